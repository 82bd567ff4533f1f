use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Opaque voter token. The caller guarantees one token per real voter.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VoterId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VoterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VoterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&VoterId> for VoterId {
    fn from(id: &VoterId) -> Self {
        id.clone()
    }
}

/// Everyone who has had a ballot accepted this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoterRegistry {
    voted: HashSet<VoterId>,
}

impl VoterRegistry {
    /// Record that `voter` has voted. Returns `false`, leaving the registry
    /// untouched, if they already had.
    pub fn register(&mut self, voter: VoterId) -> bool {
        self.voted.insert(voter)
    }
}

impl Deref for VoterRegistry {
    type Target = HashSet<VoterId>;

    fn deref(&self) -> &Self::Target {
        &self.voted
    }
}
