use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical candidate identifier. Every ballot entry is normalised to one of
/// these before it is compared or looked up.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CandidateId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<u32>()?))
    }
}

impl From<u32> for CandidateId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A single candidate standing in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate unique ID.
    pub id: CandidateId,
    /// Display name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether this candidate stands for a vacant/alternate seat.
    #[serde(default)]
    pub vacant: bool,
    /// Another candidate that must be on the same ballot for this one to be
    /// selectable. Overrides whatever the vacancy rule would derive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<CandidateId>,
}

impl Candidate {
    /// A primary candidate with no name.
    pub fn new(id: impl Into<CandidateId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            vacant: false,
            requires: None,
        }
    }

    /// A candidate for a vacant seat with no name.
    pub fn vacant(id: impl Into<CandidateId>) -> Self {
        Self {
            vacant: true,
            ..Self::new(id)
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn requires(mut self, id: impl Into<CandidateId>) -> Self {
        self.requires = Some(id.into());
        self
    }

    /// Human-readable label: the name if present, otherwise the ID.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trips_through_text() {
        let id: CandidateId = "42".parse().unwrap();
        assert_eq!(id, CandidateId(42));
        assert_eq!(id.to_string(), "42");
        assert!("lol".parse::<CandidateId>().is_err());
        assert!("-1".parse::<CandidateId>().is_err());
    }

    #[test]
    fn deserialize_with_defaults() {
        let candidate: Candidate = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(candidate, Candidate::new(7));

        let candidate: Candidate =
            serde_json::from_str(r#"{"id": 4, "name": "Vakant1", "vacant": true, "requires": 1}"#)
                .unwrap();
        assert_eq!(candidate, Candidate::vacant(4).named("Vakant1").requires(1));
    }

    #[test]
    fn labels() {
        assert_eq!(Candidate::new(3).label(), "#3");
        assert_eq!(Candidate::new(3).named("Erlang").label(), "Erlang");
    }
}
