use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{candidate::CandidateId, voter::VoterId};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from everything around the core: configuration, files, logging.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid session file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] figment::Error),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

/// Reasons a ballot is rejected. No rejected ballot changes any tally or the
/// voter registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BallotError {
    #[error("Voting is closed")]
    VotingClosed,
    #[error("User already voted: {voter}")]
    DuplicateVoter { voter: VoterId },
    #[error("Invalid amount of votes: {count} selected, at most {max} allowed")]
    TooManyVotes { count: usize, max: u32 },
    #[error("Duplicate votes for candidate {candidate}")]
    DuplicateSelection { candidate: CandidateId },
    #[error("Invalid option voted for: {0}")]
    InvalidSelection(SelectionFault),
}

impl BallotError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::VotingClosed => RejectionKind::VotingClosed,
            Self::DuplicateVoter { .. } => RejectionKind::DuplicateVoter,
            Self::TooManyVotes { .. } => RejectionKind::TooManyVotes,
            Self::DuplicateSelection { .. } => RejectionKind::DuplicateSelection,
            Self::InvalidSelection(_) => RejectionKind::InvalidSelection,
        }
    }
}

/// What exactly was wrong with an invalid selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFault {
    /// The entry does not name any candidate in this session.
    UnknownCandidate(String),
    /// The candidate needs another candidate on the same ballot.
    MissingPrerequisite {
        candidate: CandidateId,
        requires: CandidateId,
    },
    /// The candidate is a vacancy with no primary counterpart to pair with.
    NoCounterpart { candidate: CandidateId },
}

impl Display for SelectionFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCandidate(entry) => write!(f, "{entry} is not a candidate"),
            Self::MissingPrerequisite {
                candidate,
                requires,
            } => write!(
                f,
                "candidate {candidate} may only be chosen together with candidate {requires}"
            ),
            Self::NoCounterpart { candidate } => {
                write!(f, "candidate {candidate} has no primary counterpart")
            }
        }
    }
}

/// Serialisable tag for a [`BallotError`], used in reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    VotingClosed,
    DuplicateVoter,
    TooManyVotes,
    DuplicateSelection,
    InvalidSelection,
}
