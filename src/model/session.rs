use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{RejectionKind, Result},
    manager::{VacancyRule, VoteManager},
};

use super::{candidate::Candidate, results::SessionResults, selection::Selection, voter::VoterId};

/// A whole session described as data: the candidates, the limits, and the
/// ballots to cast in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSpec {
    /// Overrides the configured maximum if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_votes: Option<u32>,
    /// Overrides the configured vacancy rule if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacancy_rule: Option<VacancyRule>,
    pub primary: Vec<Candidate>,
    #[serde(default)]
    pub vacant: Vec<Candidate>,
    #[serde(default)]
    pub ballots: Vec<BallotSpec>,
    /// Close the session after the last ballot.
    #[serde(default = "default_close")]
    pub close: bool,
}

fn default_close() -> bool {
    true
}

/// One voter's ballot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotSpec {
    pub voter: VoterId,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// A ballot that was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub voter: VoterId,
    pub kind: RejectionKind,
    pub message: String,
}

/// Everything that came out of running a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub results: SessionResults,
    pub rejections: Vec<Rejection>,
}

impl SessionSpec {
    /// Read a session from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    /// Open a manager for this session, letting the file override `config`.
    pub fn manager(&self, config: &Config) -> VoteManager {
        VoteManager::with_rule(
            self.primary.clone(),
            self.vacant.clone(),
            self.max_votes.unwrap_or(config.max_votes()),
            self.vacancy_rule.unwrap_or(config.vacancy_rule()),
        )
    }

    /// Cast every ballot in order and report the outcome.
    pub fn run(self, config: &Config) -> SessionReport {
        let mut manager = self.manager(config);
        let mut rejections = Vec::new();

        for ballot in self.ballots {
            if let Err(err) = manager.cast_vote(ballot.selections, &ballot.voter) {
                rejections.push(Rejection {
                    voter: ballot.voter,
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }

        if self.close {
            manager.close_voting_session();
        }

        SessionReport {
            results: manager.results(),
            rejections,
        }
    }
}
