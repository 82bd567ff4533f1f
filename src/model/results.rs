use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::manager::VoteManager;

use super::candidate::CandidateId;

/// The standing of a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: CandidateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub vacant: bool,
    pub votes: u64,
}

impl Display for CandidateResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} (#{})", self.id)?,
            None => write!(f, "#{}", self.id)?,
        }
        if self.vacant {
            write!(f, " [vacant]")?;
        }
        write!(
            f,
            ": {} vote{}",
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

/// A snapshot of a session: its state and every candidate's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResults {
    pub is_open: bool,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub max_votes: u32,
    pub ballots_accepted: u64,
    pub voters: usize,
    /// Ordered by votes, most first; ties keep the primary-then-vacant order.
    pub candidates: Vec<CandidateResult>,
}

impl SessionResults {
    pub fn from_manager(manager: &VoteManager) -> Self {
        let mut candidates = manager
            .candidates()
            .map(|candidate| CandidateResult {
                id: candidate.id,
                name: candidate.name.clone(),
                vacant: candidate.vacant,
                // Every candidate has an entry by construction.
                votes: manager.vote_count().votes(candidate.id).unwrap_or_default(),
            })
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| b.votes.cmp(&a.votes));

        Self {
            is_open: manager.is_open(),
            opened_at: manager.opened_at(),
            closed_at: manager.closed_at(),
            max_votes: manager.max_votes(),
            ballots_accepted: manager.ballots_accepted(),
            voters: manager.voter_count(),
            candidates,
        }
    }

    /// Votes for `id`, if it is a candidate.
    pub fn votes(&self, id: CandidateId) -> Option<u64> {
        self.candidates
            .iter()
            .find(|result| result.id == id)
            .map(|result| result.votes)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::candidate::Candidate;

    use super::*;

    #[test]
    fn ordered_by_votes_then_pool_order() {
        let mut vm = VoteManager::example();
        vm.cast_vote([2, 5], "a").unwrap();
        vm.cast_vote([2, 3], "b").unwrap();
        vm.cast_vote([3], "c").unwrap();
        vm.close_voting_session();

        let results = vm.results();
        let order = results
            .candidates
            .iter()
            .map(|result| result.id.0)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![2, 3, 5, 1, 4, 6]);
        assert!(!results.is_open);
        assert!(results.closed_at.is_some());
        assert_eq!(results.ballots_accepted, 3);
        assert_eq!(results.voters, 3);
        assert_eq!(results.max_votes, 3);
        assert_eq!(results.votes(CandidateId(2)), Some(2));
        assert_eq!(results.votes(CandidateId(42)), None);
    }

    #[test]
    fn display() {
        let result = CandidateResult {
            id: CandidateId(1),
            name: Some("Ada".to_string()),
            vacant: false,
            votes: 3,
        };
        assert_eq!(result.to_string(), "Ada (#1): 3 votes");

        let result = CandidateResult {
            id: CandidateId(4),
            name: None,
            vacant: true,
            votes: 1,
        };
        assert_eq!(result.to_string(), "#4 [vacant]: 1 vote");
    }

    #[test]
    fn duplicate_ids_report_shared_tally() {
        let vm = VoteManager::new(vec![Candidate::new(1)], vec![Candidate::vacant(1)], 1);
        let results = vm.results();
        assert_eq!(results.candidates.len(), 2);
        assert!(results.candidates.iter().all(|result| result.votes == 0));
    }

    #[test]
    fn serializes_to_json() {
        let vm = VoteManager::example();
        let json = serde_json::to_value(vm.results()).unwrap();
        assert_eq!(json["is_open"], true);
        assert_eq!(json["closed_at"], serde_json::Value::Null);
        assert_eq!(json["candidates"][0]["name"], "Ada");
        assert_eq!(json["candidates"].as_array().map(Vec::len), Some(6));
    }
}
