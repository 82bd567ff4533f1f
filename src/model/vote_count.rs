use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, CandidateId};

/// The running total for a single candidate.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub value: u64,
}

/// Tallies for every candidate in the session, keyed by candidate ID.
///
/// The set of keys is fixed at construction; only the values change.
/// Serialises as a JSON object keyed by the decimal ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteCount {
    tallies: HashMap<CandidateId, Tally>,
}

impl VoteCount {
    /// Build a zeroed count with one entry per candidate, primary pool first.
    pub fn create_empty_vote_results(primary: &[Candidate], vacant: &[Candidate]) -> Self {
        let tallies = primary
            .iter()
            .chain(vacant)
            .map(|candidate| (candidate.id, Tally::default()))
            .collect();
        Self { tallies }
    }

    /// Add one vote for `id`, returning the new total, or `None` if `id` is
    /// not a candidate in this count.
    pub fn increment(&mut self, id: CandidateId) -> Option<u64> {
        let tally = self.tallies.get_mut(&id)?;
        tally.value += 1;
        Some(tally.value)
    }

    /// Votes for `id`, if it is a candidate.
    pub fn votes(&self, id: CandidateId) -> Option<u64> {
        self.tallies.get(&id).map(|tally| tally.value)
    }

    /// Sum of every tally.
    pub fn total(&self) -> u64 {
        self.tallies.values().map(|tally| tally.value).sum()
    }
}

impl Deref for VoteCount {
    type Target = HashMap<CandidateId, Tally>;

    fn deref(&self) -> &Self::Target {
        &self.tallies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_cover_both_pools() {
        let primary = Candidate::primary_examples();
        let vacant = Candidate::vacant_examples();
        let count = VoteCount::create_empty_vote_results(&primary, &vacant);

        assert_eq!(count.len(), primary.len() + vacant.len());
        assert!(count.values().all(|tally| tally.value == 0));
        for candidate in primary.iter().chain(&vacant) {
            assert_eq!(count.votes(candidate.id), Some(0));
        }
        assert_eq!(count.total(), 0);
    }

    #[test]
    fn empty_pools() {
        let count = VoteCount::create_empty_vote_results(&[], &[]);
        assert!(count.is_empty());
    }

    #[test]
    fn duplicate_ids_collapse() {
        let count =
            VoteCount::create_empty_vote_results(&[Candidate::new(1)], &[Candidate::vacant(1)]);
        assert_eq!(count.len(), 1);
    }

    #[test]
    fn increment_touches_only_one_candidate() {
        let mut count = VoteCount::create_empty_vote_results(
            &Candidate::primary_examples(),
            &Candidate::vacant_examples(),
        );
        let before = count.clone();

        assert_eq!(count.increment(CandidateId(1)), Some(1));
        assert_eq!(count.increment(CandidateId(1)), Some(2));

        assert_eq!(count.keys().len(), before.keys().len());
        for (id, tally) in before.iter() {
            let expected = if *id == CandidateId(1) {
                tally.value + 2
            } else {
                tally.value
            };
            assert_eq!(count.votes(*id), Some(expected));
        }
    }

    #[test]
    fn increment_unknown_candidate() {
        let mut count = VoteCount::create_empty_vote_results(&Candidate::primary_examples(), &[]);
        let before = count.clone();
        assert_eq!(count.increment(CandidateId(1337)), None);
        assert_eq!(count, before);
    }

    #[test]
    fn serializes_with_text_keys() {
        let mut count = VoteCount::create_empty_vote_results(&[Candidate::new(1)], &[]);
        count.increment(CandidateId(1));
        let json = serde_json::to_value(&count).unwrap();
        assert_eq!(json, serde_json::json!({ "1": { "value": 1 } }));

        let back: VoteCount = serde_json::from_value(json).unwrap();
        assert_eq!(back, count);
    }
}
