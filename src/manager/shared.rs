use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::BallotError,
    model::{
        results::SessionResults, selection::Selection, vote_count::VoteCount, voter::VoterId,
    },
};

use super::VoteManager;

/// A [`VoteManager`] that can be shared between threads.
///
/// Each operation holds the lock for its whole duration, so a ballot is
/// validated and applied without any other ballot interleaving.
#[derive(Debug, Clone)]
pub struct SharedVoteManager(Arc<Mutex<VoteManager>>);

impl SharedVoteManager {
    pub fn new(manager: VoteManager) -> Self {
        Self(Arc::new(Mutex::new(manager)))
    }

    /// See [`VoteManager::cast_vote`].
    pub fn cast_vote<I, V>(&self, selections: I, voter: V) -> Result<(), BallotError>
    where
        I: IntoIterator,
        I::Item: Into<Selection>,
        V: Into<VoterId>,
    {
        self.lock().cast_vote(selections, voter)
    }

    /// See [`VoteManager::close_voting_session`].
    pub fn close_voting_session(&self) {
        self.lock().close_voting_session()
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open()
    }

    /// A copy of the current tallies.
    pub fn vote_count(&self) -> VoteCount {
        self.lock().vote_count().clone()
    }

    pub fn results(&self) -> SessionResults {
        self.lock().results()
    }

    /// Run `f` against the manager while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&VoteManager) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, VoteManager> {
        // Ballots are fully validated before anything is mutated, so a panic
        // elsewhere while holding the lock cannot leave a half-applied ballot.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<VoteManager> for SharedVoteManager {
    fn from(manager: VoteManager) -> Self {
        Self::new(manager)
    }
}
