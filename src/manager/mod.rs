mod shared;
mod vacancy;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

pub use shared::SharedVoteManager;
pub use vacancy::{Prerequisites, Requirement, VacancyRule};

use crate::{
    config::Config,
    error::{BallotError, SelectionFault},
    logging::{BallotTicket, BALLOT_TARGET},
    model::{
        candidate::{Candidate, CandidateId},
        results::SessionResults,
        selection::Selection,
        vote_count::VoteCount,
        voter::{VoterId, VoterRegistry},
    },
};

/// Validates and tallies the ballots of a single voting session.
///
/// A manager is built once with the full candidate universe, accepts ballots
/// through [`VoteManager::cast_vote`] while open, and is closed exactly once.
/// It is not internally synchronised; wrap it in a [`SharedVoteManager`] to
/// accept ballots from several threads.
#[derive(Debug, Clone)]
pub struct VoteManager {
    primary: Vec<Candidate>,
    vacant: Vec<Candidate>,
    max_votes: u32,
    prerequisites: Prerequisites,
    vote_count: VoteCount,
    voters: VoterRegistry,
    ballots_accepted: u64,
    is_open: bool,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl VoteManager {
    /// Open a session using the default [`VacancyRule`].
    pub fn new(primary: Vec<Candidate>, vacant: Vec<Candidate>, max_votes: u32) -> Self {
        Self::with_rule(primary, vacant, max_votes, VacancyRule::default())
    }

    /// Open a session with the limits taken from `config`.
    pub fn from_config(primary: Vec<Candidate>, vacant: Vec<Candidate>, config: &Config) -> Self {
        Self::with_rule(primary, vacant, config.max_votes(), config.vacancy_rule())
    }

    /// Open a session. Pool contents are not validated; if IDs repeat, the
    /// repeated candidates share a tally.
    pub fn with_rule(
        primary: Vec<Candidate>,
        vacant: Vec<Candidate>,
        max_votes: u32,
        rule: VacancyRule,
    ) -> Self {
        let vote_count = Self::create_empty_vote_results(&primary, &vacant);
        let expected = primary.len() + vacant.len();
        if vote_count.len() != expected {
            warn!(
                "{} candidate ID(s) appear more than once; their tallies are shared",
                expected - vote_count.len()
            );
        }
        let prerequisites = rule.prerequisites(&primary, &vacant);

        info!(
            "Voting session opened: {} primary, {} vacant, at most {max_votes} vote(s) per ballot, {rule:?} vacancies",
            primary.len(),
            vacant.len(),
        );

        Self {
            primary,
            vacant,
            max_votes,
            prerequisites,
            vote_count,
            voters: VoterRegistry::default(),
            ballots_accepted: 0,
            is_open: true,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    /// Zeroed tallies for every candidate in both pools.
    pub fn create_empty_vote_results(primary: &[Candidate], vacant: &[Candidate]) -> VoteCount {
        VoteCount::create_empty_vote_results(primary, vacant)
    }

    /// Is every selection a candidate in this session?
    pub fn check_if_all_candidates_in_vote_are_valid(&self, selections: &[Selection]) -> bool {
        self.first_invalid(selections).is_none()
    }

    /// Add one vote for `candidate`. Leaves every tally untouched if it is
    /// not a candidate in this session.
    pub fn increase_vote_for_candidate(&mut self, candidate: CandidateId) -> Result<(), BallotError> {
        self.vote_count
            .increment(candidate)
            .map(|_| ())
            .ok_or_else(|| {
                BallotError::InvalidSelection(SelectionFault::UnknownCandidate(
                    candidate.to_string(),
                ))
            })
    }

    /// Validate a ballot and, only if every check passes, record the voter
    /// and add one vote per selection. A rejected ballot changes nothing.
    pub fn cast_vote<I, V>(&mut self, selections: I, voter: V) -> Result<(), BallotError>
    where
        I: IntoIterator,
        I::Item: Into<Selection>,
        V: Into<VoterId>,
    {
        let ticket = BallotTicket::next();
        let selections = selections.into_iter().map(Into::into).collect::<Vec<_>>();
        let voter = voter.into();
        info!(
            target: BALLOT_TARGET,
            "->ballot{ticket} voter {voter}, {} selection(s)",
            selections.len()
        );

        let chosen = match self.validate(&selections, &voter) {
            Ok(chosen) => chosen,
            Err(err) => {
                warn!(target: BALLOT_TARGET, "<-ballot{ticket} rejected: {err}");
                return Err(err);
            }
        };

        self.voters.register(voter);
        for candidate in chosen {
            // Already validated, so this cannot fail.
            self.increase_vote_for_candidate(candidate)?;
        }
        self.ballots_accepted += 1;
        info!(target: BALLOT_TARGET, "<-ballot{ticket} accepted");
        Ok(())
    }

    /// Stop accepting ballots. Closing an already closed session does nothing.
    pub fn close_voting_session(&mut self) {
        if !self.is_open {
            warn!("Voting session is already closed");
            return;
        }
        self.is_open = false;
        self.closed_at = Some(Utc::now());
        info!(
            "Voting session closed: {} ballot(s) accepted",
            self.ballots_accepted
        );
    }

    /// Run every check in order without mutating anything, returning the
    /// normalised selections.
    fn validate(
        &self,
        selections: &[Selection],
        voter: &VoterId,
    ) -> Result<Vec<CandidateId>, BallotError> {
        if !self.is_open {
            return Err(BallotError::VotingClosed);
        }

        if self.voters.contains(voter) {
            return Err(BallotError::DuplicateVoter {
                voter: voter.clone(),
            });
        }

        // Blank ballots always fit.
        if selections.len() > self.max_votes as usize {
            return Err(BallotError::TooManyVotes {
                count: selections.len(),
                max: self.max_votes,
            });
        }

        let mut ballot = HashSet::with_capacity(selections.len());
        for candidate in selections.iter().filter_map(Selection::normalize) {
            if !ballot.insert(candidate) {
                return Err(BallotError::DuplicateSelection { candidate });
            }
        }

        if let Some(invalid) = self.first_invalid(selections) {
            return Err(BallotError::InvalidSelection(
                SelectionFault::UnknownCandidate(invalid.to_string()),
            ));
        }

        // Everything normalises now, so this keeps the ballot's order.
        let chosen = selections
            .iter()
            .filter_map(Selection::normalize)
            .collect::<Vec<_>>();
        for candidate in &chosen {
            if let Some(requirement) = self.prerequisites.get(candidate) {
                requirement
                    .check(*candidate, &ballot)
                    .map_err(BallotError::InvalidSelection)?;
            }
        }

        Ok(chosen)
    }

    fn first_invalid<'a>(&self, selections: &'a [Selection]) -> Option<&'a Selection> {
        selections.iter().find(|selection| {
            !selection
                .normalize()
                .map_or(false, |id| self.vote_count.contains_key(&id))
        })
    }

    pub fn vote_count(&self) -> &VoteCount {
        &self.vote_count
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn max_votes(&self) -> u32 {
        self.max_votes
    }

    pub fn ballots_accepted(&self) -> u64 {
        self.ballots_accepted
    }

    pub fn has_voted(&self, voter: &VoterId) -> bool {
        self.voters.contains(voter)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// All candidates, primary pool first.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.primary.iter().chain(&self.vacant)
    }

    /// Snapshot of the current standings.
    pub fn results(&self) -> SessionResults {
        SessionResults::from_manager(self)
    }
}
