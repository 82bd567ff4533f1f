use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SelectionFault;
use crate::model::candidate::{Candidate, CandidateId};

/// How candidates in the vacant pool depend on other candidates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacancyRule {
    /// The vacancy at position `k` needs the primary candidate at position `k`.
    /// A vacancy without a primary counterpart can never be chosen.
    #[default]
    Paired,
    /// The vacancy at position `k > 0` needs the vacancy at position `k - 1`,
    /// so vacancies fill in order. The first vacancy is unrestricted.
    Sequential,
    /// Vacancies are independent of everything else.
    Unrestricted,
}

/// What a candidate needs on the same ballot to be selectable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Requirement {
    Candidate(CandidateId),
    Unsatisfiable,
}

impl Requirement {
    /// Check the requirement for `candidate` against everything on the ballot.
    pub fn check(
        self,
        candidate: CandidateId,
        ballot: &HashSet<CandidateId>,
    ) -> Result<(), SelectionFault> {
        match self {
            Self::Candidate(requires) if ballot.contains(&requires) => Ok(()),
            Self::Candidate(requires) => Err(SelectionFault::MissingPrerequisite {
                candidate,
                requires,
            }),
            Self::Unsatisfiable => Err(SelectionFault::NoCounterpart { candidate }),
        }
    }
}

/// Requirements by candidate. Candidates without an entry are unrestricted.
pub type Prerequisites = HashMap<CandidateId, Requirement>;

impl VacancyRule {
    /// Derive the prerequisite of every restricted candidate. An explicit
    /// [`Candidate::requires`] takes precedence over the rule.
    pub fn prerequisites(self, primary: &[Candidate], vacant: &[Candidate]) -> Prerequisites {
        let mut prerequisites = Prerequisites::new();

        for (position, candidate) in vacant.iter().enumerate() {
            let requirement = match self {
                Self::Paired => Some(
                    primary
                        .get(position)
                        .map_or(Requirement::Unsatisfiable, |counterpart| {
                            Requirement::Candidate(counterpart.id)
                        }),
                ),
                Self::Sequential => position
                    .checked_sub(1)
                    .map(|previous| Requirement::Candidate(vacant[previous].id)),
                Self::Unrestricted => None,
            };
            if let Some(requirement) = requirement {
                prerequisites.insert(candidate.id, requirement);
            }
        }

        for candidate in primary.iter().chain(vacant) {
            if let Some(requires) = candidate.requires {
                prerequisites.insert(candidate.id, Requirement::Candidate(requires));
            }
        }

        prerequisites
    }
}
