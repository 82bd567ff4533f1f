use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::LevelFilter;
use log4rs_dynamic_filters::DynamicLevelFilter;

use crate::error::{Error, Result};

/// Log target for per-ballot lines, routed to its own appender in `log4rs.yaml`.
pub const BALLOT_TARGET: &str = "vote_manager::ballots";

/// Name of the dynamic filter guarding that appender.
pub const BALLOT_FILTER: &str = "ballots";

/// A unique identifier for a single `cast_vote` call, used to correlate its
/// log lines.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct BallotTicket(pub usize);

impl Display for BallotTicket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BallotTicket {
    /// Atomically get the next ticket. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> BallotTicket {
        static BALLOT_TICKET_COUNTER: AtomicUsize = AtomicUsize::new(0);
        BallotTicket(BALLOT_TICKET_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Initialise `log4rs` from a YAML file, with the dynamic filters available.
pub fn init_logging(path: impl AsRef<Path>) -> Result<()> {
    log4rs::init_file(path, log4rs_dynamic_filters::default_deserializers())
        .map_err(|e| Error::Logging(e.to_string()))
}

/// Change the level of per-ballot logging at runtime.
pub fn set_ballot_logging(level: LevelFilter) {
    DynamicLevelFilter::set(BALLOT_FILTER, level);
}
