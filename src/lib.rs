#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;

pub use config::Config;
pub use error::{BallotError, Error, Result};
pub use manager::{SharedVoteManager, VacancyRule, VoteManager};
