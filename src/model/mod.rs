pub mod candidate;
pub mod results;
pub mod selection;
pub mod session;
pub mod vote_count;
pub mod voter;
