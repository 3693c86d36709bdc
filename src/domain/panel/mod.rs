//! Panel domain module.
//!
//! The roster of simulated investors and the verdicts they return.

mod shark;
mod verdict;

pub use shark::{Panel, Shark};
pub use verdict::{Offers, Verdict};

/// Name used for the moderator who recaps the round.
pub const MODERATOR: &str = "Moderator";
