//! Interactive round: answer-line commands and the round controller.

mod command;
mod controller;

pub use command::{RoundCommand, HELP_TEXT};
pub use controller::{InteractiveRoundController, RoundError, RoundOutcome, ANSWER_PROMPT};
