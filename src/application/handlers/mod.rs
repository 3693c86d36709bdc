//! Application handlers.
//!
//! - `round` - the interactive pitch round
//! - `history` - queries over persisted pitches

pub mod history;
pub mod round;

pub use history::{
    GetConversationHandler, GetConversationQuery, ListPitchHistoryHandler, ListPitchHistoryQuery,
};
pub use round::{InteractiveRoundController, RoundCommand, RoundError, RoundOutcome};
