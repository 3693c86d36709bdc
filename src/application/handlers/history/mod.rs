//! Persisted pitch history queries.

mod get_conversation;
mod list_pitch_history;

pub use get_conversation::{GetConversationHandler, GetConversationQuery};
pub use list_pitch_history::{ListPitchHistoryHandler, ListPitchHistoryQuery, MAX_HISTORY_LIMIT};
