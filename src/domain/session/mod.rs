//! Session domain module.
//!
//! Handles the pitch session lifecycle: creation, continuation, refresh
//! (keep the pitch, restart Q&A under a new identity), full reset (restart
//! numbering at 1), and the summary projections used at verdict time.

mod aggregate;
mod errors;
mod projections;
mod registry;
mod shared;

pub use aggregate::Session;
pub use errors::SessionError;
pub use projections::{ConversationSummary, SessionListing, SessionStats, LISTING_PITCH_CHARS};
pub use registry::SessionRegistry;
pub use shared::SharedSessionRegistry;
