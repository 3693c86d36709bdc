//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `pitch` - Pitch attributes, Q&A rounds, transcript rendering
//! - `session` - Session lifecycle and the session registry
//! - `panel` - Investor roster and verdicts

pub mod foundation;
pub mod panel;
pub mod pitch;
pub mod session;
