//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text generators (Anthropic, offline templates, mock)
//! - `postgres` - sqlx-backed pitch repository
//! - `memory` - In-memory pitch repository
//! - `terminal` - Stdio console and the session management menu

pub mod ai;
pub mod memory;
pub mod postgres;
pub mod terminal;

pub use ai::{AnthropicConfig, AnthropicTextGenerator, MockTextGenerator, OfflineTextGenerator};
pub use memory::InMemoryPitchRepository;
pub use postgres::PostgresPitchRepository;
pub use terminal::{ScriptedConsole, SessionMenu, StdioConsole};
