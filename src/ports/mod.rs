//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - produces pitches, questions, verdicts and recaps
//! - `PitchRepository` - durable append-only record of pitches and Q&A
//! - `Console` - line-oriented user I/O for the interactive round

mod console;
mod pitch_repository;
mod text_generator;

pub use console::Console;
pub use pitch_repository::{
    PitchRepository, QaEntry, StoredConversation, StoredPitch, StoredQaEntry,
};
pub use text_generator::{context, GenerationError, GenerationRequest, TaskKind, TextGenerator};
