//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPitchRepository` - Pitch sessions and Q&A history

mod pitch_repository;

pub use pitch_repository::PostgresPitchRepository;
