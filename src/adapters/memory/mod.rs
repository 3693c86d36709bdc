//! In-memory adapters.

mod pitch_repository;

pub use pitch_repository::InMemoryPitchRepository;
