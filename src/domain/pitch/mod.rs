//! Pitch domain module.
//!
//! The pitch attributes a founder brings to the tank, the Q&A exchanges that
//! follow, and the transcript rendering shared by live and persisted views.

mod pitch_data;
mod qa_round;
mod transcript;

pub use pitch_data::{
    format_dollars, PitchData, PitchSubmission, AMOUNT_INVESTED, PERCENTAGE_EQUITY, PITCH_TEXT,
};
pub use qa_round::QaRound;
pub use transcript::{render_transcript, TranscriptEntry};
