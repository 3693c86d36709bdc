//! One question/answer exchange between a shark and the founder.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// A single Q&A exchange, numbered by its position within the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRound {
    /// Name of the shark who asked.
    pub shark: String,
    pub question: String,
    pub answer: String,
    /// The session's current round when this exchange was appended.
    pub round_number: u32,
    pub timestamp: Timestamp,
}

impl QaRound {
    /// Creates a round stamped with the current time.
    pub fn new(
        shark: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        round_number: u32,
    ) -> Self {
        Self {
            shark: shark.into(),
            question: question.into(),
            answer: answer.into(),
            round_number,
            timestamp: Timestamp::now(),
        }
    }
}
