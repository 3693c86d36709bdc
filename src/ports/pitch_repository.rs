//! Pitch repository port - durable, append-only record of pitches and Q&A.
//!
//! The in-memory session registry stays authoritative for the interactive
//! flow. This port only keeps a durable copy; callers treat its failures as
//! warnings rather than aborting the round.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, PitchRecordId, SessionId, Timestamp};
use crate::domain::pitch::{render_transcript, PitchData, PitchSubmission, TranscriptEntry};

/// Repository port for persisted pitch records.
#[async_trait]
pub trait PitchRepository: Send + Sync {
    /// Store a pitch for a session and return its record id.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (including a duplicate
    ///   session id)
    async fn append_pitch(
        &self,
        session_id: &SessionId,
        pitch: &PitchSubmission,
    ) -> Result<PitchRecordId, DomainError>;

    /// Append one Q&A exchange to a stored pitch.
    ///
    /// # Errors
    ///
    /// - `PitchNotFound` if the record id is unknown
    /// - `DatabaseError` on persistence failure
    async fn append_qa(&self, pitch_id: PitchRecordId, entry: &QaEntry) -> Result<(), DomainError>;

    /// Load a stored pitch with its Q&A history ordered by creation.
    ///
    /// Returns `None` if no pitch was stored for the session.
    async fn find_conversation(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<StoredConversation>, DomainError>;

    /// Most recently stored pitches, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredPitch>, DomainError>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), DomainError>;
}

/// A Q&A exchange to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaEntry {
    pub shark: String,
    pub question: String,
    pub answer: String,
    pub round_number: u32,
}

/// A persisted pitch record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPitch {
    pub id: PitchRecordId,
    pub session_id: SessionId,
    pub pitch_text: String,
    pub amount_invested: i64,
    pub percentage_equity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StoredPitch {
    /// Pitch data view of this record, for transcript rendering.
    pub fn pitch_data(&self) -> PitchData {
        PitchData::from_pitch(
            self.pitch_text.clone(),
            self.amount_invested,
            i64::from(self.percentage_equity),
        )
    }
}

/// A persisted Q&A exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQaEntry {
    pub id: i64,
    pub pitch_id: PitchRecordId,
    pub shark: String,
    pub question: String,
    pub answer: String,
    pub round_number: u32,
    pub created_at: Timestamp,
}

impl TranscriptEntry for StoredQaEntry {
    fn shark(&self) -> &str {
        &self.shark
    }
    fn question(&self) -> &str {
        &self.question
    }
    fn answer(&self) -> &str {
        &self.answer
    }
    fn round_number(&self) -> u32 {
        self.round_number
    }
}

/// A stored pitch with its full Q&A history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConversation {
    pub pitch: StoredPitch,
    pub qa_history: Vec<StoredQaEntry>,
    /// Rendered transcript (pitch lines and Q&A blocks, no session header).
    pub conversation_summary: String,
}

impl StoredConversation {
    /// Assembles a conversation and renders its transcript.
    pub fn assemble(pitch: StoredPitch, qa_history: Vec<StoredQaEntry>) -> Self {
        let conversation_summary = render_transcript(None, &pitch.pitch_data(), &qa_history);
        Self {
            pitch,
            qa_history,
            conversation_summary,
        }
    }
}
