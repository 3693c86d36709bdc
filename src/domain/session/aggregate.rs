//! Session aggregate entity.
//!
//! A session is one pitch conversation: the pitch attributes plus the ordered
//! Q&A exchanges that followed. Sessions are owned exclusively by the
//! [`SessionRegistry`](super::SessionRegistry); callers receive snapshots and
//! address sessions by id.

use crate::domain::foundation::{SessionId, SessionNumber, Timestamp};
use crate::domain::pitch::{PitchData, QaRound};
use serde::{Deserialize, Serialize};

/// Session aggregate - one pitch conversation.
///
/// # Invariants
///
/// - `id` and `number` never change after construction
/// - `qa_rounds.len() == current_round - 1`
/// - round numbers are contiguous, starting at 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Number assigned from the registry counter.
    number: SessionNumber,

    /// Pitch attributes (mutable via continue).
    pitch_data: PitchData,

    /// Q&A exchanges in chronological order.
    qa_rounds: Vec<QaRound>,

    /// Number the next appended round will receive.
    current_round: u32,

    /// When the session was created.
    created_at: Timestamp,

    /// When pitch data was last merged into the session.
    updated_at: Option<Timestamp>,
}

impl Session {
    /// Create a fresh session with no Q&A history.
    pub(crate) fn new(id: SessionId, number: SessionNumber, pitch_data: PitchData) -> Self {
        Self {
            id,
            number,
            pitch_data,
            qa_rounds: Vec::new(),
            current_round: 1,
            created_at: Timestamp::now(),
            updated_at: None,
        }
    }

    /// Build the replacement a refresh installs: same pitch, new identity,
    /// empty Q&A history.
    pub(crate) fn successor(&self, id: SessionId, number: SessionNumber) -> Self {
        Self::new(id, number, self.pitch_data.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the session number.
    pub fn number(&self) -> SessionNumber {
        self.number
    }

    /// Returns the pitch attributes.
    pub fn pitch_data(&self) -> &PitchData {
        &self.pitch_data
    }

    /// Returns the Q&A history in chronological order.
    pub fn qa_rounds(&self) -> &[QaRound] {
        &self.qa_rounds
    }

    /// Returns the number the next appended round will receive.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when pitch data was last merged, if ever.
    pub fn updated_at(&self) -> Option<&Timestamp> {
        self.updated_at.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge pitch updates; later keys overwrite earlier ones.
    pub(crate) fn merge_pitch(&mut self, updates: PitchData) {
        self.pitch_data.merge(updates);
        self.updated_at = Some(Timestamp::now());
    }

    /// Append a Q&A exchange numbered with the current round, then advance.
    pub(crate) fn record_round(
        &mut self,
        shark: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> QaRound {
        let round = QaRound::new(shark, question, answer, self.current_round);
        self.qa_rounds.push(round.clone());
        self.current_round += 1;
        round
    }
}
