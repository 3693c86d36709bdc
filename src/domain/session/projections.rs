//! Read-only projections over registry state.

use serde::Serialize;

use super::Session;
use crate::domain::foundation::{SessionId, SessionNumber, Timestamp};
use crate::domain::pitch::{render_transcript, PitchData, QaRound};

/// Characters of pitch text shown in a listing before the ellipsis.
pub const LISTING_PITCH_CHARS: usize = 50;

/// Conversation summary handed to the verdict stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSummary {
    pub session_id: SessionId,
    pub session_number: SessionNumber,
    pub pitch_data: PitchData,
    pub qa_rounds: Vec<QaRound>,
    /// Rendered transcript: header, pitch lines, then one block per round.
    pub conversation_summary: String,
    pub total_qa_rounds: usize,
}

impl ConversationSummary {
    pub(crate) fn of(session: &Session) -> Self {
        let conversation_summary = render_transcript(
            Some(format!("Session #{}", session.number())),
            session.pitch_data(),
            session.qa_rounds(),
        );

        Self {
            session_id: *session.id(),
            session_number: session.number(),
            pitch_data: session.pitch_data().clone(),
            qa_rounds: session.qa_rounds().to_vec(),
            conversation_summary,
            total_qa_rounds: session.qa_rounds().len(),
        }
    }
}

/// One line of the active-session listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionListing {
    pub session_id: SessionId,
    pub session_number: SessionNumber,
    pub created_at: Timestamp,
    /// First 50 characters of the pitch, always followed by `...`.
    pub pitch_text: String,
}

impl SessionListing {
    pub(crate) fn of(session: &Session) -> Self {
        let text = session.pitch_data().pitch_text().unwrap_or("N/A");
        let truncated: String = text.chars().take(LISTING_PITCH_CHARS).collect();

        Self {
            session_id: *session.id(),
            session_number: session.number(),
            created_at: *session.created_at(),
            pitch_text: format!("{}...", truncated),
        }
    }

    /// Multi-line block used by the session listings.
    pub fn render(&self) -> String {
        format!(
            "Session #{}\n  ID: {}\n  Pitch: {}\n  Created: {}",
            self.session_number, self.session_id, self.pitch_text, self.created_at
        )
    }
}

/// Registry-wide statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_active_sessions: usize,
    pub total_qa_rounds: usize,
    /// Number the next created session will receive.
    pub next_session_number: SessionNumber,
    pub sessions: Vec<SessionListing>,
}

impl SessionStats {
    /// Human-readable statistics block.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Total Active Sessions: {}", self.total_active_sessions),
            format!("Total Q&A Rounds: {}", self.total_qa_rounds),
            format!("Next Session Number: {}", self.next_session_number),
        ];
        if !self.sessions.is_empty() {
            lines.push(String::new());
            lines.push("Active Sessions:".to_string());
            lines.extend(
                self.sessions
                    .iter()
                    .map(|s| format!("  #{}: {}", s.session_number, s.pitch_text)),
            );
        }
        lines.join("\n")
    }
}
