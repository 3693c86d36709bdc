//! Session registry - the single source of truth for live sessions.
//!
//! Owns every live [`Session`] plus the monotonic numbering counter. All
//! lifecycle reshaping (continue, refresh, reset) and the summary projections
//! consumed by the verdict stage go through here.
//!
//! # Lifecycle policies
//!
//! - Refresh always mints a new id and number; it never mutates in place.
//! - Reset is the only operation that rewinds the counter.
//! - Continue and refresh-or-create fall back to create on an unknown id so
//!   the interactive flow is never blocked by a mistyped id.
//! - Appending a round to an unknown id is silently ignored.
//!
//! The registry is plain single-owner state. Wrap it in
//! [`SharedSessionRegistry`](super::SharedSessionRegistry) to share it across
//! tasks.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::{ConversationSummary, Session, SessionError, SessionListing, SessionStats};
use crate::domain::foundation::{SessionId, SessionNumber};
use crate::domain::pitch::{PitchData, QaRound};

/// In-memory store of live sessions plus the numbering sequence.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    next_number: SessionNumber,
}

impl SessionRegistry {
    /// Creates an empty registry whose first session will be numbered 1.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_number: SessionNumber::FIRST,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates a session with the next number and empty Q&A history.
    pub fn create(&mut self, pitch_data: PitchData) -> SessionId {
        let (id, number) = self.allocate();
        self.sessions.insert(id, Session::new(id, number, pitch_data));
        info!(session_id = %id, session_number = %number, "Session created");
        id
    }

    /// Merges pitch updates into a live session and returns the same id.
    ///
    /// An unknown id falls back to [`create`](Self::create) with `updates`.
    pub fn continue_session(&mut self, session_id: &SessionId, updates: PitchData) -> SessionId {
        match self.sessions.get_mut(session_id) {
            Some(session) => {
                session.merge_pitch(updates);
                info!(
                    session_id = %session_id,
                    session_number = %session.number(),
                    "Continuing existing session"
                );
                *session_id
            }
            None => {
                warn!(session_id = %session_id, "Session not found, creating new session");
                self.create(updates)
            }
        }
    }

    /// Replaces a live session with a fresh one carrying the same pitch.
    ///
    /// The old id is removed and becomes invalid.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `session_id` is not live; the registry is unchanged
    pub fn refresh(&mut self, session_id: &SessionId) -> Result<SessionId, SessionError> {
        let old = self
            .sessions
            .get(session_id)
            .ok_or_else(|| SessionError::not_found(*session_id))?;

        let (new_id, number) = self.peek_allocation();
        let replacement = old.successor(new_id, number);
        let old_number = old.number();

        self.sessions.remove(session_id);
        self.sessions.insert(new_id, replacement);
        self.next_number = number.next();

        info!(
            old_session_id = %session_id,
            old_session_number = %old_number,
            session_id = %new_id,
            session_number = %number,
            "Session refreshed"
        );
        Ok(new_id)
    }

    /// Refreshes a live session and merges `updates` into the replacement.
    ///
    /// An unknown id falls back to [`create`](Self::create) with `updates`.
    pub fn refresh_or_create(&mut self, session_id: &SessionId, updates: PitchData) -> SessionId {
        match self.refresh(session_id) {
            Ok(new_id) => {
                if !updates.is_empty() {
                    if let Some(session) = self.sessions.get_mut(&new_id) {
                        session.merge_pitch(updates);
                    }
                }
                new_id
            }
            Err(_) => {
                warn!(session_id = %session_id, "Session not found, creating new session");
                self.create(updates)
            }
        }
    }

    /// Discards every session, rewinds numbering, and creates session 1.
    pub fn reset(&mut self) -> SessionId {
        let discarded = self.sessions.len();
        self.sessions.clear();
        self.next_number = SessionNumber::FIRST;
        info!(discarded, "Registry reset");
        self.create(PitchData::new())
    }

    /// Removes a session if present. Idempotent.
    ///
    /// Returns whether a session was removed.
    pub fn cleanup(&mut self, session_id: &SessionId) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            debug!(session_id = %session_id, "Session cleaned up");
        }
        removed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Q&A
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a Q&A round to a live session.
    ///
    /// Returns the appended round, or `None` (and changes nothing) when the
    /// session is not live.
    pub fn add_qa_round(
        &mut self,
        session_id: &SessionId,
        shark: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Option<QaRound> {
        let session = self.sessions.get_mut(session_id)?;
        let round = session.record_round(shark, question, answer);
        debug!(
            session_id = %session_id,
            round_number = round.round_number,
            shark = %round.shark,
            "Q&A round recorded"
        );
        Some(round)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Looks up a live session.
    pub fn get(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Looks up a live session by number.
    pub fn get_by_number(&self, number: SessionNumber) -> Option<&Session> {
        self.sessions.values().find(|s| s.number() == number)
    }

    /// Builds the conversation summary for a live session.
    pub fn summarize(&self, session_id: &SessionId) -> Option<ConversationSummary> {
        self.get(session_id).map(ConversationSummary::of)
    }

    /// Lists every live session exactly once, ordered by number.
    pub fn list_active(&self) -> Vec<SessionListing> {
        let mut listings: Vec<SessionListing> =
            self.sessions.values().map(SessionListing::of).collect();
        listings.sort_by_key(|l| l.session_number);
        listings
    }

    /// Registry-wide statistics.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_active_sessions: self.sessions.len(),
            total_qa_rounds: self.sessions.values().map(|s| s.qa_rounds().len()).sum(),
            next_session_number: self.next_number,
            sessions: self.list_active(),
        }
    }

    /// Number the next created session will receive.
    pub fn next_session_number(&self) -> SessionNumber {
        self.next_number
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true when no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Reserves a fresh id and the next number, advancing the counter.
    fn allocate(&mut self) -> (SessionId, SessionNumber) {
        let allocation = self.peek_allocation();
        self.next_number = allocation.1.next();
        allocation
    }

    /// A fresh id not aliased to any live session, plus the current counter.
    fn peek_allocation(&self) -> (SessionId, SessionNumber) {
        let mut id = SessionId::new();
        while self.sessions.contains_key(&id) {
            id = SessionId::new();
        }
        (id, self.next_number)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
