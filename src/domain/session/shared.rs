//! Shared, serialized access to a [`SessionRegistry`].
//!
//! Every method runs exactly one registry operation inside one lock scope, so
//! read-then-write operations (refresh, reset, the create fallbacks, round
//! appends) are atomic with respect to each other. Reset is therefore
//! serialized against every other call and any id minted before it resolves
//! to "not found" afterwards.
//!
//! Lookups return owned snapshots; no caller holds a reference into the
//! registry across an await point.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ConversationSummary, Session, SessionError, SessionListing, SessionRegistry, SessionStats};
use crate::domain::foundation::{SessionId, SessionNumber};
use crate::domain::pitch::{PitchData, QaRound};

/// Cheaply clonable handle to one registry instance.
#[derive(Debug, Clone, Default)]
pub struct SharedSessionRegistry {
    inner: Arc<Mutex<SessionRegistry>>,
}

impl SharedSessionRegistry {
    /// Creates a handle around an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, pitch_data: PitchData) -> SessionId {
        self.inner.lock().await.create(pitch_data)
    }

    pub async fn continue_session(&self, session_id: &SessionId, updates: PitchData) -> SessionId {
        self.inner.lock().await.continue_session(session_id, updates)
    }

    pub async fn refresh(&self, session_id: &SessionId) -> Result<SessionId, SessionError> {
        self.inner.lock().await.refresh(session_id)
    }

    pub async fn refresh_or_create(&self, session_id: &SessionId, updates: PitchData) -> SessionId {
        self.inner.lock().await.refresh_or_create(session_id, updates)
    }

    pub async fn reset(&self) -> SessionId {
        self.inner.lock().await.reset()
    }

    pub async fn cleanup(&self, session_id: &SessionId) -> bool {
        self.inner.lock().await.cleanup(session_id)
    }

    pub async fn add_qa_round(
        &self,
        session_id: &SessionId,
        shark: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Option<QaRound> {
        self.inner
            .lock()
            .await
            .add_qa_round(session_id, shark, question, answer)
    }

    /// Snapshot of a live session.
    pub async fn get(&self, session_id: &SessionId) -> Option<Session> {
        self.inner.lock().await.get(session_id).cloned()
    }

    /// Snapshot of a live session, looked up by number.
    pub async fn get_by_number(&self, number: SessionNumber) -> Option<Session> {
        self.inner.lock().await.get_by_number(number).cloned()
    }

    pub async fn summarize(&self, session_id: &SessionId) -> Option<ConversationSummary> {
        self.inner.lock().await.summarize(session_id)
    }

    pub async fn list_active(&self) -> Vec<SessionListing> {
        self.inner.lock().await.list_active()
    }

    pub async fn stats(&self) -> SessionStats {
        self.inner.lock().await.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch() -> PitchData {
        PitchData::from_pitch("Edible straws", 75_000, 15)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_refresh_of_one_session_succeeds_once() {
        let registry = SharedSessionRegistry::new();
        let original = registry.create(pitch()).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move { registry.refresh(&original).await }));
        }

        let mut successes = Vec::new();
        for handle in handles {
            if let Ok(new_id) = handle.await.unwrap() {
                successes.push(new_id);
            }
        }

        assert_eq!(successes.len(), 1);
        let stats = registry.stats().await;
        assert_eq!(stats.total_active_sessions, 1);
        assert_eq!(stats.next_session_number, SessionNumber::new(3));
        assert!(registry.get(&original).await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_numbers() {
        let registry = SharedSessionRegistry::new();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move { registry.create(pitch()).await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let numbers: Vec<u32> = registry
            .list_active()
            .await
            .iter()
            .map(|l| l.session_number.value())
            .collect();
        assert_eq!(numbers, (1..=32).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn ids_minted_before_reset_are_not_found_after() {
        let registry = SharedSessionRegistry::new();
        let before = registry.create(pitch()).await;

        let fresh = registry.reset().await;

        assert!(registry.get(&before).await.is_none());
        assert!(registry.summarize(&before).await.is_none());
        assert_eq!(registry.refresh(&before).await, Err(SessionError::NotFound(before)));
        assert_eq!(
            registry.get(&fresh).await.unwrap().number(),
            SessionNumber::FIRST
        );
    }

    #[tokio::test]
    async fn snapshots_do_not_observe_later_mutations() {
        let registry = SharedSessionRegistry::new();
        let id = registry.create(pitch()).await;

        let snapshot = registry.get(&id).await.unwrap();
        registry.add_qa_round(&id, "Mark Cuban", "Q", "A").await;

        assert!(snapshot.qa_rounds().is_empty());
        assert_eq!(registry.get(&id).await.unwrap().qa_rounds().len(), 1);
    }
}
