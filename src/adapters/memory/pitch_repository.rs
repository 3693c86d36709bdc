//! In-memory pitch repository.
//!
//! Backs runs without a database and the test suite. Mirrors the PostgreSQL
//! adapter's semantics: unique session ids, serial record ids, Q&A ordered
//! by insertion.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PitchRecordId, SessionId, Timestamp};
use crate::domain::pitch::PitchSubmission;
use crate::ports::{PitchRepository, QaEntry, StoredConversation, StoredPitch, StoredQaEntry};

#[derive(Debug, Default)]
struct Tables {
    pitches: Vec<StoredPitch>,
    qa_entries: Vec<StoredQaEntry>,
}

/// In-memory implementation of PitchRepository.
///
/// # Example
///
/// ```ignore
/// let repo = InMemoryPitchRepository::new();
/// let id = repo.append_pitch(&session_id, &submission).await?;
/// assert_eq!(repo.pitch_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPitchRepository {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryPitchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with `DatabaseError`.
    pub fn unavailable() -> Self {
        let repo = Self::new();
        repo.set_unavailable(true);
        repo
    }

    /// Toggles simulated outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Number of stored pitches.
    pub async fn pitch_count(&self) -> usize {
        self.tables.read().await.pitches.len()
    }

    /// Number of stored Q&A entries across all pitches.
    pub async fn qa_count(&self) -> usize {
        self.tables.read().await.qa_entries.len()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("In-memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PitchRepository for InMemoryPitchRepository {
    async fn append_pitch(
        &self,
        session_id: &SessionId,
        pitch: &PitchSubmission,
    ) -> Result<PitchRecordId, DomainError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if tables.pitches.iter().any(|p| &p.session_id == session_id) {
            return Err(DomainError::database(format!(
                "Pitch already stored for session {}",
                session_id
            ))
            .with_detail("session_id", session_id.to_string()));
        }

        let id = PitchRecordId::new(tables.pitches.len() as i64 + 1);
        let now = Timestamp::now();
        tables.pitches.push(StoredPitch {
            id,
            session_id: *session_id,
            pitch_text: pitch.pitch_text.clone(),
            amount_invested: pitch.amount_invested,
            percentage_equity: pitch.percentage_equity,
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn append_qa(&self, pitch_id: PitchRecordId, entry: &QaEntry) -> Result<(), DomainError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;

        if !tables.pitches.iter().any(|p| p.id == pitch_id) {
            return Err(DomainError::new(
                ErrorCode::PitchNotFound,
                format!("Pitch record not found: {}", pitch_id),
            ));
        }

        let id = tables.qa_entries.len() as i64 + 1;
        tables.qa_entries.push(StoredQaEntry {
            id,
            pitch_id,
            shark: entry.shark.clone(),
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            round_number: entry.round_number,
            created_at: Timestamp::now(),
        });

        Ok(())
    }

    async fn find_conversation(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<StoredConversation>, DomainError> {
        self.check_available()?;
        let tables = self.tables.read().await;

        let Some(pitch) = tables.pitches.iter().find(|p| &p.session_id == session_id) else {
            return Ok(None);
        };
        let qa_history = tables
            .qa_entries
            .iter()
            .filter(|qa| qa.pitch_id == pitch.id)
            .cloned()
            .collect();

        Ok(Some(StoredConversation::assemble(pitch.clone(), qa_history)))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredPitch>, DomainError> {
        self.check_available()?;
        let tables = self.tables.read().await;

        Ok(tables
            .pitches
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(text: &str) -> PitchSubmission {
        PitchSubmission {
            pitch_text: text.to_string(),
            amount_invested: 100_000,
            percentage_equity: 10,
        }
    }

    fn qa(shark: &str, round_number: u32) -> QaEntry {
        QaEntry {
            shark: shark.to_string(),
            question: format!("{} asks", shark),
            answer: "Because".to_string(),
            round_number,
        }
    }

    #[tokio::test]
    async fn stores_pitch_and_history_in_order() {
        let repo = InMemoryPitchRepository::new();
        let session_id = SessionId::new();

        let pitch_id = repo.append_pitch(&session_id, &submission("Socks")).await.unwrap();
        repo.append_qa(pitch_id, &qa("Mark Cuban", 1)).await.unwrap();
        repo.append_qa(pitch_id, &qa("Lori Greiner", 2)).await.unwrap();

        let conversation = repo.find_conversation(&session_id).await.unwrap().unwrap();
        let sharks: Vec<_> = conversation.qa_history.iter().map(|q| q.shark.as_str()).collect();
        assert_eq!(sharks, vec!["Mark Cuban", "Lori Greiner"]);
        assert!(conversation.conversation_summary.contains("Lori Greiner (Round 2):"));
    }

    #[tokio::test]
    async fn duplicate_session_id_is_rejected() {
        let repo = InMemoryPitchRepository::new();
        let session_id = SessionId::new();
        repo.append_pitch(&session_id, &submission("A")).await.unwrap();

        let err = repo.append_pitch(&session_id, &submission("B")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(repo.pitch_count().await, 1);
    }

    #[tokio::test]
    async fn qa_for_unknown_pitch_is_not_found() {
        let repo = InMemoryPitchRepository::new();

        let err = repo
            .append_qa(PitchRecordId::new(42), &qa("Daymond John", 1))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PitchNotFound);
    }

    #[tokio::test]
    async fn unknown_session_has_no_conversation() {
        let repo = InMemoryPitchRepository::new();
        assert!(repo.find_conversation(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let repo = InMemoryPitchRepository::new();
        for text in ["first", "second", "third"] {
            repo.append_pitch(&SessionId::new(), &submission(text)).await.unwrap();
        }

        let recent = repo.list_recent(2).await.unwrap();

        let texts: Vec<_> = recent.iter().map(|p| p.pitch_text.as_str()).collect();
        assert_eq!(texts, vec!["third", "second"]);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let repo = InMemoryPitchRepository::unavailable();

        assert!(repo.health_check().await.is_err());
        assert!(repo
            .append_pitch(&SessionId::new(), &submission("x"))
            .await
            .is_err());

        repo.set_unavailable(false);
        assert!(repo.health_check().await.is_ok());
    }
}
