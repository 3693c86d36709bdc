//! PostgreSQL implementation of PitchRepository.
//!
//! Persists pitches to `pitch_sessions` and their Q&A exchanges to
//! `qa_entries`. Rows are only ever inserted.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode, PitchRecordId, SessionId, Timestamp};
use crate::domain::pitch::PitchSubmission;
use crate::ports::{PitchRepository, QaEntry, StoredConversation, StoredPitch, StoredQaEntry};

/// PostgreSQL implementation of PitchRepository.
#[derive(Clone)]
pub struct PostgresPitchRepository {
    pool: PgPool,
}

impl PostgresPitchRepository {
    /// Creates a new PostgresPitchRepository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration, running migrations when enabled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.connection_url())
            .await
            .map_err(|e| DomainError::database(format!("Failed to connect: {}", e)))?;

        if config.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to run migrations: {}", e)))?;
            info!("Pitch tables ready");
        }

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PitchRepository for PostgresPitchRepository {
    async fn append_pitch(
        &self,
        session_id: &SessionId,
        pitch: &PitchSubmission,
    ) -> Result<PitchRecordId, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO pitch_sessions (
                session_id, pitch_text, amount_invested, percentage_equity
            ) VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(session_id.to_string())
        .bind(&pitch.pitch_text)
        .bind(pitch.amount_invested)
        .bind(pitch.percentage_equity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to create pitch session: {}", e))
                .with_detail("session_id", session_id.to_string())
        })?;

        Ok(PitchRecordId::new(id))
    }

    async fn append_qa(&self, pitch_id: PitchRecordId, entry: &QaEntry) -> Result<(), DomainError> {
        let round_number = i32::try_from(entry.round_number)
            .map_err(|_| DomainError::database("Round number out of range"))?;

        let result = sqlx::query(
            r#"
            INSERT INTO qa_entries (
                pitch_session_id, shark_name, question, answer, round_number
            )
            SELECT id, $2, $3, $4, $5 FROM pitch_sessions WHERE id = $1
            "#,
        )
        .bind(pitch_id.as_i64())
        .bind(&entry.shark)
        .bind(&entry.question)
        .bind(&entry.answer)
        .bind(round_number)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to add Q&A entry: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PitchNotFound,
                format!("Pitch record not found: {}", pitch_id),
            ));
        }

        Ok(())
    }

    async fn find_conversation(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<StoredConversation>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, pitch_text, amount_invested, percentage_equity,
                   created_at, updated_at
            FROM pitch_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch pitch session: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let pitch = row_to_pitch(row)?;

        let qa_rows = sqlx::query(
            r#"
            SELECT id, pitch_session_id, shark_name, question, answer, round_number, created_at
            FROM qa_entries
            WHERE pitch_session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(pitch.id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch Q&A history: {}", e)))?;

        let qa_history = qa_rows
            .into_iter()
            .map(row_to_qa_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StoredConversation::assemble(pitch, qa_history)))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredPitch>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, pitch_text, amount_invested, percentage_equity,
                   created_at, updated_at
            FROM pitch_sessions
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list pitch sessions: {}", e)))?;

        rows.into_iter().map(row_to_pitch).collect()
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Database unreachable: {}", e)))?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to get {}: {}", column, e))
}

fn parse_session_id(raw: &str) -> Result<SessionId, DomainError> {
    raw.parse()
        .map_err(|e| DomainError::database(format!("Invalid session_id '{}': {}", raw, e)))
}

fn parse_round_number(raw: i32) -> Result<u32, DomainError> {
    u32::try_from(raw)
        .map_err(|_| DomainError::database(format!("Invalid round_number: {}", raw)))
}

fn row_to_pitch(row: PgRow) -> Result<StoredPitch, DomainError> {
    let id: i64 = row.try_get("id").map_err(|e| column_error("id", e))?;
    let session_id: String = row
        .try_get("session_id")
        .map_err(|e| column_error("session_id", e))?;
    let pitch_text: String = row
        .try_get("pitch_text")
        .map_err(|e| column_error("pitch_text", e))?;
    let amount_invested: i64 = row
        .try_get("amount_invested")
        .map_err(|e| column_error("amount_invested", e))?;
    let percentage_equity: i32 = row
        .try_get("percentage_equity")
        .map_err(|e| column_error("percentage_equity", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| column_error("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_error("updated_at", e))?;

    Ok(StoredPitch {
        id: PitchRecordId::new(id),
        session_id: parse_session_id(&session_id)?,
        pitch_text,
        amount_invested,
        percentage_equity,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

fn row_to_qa_entry(row: PgRow) -> Result<StoredQaEntry, DomainError> {
    let id: i64 = row.try_get("id").map_err(|e| column_error("id", e))?;
    let pitch_id: i64 = row
        .try_get("pitch_session_id")
        .map_err(|e| column_error("pitch_session_id", e))?;
    let shark: String = row
        .try_get("shark_name")
        .map_err(|e| column_error("shark_name", e))?;
    let question: String = row
        .try_get("question")
        .map_err(|e| column_error("question", e))?;
    let answer: String = row.try_get("answer").map_err(|e| column_error("answer", e))?;
    let round_number: i32 = row
        .try_get("round_number")
        .map_err(|e| column_error("round_number", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| column_error("created_at", e))?;

    Ok(StoredQaEntry {
        id,
        pitch_id: PitchRecordId::new(pitch_id),
        shark,
        question,
        answer,
        round_number: parse_round_number(round_number)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_session_id_accepts_stored_text() {
        let id = SessionId::new();
        assert_eq!(parse_session_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_session_id_rejects_garbage() {
        let err = parse_session_id("not-a-uuid").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn negative_round_numbers_are_rejected() {
        assert_eq!(parse_round_number(3).unwrap(), 3);
        assert!(parse_round_number(-1).is_err());
    }
}
