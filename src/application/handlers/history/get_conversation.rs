//! GetConversationHandler - Query handler for a stored pitch conversation.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{PitchRepository, StoredConversation};

/// Query to get the stored conversation of a session.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving a stored pitch with its Q&A history.
pub struct GetConversationHandler {
    repository: Arc<dyn PitchRepository>,
}

impl GetConversationHandler {
    pub fn new(repository: Arc<dyn PitchRepository>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// - `PitchNotFound` if nothing was stored for the session
    /// - `DatabaseError` on persistence failure
    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<StoredConversation, DomainError> {
        self.repository
            .find_conversation(&query.session_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::PitchNotFound,
                    format!("No stored pitch for session {}", query.session_id),
                )
                .with_detail("session_id", query.session_id.to_string())
            })
    }
}
