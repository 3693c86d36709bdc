//! ListPitchHistoryHandler - Query handler for recently stored pitches.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{PitchRepository, StoredPitch};

/// Largest page a single query may request.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Query for the most recent stored pitches.
#[derive(Debug, Clone)]
pub struct ListPitchHistoryQuery {
    /// Requested page size; clamped to `1..=100`.
    pub limit: u32,
}

impl Default for ListPitchHistoryQuery {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// Handler for listing stored pitches, newest first.
pub struct ListPitchHistoryHandler {
    repository: Arc<dyn PitchRepository>,
}

impl ListPitchHistoryHandler {
    pub fn new(repository: Arc<dyn PitchRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListPitchHistoryQuery) -> Result<Vec<StoredPitch>, DomainError> {
        let limit = query.limit.clamp(1, MAX_HISTORY_LIMIT);
        self.repository.list_recent(limit).await
    }
}
