//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Session-specific errors.
///
/// Only `refresh` fails; continue and refresh-or-create degrade to create,
/// and appending to an unknown session is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session is not live in the registry.
    #[error("Session {0} not found")]
    NotFound(SessionId),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
        }
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        let code = err.code();
        match &err {
            SessionError::NotFound(id) => {
                DomainError::new(code, err.to_string()).with_detail("session_id", id.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_session_id() {
        let id = SessionId::new();
        assert_eq!(
            SessionError::not_found(id).to_string(),
            format!("Session {} not found", id)
        );
    }

    #[test]
    fn converts_to_domain_error_with_code() {
        let id = SessionId::new();
        let err: DomainError = SessionError::not_found(id).into();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
        assert_eq!(err.details.get("session_id"), Some(&id.to_string()));
    }
}
