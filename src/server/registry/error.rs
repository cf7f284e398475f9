//! Registry error types

use thiserror::Error;

use super::types::SessionId;

/// Error returned by registry operations that a client can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    #[error("Session is full: {0}")]
    SessionFull(SessionId),
    /// The connection is already a participant (of this or another session).
    #[error("Already joined session: {0}")]
    AlreadyJoined(SessionId),
}

impl RegistryError {
    /// Stable code sent to clients in `Error` notifications.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::SessionNotFound(_) => "SESSION_NOT_FOUND",
            RegistryError::SessionFull(_) => "SESSION_FULL",
            RegistryError::AlreadyJoined(_) => "ALREADY_JOINED",
        }
    }
}
