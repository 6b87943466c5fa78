// src/asistenku/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

/// Generic text shown when a failure carries no usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Terjadi kesalahan. Silakan coba lagi.";

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum AsistenkuError {
    /// Transport or session not initialized yet. Rendered as a connecting
    /// banner, never as a failure toast.
    #[error("Backend actor is not ready")]
    ActorNotReady,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Role mismatch: required {required}, found {actual}")]
    RoleMismatch { required: String, actual: String },

    /// Error text returned by the backend actor itself.
    #[error("{0}")]
    Backend(String),

    #[error("Call rejected: {0}")]
    Rejected(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal client error: {0}")]
    InternalError(String),
}

impl AsistenkuError {
    /// Message for a user-facing toast: the server's own message when there is
    /// one, the supplied fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AsistenkuError::Backend(msg)
            | AsistenkuError::Rejected(msg)
            | AsistenkuError::InvalidInput(msg)
                if !msg.trim().is_empty() =>
            {
                msg.trim().to_string()
            }
            _ if !fallback.trim().is_empty() => fallback.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Access-control outcomes are rendered as screens, not failures.
    pub fn is_access_outcome(&self) -> bool {
        matches!(self, AsistenkuError::NotFound(_) | AsistenkuError::RoleMismatch { .. })
    }

    /// Whether a query may re-attempt after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AsistenkuError::Rejected(_) | AsistenkuError::Backend(_))
    }
}

impl From<validator::ValidationErrors> for AsistenkuError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AsistenkuError::InvalidInput(errors.to_string())
    }
}

impl From<serde_json::Error> for AsistenkuError {
    fn from(err: serde_json::Error) -> Self {
        AsistenkuError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = AsistenkuError::Backend("Kuota layanan habis".to_string());
        assert_eq!(err.user_message("Gagal membuat tugas"), "Kuota layanan habis");
    }

    #[test]
    fn user_message_falls_back() {
        let err = AsistenkuError::Backend("   ".to_string());
        assert_eq!(err.user_message("Gagal membuat tugas"), "Gagal membuat tugas");
        assert_eq!(AsistenkuError::ActorNotReady.user_message(""), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn access_outcomes_are_not_retryable() {
        let err = AsistenkuError::NotFound("profile".to_string());
        assert!(err.is_access_outcome());
        assert!(!err.is_retryable());
        assert!(!AsistenkuError::ActorNotReady.is_retryable());
    }
}
