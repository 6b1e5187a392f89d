//! Repository error types shared by every media-server operation

use thiserror::Error;

/// Result alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised while talking to the media server or local bookkeeping
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// Transport-level failure; the message is shown to the user as-is
    #[error("{0}")]
    Network(String),

    #[error("Unauthorized - please login again")]
    Unauthorized,

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    #[error("Client is not configured: {0}")]
    NotConfigured(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl RepositoryError {
    /// User-facing description, `None` when the error carries no text.
    pub fn message(&self) -> Option<String> {
        let text = self.to_string();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Deserialization(err.to_string())
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Deserialization(err.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RepositoryError {
    fn from(err: tokio::task::JoinError) -> Self {
        RepositoryError::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_display_verbatim() {
        let err = RepositoryError::Network("network down".into());
        assert_eq!(err.message().as_deref(), Some("network down"));
    }

    #[test]
    fn blank_messages_are_absent() {
        assert_eq!(RepositoryError::Network(String::new()).message(), None);
        assert_eq!(RepositoryError::Network("  ".into()).message(), None);
    }

    #[test]
    fn status_errors_include_body() {
        let err = RepositoryError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Request failed with status 500: boom");
    }
}
