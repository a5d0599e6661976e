//! Client-side error types.

use thiserror::Error;

use dayboard_core::ValidationError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The service rejected the payload; every violated field is listed.
    #[error("{0}")]
    Validation(ValidationError),

    /// The targeted resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request never completed (network failure, service unreachable).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service failed; opaque to the client.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
}

impl ClientError {
    /// User-friendly message for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => {
                let fields = err
                    .violations
                    .iter()
                    .map(|v| v.field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Some fields are invalid: {}", fields)
            }
            Self::NotFound(_) => "This item no longer exists. It may have been deleted.".to_string(),
            Self::Transport(_) => "Network error. Check your connection.".to_string(),
            Self::Server { .. } => "The service is experiencing issues. Please try again.".to_string(),
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }
}
