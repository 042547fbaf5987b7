use thiserror::Error;

/// Errors raised at the threading engine's input boundary.
///
/// Failing to find a thread for a message is not an error; that outcome is
/// reported as `None` by the matching operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThreadingError {
    #[error("message at position {position} has an empty message id")]
    EmptyMessageId { position: usize },
    #[error("invalid threading configuration: {0}")]
    InvalidConfig(String),
}

impl ThreadingError {
    pub fn empty_message_id(position: usize) -> Self {
        ThreadingError::EmptyMessageId { position }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ThreadingError::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, ThreadingError>;
