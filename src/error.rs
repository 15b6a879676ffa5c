//! Error types for simplechat.

use thiserror::Error;

/// Common error type for simplechat.
#[derive(Error, Debug)]
pub enum ChatError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint could not reach its peer or bind its listener.
    #[error("connection error: {0}")]
    Connection(String),

    /// An operation needed an open connection and there was none.
    #[error("not connected")]
    NotConnected,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for simplechat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
