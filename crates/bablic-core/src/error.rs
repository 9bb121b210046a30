use thiserror::Error;

/// Top-level error type for the Bablic adapter.
#[derive(Debug, Error)]
pub enum BablicError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("http error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Client-local storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// No async runtime available to drive background work.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
