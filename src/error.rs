//! Error types shared across the crate

/// Failure of a single completion-service call
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Connection, timeout or body-read failure
    #[error("completion transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status, including rate limiting
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Startup configuration errors. These halt the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is required but not set (config file or environment)")]
    MissingApiKey,

    #[error("OPENAI_API_KEY appears to be invalid (shorter than {min_len} characters)")]
    InvalidApiKey { min_len: usize },
}
