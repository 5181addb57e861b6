use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },
    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },
    #[error("stored scores are malformed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode scores: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("no global window to schedule the timer on")]
    NoWindow,
    #[error("setInterval failed: {0}")]
    Schedule(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not a board square")]
pub struct ParseSquareError(pub String);
