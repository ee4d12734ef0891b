use thiserror::Error;

/// Represents errors that can occur while fetching or streaming history.
///
/// Variants carry rendered messages rather than source errors so that a
/// terminal error can be copied from one stream handle onto another without
/// changing its kind (the deposit filter forwards the upstream error as-is).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Stream cancelled")]
    Cancelled,
}

pub type HistoryResult<T> = Result<T, HistoryError>;

impl HistoryError {
    /// True when a stream was stopped by its cancellation token rather than
    /// by a failing page fetch.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HistoryError::Cancelled)
    }
}
