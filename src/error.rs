use thiserror::Error;

/// Why a raw article could not be segmented into header fields and body.
/// Non-fatal: the caller logs it and skips the current word.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("article has fewer than two lines")]
    TooShort,
    #[error("article header is empty after trimming")]
    EmptyHeader,
}

/// Failures raised by an article source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Navigation failed for the current query only; the batch continues.
    #[error("article navigation failed: {0}")]
    Navigation(String),
    /// The source position can no longer be trusted. Continuing could
    /// silently scan the wrong entries, so the batch must stop.
    #[error("article source desynced: {0}")]
    Desynced(String),
}
