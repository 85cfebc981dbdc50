use thiserror::Error;

/// Failures raised by the date/span core.
///
/// An ordinary non-match is not represented here: parsers and the
/// orchestrator return `Ok(None)` for that.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// Year 0, month/day out of range, or a start that falls after its end.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// One date carried two disagreeing era markers.
    #[error("era conflict: {0}")]
    EraConflict(String),
    /// A row needed an inherited year but no rowspan context was active.
    #[error("no active rowspan context for row {row}")]
    RowspanExhausted { row: usize },
    /// The caller passed a context the parsers cannot work with.
    #[error("malformed context: {0}")]
    MalformedContext(String),
}

pub type Result<T> = std::result::Result<T, SpanError>;

/// Failures in the IO-bearing outer layer (document loading, artifact writing).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Span(#[from] SpanError),
}
