//! The error surface for everything outside the core graph/aggregation
//! pipeline: source acquisition, decompression, and report output.

use thiserror::Error;

/// Fatal error kinds a run can end in. Row-level and deferral-level
/// conditions are never errors here — they are counters surfaced through
/// [`crate::graph::UnresolvedSummary`] and row-skip diagnostics instead.
#[derive(Debug, Error)]
pub enum GffStatError {
    /// The source string names a scheme this build has no client for.
    #[error("unsupported source scheme: {0}")]
    UnsupportedScheme(String),

    /// The local file or remote resource could not be opened or fetched.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The gzip stream could not be decoded.
    #[error("failed to decompress gzip stream: {0}")]
    Decompression(String),

    /// Writing the serialized report failed.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),

    /// The report could not be serialized to JSON.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GffStatError>;
