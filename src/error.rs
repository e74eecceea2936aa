//! Unified error type for the crate.

use thiserror::Error;

/// Errors surfaced by the reconciliation core and its collaborators.
///
/// `Config` and `Validation` are caller mistakes and fail the operation
/// immediately. `Fetch` is recovered inside batch reconciliation and turned
/// into a failed [`crate::reconcile::ScrapeOutcome`] instead of propagating.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown module name or otherwise unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid caller input, e.g. editing the source language directly.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Upstream site fetch failed (network, HTTP status, unexpected markup).
    #[error("upstream fetch failed: {0}")]
    Fetch(String),

    /// Translation file read or write failed.
    ///
    /// Missing or unparsable files on the read path are deliberately *not*
    /// errors; they read as empty mappings so that freshly added modules and
    /// languages work before their first scrape.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
