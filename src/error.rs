// SPDX-License-Identifier: MIT

//! Application error types.
//!
//! Remote-layer errors are recorded in the sync status channel and re-thrown
//! to the caller, so callers can implement their own recovery. Nothing here
//! is fatal to the process.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Import parse error: {0}")]
    ImportParse(String),

    /// Subscription/snapshot failure. Non-fatal; the poll loop keeps retrying.
    #[error("Remote read error: {0}")]
    RemoteRead(String),

    /// Create/update/delete failure. The operation is treated as not-applied.
    #[error("Remote write error: {0}")]
    RemoteWrite(String),

    /// Local file persistence failure (preferences, backups).
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, AppError>;
