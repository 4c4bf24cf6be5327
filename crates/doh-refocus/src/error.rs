//! Error types for doh-refocus

use thiserror::Error;

/// Result type alias using doh-refocus Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur on the internal seams of the refocusing pipeline.
///
/// None of these escape `refocus`: the transformation is best-effort and
/// swallows failures at the boundary where they arise.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem read or log append failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
