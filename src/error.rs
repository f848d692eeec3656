//! Error types for the layout-intelligence library.
//!
//! Analysis itself never fails: malformed-but-well-typed input produces a
//! degraded-but-defined result (an empty issue list, an `Unknown`
//! classification, a recorded deviation). The error type here covers the two
//! genuine failure paths: the external extraction collaborator, and the
//! by-name dispatch layer rejecting an operation it cannot decode.

/// Result type alias for layout library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the crate's boundaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external fact-extraction collaborator failed or timed out.
    ///
    /// Surfaced verbatim to the caller; no retry is attempted inside this
    /// crate.
    #[error("Layout extraction failed: {0}")]
    Extraction(String),

    /// The by-name dispatch layer received an operation it does not know.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Dispatch arguments did not match the operation's expected shape.
    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArguments {
        /// Operation whose arguments failed to decode
        operation: String,
        /// Reason the arguments were rejected
        reason: String,
    },

    /// JSON (de)serialization error in the dispatch layer.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
