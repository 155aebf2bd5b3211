//! Error types for rosviz-rs.

use thiserror::Error;

/// The main error type for rosviz-rs operations.
#[derive(Error, Debug)]
pub enum RosvizError {
    /// The intrinsic matrix has a zero focal length and cannot be back-projected.
    #[error("invalid intrinsics: focal lengths must be non-zero (fx = {fx}, fy = {fy})")]
    Domain { fx: f64, fy: f64 },

    /// The transport refused or failed a subscription.
    #[error("transport error: {0}")]
    Transport(String),

    /// Node state was accessed while a message for the same node was still being processed.
    #[error("node state is already borrowed")]
    NodeBorrowed,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for rosviz-rs operations.
pub type Result<T> = std::result::Result<T, RosvizError>;
