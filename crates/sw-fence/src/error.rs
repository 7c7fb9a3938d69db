//! Fence-subsystem error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FenceError {
    /// The text parsed as JSON but is not a usable polygon.
    #[error("malformed fence geometry: {0}")]
    MalformedGeometry(String),

    /// The repaired text is still not JSON.
    #[error("fence geometry is not valid JSON after repair: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FenceResult<T> = Result<T, FenceError>;
