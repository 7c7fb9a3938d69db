//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `SwError` as one variant
//! where core validation can fail underneath them.

use thiserror::Error;

/// The top-level error type for `sw-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SwError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `sw-*` crates.
pub type SwResult<T> = Result<T, SwError>;
