//! Error types for sw-output.

use thiserror::Error;

use sw_landscape::LandscapeError;

/// Errors that can occur while exporting simulation output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("raster write error: {0}")]
    Landscape(#[from] LandscapeError),

    /// A sink received a snapshot it cannot represent.
    #[error("unexpected snapshot shape: {0}")]
    Shape(String),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
