//! Landscape-subsystem error type.

use std::path::PathBuf;

use thiserror::Error;

use sw_core::SwError;

/// Errors produced by `sw-landscape`.
///
/// [`NotFound`][LandscapeError::NotFound] is the only recoverable variant:
/// [`LandscapeLoader::load_or_fallback`][crate::LandscapeLoader::load_or_fallback]
/// turns it into a synthetic landscape.  Everything else is fatal.
#[derive(Debug, Error)]
pub enum LandscapeError {
    #[error("landscape raster not found at {0}")]
    NotFound(PathBuf),

    #[error("geo-processing error: {0}")]
    GeoProcessing(String),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] SwError),
}

pub type LandscapeResult<T> = Result<T, LandscapeError>;
