//! `LandscapeLoader`: path + target georeference → [`Landscape`].
//!
//! # Pipeline
//!
//! 1. [`read_geotiff`]: decode the single-band source raster.
//! 2. [`warp`]: resample onto `GridSpec::with_resolution(bounds, resolution)`
//!    in the target CRS.
//! 3. [`breeding_capacity`]: clip at the floor and scale.
//!
//! A missing file is the one recoverable failure; see
//! [`LandscapeLoader::load_or_fallback`].

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use sw_core::{BoundingBox, Crs, GridSpec};

use crate::{
    Landscape, LandscapeError, LandscapeResult, breeding_capacity, read_geotiff, warp::warp,
};

// ── FallbackGrid ──────────────────────────────────────────────────────────────

/// Shape of the synthetic landscape used when the raster file is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackGrid {
    pub width:  usize,
    pub height: usize,
    /// Capacity is drawn uniformly in `[limits.0, limits.1)` by the engine.
    pub limits: (f64, f64),
}

impl Default for FallbackGrid {
    fn default() -> Self {
        Self { width: 100, height: 100, limits: (0.0, 5.0) }
    }
}

// ── LandscapeLoader ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LandscapeLoader {
    path:       PathBuf,
    crs:        Crs,
    bounds:     BoundingBox,
    resolution: f64,
}

impl LandscapeLoader {
    /// `resolution` is in target-CRS map units per cell.
    pub fn new(path: impl Into<PathBuf>, crs: Crs, bounds: BoundingBox, resolution: f64) -> Self {
        Self { path: path.into(), crs, bounds, resolution }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, reproject, and transform the raster.
    ///
    /// # Errors
    ///
    /// - [`LandscapeError::NotFound`] if no file exists at the path.
    /// - [`LandscapeError::Core`] for a resolution that yields an empty grid.
    /// - [`LandscapeError::GeoProcessing`] / [`LandscapeError::Tiff`] for
    ///   decode and reprojection failures.
    pub fn load(&self) -> LandscapeResult<Landscape> {
        if !self.path.is_file() {
            return Err(LandscapeError::NotFound(self.path.clone()));
        }
        let grid = GridSpec::with_resolution(self.bounds, self.resolution)?;
        let source = read_geotiff(&self.path)?;
        let capacities: Vec<f64> = warp(&source, &grid, self.crs)?
            .into_iter()
            .map(breeding_capacity)
            .collect();

        info!(
            path = %self.path.display(),
            width = grid.width(),
            height = grid.height(),
            crs = %self.crs,
            "landscape loaded"
        );
        Landscape::from_capacities(grid, self.crs, capacities)
    }

    /// Like [`load`][Self::load], but substitute a synthetic landscape over
    /// the configured bounding box when the file does not exist.
    ///
    /// Any other failure is still returned.
    pub fn load_or_fallback(&self, fallback: &FallbackGrid) -> LandscapeResult<Landscape> {
        match self.load() {
            Err(LandscapeError::NotFound(path)) => {
                warn!(
                    path = %path.display(),
                    width = fallback.width,
                    height = fallback.height,
                    "landscape raster missing; using synthetic uniform landscape"
                );
                let grid = GridSpec::new(self.bounds, fallback.width, fallback.height)?;
                Ok(Landscape::synthetic(grid, self.crs, fallback.limits))
            }
            other => other,
        }
    }
}
