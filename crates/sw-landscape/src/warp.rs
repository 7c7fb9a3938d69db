//! Reproject and resample a [`SourceRaster`] onto a target grid.
//!
//! Every target cell centre is transformed into the source CRS and sampled
//! with nearest-neighbour lookup.  Cells whose centre falls outside the
//! source extent, that the projection cannot represent, or that land on a
//! non-finite (no-data) sample receive [`OUTSIDE_FILL`].

use sw_core::{Crs, GridSpec};
use tracing::debug;

use crate::{LandscapeError, LandscapeResult, SourceRaster};

/// Value written to target cells not covered by the source raster.
pub const OUTSIDE_FILL: f64 = 0.0;

/// Resample `source` onto `target` (expressed in `target_crs`).
///
/// A source raster that declares no CRS is assumed to already be in
/// `target_crs`.
///
/// # Errors
///
/// [`LandscapeError::GeoProcessing`] if the source CRS cannot be transformed
/// into `target_crs`.
pub fn warp(source: &SourceRaster, target: &GridSpec, target_crs: Crs) -> LandscapeResult<Vec<f64>> {
    let source_crs = source.crs.unwrap_or(target_crs);
    if !target_crs.can_transform_to(source_crs) {
        return Err(LandscapeError::GeoProcessing(format!(
            "cannot reproject from {source_crs} to {target_crs}"
        )));
    }

    let mut covered = 0usize;
    let values: Vec<f64> = target
        .cells()
        .map(|cell| {
            target_crs
                .transform(source_crs, target.cell_center(cell))
                .and_then(|p| source.sample(p))
                .filter(|v| v.is_finite())
                .inspect(|_| covered += 1)
                .unwrap_or(OUTSIDE_FILL)
        })
        .collect();

    debug!(
        source_crs = %source_crs,
        target_crs = %target_crs,
        width = target.width(),
        height = target.height(),
        covered,
        "warped landscape raster"
    );
    Ok(values)
}
