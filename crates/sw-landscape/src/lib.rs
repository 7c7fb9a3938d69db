//! `sw-landscape` — landscape raster ingestion.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`geotiff`]   | `read_geotiff`, `write_geotiff`, `SourceRaster`            |
//! | [`warp`]      | nearest-neighbour reprojection onto a target `GridSpec`    |
//! | [`landscape`] | `Landscape` (immutable capacity grid), capacity transform  |
//! | [`loader`]    | `LandscapeLoader` with the synthetic-grid fallback         |
//! | [`error`]     | `LandscapeError`, `LandscapeResult<T>`                     |
//!
//! # Usage
//!
//! ```rust,ignore
//! let loader = LandscapeLoader::new(path, Crs::LAEA_EUROPE, bounds, 2_000.0);
//! let landscape = loader.load_or_fallback(&FallbackGrid::default())?;
//! let release = landscape.coord_to_cell(GeoPoint::new(4.6e6, 3.2e6));
//! ```

pub mod error;
pub mod geotiff;
pub mod landscape;
pub mod loader;
pub mod warp;

#[cfg(test)]
mod tests;

pub use error::{LandscapeError, LandscapeResult};
pub use geotiff::{SourceRaster, read_geotiff, write_geotiff};
pub use landscape::{CAPACITY_FLOOR, CAPACITY_SCALE, Capacity, Landscape, breeding_capacity};
pub use loader::{FallbackGrid, LandscapeLoader};
