//! `sw-fence` — turn user-supplied fence text into a cell-space zone
//! classifier.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`repair`]    | `repair_geometry_text`: quote bare words in quasi-JSON    |
//! | [`geometry`]  | `parse_fence`: GeoJSON-ish envelopes → `geo::Polygon`     |
//! | [`normalize`] | `normalize_fence`, `FenceClassifier`                      |
//! | [`error`]     | `FenceError`, `FenceResult<T>`                            |
//!
//! # Usage
//!
//! ```rust,ignore
//! let polygon = parse_fence(&std::env::var("FENCE_COORDS")?)?;
//! let classifier = FenceClassifier::new(normalize_fence(&polygon, landscape.grid()));
//! assert_eq!(classifier.zone(CellCoord::new(0, 0)), INSIDE_ZONE);
//! ```

pub mod error;
pub mod geometry;
pub mod normalize;
pub mod repair;

#[cfg(test)]
mod tests;

pub use error::{FenceError, FenceResult};
pub use geometry::parse_fence;
pub use normalize::{FenceClassifier, INSIDE_ZONE, OUTSIDE_ZONE, normalize_fence};
pub use repair::repair_geometry_text;
