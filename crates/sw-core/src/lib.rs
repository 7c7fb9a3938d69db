//! `sw-core` — foundational types for the swifco scenario runner.
//!
//! This crate is a dependency of every other `sw-*` crate.  It intentionally
//! has no `sw-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`ids`]   | `ZoneId`, `VariantId`                                      |
//! | [`geo`]   | `GeoPoint`, `BoundingBox`, `Crs`, LAEA (EPSG:3035) maths   |
//! | [`grid`]  | `CellCoord`, `GridSpec` (geographic ↔ cell conversion)     |
//! | [`time`]  | `Tick`, ticks-per-year constant                            |
//! | [`rng`]   | `SimRng` (seeded, with a Poisson sampler)                  |
//! | [`error`] | `SwError`, `SwResult`                                      |

pub mod error;
pub mod geo;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SwError, SwResult};
pub use geo::{BoundingBox, Crs, GeoPoint};
pub use grid::{CellCoord, GridSpec};
pub use ids::{VariantId, ZoneId};
pub use rng::SimRng;
pub use time::{TICKS_PER_YEAR, Tick};
