//! `sw-output` — routes engine snapshots to files.
//!
//! | Sink                         | Input          | Files created                                  |
//! |------------------------------|----------------|------------------------------------------------|
//! | `GridCsvSink::per_category`  | grid           | `{prefix}_{category}_tick_{t}.csv` (no header) |
//! | `GridCsvSink::transposed`    | grid, 1 layer  | `{prefix}_tick_{t}.csv` (header, column → row) |
//! | `TimeSeriesCsvSink`          | table row      | one CSV, `tick` + columns, one row per tick    |
//! | `VideoSink` + `FrameAdapter` | grid           | one animated GIF, one frame per tick           |
//! | `FinalRasterSink`            | grid, 1 layer  | one Int16 GeoTIFF of the last snapshot         |
//!
//! All sinks implement [`Sink`] and are driven by [`ExportPipeline`], which
//! implements `sw_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut exports = ExportPipeline::new()
//!     .route(Observation::AgeClassTable, TimeSeriesCsvSink::new(&out.join("population.csv"), &Observation::AgeClassTable)?)
//!     .route(Observation::PopulationMap, FinalRasterSink::new(out.join("population.tif"), landscape.clone()));
//! engine.run(&mut exports)?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod frame;
pub mod raster;
pub mod sink;
pub mod video;


pub use crate::csv::{GridCsvSink, TimeSeriesCsvSink};
pub use error::{OutputError, OutputResult};
pub use export::ExportPipeline;
pub use frame::{FrameAdapter, Rgb};
pub use raster::FinalRasterSink;
pub use sink::Sink;
pub use video::VideoSink;

#[cfg(feature = "fx-hash")]
pub(crate) type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V>;
