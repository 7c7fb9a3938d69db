//! Final-state GeoTIFF sink.

use std::path::PathBuf;
use std::sync::Arc;

use tiff::encoder::colortype::GrayI16;
use tracing::info;

use sw_core::Tick;
use sw_landscape::{Landscape, write_geotiff};
use sw_sim::{Grid3, Snapshot};

use crate::{OutputError, OutputResult, Sink};

/// Keeps the most recent grid and writes it as an Int16 GeoTIFF, aligned to
/// the landscape's grid and CRS, when finished.
pub struct FinalRasterSink {
    path:      PathBuf,
    landscape: Arc<Landscape>,
    latest:    Option<Grid3>,
    written:   bool,
}

impl FinalRasterSink {
    pub fn new(path: impl Into<PathBuf>, landscape: Arc<Landscape>) -> Self {
        Self { path: path.into(), landscape, latest: None, written: false }
    }
}

impl Sink for FinalRasterSink {
    fn accept(&mut self, _tick: Tick, snapshot: &Snapshot) -> OutputResult<()> {
        let Snapshot::Grid(grid) = snapshot else {
            return Err(OutputError::Shape("raster expects a grid snapshot".into()));
        };
        if (grid.width(), grid.height()) != (self.landscape.width(), self.landscape.height()) {
            return Err(OutputError::Shape(format!(
                "grid {}×{} does not match landscape {}×{}",
                grid.width(),
                grid.height(),
                self.landscape.width(),
                self.landscape.height()
            )));
        }
        self.latest = Some(grid.clone());
        Ok(())
    }

    /// Writes nothing if no snapshot was ever accepted.
    fn finish(&mut self) -> OutputResult<()> {
        if self.written {
            return Ok(());
        }
        self.written = true;
        let Some(grid) = self.latest.take() else {
            return Ok(());
        };
        let data: Vec<i16> = grid
            .layer(0)
            .iter()
            .map(|&v| v.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16)
            .collect();
        write_geotiff::<GrayI16>(&self.path, self.landscape.grid(), self.landscape.crs(), &data)?;
        info!(path = %self.path.display(), "final raster written");
        Ok(())
    }
}
