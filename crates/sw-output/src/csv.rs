//! CSV sinks for grid and table snapshots.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use sw_core::Tick;
use sw_sim::{Grid3, Observation, Snapshot};

use crate::{OutputError, OutputResult, Sink};

// ── GridCsvSink ───────────────────────────────────────────────────────────────

enum GridLayout {
    /// One headerless matrix file per layer.
    PerCategory { categories: Vec<String> },
    /// Layer 0 only; each grid column becomes one CSV row under `header`.
    Transposed { header: Vec<String> },
}

/// Writes one or more CSV files per tick into a directory.
pub struct GridCsvSink {
    dir:    PathBuf,
    prefix: String,
    layout: GridLayout,
}

impl GridCsvSink {
    /// `{dir}/{prefix}_{category}_tick_{t}.csv`, one per category (layer).
    pub fn per_category<S: Into<String>>(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            dir:    dir.into(),
            prefix: prefix.into(),
            layout: GridLayout::PerCategory { categories: categories.into_iter().map(Into::into).collect() },
        }
    }

    /// `{dir}/{prefix}_tick_{t}.csv` with `header`, one row per grid column.
    pub fn transposed<S: Into<String>>(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        header: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            dir:    dir.into(),
            prefix: prefix.into(),
            layout: GridLayout::Transposed { header: header.into_iter().map(Into::into).collect() },
        }
    }

    fn write_per_category(&self, tick: Tick, grid: &Grid3, categories: &[String]) -> OutputResult<()> {
        if grid.layers() != categories.len() {
            return Err(OutputError::Shape(format!(
                "{}: {} layers for {} categories",
                self.prefix,
                grid.layers(),
                categories.len()
            )));
        }
        for (layer, category) in categories.iter().enumerate() {
            let path = self.dir.join(format!("{}_{category}_tick_{}.csv", self.prefix, tick.0));
            let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
            for row in grid.rows(layer) {
                w.write_record(row.iter().map(i64::to_string))?;
            }
            w.flush()?;
        }
        Ok(())
    }

    fn write_transposed(&self, tick: Tick, grid: &Grid3, header: &[String]) -> OutputResult<()> {
        if grid.height() != header.len() {
            return Err(OutputError::Shape(format!(
                "{}: {} rows for a {}-column header",
                self.prefix,
                grid.height(),
                header.len()
            )));
        }
        let path = self.dir.join(format!("{}_tick_{}.csv", self.prefix, tick.0));
        let mut w = Writer::from_path(path)?;
        w.write_record(header)?;
        for col in 0..grid.width() {
            w.write_record((0..grid.height()).map(|row| grid.get(0, row, col).to_string()))?;
        }
        w.flush()?;
        Ok(())
    }
}

impl Sink for GridCsvSink {
    fn accept(&mut self, tick: Tick, snapshot: &Snapshot) -> OutputResult<()> {
        let Snapshot::Grid(grid) = snapshot else {
            return Err(OutputError::Shape(format!("{}: expected a grid snapshot", self.prefix)));
        };
        match &self.layout {
            GridLayout::PerCategory { categories } => self.write_per_category(tick, grid, categories),
            GridLayout::Transposed { header } => self.write_transposed(tick, grid, header),
        }
    }

    /// Files are closed after every tick; nothing to do.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

// ── TimeSeriesCsvSink ─────────────────────────────────────────────────────────

/// Appends one `tick,…` row per tick to a single CSV file.
pub struct TimeSeriesCsvSink {
    writer:   Writer<File>,
    columns:  usize,
    finished: bool,
}

impl TimeSeriesCsvSink {
    /// Create `path` and write the header: `tick` then the observation's
    /// columns.
    pub fn new(path: &Path, observation: &Observation) -> OutputResult<Self> {
        let columns = observation.columns();
        let mut writer = Writer::from_path(path)?;
        writer.write_record(std::iter::once("tick").chain(columns.iter().copied()))?;
        Ok(Self { writer, columns: columns.len(), finished: false })
    }
}

impl Sink for TimeSeriesCsvSink {
    fn accept(&mut self, tick: Tick, snapshot: &Snapshot) -> OutputResult<()> {
        let Snapshot::Row(row) = snapshot else {
            return Err(OutputError::Shape("time series expects a table row".into()));
        };
        if row.len() != self.columns {
            return Err(OutputError::Shape(format!(
                "row has {} values, header has {} columns",
                row.len(),
                self.columns
            )));
        }
        self.writer
            .write_record(std::iter::once(tick.0.to_string()).chain(row.iter().map(i64::to_string)))?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}
