//! Release scheduling: where and when infected individuals are introduced.
//!
//! A [`ReleaseSchedule`] is an immutable `Tick → [CellCoord]` table, so
//! [`cells_at`][ReleaseSchedule::cells_at] is a pure function of the tick.
//!
//! # CSV format
//!
//! One row per released point, coordinates in the landscape's projected CRS:
//!
//! ```csv
//! x,y,tick
//! 4650000,3200000,3
//! 4652000,3198000,10
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use sw_core::{CellCoord, GeoPoint, GridSpec, Tick};

use crate::{PipelineError, PipelineResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReleaseSchedule {
    events: BTreeMap<Tick, Vec<CellCoord>>,
}

impl ReleaseSchedule {
    /// No releases at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// One release point at one tick.
    pub fn single(tick: Tick, cell: CellCoord) -> Self {
        Self::from_events([(tick, cell)])
    }

    /// Build from `(tick, cell)` pairs.  Order within a tick is kept.
    pub fn from_events(events: impl IntoIterator<Item = (Tick, CellCoord)>) -> Self {
        let mut table: BTreeMap<Tick, Vec<CellCoord>> = BTreeMap::new();
        for (tick, cell) in events {
            table.entry(tick).or_default().push(cell);
        }
        Self { events: table }
    }

    /// Load `x,y,tick` rows, converting points to cells through `grid`.
    pub fn from_csv(path: &Path, grid: &GridSpec) -> PipelineResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, grid)
    }

    /// Like [`from_csv`][Self::from_csv] but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R, grid: &GridSpec) -> PipelineResult<Self> {
        #[derive(Deserialize)]
        struct ReleaseRecord {
            x:    f64,
            y:    f64,
            tick: u64,
        }

        let mut csv_reader = csv::Reader::from_reader(reader);
        let events = csv_reader
            .deserialize::<ReleaseRecord>()
            .map(|row| {
                let row = row.map_err(|e| PipelineError::ReleaseCsv(e.to_string()))?;
                Ok((Tick(row.tick), grid.coord_to_cell(GeoPoint::new(row.x, row.y))))
            })
            .collect::<PipelineResult<Vec<_>>>()?;

        let schedule = Self::from_events(events);
        debug!(points = schedule.len(), ticks = schedule.events.len(), "release schedule loaded");
        Ok(schedule)
    }

    /// Cells released at `tick`; empty for ticks without releases.
    pub fn cells_at(&self, tick: Tick) -> Vec<CellCoord> {
        self.events.get(&tick).cloned().unwrap_or_default()
    }

    /// Total number of release points.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Ticks that have at least one release, ascending.
    pub fn ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        self.events.keys().copied()
    }
}
