//! The immutable landscape: a breeding-capacity grid plus its georeference.

use sw_core::{CellCoord, Crs, GeoPoint, GridSpec};

use crate::{LandscapeError, LandscapeResult};

/// Raw raster values below this floor are clipped before scaling.
pub const CAPACITY_FLOOR: f64 = -1.0;

/// Multiplier from clipped raster value to breeding capacity.
pub const CAPACITY_SCALE: f64 = 1.5;

/// Convert one raw raster value into a breeding capacity.
#[inline]
pub fn breeding_capacity(raw: f64) -> f64 {
    CAPACITY_SCALE * raw.max(CAPACITY_FLOOR)
}

/// Where a landscape's per-cell capacity comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Capacity {
    /// Row-major capacities derived from a raster file.
    Raster(Vec<f64>),
    /// Synthetic fallback: the engine draws each cell uniformly in
    /// `limits`.
    Uniform { limits: (f64, f64) },
}

/// A loaded landscape.  Read-only after construction; share it via `Arc`.
#[derive(Clone, Debug)]
pub struct Landscape {
    grid:     GridSpec,
    crs:      Crs,
    capacity: Capacity,
}

impl Landscape {
    /// Landscape from already-transformed capacities (one per grid cell).
    pub fn from_capacities(grid: GridSpec, crs: Crs, capacities: Vec<f64>) -> LandscapeResult<Self> {
        if capacities.len() != grid.cell_count() {
            return Err(LandscapeError::GeoProcessing(format!(
                "{} capacity values for a {}×{} grid",
                capacities.len(),
                grid.width(),
                grid.height()
            )));
        }
        Ok(Self { grid, crs, capacity: Capacity::Raster(capacities) })
    }

    /// Synthetic uniform landscape over `grid`.
    pub fn synthetic(grid: GridSpec, crs: Crs, limits: (f64, f64)) -> Self {
        Self { grid, crs, capacity: Capacity::Uniform { limits } }
    }

    #[inline]
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    #[inline]
    pub fn crs(&self) -> Crs {
        self.crs
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        matches!(self.capacity, Capacity::Uniform { .. })
    }

    /// The raw capacity array, `None` for synthetic landscapes.
    pub fn raw(&self) -> Option<&[f64]> {
        match &self.capacity {
            Capacity::Raster(values) => Some(values),
            Capacity::Uniform { .. } => None,
        }
    }

    /// Capacity of one cell; `None` outside the grid or for synthetic
    /// landscapes.
    pub fn capacity_at(&self, cell: CellCoord) -> Option<f64> {
        let i = self.grid.linear_index(cell)?;
        self.raw().map(|values| values[i])
    }

    /// Geographic coordinate (in this landscape's CRS) → cell index.
    #[inline]
    pub fn coord_to_cell(&self, p: GeoPoint) -> CellCoord {
        self.grid.coord_to_cell(p)
    }

    /// Cell index → geographic coordinate of its top-left corner.
    #[inline]
    pub fn cell_to_coord(&self, cell: CellCoord) -> GeoPoint {
        self.grid.cell_to_coord(cell)
    }
}
