//! Simulation grid geometry: cell coordinates and the geographic ↔ cell
//! mapping.
//!
//! # Axis convention
//!
//! Cell `x` grows eastwards from `x_min`.  Cell `y` is a raster *row* index
//! and grows downwards from `y_max`, while geographic `y` grows upwards:
//!
//! ```text
//! cell_x = floor((gx − x_min) / cell_size_x)
//! cell_y = floor(−((gy − y_min) / cell_size_y) + height)
//! ```
//!
//! The landscape loader, the fence normaliser, and release-point conversion
//! all go through [`GridSpec`], so a fence and the landscape it partitions can
//! only disagree if they are handed different `GridSpec`s.

use std::fmt;

use crate::{BoundingBox, GeoPoint, SwError, SwResult};

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Integer `(x, y)` index into the simulation grid.
///
/// Signed so that geographic points outside the bounding box map to
/// out-of-grid (negative or too large) cells instead of wrapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── GridSpec ──────────────────────────────────────────────────────────────────

/// A bounding box subdivided into `width × height` equally sized cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSpec {
    bounds: BoundingBox,
    width:  usize,
    height: usize,
}

impl GridSpec {
    /// Create a grid; both dimensions must be non-zero and fit in `i32`.
    pub fn new(bounds: BoundingBox, width: usize, height: usize) -> SwResult<Self> {
        if width == 0 || height == 0 {
            return Err(SwError::Config(format!(
                "grid dimensions must be non-zero, got {width}×{height}"
            )));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(SwError::Config(format!("grid {width}×{height} exceeds i32 cell indices")));
        }
        Ok(Self { bounds, width, height })
    }

    /// Grid covering `bounds` at `resolution` map units per cell.
    ///
    /// Dimensions are rounded to the nearest whole cell, so the derived cell
    /// size may differ slightly from `resolution` when the extent is not an
    /// exact multiple.
    pub fn with_resolution(bounds: BoundingBox, resolution: f64) -> SwResult<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(SwError::Config(format!("resolution must be positive, got {resolution}")));
        }
        let width = (bounds.width() / resolution).round() as usize;
        let height = (bounds.height() / resolution).round() as usize;
        Self::new(bounds, width, height)
    }

    #[inline]
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// `(cell_size_x, cell_size_y)` in map units.  Always strictly positive.
    #[inline]
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.bounds.width() / self.width as f64,
            self.bounds.height() / self.height as f64,
        )
    }

    /// Geographic point → cell index (see the module docs for the formula).
    pub fn coord_to_cell(&self, p: GeoPoint) -> CellCoord {
        let (cs_x, cs_y) = self.cell_size();
        let x = ((p.x - self.bounds.x_min()) / cs_x).floor();
        let y = (-((p.y - self.bounds.y_min()) / cs_y) + self.height as f64).floor();
        CellCoord::new(saturate(x), saturate(y))
    }

    /// Cell index → geographic coordinate of the cell's top-left corner.
    ///
    /// Corners sit exactly on cell edges, so converting back may land one
    /// cell off through float rounding.  Use [`cell_center`][Self::cell_center]
    /// for an exact round-trip.
    pub fn cell_to_coord(&self, c: CellCoord) -> GeoPoint {
        let (cs_x, cs_y) = self.cell_size();
        GeoPoint::new(
            self.bounds.x_min() + c.x as f64 * cs_x,
            self.bounds.y_min() + (self.height as f64 - c.y as f64) * cs_y,
        )
    }

    /// Geographic coordinate of the centre of cell `c`.
    pub fn cell_center(&self, c: CellCoord) -> GeoPoint {
        let (cs_x, cs_y) = self.cell_size();
        let corner = self.cell_to_coord(c);
        GeoPoint::new(corner.x + cs_x * 0.5, corner.y - cs_y * 0.5)
    }

    /// `true` if `c` indexes a cell of this grid.
    #[inline]
    pub fn in_grid(&self, c: CellCoord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as usize) < self.width && (c.y as usize) < self.height
    }

    /// Row-major index of an in-grid cell.
    #[inline]
    pub fn linear_index(&self, c: CellCoord) -> Option<usize> {
        self.in_grid(c).then(|| c.y as usize * self.width + c.x as usize)
    }

    /// Cell of a row-major index.
    #[inline]
    pub fn cell_of(&self, index: usize) -> CellCoord {
        CellCoord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Iterate all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.cell_count()).map(|i| self.cell_of(i))
    }
}

fn saturate(v: f64) -> i32 {
    if v.is_nan() {
        i32::MIN
    } else {
        v.clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }
}
