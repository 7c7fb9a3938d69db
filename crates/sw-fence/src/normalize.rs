//! Map a geographic fence polygon into cell space and classify cells
//! against it.
//!
//! Vertices go through [`GridSpec::coord_to_cell`], so the fence uses exactly
//! the axis-flip convention of the landscape it partitions.  Vertex order is
//! kept; the ring is not re-closed or re-oriented.

use geo::{Contains, Coord, LineString, Point, Polygon};

use sw_core::{CellCoord, GeoPoint, GridSpec, ZoneId};

/// Zone of cells strictly inside the fence.
pub const INSIDE_ZONE: ZoneId = ZoneId(0);
/// Zone of every other cell, including cells on the fence line.
pub const OUTSIDE_ZONE: ZoneId = ZoneId(1);

/// Convert the exterior ring of `polygon` from map coordinates to cell
/// indices.  Interior rings are dropped: cells inside a hole are still
/// inside the fence.
pub fn normalize_fence(polygon: &Polygon<f64>, grid: &GridSpec) -> Polygon<f64> {
    let exterior: LineString<f64> = polygon
        .exterior()
        .coords()
        .map(|c| {
            let cell = grid.coord_to_cell(GeoPoint::new(c.x, c.y));
            Coord { x: f64::from(cell.x), y: f64::from(cell.y) }
        })
        .collect();
    Polygon::new(exterior, Vec::new())
}

/// Pure cell → zone function backed by a cell-space fence polygon.
#[derive(Clone, Debug)]
pub struct FenceClassifier {
    polygon: Polygon<f64>,
}

impl FenceClassifier {
    /// `polygon` must already be in cell space (see [`normalize_fence`]).
    pub fn new(polygon: Polygon<f64>) -> Self {
        Self { polygon }
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn zone(&self, cell: CellCoord) -> ZoneId {
        let p = Point::new(f64::from(cell.x), f64::from(cell.y));
        if self.polygon.contains(&p) { INSIDE_ZONE } else { OUTSIDE_ZONE }
    }
}
