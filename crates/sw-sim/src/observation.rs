//! Observations (what to look at) and snapshots (what was seen).
//!
//! | Observation           | Snapshot                                         |
//! |-----------------------|--------------------------------------------------|
//! | `EpiStatMap`          | grid, layers S / I / R, `height × width`         |
//! | `SecondaryInfections` | grid, 1 layer, rows total / within / between / carcass, one column per secondary-infection count |
//! | `VariantsMap`         | grid, 1 layer of variant ids (0 = none)          |
//! | `PopulationMap`       | grid, 1 layer of living individuals              |
//! | `*Table`              | one row matching [`Observation::columns`]        |

use std::fmt;

// ── AgeClass ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeClass {
    Piglet,
    Yearling,
    Adult,
}

impl AgeClass {
    pub const ALL: [AgeClass; 3] = [AgeClass::Piglet, AgeClass::Yearling, AgeClass::Adult];

    pub fn name(self) -> &'static str {
        match self {
            AgeClass::Piglet => "piglet",
            AgeClass::Yearling => "yearling",
            AgeClass::Adult => "adult",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Observation ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Observation {
    EpiStatMap,
    SecondaryInfections,
    /// `first_variant`: report the first variant a cell carried instead of
    /// its current one.
    VariantsMap { first_variant: bool },
    PopulationMap,
    NewInfectionsTable,
    AgeClassTable,
    CauseOfDeathTable,
    CarcassesTable,
    EpiStatTable,
}

impl Observation {
    /// Layer names for grid observations, column names for tables.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Observation::EpiStatMap | Observation::EpiStatTable => &["susceptible", "infected", "resistant"],
            Observation::SecondaryInfections => &["total", "within", "between", "carcass"],
            Observation::VariantsMap { .. } => &["variant"],
            Observation::PopulationMap => &["population"],
            Observation::NewInfectionsTable => &["release", "within", "between", "carcass"],
            Observation::AgeClassTable => &["piglet", "yearling", "adult"],
            Observation::CauseOfDeathTable => &["natural", "disease", "hunted"],
            Observation::CarcassesTable => &["total", "infectious", "removed"],
        }
    }

    pub fn is_grid(&self) -> bool {
        matches!(
            self,
            Observation::EpiStatMap
                | Observation::SecondaryInfections
                | Observation::VariantsMap { .. }
                | Observation::PopulationMap
        )
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Snapshot {
    Grid(Grid3),
    Row(Vec<i64>),
}

/// Dense `layers × height × width` integer array, layer-major then
/// row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid3 {
    layers: usize,
    height: usize,
    width:  usize,
    data:   Vec<i64>,
}

impl Grid3 {
    pub fn zeros(layers: usize, height: usize, width: usize) -> Self {
        Self { layers, height, width, data: vec![0; layers * height * width] }
    }

    /// `None` if `data.len()` does not match the shape.
    pub fn from_vec(layers: usize, height: usize, width: usize, data: Vec<i64>) -> Option<Self> {
        (data.len() == layers * height * width).then_some(Self { layers, height, width, data })
    }

    #[inline]
    pub fn layers(&self) -> usize {
        self.layers
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn get(&self, layer: usize, row: usize, col: usize) -> i64 {
        self.data[(layer * self.height + row) * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, layer: usize, row: usize, col: usize, value: i64) {
        self.data[(layer * self.height + row) * self.width + col] = value;
    }

    /// One layer as a row-major slice.
    pub fn layer(&self, layer: usize) -> &[i64] {
        let len = self.height * self.width;
        &self.data[layer * len..(layer + 1) * len]
    }

    /// Rows of one layer.
    pub fn rows(&self, layer: usize) -> impl Iterator<Item = &[i64]> {
        self.layer(layer).chunks(self.width.max(1))
    }
}
