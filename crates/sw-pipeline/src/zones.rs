//! Zone classifiers and per-zone parameter maps.
//!
//! A classifier is a pure `CellCoord → Option<ZoneId>` function; `None`
//! leaves the cell unmanaged.  A [`ZoneParams`] maps the ids one classifier
//! emits to the parameters of the management system that follows it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sw_core::{CellCoord, ZoneId};
use sw_fence::FenceClassifier;

use crate::{PipelineError, PipelineResult};

// ── Classifier ────────────────────────────────────────────────────────────────

/// Caller-supplied classifier function.  Must be pure.
pub type ZoneFn = Arc<dyn Fn(CellCoord) -> Option<ZoneId> + Send + Sync>;

#[derive(Clone)]
pub enum Classifier {
    /// Every cell belongs to the same zone.
    Constant(ZoneId),
    /// Inside the fence polygon → zone 0, everywhere else → zone 1.
    Fence(FenceClassifier),
    /// Cells with `x <= max_x` belong to `zone`; the rest are unmanaged.
    UpToX { max_x: i32, zone: ZoneId },
    Callback(ZoneFn),
}

impl Classifier {
    pub fn callback(f: impl Fn(CellCoord) -> Option<ZoneId> + Send + Sync + 'static) -> Self {
        Classifier::Callback(Arc::new(f))
    }

    #[inline]
    pub fn zone(&self, cell: CellCoord) -> Option<ZoneId> {
        match self {
            Classifier::Constant(zone) => Some(*zone),
            Classifier::Fence(fence) => Some(fence.zone(cell)),
            Classifier::UpToX { max_x, zone } => (cell.x <= *max_x).then_some(*zone),
            Classifier::Callback(f) => f(cell),
        }
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::Constant(zone) => f.debug_tuple("Constant").field(zone).finish(),
            Classifier::Fence(fence) => f
                .debug_struct("Fence")
                .field("vertices", &fence.polygon().exterior().0.len())
                .finish(),
            Classifier::UpToX { max_x, zone } => {
                f.debug_struct("UpToX").field("max_x", max_x).field("zone", zone).finish()
            }
            Classifier::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

// ── Parameter structs ─────────────────────────────────────────────────────────

/// Parameter sets that can be checked before the run starts.
pub trait ValidateParams {
    /// Describe the first problem found, if any.
    fn check(&self) -> Result<(), String>;
}

/// One fence segment of a zone: the pair of zones it separates.
///
/// `low` and `high` are zone ids, not ordered bounds; either side may carry
/// the larger id.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FenceParams {
    pub low:          ZoneId,
    pub high:         ZoneId,
    /// Probability that an individual crosses the fence.
    pub permeability: f64,
}

impl ValidateParams for Vec<FenceParams> {
    fn check(&self) -> Result<(), String> {
        self.iter().try_for_each(|p| unit_interval("fence permeability", p.permeability))
    }
}

/// Hunting campaign for one zone.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HuntingParams {
    pub start:        i64,
    pub duration:     i64,
    /// Share of the zone's population harvested over the campaign.
    pub target_share: f64,
}

impl ValidateParams for HuntingParams {
    fn check(&self) -> Result<(), String> {
        non_negative("hunting start", self.start)?;
        non_negative("hunting duration", self.duration)?;
        unit_interval("hunting target share", self.target_share)
    }
}

/// Carcass search-and-removal campaign for one zone.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarcassRemovalParams {
    pub start:                 i64,
    pub duration:              i64,
    pub detection_probability: f64,
}

impl ValidateParams for CarcassRemovalParams {
    fn check(&self) -> Result<(), String> {
        non_negative("carcass removal start", self.start)?;
        non_negative("carcass removal duration", self.duration)?;
        unit_interval("carcass detection probability", self.detection_probability)
    }
}

pub(crate) fn unit_interval(what: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(format!("{what} must be in [0, 1], got {v}"))
    }
}

fn non_negative(what: &str, v: i64) -> Result<(), String> {
    if v >= 0 { Ok(()) } else { Err(format!("{what} must be non-negative, got {v}")) }
}

// ── ZoneParams ────────────────────────────────────────────────────────────────

/// Zone id → parameters, ordered by id.
///
/// Entries for ids the paired classifier never emits are allowed; they are
/// simply never looked up.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneParams<P> {
    entries: BTreeMap<ZoneId, P>,
}

impl<P> Default for ZoneParams<P> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<P> ZoneParams<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, zone: ZoneId, params: P) -> Self {
        self.entries.insert(zone, params);
        self
    }

    pub fn insert(&mut self, zone: ZoneId, params: P) -> Option<P> {
        self.entries.insert(zone, params)
    }

    pub fn get(&self, zone: ZoneId) -> Option<&P> {
        self.entries.get(&zone)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &P)> {
        self.entries.iter().map(|(z, p)| (*z, p))
    }

    pub fn zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: ValidateParams> ZoneParams<P> {
    /// Check every entry; `family` names the system in the error message.
    pub fn validate(&self, family: &str) -> PipelineResult<()> {
        self.entries.iter().try_for_each(|(zone, params)| {
            params
                .check()
                .map_err(|msg| PipelineError::InvalidConfiguration(format!("{family} {zone}: {msg}")))
        })
    }
}

impl<P> FromIterator<(ZoneId, P)> for ZoneParams<P> {
    fn from_iter<I: IntoIterator<Item = (ZoneId, P)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
