//! Management parameters of the ASF fence scenario.
//!
//! Every field has a default, so a YAML `scenario:` block only needs the
//! values it changes:
//!
//! ```yaml
//! scenario:
//!   num_ticks: 520
//!   hunting: { start: 104, duration: 52, target_share: 0.6 }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sw_core::{CellCoord, GridSpec, TICKS_PER_YEAR, Tick, ZoneId};
use sw_fence::{FenceClassifier, INSIDE_ZONE, OUTSIDE_ZONE};
use sw_pipeline::{
    CarcassRemovalParams, Classifier, FenceParams, HuntingParams, MapInit, Pipeline, PipelineBuilder,
    PipelineResult, PopInit, ReleaseSchedule, ZoneParams,
};

/// Zone that hunting and carcass removal act on.
pub const MANAGED_ZONE: ZoneId = ZoneId(0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub release_factor:        f64,
    /// Fences of the zone inside the fence polygon.
    pub fence:                 Vec<FenceParams>,
    pub hunting:               HuntingParams,
    pub carcass_removal:       CarcassRemovalParams,
    /// Carcass removal covers cells with `x <= carcass_removal_max_x`.
    pub carcass_removal_max_x: i32,
    pub release_tick:          u64,
    pub release_radius:        u32,
    /// `x,y,tick` CSV replacing the single configured release point.
    pub release_csv:           Option<PathBuf>,
    pub mutation_probability:  f64,
    pub num_ticks:             u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            release_factor:        5.0,
            fence:                 vec![FenceParams { low: INSIDE_ZONE, high: OUTSIDE_ZONE, permeability: 0.0 }],
            hunting:               HuntingParams {
                start:        (5 * TICKS_PER_YEAR) as i64,
                duration:     TICKS_PER_YEAR as i64,
                target_share: 0.8,
            },
            carcass_removal:       CarcassRemovalParams {
                start:                 (5 * TICKS_PER_YEAR) as i64,
                duration:              (2 * TICKS_PER_YEAR) as i64,
                detection_probability: 0.5,
            },
            carcass_removal_max_x: 75,
            release_tick:          3,
            release_radius:        5,
            release_csv:           None,
            mutation_probability:  1e-2,
            num_ticks:             120,
        }
    }
}

impl Scenario {
    /// Release schedule: the CSV if one is configured, else `release_cell`
    /// at `release_tick`.
    pub fn release_schedule(&self, release_cell: CellCoord, grid: &GridSpec) -> PipelineResult<ReleaseSchedule> {
        match &self.release_csv {
            Some(path) => ReleaseSchedule::from_csv(path, grid),
            None => Ok(ReleaseSchedule::single(Tick(self.release_tick), release_cell)),
        }
    }

    /// Assemble the full system list.  Fences are only added when a fence
    /// classifier is given.
    pub fn pipeline(
        &self,
        map_init: MapInit,
        release: ReleaseSchedule,
        fence: Option<FenceClassifier>,
    ) -> PipelineResult<Pipeline> {
        let mut builder = PipelineBuilder::new(map_init, PopInit::Default { release_factor: self.release_factor });
        if let Some(fence) = fence {
            builder = builder.fence(Classifier::Fence(fence), ZoneParams::new().with(INSIDE_ZONE, self.fence.clone()));
        }
        builder
            .hunting(Classifier::Constant(MANAGED_ZONE), ZoneParams::new().with(MANAGED_ZONE, self.hunting))
            .carcass_removal(
                Classifier::UpToX { max_x: self.carcass_removal_max_x, zone: MANAGED_ZONE },
                ZoneParams::new().with(MANAGED_ZONE, self.carcass_removal),
            )
            .release(release, self.release_radius)
            .mutation(self.mutation_probability)
            .terminate_after(self.num_ticks)
            .build()
    }
}
