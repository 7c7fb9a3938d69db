//! Fluent builder for a [`Pipeline`].

use tracing::debug;

use crate::system::check_zone_order;
use crate::zones::{CarcassRemovalParams, Classifier, FenceParams, HuntingParams, ZoneParams, unit_interval};
use crate::{MapInit, PipelineError, PipelineResult, PopInit, ReleaseSchedule, System};

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// The initialisers plus the ordered system list.  Immutable once built;
/// consumed by `Engine::load`.
#[derive(Clone, Debug)]
pub struct Pipeline {
    map_init: MapInit,
    pop_init: PopInit,
    systems:  Vec<System>,
}

impl Pipeline {
    pub fn map_init(&self) -> &MapInit {
        &self.map_init
    }

    pub fn pop_init(&self) -> &PopInit {
        &self.pop_init
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    /// Tick budget of the termination system, if any.
    pub fn num_ticks(&self) -> Option<u64> {
        self.systems.iter().find_map(|s| match s {
            System::TerminateFixedTick { num_ticks } => Some(*num_ticks),
            _ => None,
        })
    }

    pub fn check_zone_order(&self) -> PipelineResult<()> {
        check_zone_order(&self.systems)
    }

    pub fn into_parts(self) -> (MapInit, PopInit, Vec<System>) {
        (self.map_init, self.pop_init, self.systems)
    }
}

// ── PipelineBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Pipeline`].
///
/// # Required inputs
///
/// - [`MapInit`] and [`PopInit`], given to [`new`][Self::new]
/// - a termination tick, via [`terminate_after`][Self::terminate_after]
///
/// # Optional stages
///
/// | Method                     | Systems added                              |
/// |----------------------------|--------------------------------------------|
/// | `.fence(c, p)`             | `FenceZones`, `Fences`                     |
/// | `.hunting(c, p)`           | `HuntingZones`, `Hunting`                  |
/// | `.carcass_removal(c, p)`   | `CarcassRemovalZones`, `CarcassRemoval`    |
/// | `.release(s, r)`           | `Release`                                  |
/// | `.mutation(p)`             | `Mutation`                                 |
///
/// Disease course, the population processes, and infection are always
/// present.  Stages land in the fixed order documented on the crate, no
/// matter the order the setters are called in.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new(MapInit::from_landscape(landscape), PopInit::Default { release_factor: 5.0 })
///     .hunting(Classifier::Constant(ZoneId(0)), ZoneParams::new().with(ZoneId(0), hunting))
///     .release(ReleaseSchedule::single(Tick(3), cell), 5)
///     .mutation(0.01)
///     .terminate_after(120)
///     .build()?;
/// ```
pub struct PipelineBuilder {
    map_init:        MapInit,
    pop_init:        PopInit,
    fence:           Option<(Classifier, ZoneParams<Vec<FenceParams>>)>,
    hunting:         Option<(Classifier, ZoneParams<HuntingParams>)>,
    carcass_removal: Option<(Classifier, ZoneParams<CarcassRemovalParams>)>,
    release:         Option<(ReleaseSchedule, u32)>,
    mutation:        Option<f64>,
    num_ticks:       Option<u64>,
}

impl PipelineBuilder {
    pub fn new(map_init: MapInit, pop_init: PopInit) -> Self {
        Self {
            map_init,
            pop_init,
            fence:           None,
            hunting:         None,
            carcass_removal: None,
            release:         None,
            mutation:        None,
            num_ticks:       None,
        }
    }

    pub fn fence(mut self, classifier: Classifier, params: ZoneParams<Vec<FenceParams>>) -> Self {
        self.fence = Some((classifier, params));
        self
    }

    pub fn hunting(mut self, classifier: Classifier, params: ZoneParams<HuntingParams>) -> Self {
        self.hunting = Some((classifier, params));
        self
    }

    pub fn carcass_removal(mut self, classifier: Classifier, params: ZoneParams<CarcassRemovalParams>) -> Self {
        self.carcass_removal = Some((classifier, params));
        self
    }

    /// `radius` is the search radius, in cells, around each release point.
    pub fn release(mut self, schedule: ReleaseSchedule, radius: u32) -> Self {
        self.release = Some((schedule, radius));
        self
    }

    pub fn mutation(mut self, probability: f64) -> Self {
        self.mutation = Some(probability);
        self
    }

    pub fn terminate_after(mut self, num_ticks: u64) -> Self {
        self.num_ticks = Some(num_ticks);
        self
    }

    /// Validate every stage and assemble the system list.
    pub fn build(self) -> PipelineResult<Pipeline> {
        // ── Validate ──────────────────────────────────────────────────────
        self.map_init.validate()?;
        self.pop_init.validate()?;
        if let Some((_, params)) = &self.fence {
            params.validate("fences")?;
        }
        if let Some((_, params)) = &self.hunting {
            params.validate("hunting")?;
        }
        if let Some((_, params)) = &self.carcass_removal {
            params.validate("carcass removal")?;
        }
        if let Some(p) = self.mutation {
            unit_interval("mutation probability", p).map_err(PipelineError::InvalidConfiguration)?;
        }
        let num_ticks = self.num_ticks.ok_or_else(|| {
            PipelineError::InvalidConfiguration("no termination configured; call terminate_after".into())
        })?;

        // ── Assemble in fixed order ───────────────────────────────────────
        let mut systems = vec![System::DiseaseCourse];
        if let Some((c, p)) = self.fence {
            push_zone_pair(&mut systems, System::FenceZones(c), System::Fences(p));
        }
        if let Some((c, p)) = self.hunting {
            push_zone_pair(&mut systems, System::HuntingZones(c), System::Hunting(p));
        }
        if let Some((c, p)) = self.carcass_removal {
            push_zone_pair(&mut systems, System::CarcassRemovalZones(c), System::CarcassRemoval(p));
        }
        systems.extend([
            System::Mortality,
            System::SeasonalDecay,
            System::Reproduction,
            System::Ageing,
            System::FemaleDispersal,
            System::MaleDispersal,
        ]);
        if let Some((schedule, radius)) = self.release {
            systems.push(System::Release { schedule, radius });
        }
        systems.push(System::Infection);
        if let Some(probability) = self.mutation {
            systems.push(System::Mutation { probability });
        }
        systems.push(System::TerminateFixedTick { num_ticks });

        let pipeline = Pipeline { map_init: self.map_init, pop_init: self.pop_init, systems };
        pipeline.check_zone_order()?;
        debug!(
            systems = pipeline.systems.len(),
            map = ?pipeline.map_init.size(),
            num_ticks,
            "pipeline built"
        );
        Ok(pipeline)
    }
}

/// The only place a classifier and its parameter system are pushed.
fn push_zone_pair(systems: &mut Vec<System>, classifier: System, params: System) {
    debug_assert_eq!(
        classifier.zone_role().map(|(f, _)| f),
        params.zone_role().map(|(f, _)| f)
    );
    systems.push(classifier);
    systems.push(params);
}
