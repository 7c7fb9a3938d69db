//! The closed set of simulation systems and the zone-ordering rule.

use crate::zones::{CarcassRemovalParams, Classifier, FenceParams, HuntingParams, ZoneParams};
use crate::{PipelineError, PipelineResult, ReleaseSchedule};

/// One entry of the pipeline's system list.
#[derive(Clone, Debug)]
pub enum System {
    DiseaseCourse,

    FenceZones(Classifier),
    Fences(ZoneParams<Vec<FenceParams>>),
    HuntingZones(Classifier),
    Hunting(ZoneParams<HuntingParams>),
    CarcassRemovalZones(Classifier),
    CarcassRemoval(ZoneParams<CarcassRemovalParams>),

    Mortality,
    SeasonalDecay,
    Reproduction,
    Ageing,
    FemaleDispersal,
    MaleDispersal,

    /// `radius` is in cells.
    Release { schedule: ReleaseSchedule, radius: u32 },
    Infection,
    /// Per infected cell and tick, the chance of emitting a new variant.
    Mutation { probability: f64 },

    TerminateFixedTick { num_ticks: u64 },
}

/// Management families that come as classifier + parameter pairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ZoneFamily {
    Fence,
    Hunting,
    CarcassRemoval,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ZoneRole {
    Classifier,
    Params,
}

impl System {
    pub fn name(&self) -> &'static str {
        match self {
            System::DiseaseCourse              => "disease_course",
            System::FenceZones(_)              => "fence_zones",
            System::Fences(_)                  => "fences",
            System::HuntingZones(_)            => "hunting_zones",
            System::Hunting(_)                 => "hunting",
            System::CarcassRemovalZones(_)     => "carcass_removal_zones",
            System::CarcassRemoval(_)          => "carcass_removal",
            System::Mortality                  => "mortality",
            System::SeasonalDecay              => "seasonal_decay",
            System::Reproduction               => "reproduction",
            System::Ageing                     => "ageing",
            System::FemaleDispersal            => "female_dispersal",
            System::MaleDispersal              => "male_dispersal",
            System::Release { .. }             => "release",
            System::Infection                  => "infection",
            System::Mutation { .. }            => "mutation",
            System::TerminateFixedTick { .. }  => "terminate_fixed_tick",
        }
    }

    /// Family and role for the paired management systems, `None` otherwise.
    pub fn zone_role(&self) -> Option<(ZoneFamily, ZoneRole)> {
        match self {
            System::FenceZones(_)          => Some((ZoneFamily::Fence, ZoneRole::Classifier)),
            System::Fences(_)              => Some((ZoneFamily::Fence, ZoneRole::Params)),
            System::HuntingZones(_)        => Some((ZoneFamily::Hunting, ZoneRole::Classifier)),
            System::Hunting(_)             => Some((ZoneFamily::Hunting, ZoneRole::Params)),
            System::CarcassRemovalZones(_) => Some((ZoneFamily::CarcassRemoval, ZoneRole::Classifier)),
            System::CarcassRemoval(_)      => Some((ZoneFamily::CarcassRemoval, ZoneRole::Params)),
            _ => None,
        }
    }

    /// The classifier carried by a `*Zones` system.
    pub fn classifier(&self) -> Option<(ZoneFamily, &Classifier)> {
        match self {
            System::FenceZones(c)          => Some((ZoneFamily::Fence, c)),
            System::HuntingZones(c)        => Some((ZoneFamily::Hunting, c)),
            System::CarcassRemovalZones(c) => Some((ZoneFamily::CarcassRemoval, c)),
            _ => None,
        }
    }
}

/// Verify that every classifier is immediately followed by the parameter
/// system of its family, and every parameter system immediately follows
/// its classifier.
pub fn check_zone_order(systems: &[System]) -> PipelineResult<()> {
    for (i, system) in systems.iter().enumerate() {
        let Some((family, role)) = system.zone_role() else { continue };
        let (neighbour, expected) = match role {
            ZoneRole::Classifier => (systems.get(i + 1), ZoneRole::Params),
            ZoneRole::Params => (i.checked_sub(1).and_then(|j| systems.get(j)), ZoneRole::Classifier),
        };
        if neighbour.and_then(System::zone_role) != Some((family, expected)) {
            return Err(PipelineError::InvalidConfiguration(format!(
                "system #{i} ({}) must be {} its {family:?} {}",
                system.name(),
                if expected == ZoneRole::Params { "immediately followed by" } else { "immediately preceded by" },
                if expected == ZoneRole::Params { "parameters" } else { "classifier" },
            )));
        }
    }
    Ok(())
}
