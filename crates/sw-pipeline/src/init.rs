//! Map and population initialisers.
//!
//! The engine consumes these through dedicated setters rather than as
//! ordinary systems, so they are kept out of [`System`][crate::System].

use std::sync::Arc;

use sw_landscape::{Capacity, Landscape};

use crate::{PipelineError, PipelineResult};

/// How the engine obtains per-cell breeding capacity.
#[derive(Clone, Debug)]
pub enum MapInit {
    /// Capacity read from a raster-backed landscape, one Poisson draw per
    /// cell at population init.
    CallbackPoisson { landscape: Arc<Landscape> },
    /// Capacity drawn uniformly in `limits` by the engine.
    RandomUniform { width: usize, height: usize, limits: (f64, f64) },
}

impl MapInit {
    /// Pick the initialiser matching how the landscape was loaded.
    pub fn from_landscape(landscape: Arc<Landscape>) -> Self {
        match *landscape.capacity() {
            Capacity::Raster(_) => MapInit::CallbackPoisson { landscape },
            Capacity::Uniform { limits } => MapInit::RandomUniform {
                width: landscape.width(),
                height: landscape.height(),
                limits,
            },
        }
    }

    /// `(width, height)` of the simulated map.
    pub fn size(&self) -> (usize, usize) {
        match self {
            MapInit::CallbackPoisson { landscape } => (landscape.width(), landscape.height()),
            MapInit::RandomUniform { width, height, .. } => (*width, *height),
        }
    }

    pub(crate) fn validate(&self) -> PipelineResult<()> {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "map size must be non-zero, got {width}×{height}"
            )));
        }
        if let MapInit::RandomUniform { limits: (lo, hi), .. } = *self {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(PipelineError::InvalidConfiguration(format!(
                    "uniform capacity limits must be finite and ordered, got ({lo}, {hi})"
                )));
            }
        }
        Ok(())
    }
}

/// How the engine seeds the initial population.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PopInit {
    /// Poisson(max(capacity, 0) × `release_factor`) individuals per cell.
    Default { release_factor: f64 },
}

impl PopInit {
    pub(crate) fn validate(&self) -> PipelineResult<()> {
        let PopInit::Default { release_factor } = *self;
        if !(release_factor.is_finite() && release_factor > 0.0) {
            return Err(PipelineError::InvalidConfiguration(format!(
                "release factor must be finite and > 0, got {release_factor}"
            )));
        }
        Ok(())
    }
}
