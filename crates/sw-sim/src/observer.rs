//! Observer hooks called by [`Engine::run`][crate::Engine::run].

use sw_core::Tick;

use crate::{Observation, Snapshot};

/// Error type sinks report through the observer hooks.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only view of engine state, valid for the duration of one callback.
pub trait SnapshotSource {
    fn snapshot(&self, observation: &Observation) -> Snapshot;
}

/// Callbacks invoked by the engine's tick loop.
///
/// Both methods default to no-ops.  An `Err` aborts the run with
/// [`SimError::Observer`][crate::SimError::Observer].
///
/// # Example
///
/// ```rust,ignore
/// struct PopulationPrinter;
///
/// impl SimObserver for PopulationPrinter {
///     fn on_tick_end(&mut self, tick: Tick, state: &dyn SnapshotSource) -> Result<(), ObserverError> {
///         if let Snapshot::Row(row) = state.snapshot(&Observation::AgeClassTable) {
///             println!("{tick}: {row:?}");
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after every executed tick.
    fn on_tick_end(&mut self, _tick: Tick, _state: &dyn SnapshotSource) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Called once after the termination condition is met, including runs
    /// with zero ticks.
    fn on_sim_end(&mut self, _final_tick: Tick, _state: &dyn SnapshotSource) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
