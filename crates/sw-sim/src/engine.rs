//! The narrow interface the orchestrator drives.

use sw_core::Tick;
use sw_pipeline::{MapInit, Pipeline, PopInit, System};

use crate::{SimObserver, SimResult};

/// What a completed run reports back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of ticks executed.
    pub ticks:            u64,
    /// Tick counter after the last executed tick.
    pub final_tick:       Tick,
    /// Systems registered with the engine.
    pub systems:          usize,
    /// Living individuals at the end of the run.
    pub final_population: u64,
}

/// A tick-based simulation engine.
///
/// Configuration is write-only: initialisers and systems go in, and the only
/// way to observe state is through the [`SimObserver`] passed to
/// [`run`][Engine::run].
pub trait Engine {
    fn set_map_init(&mut self, init: MapInit);

    fn set_pop_init(&mut self, init: PopInit);

    /// Append one system.  Order matters: zone classifiers must directly
    /// precede their parameter systems.
    fn add_system(&mut self, system: System);

    /// Register a whole pipeline in its stored order.
    fn load(&mut self, pipeline: Pipeline) {
        let (map_init, pop_init, systems) = pipeline.into_parts();
        self.set_map_init(map_init);
        self.set_pop_init(pop_init);
        for system in systems {
            self.add_system(system);
        }
    }

    /// Run until the termination system fires.  Blocks.
    fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary>;
}
