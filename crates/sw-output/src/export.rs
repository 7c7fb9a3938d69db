//! `ExportPipeline` — the observer that fans engine snapshots out to sinks.

use tracing::debug;

use sw_core::Tick;
use sw_sim::{Observation, ObserverError, SimObserver, Snapshot, SnapshotSource};

use crate::{HashMap, OutputResult, Sink};

/// Ordered `(observation, sink)` routes.
///
/// Each tick, every route is served in registration order.  A snapshot is
/// pulled from the engine at most once per observation per tick, so two
/// sinks on the same observation see identical data.
#[derive(Default)]
pub struct ExportPipeline {
    routes: Vec<(Observation, Box<dyn Sink>)>,
    cache:  HashMap<Observation, Snapshot>,
}

impl ExportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, observation: Observation, sink: impl Sink + 'static) -> Self {
        self.push(observation, Box::new(sink));
        self
    }

    pub fn push(&mut self, observation: Observation, sink: Box<dyn Sink>) {
        self.routes.push((observation, sink));
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Observations in route order.
    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.routes.iter().map(|(obs, _)| obs)
    }

    /// Deliver one tick to every route.
    pub fn deliver(&mut self, tick: Tick, state: &dyn SnapshotSource) -> OutputResult<()> {
        self.cache.clear();
        for (observation, sink) in &mut self.routes {
            let snapshot = self
                .cache
                .entry(*observation)
                .or_insert_with(|| state.snapshot(observation));
            sink.accept(tick, snapshot)?;
        }
        debug!(tick = %tick, routes = self.routes.len(), observations = self.cache.len(), "tick exported");
        Ok(())
    }

    /// Finish every sink, even after a failure; returns the first error.
    pub fn finish_all(&mut self) -> OutputResult<()> {
        let mut first = None;
        for (_, sink) in &mut self.routes {
            if let Err(e) = sink.finish() {
                first.get_or_insert(e);
            }
        }
        self.cache.clear();
        first.map_or(Ok(()), Err)
    }
}

impl SimObserver for ExportPipeline {
    fn on_tick_end(&mut self, tick: Tick, state: &dyn SnapshotSource) -> Result<(), ObserverError> {
        self.deliver(tick, state).map_err(Into::into)
    }

    fn on_sim_end(&mut self, final_tick: Tick, _state: &dyn SnapshotSource) -> Result<(), ObserverError> {
        debug!(tick = %final_tick, "finishing sinks");
        self.finish_all().map_err(Into::into)
    }
}
