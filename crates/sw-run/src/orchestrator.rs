//! `Orchestrator` — one scenario run from configuration to written outputs.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use sw_fence::{FenceClassifier, normalize_fence, parse_fence};
use sw_landscape::{FallbackGrid, Landscape, LandscapeLoader};
use sw_output::ExportPipeline;
use sw_pipeline::MapInit;
use sw_sim::{Engine, GridSim, RunSummary};

use crate::exports::standard_exports;
use crate::{RunConfig, RunError, RunResult};

// ── RunState ──────────────────────────────────────────────────────────────────

/// Lifecycle of an [`Orchestrator`].  There is no way back to an earlier
/// state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Unconfigured,
    /// Every system is registered and the output files are open.
    Built,
    Running,
    Completed,
    Aborted,
}

// ── RunReport ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct RunReport {
    pub summary:             RunSummary,
    /// Wall-clock time of the engine run alone.
    pub elapsed:             Duration,
    /// `true` if the raster was missing and the synthetic landscape was used.
    pub synthetic_landscape: bool,
    pub fenced:              bool,
}

impl RunReport {
    pub fn per_tick(&self) -> Duration {
        match u32::try_from(self.summary.ticks) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.elapsed / n,
            Err(_) => Duration::from_secs_f64(self.elapsed.as_secs_f64() / self.summary.ticks as f64),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total runtime: {:.2}s, Runtime per tick: {:.2}ms ({} ticks)",
            self.elapsed.as_secs_f64(),
            self.per_tick().as_secs_f64() * 1_000.0,
            self.summary.ticks
        )
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Wires landscape, fence, pipeline, and exports into one engine and runs it.
///
/// ```rust,ignore
/// let report = Orchestrator::new(RunConfig::from_env()?).run()?;
/// println!("{report}");
/// ```
pub struct Orchestrator<E: Engine = GridSim> {
    config:    RunConfig,
    engine:    E,
    state:     RunState,
    exports:   Option<ExportPipeline>,
    landscape: Option<Arc<Landscape>>,
    fenced:    bool,
}

impl Orchestrator<GridSim> {
    /// Use the headless [`GridSim`] seeded from the configuration.
    pub fn new(config: RunConfig) -> Self {
        let engine = GridSim::new(config.seed);
        Self::with_engine(config, engine)
    }
}

impl<E: Engine> Orchestrator<E> {
    pub fn with_engine(config: RunConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            state: RunState::Unconfigured,
            exports: None,
            landscape: None,
            fenced: false,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The loaded landscape, once built.
    pub fn landscape(&self) -> Option<&Arc<Landscape>> {
        self.landscape.as_ref()
    }

    /// Load inputs, register every system, and open the output files.
    ///
    /// Unconfigured → Built, or → Aborted on any error.
    pub fn build(&mut self) -> RunResult<()> {
        if self.state != RunState::Unconfigured {
            return Err(RunError::State(self.state));
        }
        let result = self.assemble();
        self.state = if result.is_ok() { RunState::Built } else { RunState::Aborted };
        result
    }

    /// Build if needed, then run to completion.
    ///
    /// Built → Running → Completed, or → Aborted on any error.  Sinks are
    /// finished on both paths.
    pub fn run(&mut self) -> RunResult<RunReport> {
        if self.state == RunState::Unconfigured {
            self.build()?;
        }
        if self.state != RunState::Built {
            return Err(RunError::State(self.state));
        }
        let Some(mut exports) = self.exports.take() else {
            self.state = RunState::Aborted;
            return Err(RunError::State(RunState::Built));
        };

        self.state = RunState::Running;
        info!(ticks = self.config.scenario.num_ticks, out = %self.config.output_dir.display(), "run started");
        let start = Instant::now();
        let outcome = self.engine.run(&mut exports);
        let elapsed = start.elapsed();
        // Closes the video files on the error path too.
        drop(exports);

        match outcome {
            Ok(summary) => {
                self.state = RunState::Completed;
                let report = RunReport {
                    summary,
                    elapsed,
                    synthetic_landscape: self.landscape.as_ref().is_some_and(|l| l.is_synthetic()),
                    fenced: self.fenced,
                };
                info!(ticks = summary.ticks, elapsed_s = elapsed.as_secs_f64(), "run completed");
                Ok(report)
            }
            Err(e) => {
                self.state = RunState::Aborted;
                Err(e.into())
            }
        }
    }

    fn assemble(&mut self) -> RunResult<()> {
        let cfg = &self.config;
        let loader = LandscapeLoader::new(&cfg.input_map, cfg.target_crs, cfg.computed_area, cfg.resolution);
        let landscape = Arc::new(loader.load_or_fallback(&FallbackGrid::default())?);
        let grid = *landscape.grid();

        let fence = match cfg.fence_coords.as_deref() {
            Some(text) => {
                let polygon = parse_fence(text)?;
                Some(FenceClassifier::new(normalize_fence(&polygon, &grid)))
            }
            None => None,
        };
        self.fenced = fence.is_some();

        let release_cell = landscape.coord_to_cell(cfg.release_coords);
        let release = cfg.scenario.release_schedule(release_cell, &grid)?;
        debug!(cell = %release_cell, events = release.len(), "release schedule");

        let pipeline = cfg
            .scenario
            .pipeline(MapInit::from_landscape(Arc::clone(&landscape)), release, fence)?;
        debug!(systems = pipeline.systems().len(), fenced = self.fenced, "pipeline built");

        let exports = standard_exports(&cfg.output_dir, Arc::clone(&landscape))?;

        self.engine.load(pipeline);
        self.exports = Some(exports);
        self.landscape = Some(landscape);
        Ok(())
    }
}
