//! Error types for sw-run.

use thiserror::Error;

use sw_fence::FenceError;
use sw_landscape::LandscapeError;
use sw_output::OutputError;
use sw_pipeline::PipelineError;
use sw_sim::SimError;

use crate::RunState;

/// A configuration key is missing or cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration key {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Every way a scenario run can fail.  No variant is retried.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("landscape: {0}")]
    Landscape(#[from] LandscapeError),

    #[error("fence: {0}")]
    Fence(#[from] FenceError),

    #[error("pipeline: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("simulation: {0}")]
    Sim(#[from] SimError),

    #[error("output: {0}")]
    Output(#[from] OutputError),

    /// `build` or `run` called on an orchestrator in the wrong state.
    #[error("orchestrator is {0:?}")]
    State(RunState),
}

pub type RunResult<T> = Result<T, RunError>;
