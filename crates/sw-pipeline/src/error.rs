use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Raised by `PipelineBuilder::build` before any tick runs.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfiguration(String),

    #[error("release schedule CSV error: {0}")]
    ReleaseCsv(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
