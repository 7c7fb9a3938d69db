use thiserror::Error;

use sw_core::Tick;

use crate::ObserverError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A sink failed; the run stops at that tick.
    #[error("observer failed at {tick}: {source}")]
    Observer {
        tick:   Tick,
        source: ObserverError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
