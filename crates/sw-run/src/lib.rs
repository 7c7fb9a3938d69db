//! `sw-run` — configure and run the ASF fence scenario.
//!
//! | Module           | Contents                                                   |
//! |------------------|------------------------------------------------------------|
//! | [`config`]       | `RunConfig` from environment variables or a YAML file      |
//! | [`scenario`]     | `Scenario` management defaults, pipeline assembly          |
//! | [`exports`]      | the output directory layout and its sinks                  |
//! | [`orchestrator`] | `Orchestrator`, `RunState`, `RunReport`                    |
//! | [`error`]        | `ConfigError`, `RunError`, `RunResult<T>`                  |

pub mod config;
pub mod error;
pub mod exports;
pub mod orchestrator;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use config::RunConfig;
pub use error::{ConfigError, RunError, RunResult};
pub use exports::standard_exports;
pub use orchestrator::{Orchestrator, RunReport, RunState};
pub use scenario::Scenario;
