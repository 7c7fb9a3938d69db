//! `sw-sim` — the engine boundary and a headless reference engine.
//!
//! # Run loop
//!
//! ```text
//! setup:  map init → pop init → classify zones (parallel with `parallel`)
//! for tick in 0..num_ticks:
//!   ① Release    — infect one susceptible near each scheduled cell
//!   ② Mutation   — infected cells may switch to a fresh variant
//!   ③ Ageing     — promote age classes at the end of each year
//!   ④ Observe    — SimObserver::on_tick_end(tick, &snapshots)
//! SimObserver::on_sim_end(final_tick, &snapshots)
//! ```
//!
//! The other systems are accepted and counted but leave the state alone in
//! [`GridSim`]; a full engine plugs in behind the same [`Engine`] trait.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | Evaluates zone classifiers on Rayon's thread pool.   |

pub mod engine;
pub mod error;
pub mod grid_sim;
pub mod observation;
pub mod observer;


pub use engine::{Engine, RunSummary};
pub use error::{SimError, SimResult};
pub use grid_sim::GridSim;
pub use observation::{AgeClass, Grid3, Observation, Snapshot};
pub use observer::{NoopObserver, ObserverError, SimObserver, SnapshotSource};
