//! `sw-pipeline` — the ordered list of simulation systems handed to the
//! engine.
//!
//! # Pipeline order
//!
//! ```text
//! MapInit, PopInit                 (dedicated engine setters)
//! DiseaseCourse
//! FenceZones → Fences              (optional pair)
//! HuntingZones → Hunting           (optional pair)
//! CarcassRemovalZones → CarcassRemoval
//! Mortality, SeasonalDecay, Reproduction, Ageing, FemaleDispersal, MaleDispersal
//! Release { schedule, radius }
//! Infection
//! Mutation { probability }
//! TerminateFixedTick { num_ticks }
//! ```
//!
//! Every zone classifier sits immediately before the parameter system that
//! reads its ids.  [`PipelineBuilder`] pushes each pair through one function;
//! [`check_zone_order`] re-verifies any system list.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`init`]    | `MapInit`, `PopInit`                                        |
//! | [`zones`]   | `Classifier`, `ZoneParams<P>`, per-family parameter structs |
//! | [`release`] | `ReleaseSchedule` (pure tick → cells) and its CSV loader    |
//! | [`system`]  | `System`, `ZoneFamily`, `check_zone_order`                  |
//! | [`builder`] | `PipelineBuilder`, `Pipeline`                               |
//! | [`error`]   | `PipelineError`, `PipelineResult<T>`                        |

pub mod builder;
pub mod error;
pub mod init;
pub mod release;
pub mod system;
pub mod zones;


pub use builder::{Pipeline, PipelineBuilder};
pub use error::{PipelineError, PipelineResult};
pub use init::{MapInit, PopInit};
pub use release::ReleaseSchedule;
pub use system::{System, ZoneFamily, ZoneRole, check_zone_order};
pub use zones::{
    CarcassRemovalParams, Classifier, FenceParams, HuntingParams, ValidateParams, ZoneFn, ZoneParams,
};
