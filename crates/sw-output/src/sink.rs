//! The `Sink` trait implemented by every exporter.

use sw_core::Tick;
use sw_sim::Snapshot;

use crate::OutputResult;

/// Consumer of one observation's snapshots.
///
/// `accept` is called once per tick, in tick order, with the engine's tick
/// index.  Any error aborts the run.
pub trait Sink {
    fn accept(&mut self, tick: Tick, snapshot: &Snapshot) -> OutputResult<()>;

    /// Flush and close underlying files.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
