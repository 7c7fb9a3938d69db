//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter advanced exclusively by
//! the engine.  One tick represents one week, so management schedules are
//! written as multiples of [`TICKS_PER_YEAR`] (e.g. "start in year five" is
//! `Tick::years(5)`).

use std::fmt;

/// Weekly ticks per simulated year.
pub const TICKS_PER_YEAR: u64 = 52;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The first tick of simulated year `n` (zero-based).
    #[inline]
    pub fn years(n: u64) -> Tick {
        Tick(n * TICKS_PER_YEAR)
    }

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The tick immediately after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// `true` on the last tick of a simulated year.
    #[inline]
    pub fn is_year_end(self) -> bool {
        (self.0 + 1) % TICKS_PER_YEAR == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
