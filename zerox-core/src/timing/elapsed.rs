//! Overflow-extended elapsed time

use crate::config::TimerConfig;

/// Duration measured in timer ticks
///
/// `low` is the raw hardware counter, `overflows` the number of wraps seen
/// since the timer was last reset. Ordering is lexicographic on
/// (`overflows`, `low`), which matches ordering by total ticks as long as
/// `low` stays below the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElapsedTime {
    /// Number of counter wraps
    pub overflows: u32,
    /// Counter value when the timer was stopped
    pub low: u32,
}

impl ElapsedTime {
    /// Create a new elapsed time
    pub const fn new(overflows: u32, low: u32) -> Self {
        Self { overflows, low }
    }

    /// Check for the "could not measure" value
    pub const fn is_zero(&self) -> bool {
        self.overflows == 0 && self.low == 0
    }
}

/// Tick-to-seconds conversion for one timer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickClock {
    tick_seconds: f64,
    modulus: u64,
}

impl TickClock {
    /// Create a clock from a tick period (seconds) and wrap modulus
    pub const fn new(tick_seconds: f64, modulus: u64) -> Self {
        Self {
            tick_seconds,
            modulus,
        }
    }

    /// Clock matching a timer configuration
    pub fn from_config(timer: &TimerConfig) -> Self {
        Self::new(timer.tick_seconds(), timer.width.modulus())
    }

    /// Duration of one tick in seconds
    pub fn tick_seconds(&self) -> f64 {
        self.tick_seconds
    }

    /// Wrap modulus of the counter
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Total ticks: `overflows * modulus + low`
    pub fn ticks(&self, elapsed: ElapsedTime) -> u64 {
        elapsed.overflows as u64 * self.modulus + elapsed.low as u64
    }

    /// Elapsed time in seconds, full precision
    pub fn seconds_f64(&self, elapsed: ElapsedTime) -> f64 {
        self.ticks(elapsed) as f64 * self.tick_seconds
    }

    /// Elapsed time in seconds
    pub fn seconds(&self, elapsed: ElapsedTime) -> f32 {
        self.seconds_f64(elapsed) as f32
    }

    /// Convert a duration in seconds to whole ticks (rounded to nearest)
    pub fn ticks_for(&self, seconds: f64) -> u64 {
        if seconds <= 0.0 {
            return 0;
        }
        (seconds / self.tick_seconds + 0.5) as u64
    }
}
