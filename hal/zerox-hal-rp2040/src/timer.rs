//! Time-base counters
//!
//! Both counters read `embassy_time::Instant`, which ticks at
//! `embassy_time::TICK_HZ` (1 MHz by default).

use embassy_time::Instant;
use zerox_hal::{OverflowTimer, ReferenceCounter, WrapCounter};

fn now_ticks() -> u64 {
    Instant::now().as_ticks()
}

/// Overflow timer emulated on the embassy time base
///
/// Behaves like a hardware counter of the given width: the low word wraps
/// and raises a sticky flag that must be polled. A 16-bit width at 1 MHz
/// wraps every 65.5 ms.
pub struct InstantTimer {
    counter: WrapCounter,
}

impl InstantTimer {
    /// Create a stopped timer wrapping at `modulus` ticks
    pub fn new(modulus: u64) -> Self {
        Self {
            counter: WrapCounter::new(modulus),
        }
    }

    /// Timer tick rate in Hz
    pub const fn tick_hz() -> u64 {
        embassy_time::TICK_HZ
    }
}

impl OverflowTimer for InstantTimer {
    fn modulus(&self) -> u64 {
        self.counter.modulus()
    }

    fn start(&mut self) {
        self.counter.start(now_ticks());
    }

    fn stop(&mut self) {
        self.counter.stop(now_ticks());
    }

    fn reset(&mut self) {
        self.counter.reset(now_ticks());
    }

    fn counter(&self) -> u32 {
        self.counter.counter(now_ticks())
    }

    fn overflowed(&self) -> bool {
        self.counter.overflowed(now_ticks())
    }

    fn clear_overflow(&mut self) {
        self.counter.clear_overflow(now_ticks());
    }

    fn overrun(&self) -> bool {
        self.counter.overrun(now_ticks())
    }
}

/// Reference counter on the embassy time base, one count per tick
pub struct InstantReference {
    started_at: Instant,
}

impl InstantReference {
    /// Create a counter starting now
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for InstantReference {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceCounter for InstantReference {
    fn restart(&mut self) {
        self.started_at = Instant::now();
    }

    fn elapsed(&self) -> u32 {
        let ticks = self.started_at.elapsed().as_ticks();
        ticks.min(u32::MAX as u64) as u32
    }
}
