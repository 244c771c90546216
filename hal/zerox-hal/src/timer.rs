//! Timer abstractions
//!
//! Two independent counters are involved in every measurement:
//!
//! - An [`OverflowTimer`]: the hardware counter that measures the interval.
//!   Its low word wraps at a fixed modulus and raises an overflow flag that
//!   the caller must poll and clear faster than one wrap period.
//! - A [`ReferenceCounter`]: a free-running counter that only bounds how
//!   long a busy-wait may spin before giving up.
//!
//! Platforms without a suitable hardware counter emulate one on a monotonic
//! tick source with [`WrapCounter`].

/// Free-running counter with an overflow flag
///
/// Mirrors a classic 16-bit timer: a run control bit, a counter register
/// and a sticky overflow flag set by hardware on every wrap.
pub trait OverflowTimer {
    /// Counter modulus; the low word counts `0..modulus()` and then wraps
    ///
    /// `u64` so that full 32-bit counters (modulus 2^32) are representable.
    fn modulus(&self) -> u64;

    /// Start (or resume) counting
    fn start(&mut self);

    /// Stop counting, keeping the current value
    fn stop(&mut self);

    /// Zero the counter
    fn reset(&mut self);

    /// Current raw counter value (the low word)
    fn counter(&self) -> u32;

    /// Check the sticky overflow flag
    fn overflowed(&self) -> bool;

    /// Clear the overflow flag
    fn clear_overflow(&mut self);

    /// Check whether more than one wrap happened since the flag was last
    /// cleared
    ///
    /// Counters without overrun detection always return `false`; on those
    /// a slow poll loop silently undercounts.
    fn overrun(&self) -> bool {
        false
    }
}

/// Free-running counter used to bound busy-waits
pub trait ReferenceCounter {
    /// Restart counting from zero
    fn restart(&mut self);

    /// Counts elapsed since the last restart
    fn elapsed(&self) -> u32;
}

/// Wrapping counter modelled on a monotonic tick source
///
/// Reproduces a hardware counter with a sticky overflow flag, given the
/// current time on every call. Clearing the flag acknowledges every wrap so
/// far, so a flag that is cleared too late loses wraps just like the real
/// thing; [`overrun`](Self::overrun) reports when that happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WrapCounter {
    modulus: u64,
    running: bool,
    /// Ticks counted before the current run
    accumulated: u64,
    /// Tick source value when the current run started
    started_at: u64,
    /// Wraps covered by the last flag clear
    acknowledged: u64,
}

impl WrapCounter {
    /// Create a stopped counter wrapping at `modulus` (at least 1)
    pub const fn new(modulus: u64) -> Self {
        Self {
            modulus: if modulus == 0 { 1 } else { modulus },
            running: false,
            accumulated: 0,
            started_at: 0,
            acknowledged: 0,
        }
    }

    /// Counter modulus
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Start counting at `now`
    pub fn start(&mut self, now: u64) {
        if !self.running {
            self.started_at = now;
            self.running = true;
        }
    }

    /// Stop counting at `now`, keeping the value
    pub fn stop(&mut self, now: u64) {
        if self.running {
            self.accumulated = self.total(now);
            self.running = false;
        }
    }

    /// Zero the counter and the flag
    pub fn reset(&mut self, now: u64) {
        self.accumulated = 0;
        self.started_at = now;
        self.acknowledged = 0;
    }

    /// Low word at `now`
    pub fn counter(&self, now: u64) -> u32 {
        (self.total(now) % self.modulus) as u32
    }

    /// Overflow flag at `now`
    pub fn overflowed(&self, now: u64) -> bool {
        self.wraps(now) > self.acknowledged
    }

    /// Clear the overflow flag
    pub fn clear_overflow(&mut self, now: u64) {
        self.acknowledged = self.wraps(now);
    }

    /// More than one wrap pending at `now`
    pub fn overrun(&self, now: u64) -> bool {
        self.wraps(now) > self.acknowledged + 1
    }

    fn total(&self, now: u64) -> u64 {
        if self.running {
            self.accumulated + now.saturating_sub(self.started_at)
        } else {
            self.accumulated
        }
    }

    fn wraps(&self, now: u64) -> u64 {
        self.total(now) / self.modulus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_only_while_running() {
        let mut counter = WrapCounter::new(256);

        assert_eq!(counter.counter(100), 0);

        counter.start(100);
        assert_eq!(counter.counter(400), 44);
        assert!(counter.overflowed(400));
        assert!(!counter.overrun(400));

        counter.clear_overflow(400);
        assert!(!counter.overflowed(400));

        counter.stop(400);
        assert_eq!(counter.counter(1400), 44);
        assert!(!counter.overflowed(1400));
    }

    #[test]
    fn test_overrun() {
        let mut counter = WrapCounter::new(256);
        counter.start(0);
        assert!(counter.overrun(600));

        // Clearing acknowledges both wraps
        counter.clear_overflow(600);
        assert!(!counter.overflowed(600));
        assert!(counter.overflowed(768));
    }

    #[test]
    fn test_reset_while_running() {
        let mut counter = WrapCounter::new(256);
        counter.start(0);
        counter.reset(100);
        assert_eq!(counter.counter(110), 10);
    }

    #[test]
    fn test_resume_keeps_value() {
        let mut counter = WrapCounter::new(1000);
        counter.start(0);
        counter.stop(300);
        counter.start(5000);
        assert_eq!(counter.counter(5100), 400);
    }

    #[test]
    fn test_zero_modulus_is_clamped() {
        assert_eq!(WrapCounter::new(0).modulus(), 1);
    }
}
