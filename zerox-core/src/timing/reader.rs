//! Overflow-extended timer reader
//!
//! Extends a hardware counter past its wrap by counting overflow flags in
//! software. The caller must call [`OverflowExtendedTimer::service`] more
//! often than once per wrap period; every timed wait in the engine does so
//! on each poll iteration.

use zerox_hal::OverflowTimer;

use super::elapsed::ElapsedTime;
use crate::error::MeasureError;

/// Two-level timer: hardware low word plus software overflow count
pub struct OverflowExtendedTimer<T> {
    timer: T,
    overflows: u32,
}

impl<T: OverflowTimer> OverflowExtendedTimer<T> {
    /// Wrap a hardware timer
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            overflows: 0,
        }
    }

    /// Stop, zero, clear the overflow flag and start counting
    pub fn start(&mut self) {
        self.timer.stop();
        self.timer.reset();
        self.timer.clear_overflow();
        self.overflows = 0;
        self.timer.start();
    }

    /// Account for a pending overflow
    ///
    /// Returns [`MeasureError::MissedOverflow`] when the counter reports
    /// that it wrapped more than once since the flag was last cleared.
    pub fn service(&mut self) -> Result<(), MeasureError> {
        if self.timer.overflowed() {
            if self.timer.overrun() {
                #[cfg(feature = "defmt")]
                defmt::warn!("timer overrun after {} overflows", self.overflows);
                return Err(MeasureError::MissedOverflow);
            }
            self.timer.clear_overflow();
            self.overflows = self.overflows.saturating_add(1);
        }
        Ok(())
    }

    /// Halt the counter and return the elapsed time
    ///
    /// An overflow raised after the last poll is still counted.
    pub fn stop(&mut self) -> Result<ElapsedTime, MeasureError> {
        self.timer.stop();
        self.service()?;
        Ok(ElapsedTime::new(self.overflows, self.timer.counter()))
    }

    /// Overflows counted since the last start
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Wrap modulus of the underlying counter
    pub fn modulus(&self) -> u64 {
        self.timer.modulus()
    }

    /// Release the hardware timer
    pub fn free(self) -> T {
        self.timer
    }
}
