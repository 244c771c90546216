//! Half-period and full-period relations
//!
//! The half period is one zero-crossing-to-zero-crossing span. Doubling it
//! assumes a symmetric waveform; asymmetric duty cycles bias the full
//! period and are not corrected.

use crate::timing::ElapsedTime;

/// Full period from a half period
pub fn full_period(half_period: f32) -> f32 {
    half_period * 2.0
}

/// Half of a full period (time from a zero crossing to the peak span)
pub fn peak_period(full_period: f32) -> f32 {
    full_period / 2.0
}

/// One half-period measurement of a quasi-periodic signal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodMeasurement {
    /// Raw interval between the two zero crossings
    pub elapsed: ElapsedTime,
    /// Half period in seconds
    pub half_period: f32,
}

impl PeriodMeasurement {
    /// Full period in seconds
    pub fn full_period(&self) -> f32 {
        full_period(self.half_period)
    }

    /// Signal frequency in Hz, `None` for a zero period
    pub fn frequency(&self) -> Option<f32> {
        let full = self.full_period();
        (full > 0.0).then(|| 1.0 / full)
    }
}
