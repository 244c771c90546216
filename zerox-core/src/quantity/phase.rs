//! Phase offset between two same-frequency signals

use crate::error::MeasureError;

/// Map a raw phase into (-180, 180]
///
/// Values above 180 have 360 subtracted. Nothing else is wrapped: inputs
/// are expected to come from a time difference in `[0, period)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    if degrees > 180.0 {
        degrees - 360.0
    } else {
        degrees
    }
}

/// Phase offset in degrees, in (-180, 180]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseOffset(f32);

impl PhaseOffset {
    /// Phase of a time difference relative to a full period
    ///
    /// `degrees = time_difference * 360 / full_period`, normalized. A period
    /// that is not positive and finite, or a negative or non-finite time
    /// difference, gives [`MeasureError::DegeneratePeriod`] rather than a
    /// phase outside (-180, 180].
    pub fn from_time_difference(
        time_difference: f32,
        full_period: f32,
    ) -> Result<Self, MeasureError> {
        if !(full_period > 0.0 && full_period.is_finite()) {
            return Err(MeasureError::DegeneratePeriod);
        }
        if !(time_difference >= 0.0 && time_difference.is_finite()) {
            return Err(MeasureError::DegeneratePeriod);
        }

        Ok(Self(normalize_degrees(time_difference * 360.0 / full_period)))
    }

    /// Phase in degrees
    pub fn degrees(&self) -> f32 {
        self.0
    }
}
