//! Measurement errors
//!
//! Every error is local to a single measurement call. None of them is fatal:
//! the outer loop reports the failure and retries on its next iteration.

use zerox_hal::SampleError;

/// Errors that can occur during a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasureError {
    /// An expected edge never arrived within the polling budget
    ///
    /// Usually means no signal is present, or its frequency is out of range.
    Timeout,
    /// The timer wrapped more than once between two overflow polls
    MissedOverflow,
    /// A derived quantity got a period that is not positive and finite, or
    /// a negative interval
    DegeneratePeriod,
    /// The sampler could not read a channel
    Sampler(SampleError),
}

impl From<SampleError> for MeasureError {
    fn from(e: SampleError) -> Self {
        MeasureError::Sampler(e)
    }
}

impl core::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MeasureError::Timeout => f.write_str("no edge within budget"),
            MeasureError::MissedOverflow => f.write_str("timer overflow missed"),
            MeasureError::DegeneratePeriod => f.write_str("degenerate period"),
            MeasureError::Sampler(SampleError::InvalidChannel) => f.write_str("invalid channel"),
            MeasureError::Sampler(SampleError::Conversion) => f.write_str("conversion failed"),
        }
    }
}
