//! Derived quantities
//!
//! Pure conversions from measured intervals and samples to the values the
//! meters display: periods, phase, voltages and capacitance.

pub mod capacitance;
pub mod period;
pub mod phase;
pub mod voltage;

pub use capacitance::{AstableTiming, BucketRange, CapacitanceReading};
pub use period::{full_period, peak_period, PeriodMeasurement};
pub use phase::{normalize_degrees, PhaseOffset};
pub use voltage::{rms_from_peak, SampleScale};
