//! Capacitance from an astable multivibrator period
//!
//! A 555-style astable oscillates with `f = 1.44 / ((R_A + 2 R_B) C)`, so
//! the capacitor follows from the measured period `T`:
//! `C = 1.44 * T / (R_A + 2 R_B)`.
//!
//! Readings are then bucketed into display units. The thresholds and the
//! 0.47 nF offset are the bench values the meter shipped with; see
//! [`CapacitanceReading::classify`].

use crate::config::TransducerConfig;

/// Astable timing network
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AstableTiming {
    /// R_A in ohms
    pub ra_ohms: f32,
    /// R_B in ohms
    pub rb_ohms: f32,
}

impl AstableTiming {
    /// Create a timing network
    pub const fn new(ra_ohms: f32, rb_ohms: f32) -> Self {
        Self { ra_ohms, rb_ohms }
    }

    /// Network from the transducer configuration
    pub fn from_config(transducer: &TransducerConfig) -> Self {
        Self::new(transducer.ra_ohms, transducer.rb_ohms)
    }

    /// Capacitance in farads for a measured period in seconds
    ///
    /// `period_seconds` is the full oscillator period, high plus low.
    pub fn capacitance(&self, period_seconds: f32) -> f32 {
        1.44 * period_seconds / (self.ra_ohms + 2.0 * self.rb_ohms)
    }
}

impl Default for AstableTiming {
    fn default() -> Self {
        Self::new(1000.0, 2000.0)
    }
}

/// Open interval `(above, below)` in microfarads
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BucketRange {
    /// Exclusive lower bound
    pub above: f32,
    /// Exclusive upper bound
    pub below: f32,
}

impl BucketRange {
    /// Check `above < value < below`
    pub fn contains(&self, value: f32) -> bool {
        value < self.below && value > self.above
    }

    /// Check whether any value can fall in this range
    pub fn is_empty(&self) -> bool {
        self.above >= self.below
    }
}

/// Small capacitors, shown in nF with the 0.47 nF stray offset removed
pub const SMALL_NF_RANGE: BucketRange = BucketRange {
    above: 0.001,
    below: 0.01,
};

/// Mid-range capacitors, shown in nF without the offset
///
/// Bounds are inverted (lower bound above the upper), so nothing ever lands
/// here and mid-range values fall through to microfarads.
pub const MID_NF_RANGE: BucketRange = BucketRange {
    above: 0.091,
    below: 0.02,
};

/// Below this (in µF) nothing is connected
pub const NO_CAPACITOR_BELOW_UF: f32 = 0.001;

/// Stray capacitance subtracted from small readings, in nF
pub const STRAY_OFFSET_NF: f32 = 0.47;

/// Capacitance bucketed for display
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CapacitanceReading {
    /// Value in nanofarads
    Nanofarads(f32),
    /// Value in microfarads
    Microfarads(f32),
    /// Reading too small to be a capacitor
    NoCapacitor,
}

impl CapacitanceReading {
    /// Bucket a capacitance given in farads
    ///
    /// Checks run in order: small nF range (offset applied), mid nF range
    /// (empty, see [`MID_NF_RANGE`]), no capacitor, and microfarads for
    /// everything else.
    pub fn classify(farads: f32) -> Self {
        let microfarads = farads * 1_000_000.0;

        if SMALL_NF_RANGE.contains(microfarads) {
            CapacitanceReading::Nanofarads(microfarads * 1000.0 - STRAY_OFFSET_NF)
        } else if MID_NF_RANGE.contains(microfarads) {
            CapacitanceReading::Nanofarads(microfarads * 1000.0)
        } else if microfarads < NO_CAPACITOR_BELOW_UF {
            CapacitanceReading::NoCapacitor
        } else {
            CapacitanceReading::Microfarads(microfarads)
        }
    }
}
