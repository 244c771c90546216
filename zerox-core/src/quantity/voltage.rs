//! Raw count to voltage conversion

use core::f32::consts::SQRT_2;

use crate::config::AdcConfig;

/// Scaling from raw counts to volts
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleScale {
    /// Largest raw count
    pub full_scale: u16,
    /// Voltage that the full-scale count represents
    pub vref_volts: f32,
}

impl SampleScale {
    /// Create a scale
    pub const fn new(full_scale: u16, vref_volts: f32) -> Self {
        Self {
            full_scale,
            vref_volts,
        }
    }

    /// Scale matching an ADC configuration
    pub fn from_config(adc: &AdcConfig) -> Self {
        Self::new(adc.resolution.full_scale(), adc.vref_volts)
    }

    /// `raw * vref / full_scale`
    pub fn to_volts(&self, raw: u16) -> f32 {
        if self.full_scale == 0 {
            return 0.0;
        }
        raw as f32 * self.vref_volts / self.full_scale as f32
    }
}

/// RMS value of a sine wave from its peak
pub fn rms_from_peak(peak_volts: f32) -> f32 {
    peak_volts / SQRT_2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_bit_scale() {
        let scale = SampleScale::from_config(&AdcConfig::default());
        assert_eq!(scale.full_scale, 16383);
        assert_eq!(scale.to_volts(0), 0.0);
        assert!((scale.to_volts(16383) - 3.3035).abs() < 1e-6);
        assert!((scale.to_volts(8192) - 1.651_85).abs() < 1e-4);
    }

    #[test]
    fn test_rms() {
        assert!((rms_from_peak(1.414_213_5) - 1.0).abs() < 1e-6);
        assert_eq!(rms_from_peak(0.0), 0.0);
    }
}
