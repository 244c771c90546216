//! ADC sampling
//!
//! RP2040 has a single 12-bit ADC with 5 inputs:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor
//!
//! Meter channels are numbered by ADC input, so channel 0 is GPIO26.

use embassy_rp::adc::{self, Adc, Blocking};
use heapless::Vec;
use zerox_hal::{Channel, SampleError, Sampler};

/// Full scale of the 12-bit converter
pub const ADC_FULL_SCALE: u16 = 4095;

/// ADC input identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcInput {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
}

impl AdcInput {
    /// Get the GPIO pin for this input
    pub fn gpio(&self) -> u8 {
        match self {
            AdcInput::Adc0 => 26,
            AdcInput::Adc1 => 27,
            AdcInput::Adc2 => 28,
            AdcInput::Adc3 => 29,
        }
    }

    /// Get the input for a meter channel
    pub fn from_channel(channel: Channel) -> Option<Self> {
        match channel.index() {
            0 => Some(AdcInput::Adc0),
            1 => Some(AdcInput::Adc1),
            2 => Some(AdcInput::Adc2),
            3 => Some(AdcInput::Adc3),
            _ => None,
        }
    }

    /// Meter channel for this input
    pub fn channel(&self) -> Channel {
        Channel::new(*self as u8)
    }
}

/// Maximum number of wired ADC inputs
const MAX_INPUTS: usize = 4;

/// Sampler over the blocking ADC
///
/// Each read selects the input and waits for one conversion (about 2 µs).
pub struct AdcSampler<'d> {
    adc: Adc<'d, Blocking>,
    inputs: Vec<(Channel, adc::Channel<'d>), MAX_INPUTS>,
}

impl<'d> AdcSampler<'d> {
    /// Create a sampler with no inputs wired
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self {
            adc,
            inputs: Vec::new(),
        }
    }

    /// Wire an analog pin to `input`
    ///
    /// Rewiring an input replaces the previous pin.
    pub fn with_input(mut self, input: AdcInput, pin: adc::Channel<'d>) -> Self {
        let channel = input.channel();
        if let Some(slot) = self.inputs.iter_mut().find(|(c, _)| *c == channel) {
            slot.1 = pin;
        } else {
            // Capacity covers every AdcInput
            let _ = self.inputs.push((channel, pin));
        }
        self
    }
}

impl Sampler for AdcSampler<'_> {
    fn read_raw(&mut self, channel: Channel) -> Result<u16, SampleError> {
        let (_, pin) = self
            .inputs
            .iter_mut()
            .find(|(c, _)| *c == channel)
            .ok_or(SampleError::InvalidChannel)?;

        self.adc
            .blocking_read(pin)
            .map_err(|_| SampleError::Conversion)
    }

    fn full_scale(&self) -> u16 {
        ADC_FULL_SCALE
    }
}
