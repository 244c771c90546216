//! Configuration type definitions
//!
//! Peripheral settings are modelled as named records with enumerated legal
//! values instead of raw register bit fields. The meter firmware builds a
//! [`MeterConfig`] from a board preset and its embedded TOML file.

use zerox_hal::Channel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timer input clock divider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimerPrescale {
    /// Timer clocked at SYSCLK
    #[default]
    Div1,
    /// SYSCLK / 2 (e.g. a MIPS core timer)
    Div2,
    /// SYSCLK / 4
    Div4,
    /// SYSCLK / 8
    Div8,
    /// SYSCLK / 12 (classic 8051 timer clock)
    Div12,
    /// SYSCLK / 48
    Div48,
}

impl TimerPrescale {
    /// Divisor applied to the system clock
    pub const fn divisor(self) -> u32 {
        match self {
            TimerPrescale::Div1 => 1,
            TimerPrescale::Div2 => 2,
            TimerPrescale::Div4 => 4,
            TimerPrescale::Div8 => 8,
            TimerPrescale::Div12 => 12,
            TimerPrescale::Div48 => 48,
        }
    }

    /// Look up a prescale from its divisor
    pub fn from_divisor(divisor: u32) -> Option<Self> {
        match divisor {
            1 => Some(TimerPrescale::Div1),
            2 => Some(TimerPrescale::Div2),
            4 => Some(TimerPrescale::Div4),
            8 => Some(TimerPrescale::Div8),
            12 => Some(TimerPrescale::Div12),
            48 => Some(TimerPrescale::Div48),
            _ => None,
        }
    }
}

/// Width of the hardware counter register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CounterWidth {
    /// 8-bit counter (wraps at 256)
    Bits8,
    /// 16-bit counter (wraps at 65536)
    #[default]
    Bits16,
    /// 24-bit counter
    Bits24,
    /// 32-bit counter
    Bits32,
}

impl CounterWidth {
    /// Number of counter bits
    pub const fn bits(self) -> u8 {
        match self {
            CounterWidth::Bits8 => 8,
            CounterWidth::Bits16 => 16,
            CounterWidth::Bits24 => 24,
            CounterWidth::Bits32 => 32,
        }
    }

    /// Wrap modulus of the counter
    pub const fn modulus(self) -> u64 {
        1u64 << self.bits()
    }

    /// Look up a width from its bit count
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(CounterWidth::Bits8),
            16 => Some(CounterWidth::Bits16),
            24 => Some(CounterWidth::Bits24),
            32 => Some(CounterWidth::Bits32),
            _ => None,
        }
    }
}

/// Measurement timer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerConfig {
    /// System clock frequency in Hz
    pub sysclk_hz: u32,
    /// Timer input divider
    pub prescale: TimerPrescale,
    /// Counter register width
    pub width: CounterWidth,
}

impl TimerConfig {
    /// Duration of one timer tick in seconds (`prescale / sysclk`)
    pub fn tick_seconds(&self) -> f64 {
        self.prescale.divisor() as f64 / self.sysclk_hz as f64
    }

    /// Time for the counter to wrap once, in seconds
    pub fn wrap_seconds(&self) -> f64 {
        self.width.modulus() as f64 * self.tick_seconds()
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            sysclk_hz: 72_000_000,
            prescale: TimerPrescale::Div12,
            width: CounterWidth::Bits16,
        }
    }
}

/// ADC conversion resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdcResolution {
    /// 10-bit (0..1023)
    Bits10,
    /// 12-bit (0..4095)
    Bits12,
    /// 14-bit (0..16383)
    #[default]
    Bits14,
}

impl AdcResolution {
    /// Number of result bits
    pub const fn bits(self) -> u8 {
        match self {
            AdcResolution::Bits10 => 10,
            AdcResolution::Bits12 => 12,
            AdcResolution::Bits14 => 14,
        }
    }

    /// Largest raw count
    pub const fn full_scale(self) -> u16 {
        (1u16 << self.bits()) - 1
    }

    /// Look up a resolution from its bit count
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            10 => Some(AdcResolution::Bits10),
            12 => Some(AdcResolution::Bits12),
            14 => Some(AdcResolution::Bits14),
            _ => None,
        }
    }
}

/// ADC voltage reference selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferenceSource {
    /// External VREF pin
    VrefPin,
    /// Supply rail
    #[default]
    Vdd,
    /// Fixed 1.8 V reference
    Internal1v8,
    /// On-chip bandgap reference
    Internal,
}

/// ADC configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdcConfig {
    /// Conversion resolution
    pub resolution: AdcResolution,
    /// Reference selection
    pub reference: ReferenceSource,
    /// Measured value of the reference in volts
    pub vref_volts: f32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            resolution: AdcResolution::Bits14,
            reference: ReferenceSource::Vdd,
            vref_volts: 3.3035,
        }
    }
}

/// Busy-wait polling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PollConfig {
    /// Edge-wait budget in reference counter counts, `None` waits forever
    pub timeout_counts: Option<u32>,
    /// Raw count at or below which a sample is "low"
    pub threshold: u16,
    /// Worst-case duration of one poll iteration in timer ticks
    ///
    /// Must stay below one counter wrap, otherwise overflows are missed.
    pub poll_latency_ticks: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_counts: None,
            threshold: 0,
            poll_latency_ticks: 32,
        }
    }
}

/// Astable multivibrator used by the capacitance meter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransducerConfig {
    /// Timing resistor R_A in ohms
    pub ra_ohms: f32,
    /// Timing resistor R_B in ohms
    pub rb_ohms: f32,
    /// Number of periods averaged per reading
    pub period_count: u16,
}

impl Default for TransducerConfig {
    fn default() -> Self {
        Self {
            ra_ohms: 1000.0,
            rb_ohms: 2000.0,
            period_count: 100,
        }
    }
}

/// Input channel assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelConfig {
    /// Reference signal (phase origin)
    pub reference: u8,
    /// Second signal compared against the reference
    pub other: u8,
}

impl ChannelConfig {
    /// Reference channel selector
    pub const fn reference(&self) -> Channel {
        Channel::new(self.reference)
    }

    /// Other channel selector
    pub const fn other(&self) -> Channel {
        Channel::new(self.other)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            reference: 0,
            other: 1,
        }
    }
}

/// Complete meter configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeterConfig {
    /// Measurement timer
    pub timer: TimerConfig,
    /// ADC
    pub adc: AdcConfig,
    /// Polling and timeouts
    pub poll: PollConfig,
    /// Capacitance transducer
    pub transducer: TransducerConfig,
    /// Input channels
    pub channels: ChannelConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// System clock frequency is zero
    ZeroClock,
    /// A poll iteration takes at least one counter wrap
    PollSlowerThanWrap,
    /// The timer handed to the engine wraps at a different modulus
    TimerMismatch,
    /// Reference voltage is not a positive number
    InvalidReference,
    /// Resistor network is not positive
    InvalidResistors,
    /// Period count is zero
    ZeroPeriodCount,
}

impl MeterConfig {
    /// Phase meter on an 8051-class part: 72 MHz SYSCLK, timer 0 at
    /// SYSCLK/12 in 16-bit mode, 14-bit ADC referenced to VDD, no timeouts
    pub fn phase_meter() -> Self {
        Self {
            timer: TimerConfig {
                sysclk_hz: 72_000_000,
                prescale: TimerPrescale::Div12,
                width: CounterWidth::Bits16,
            },
            adc: AdcConfig {
                resolution: AdcResolution::Bits14,
                reference: ReferenceSource::Vdd,
                vref_volts: 3.3035,
            },
            poll: PollConfig {
                timeout_counts: None,
                threshold: 0,
                poll_latency_ticks: 32,
            },
            transducer: TransducerConfig::default(),
            channels: ChannelConfig::default(),
        }
    }

    /// Capacitance meter on a 32-bit MIPS part: 40 MHz SYSCLK, core timer
    /// at SYSCLK/2, a quarter-SYSCLK budget per wait and 100 averaged
    /// periods
    pub fn capacitance_meter() -> Self {
        let sysclk_hz = 40_000_000;
        Self {
            timer: TimerConfig {
                sysclk_hz,
                prescale: TimerPrescale::Div2,
                width: CounterWidth::Bits32,
            },
            adc: AdcConfig {
                resolution: AdcResolution::Bits10,
                reference: ReferenceSource::Vdd,
                vref_volts: 3.3,
            },
            poll: PollConfig {
                timeout_counts: Some(sysclk_hz / 4),
                threshold: 0,
                poll_latency_ticks: 4,
            },
            transducer: TransducerConfig {
                ra_ohms: 1000.0,
                rb_ohms: 2000.0,
                period_count: 100,
            },
            channels: ChannelConfig {
                reference: 6,
                other: 6,
            },
        }
    }

    /// Check the configuration for values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.sysclk_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }

        if self.poll.poll_latency_ticks as u64 >= self.timer.width.modulus() {
            return Err(ConfigError::PollSlowerThanWrap);
        }

        if !(self.adc.vref_volts > 0.0 && self.adc.vref_volts.is_finite()) {
            return Err(ConfigError::InvalidReference);
        }

        let network = self.transducer.ra_ohms + 2.0 * self.transducer.rb_ohms;
        if !(network > 0.0 && network.is_finite()) {
            return Err(ConfigError::InvalidResistors);
        }

        if self.transducer.period_count == 0 {
            return Err(ConfigError::ZeroPeriodCount);
        }

        Ok(())
    }
}
