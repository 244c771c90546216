//! RP2040-specific HAL for the Zerox meters
//!
//! This crate provides RP2040 implementations of the shared `zerox-hal`
//! traits:
//!
//! - Blocking ADC sampler over the four analog inputs
//! - GPIO input pins for the capacitance meter's square wave
//! - A 16-bit style overflow timer emulated on the embassy time base
//! - A reference counter on the same time base
//! - Blocking UART transmitter for the diagnostic log
//!
//! The embassy time driver owns the hardware TIMER, so the measurement
//! timer is emulated on `embassy_time::Instant`. Its tick rate is
//! `embassy_time::TICK_HZ`, which the meter configuration must match.

#![no_std]

pub mod adc;
pub mod gpio;
pub mod timer;
pub mod uart;

pub use adc::{AdcInput, AdcSampler};
pub use gpio::RpInput;
pub use timer::{InstantReference, InstantTimer};
pub use uart::BlockingUart;

// Re-export shared traits from zerox-hal for convenience
pub use zerox_hal::{Channel, OverflowTimer, ReferenceCounter, Sampler, UartTx};
