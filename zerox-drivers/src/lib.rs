//! Hardware driver implementations
//!
//! This crate provides concrete drivers for the meter's output devices:
//!
//! - HD44780 character LCD in 4-bit mode, as a `DisplayBackend`
//! - Diagnostic text log over any `UartTx`

#![no_std]
#![deny(unsafe_code)]

pub mod diag;
pub mod lcd;

pub use diag::DiagnosticLog;
pub use lcd::{Hd44780, LcdPins};
