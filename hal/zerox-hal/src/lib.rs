//! Zerox Hardware Abstraction Layer
//!
//! This crate defines the capabilities the signal timing engine consumes.
//! Chip-specific HALs (RP2040, the simulated bench in `zerox-core`, etc.)
//! implement them, so the same measurement code runs on hardware and on
//! the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (zerox-firmware, tests)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  zerox-core (signal timing engine)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  zerox-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  zerox-hal-   │       │ zerox-core    │
//! │    rp2040     │       │   ::sim       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`sampler::Sampler`] - Instantaneous channel readings (ADC or GPIO)
//! - [`timer::OverflowTimer`] - Free-running counter with an overflow flag
//! - [`timer::ReferenceCounter`] - Independent counter used for poll budgets
//! - [`timer::WrapCounter`] - Software counter model for emulated timers
//! - [`gpio::InputPin`] - Digital input
//! - [`uart::UartTx`] - Diagnostic serial output

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod sampler;
pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::InputPin;
pub use sampler::{Channel, SampleError, Sampler};
pub use timer::{OverflowTimer, ReferenceCounter, WrapCounter};
pub use uart::UartTx;
