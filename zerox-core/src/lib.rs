//! Board-agnostic core logic for the Zerox meter firmware
//!
//! This crate contains all measurement logic that does not depend on
//! specific hardware implementations:
//!
//! - Polling with timeout budgets
//! - Overflow-extended elapsed-time counting
//! - Edge detection and the signal timing engine
//! - Derived quantities (period, phase, voltage, capacitance)
//! - Complete phase and capacitance meter cycles
//! - Configuration type definitions and parsing
//! - A simulated bench for host testing (`sim` feature)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod meter;
pub mod quantity;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod timing;

pub use engine::{Edge, Interval, Level, PeriodCount, SignalTimingEngine};
pub use error::MeasureError;
pub use meter::{read_capacitance, read_phase, CapacitanceMeasurement, PhaseReading};
