//! Inter-task communication
//!
//! The measurement loop in `main` publishes each completed reading; the
//! report task shows the latest one.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use zerox_core::{CapacitanceMeasurement, PhaseReading};

/// A completed measurement cycle
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Readout {
    /// Phase meter cycle
    Phase(PhaseReading),
    /// Capacitance meter cycle
    Capacitance(CapacitanceMeasurement),
}

/// Latest reading (overwritten if the report task falls behind)
pub static READOUT: Signal<CriticalSectionRawMutex, Readout> = Signal::new();
