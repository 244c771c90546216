//! Meter screens
//!
//! Fixed two-line layouts for the phase meter and the capacitance meter.
//! Values are printed with two decimals; anything past the sixteenth column
//! is cut.

use core::fmt::Write;

use heapless::String;
use zerox_core::quantity::{CapacitanceReading, PhaseOffset};

use crate::screen::Screen;

/// First line of the capacitance screen
pub const CAPACITANCE_TITLE: &str = "Capacitance";

/// Scratch width for formatting before the line is cut
const SCRATCH_LEN: usize = 32;

/// One phase meter reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseReadout {
    /// Phase of the second signal relative to the first
    pub phase: PhaseOffset,
    /// RMS voltage of the reference signal
    pub v1_rms: f32,
    /// RMS voltage of the second signal
    pub v2_rms: f32,
}

/// Lay out a phase reading
///
/// ```text
/// PhaseDiff=90.00
/// V1=1.17 V2=1.17
/// ```
pub fn render_phase(screen: &mut Screen, readout: &PhaseReadout) {
    set_formatted(
        screen,
        0,
        format_args!("PhaseDiff={:.2}", readout.phase.degrees()),
    );
    set_formatted(
        screen,
        1,
        format_args!("V1={:.2} V2={:.2}", readout.v1_rms, readout.v2_rms),
    );
}

/// Lay out a capacitance reading
pub fn render_capacitance(screen: &mut Screen, reading: CapacitanceReading) {
    screen.set_line(0, CAPACITANCE_TITLE);
    match reading {
        CapacitanceReading::Nanofarads(nf) => {
            set_formatted(screen, 1, format_args!("C= {:.2}nF", nf))
        }
        CapacitanceReading::Microfarads(uf) => {
            set_formatted(screen, 1, format_args!("C= {:.2}uF", uf))
        }
        CapacitanceReading::NoCapacitor => screen.set_line(1, "NO capacitor"),
    }
}

fn set_formatted(screen: &mut Screen, row: usize, args: core::fmt::Arguments<'_>) {
    let mut line: String<SCRATCH_LEN> = String::new();
    // A full scratch buffer still holds more than one display line
    let _ = line.write_fmt(args);
    screen.set_line(row, &line);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(degrees: f32) -> PhaseOffset {
        // 1 s period so the time difference maps straight to degrees; a lead
        // is a lag of 360 + degrees
        let lag = if degrees < 0.0 { degrees + 360.0 } else { degrees };
        PhaseOffset::from_time_difference(lag / 360.0, 1.0).unwrap()
    }

    #[test]
    fn test_small_capacitor() {
        let mut screen = Screen::new();
        render_capacitance(&mut screen, CapacitanceReading::classify(5e-9));

        assert_eq!(screen.get_line(0), Some("Capacitance"));
        assert_eq!(screen.get_line(1), Some("C= 4.53nF"));
    }

    #[test]
    fn test_large_capacitor() {
        let mut screen = Screen::new();
        render_capacitance(&mut screen, CapacitanceReading::Microfarads(2.2));
        assert_eq!(screen.get_line(1), Some("C= 2.20uF"));
    }

    #[test]
    fn test_no_capacitor() {
        let mut screen = Screen::new();
        render_capacitance(&mut screen, CapacitanceReading::NoCapacitor);
        assert_eq!(screen.get_line(1), Some("NO capacitor"));
    }

    #[test]
    fn test_phase_screen() {
        let mut screen = Screen::new();
        let readout = PhaseReadout {
            phase: phase(90.0),
            v1_rms: 1.1677,
            v2_rms: 0.5,
        };

        render_phase(&mut screen, &readout);

        assert_eq!(screen.get_line(0), Some("PhaseDiff=90.00"));
        assert_eq!(screen.get_line(1), Some("V1=1.17 V2=0.50"));
    }

    #[test]
    fn test_wide_phase_is_cut() {
        let mut screen = Screen::new();
        let readout = PhaseReadout {
            phase: phase(-179.5),
            v1_rms: 0.0,
            v2_rms: 0.0,
        };

        render_phase(&mut screen, &readout);

        assert_eq!(screen.get_line(0), Some("PhaseDiff=-179.5"));
    }
}
