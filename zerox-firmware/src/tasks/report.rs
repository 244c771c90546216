//! Report task
//!
//! Owns the LCD and the diagnostic UART. Each reading is rendered to the
//! 16x2 screen and mirrored as text lines on the UART.

use defmt::*;
use zerox_core::{CapacitanceMeasurement, PhaseReading};
use zerox_display::{render_capacitance, render_phase, PhaseReadout, Screen};

use crate::board::{DiagLog, Lcd};
use crate::channels::{Readout, READOUT};

/// Report task - shows every published reading
#[embassy_executor::task]
pub async fn report_task(mut lcd: Lcd, mut log: DiagLog) {
    info!("Report task started");

    if lcd.init().is_err() {
        warn!("LCD init failed");
    }
    if let Err(e) = log.clear_screen() {
        warn!("Diagnostic UART write failed: {:?}", e);
    }

    let mut screen = Screen::new();

    loop {
        match READOUT.wait().await {
            Readout::Phase(reading) => {
                render_phase(
                    &mut screen,
                    &PhaseReadout {
                        phase: reading.phase,
                        v1_rms: reading.rms_reference(),
                        v2_rms: reading.rms_other(),
                    },
                );
                if let Err(e) = log_phase(&mut log, &reading) {
                    warn!("Diagnostic UART write failed: {:?}", e);
                }
            }
            Readout::Capacitance(measurement) => {
                render_capacitance(&mut screen, measurement.reading);
                if let Err(e) = log_capacitance(&mut log, &measurement) {
                    warn!("Diagnostic UART write failed: {:?}", e);
                }
            }
        }

        if let Err(e) = screen.render(&mut lcd) {
            warn!("LCD update failed: {:?}", e);
        }
    }
}

fn log_phase(log: &mut DiagLog, reading: &PhaseReading) -> Result<(), embassy_rp::uart::Error> {
    log.period(reading.half_period)?;
    log.period(reading.full_period)?;
    log.voltage(reading.peak_reference)?;
    log.voltage(reading.peak_other)?;
    log.time_difference(reading.time_difference)?;
    log.phase(reading.phase.degrees())
}

fn log_capacitance(
    log: &mut DiagLog,
    measurement: &CapacitanceMeasurement,
) -> Result<(), embassy_rp::uart::Error> {
    log.capacitance(measurement.period, measurement.farads)
}
