//! Diagnostic text log
//!
//! Every measurement is mirrored as a line of text on a serial port so a
//! terminal can follow the meter. Values use six decimals.

use core::fmt::Write;

use heapless::String;
use zerox_hal::UartTx;

/// Longest formatted line
const LINE_CAPACITY: usize = 64;

/// ANSI clear-screen sequence
const CLEAR_SCREEN: &str = "\x1b[2J";

/// Text log over a UART transmitter
pub struct DiagnosticLog<U> {
    uart: U,
}

impl<U: UartTx> DiagnosticLog<U> {
    /// Create a log on `uart`
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Clear the attached terminal
    pub fn clear_screen(&mut self) -> Result<(), U::Error> {
        self.uart.write_blocking(CLEAR_SCREEN.as_bytes())
    }

    /// `Period = <seconds>`
    pub fn period(&mut self, seconds: f32) -> Result<(), U::Error> {
        self.line(format_args!("Period = {:.6}\n", seconds))
    }

    /// `voltage = <volts>`
    pub fn voltage(&mut self, volts: f32) -> Result<(), U::Error> {
        self.line(format_args!("voltage = {:.6}\n", volts))
    }

    /// `timediff = <seconds>`
    pub fn time_difference(&mut self, seconds: f32) -> Result<(), U::Error> {
        self.line(format_args!("timediff = {:.6}\n", seconds))
    }

    /// `phaseDiff = <degrees>`
    pub fn phase(&mut self, degrees: f32) -> Result<(), U::Error> {
        self.line(format_args!("phaseDiff = {:.6}\n", degrees))
    }

    /// `T: <seconds>, C: <nanofarads>`, ending in a carriage return so the
    /// terminal overwrites the previous reading
    pub fn capacitance(&mut self, period_seconds: f32, farads: f32) -> Result<(), U::Error> {
        self.line(format_args!(
            "T: {:.6}, C: {:.6}\r",
            period_seconds,
            farads * 1e9
        ))
    }

    /// Release the UART
    pub fn release(self) -> U {
        self.uart
    }

    fn line(&mut self, args: core::fmt::Arguments<'_>) -> Result<(), U::Error> {
        let mut text: String<LINE_CAPACITY> = String::new();
        // Lines are short; an overlong value is cut rather than dropped
        let _ = text.write_fmt(args);
        self.uart.write_blocking(text.as_bytes())?;
        self.uart.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use heapless::Vec;

    #[derive(Default)]
    struct MockUart {
        sent: Vec<u8, 256>,
        flushes: u32,
    }

    impl UartTx for MockUart {
        type Error = Infallible;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            let _ = self.sent.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn sent(log: DiagnosticLog<MockUart>) -> Vec<u8, 256> {
        log.release().sent
    }

    #[test]
    fn test_phase_meter_lines() {
        let mut log = DiagnosticLog::new(MockUart::default());
        log.period(0.008333).unwrap();
        log.time_difference(0.004167).unwrap();
        log.phase(-90.0).unwrap();

        assert_eq!(
            sent(log).as_slice(),
            b"Period = 0.008333\ntimediff = 0.004167\nphaseDiff = -90.000000\n"
        );
    }

    #[test]
    fn test_capacitance_line() {
        let mut log = DiagnosticLog::new(MockUart::default());
        log.capacitance(0.000_017_36, 5e-9).unwrap();

        assert_eq!(sent(log).as_slice(), b"T: 0.000017, C: 5.000000\r");
    }

    #[test]
    fn test_each_line_is_flushed() {
        let mut log = DiagnosticLog::new(MockUart::default());
        log.clear_screen().unwrap();
        log.voltage(1.65).unwrap();

        let uart = log.release();
        assert_eq!(uart.flushes, 1);
        assert!(uart.sent.starts_with(b"\x1b[2J"));
    }
}
