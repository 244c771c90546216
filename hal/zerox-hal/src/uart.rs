//! Diagnostic serial output
//!
//! The meters mirror every measurement as a text line on a serial port for
//! human monitoring. Only the transmit side is needed.

/// Byte sink for the diagnostic stream
pub trait UartTx {
    /// Transmit failure
    type Error;

    /// Send `data`, returning once every byte is queued or sent
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until queued bytes have left the transmitter
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Serial line settings for the diagnostic stream (8N1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}
