//! Blocking UART transmitter
//!
//! RP2040 has two UART peripherals (UART0 and UART1). The diagnostic log
//! only transmits, so a TX-only blocking driver is enough.

use embassy_rp::uart::{self, Blocking, UartTx as RpUartTx};

/// Blocking TX half as a `zerox_hal::UartTx`
pub struct BlockingUart<'d> {
    tx: RpUartTx<'d, Blocking>,
}

impl<'d> BlockingUart<'d> {
    /// Wrap a configured transmitter
    pub fn new(tx: RpUartTx<'d, Blocking>) -> Self {
        Self { tx }
    }
}

impl zerox_hal::UartTx for BlockingUart<'_> {
    type Error = uart::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush()
    }
}

