//! HD44780 character LCD, 4-bit parallel mode
//!
//! Only the write side of the bus is used (R/W tied low), so every command
//! is followed by a fixed delay instead of a busy-flag read.
//!
//! # Bus Protocol
//!
//! Each byte goes out as two nibbles on D7..D4, high nibble first. A nibble
//! is latched on the falling edge of E. RS selects the register:
//! - RS = 0: instruction register (commands)
//! - RS = 1: data register (characters at the cursor)

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use zerox_display::{DisplayBackend, DisplayError};

/// HD44780 instruction codes
pub mod cmd {
    /// Function set, 8-bit, sent twice to resynchronise the nibble phase
    pub const FUNCTION_8BIT_TWICE: u8 = 0x33;
    /// Function set, 8-bit then switch to 4-bit
    pub const FUNCTION_SWITCH_4BIT: u8 = 0x32;
    /// Function set: 4-bit bus, two lines, 5x8 font
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// Clear display and home the cursor
    pub const CLEAR: u8 = 0x01;
    /// Set DDRAM address (OR with the address)
    pub const SET_DDRAM: u8 = 0x80;
    /// DDRAM address of the start of the second line
    pub const LINE2_OFFSET: u8 = 0x40;
}

/// Visible columns
pub const LCD_COLS: u8 = 16;

/// Visible rows
pub const LCD_ROWS: u8 = 2;

/// Enable pulse width and inter-nibble gap
const PULSE_US: u32 = 40;
/// Settle time after a command
const COMMAND_MS: u32 = 5;
/// Settle time after a data write
const DATA_MS: u32 = 2;
/// Power-on and clear-screen settle time
const RESET_MS: u32 = 20;

/// Control and data lines of the LCD
pub struct LcdPins<P> {
    /// Register select
    pub rs: P,
    /// Enable (latch)
    pub e: P,
    /// Data bit 4
    pub d4: P,
    /// Data bit 5
    pub d5: P,
    /// Data bit 6
    pub d6: P,
    /// Data bit 7
    pub d7: P,
}

/// HD44780 driver
pub struct Hd44780<P, D> {
    pins: LcdPins<P>,
    delay: D,
    initialized: bool,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Create a driver; call [`init`](Self::init) before writing
    pub fn new(pins: LcdPins<P>, delay: D) -> Self {
        Self {
            pins,
            delay,
            initialized: false,
        }
    }

    /// Switch the controller to 4-bit mode and clear the screen
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.pins.e.set_low()?;
        self.delay.delay_ms(RESET_MS);

        // Make sure the LCD is in 8-bit mode, then change to 4-bit mode
        self.command(cmd::FUNCTION_8BIT_TWICE)?;
        self.command(cmd::FUNCTION_8BIT_TWICE)?;
        self.command(cmd::FUNCTION_SWITCH_4BIT)?;

        self.command(cmd::FUNCTION_4BIT_2LINE)?;
        self.command(cmd::DISPLAY_ON)?;
        self.command(cmd::CLEAR)?;
        self.delay.delay_ms(RESET_MS);

        self.initialized = true;
        Ok(())
    }

    /// Send an instruction
    pub fn command(&mut self, value: u8) -> Result<(), P::Error> {
        self.pins.rs.set_low()?;
        self.write_byte(value)?;
        self.delay.delay_ms(COMMAND_MS);
        Ok(())
    }

    /// Write one character at the cursor
    pub fn write_data(&mut self, value: u8) -> Result<(), P::Error> {
        self.pins.rs.set_high()?;
        self.write_byte(value)?;
        self.delay.delay_ms(DATA_MS);
        Ok(())
    }

    /// Move the cursor; `row` 0 is the top line
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), P::Error> {
        let line = if row == 0 { 0 } else { cmd::LINE2_OFFSET };
        self.command(cmd::SET_DDRAM | (line + col))
    }

    /// Write `text` at the start of `row`, padding the rest of the line
    /// with spaces
    pub fn print_line(&mut self, row: u8, text: &str) -> Result<(), P::Error> {
        self.set_cursor(row, 0)?;

        let mut written = 0;
        for c in text.chars().take(LCD_COLS as usize) {
            self.write_data(glyph(c))?;
            written += 1;
        }
        for _ in written..LCD_COLS {
            self.write_data(b' ')?;
        }
        Ok(())
    }

    /// Check whether [`init`](Self::init) has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the pins and delay
    pub fn release(self) -> (LcdPins<P>, D) {
        (self.pins, self.delay)
    }

    fn write_byte(&mut self, value: u8) -> Result<(), P::Error> {
        self.write_nibble(value >> 4)?;
        self.delay.delay_us(PULSE_US);
        self.write_nibble(value & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), P::Error> {
        self.pins.d7.set_state((nibble & 0x08 != 0).into())?;
        self.pins.d6.set_state((nibble & 0x04 != 0).into())?;
        self.pins.d5.set_state((nibble & 0x02 != 0).into())?;
        self.pins.d4.set_state((nibble & 0x01 != 0).into())?;
        self.pulse()
    }

    fn pulse(&mut self) -> Result<(), P::Error> {
        self.pins.e.set_high()?;
        self.delay.delay_us(PULSE_US);
        self.pins.e.set_low()
    }
}

/// Map a character to the controller's ROM; anything outside ASCII shows
/// as `?`
fn glyph(c: char) -> u8 {
    if c.is_ascii() && !c.is_ascii_control() {
        c as u8
    } else {
        b'?'
    }
}

impl<P: OutputPin, D: DelayNs> DisplayBackend for Hd44780<P, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.command(cmd::CLEAR)
            .map_err(|_| DisplayError::Communication)?;
        self.delay.delay_ms(RESET_MS);
        Ok(())
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if row >= LCD_ROWS || col >= LCD_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }

        self.set_cursor(row, col)
            .map_err(|_| DisplayError::Communication)?;
        for c in text.chars().take((LCD_COLS - col) as usize) {
            self.write_data(glyph(c))
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (LCD_COLS, LCD_ROWS)
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}
