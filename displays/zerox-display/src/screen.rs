//! Two-line text screen
//!
//! Renderers write lines into a [`Screen`]; [`Screen::render`] copies them
//! to a [`DisplayBackend`] when something changed.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Rows on the meter LCD
pub const SCREEN_ROWS: usize = 2;

/// Columns on the meter LCD
pub const SCREEN_COLS: usize = 16;

/// Characters kept per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// Line buffer for the 16x2 meter display
///
/// Lines are kept as written. Rendering pads them with spaces to the full
/// width, so a short line blanks whatever the previous reading left behind.
#[derive(Clone)]
pub struct Screen {
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Blank screen, marked for redraw
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            dirty: true,
        }
    }

    /// Replace row `row`, cutting `text` at [`LINE_LEN`] characters
    ///
    /// Rows past the display are ignored.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        line.clear();
        for c in text.chars().take(LINE_LEN) {
            // Multi-byte characters can fill the buffer before LINE_LEN chars
            if line.push(c).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    /// Row `row` as written
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Row `row` padded with spaces to [`SCREEN_COLS`]
    pub fn padded_line(&self, row: usize) -> Option<String<LINE_LEN>> {
        let mut padded = self.lines.get(row)?.clone();
        while padded.push(' ').is_ok() {}
        Some(padded)
    }

    /// Whether a line changed since the last render
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write both rows to `backend`, padded, then flush
    ///
    /// A clean screen writes nothing.
    pub fn render<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        if !self.dirty {
            return Ok(());
        }

        if !backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        for row in 0..SCREEN_ROWS {
            if let Some(line) = self.padded_line(row) {
                backend.draw_text(row as u8, 0, &line)?;
            }
        }
        backend.flush()?;

        self.dirty = false;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend that keeps what was drawn
    pub(crate) struct RecordingBackend {
        pub rows: [String<32>; SCREEN_ROWS],
        pub ready: bool,
        pub flushes: u32,
    }

    impl RecordingBackend {
        pub(crate) fn new() -> Self {
            Self {
                rows: core::array::from_fn(|_| String::new()),
                ready: true,
                flushes: 0,
            }
        }
    }

    impl DisplayBackend for RecordingBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            for row in &mut self.rows {
                row.clear();
            }
            Ok(())
        }

        fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
            if col != 0 {
                return Err(DisplayError::InvalidCoordinates);
            }
            let slot = self
                .rows
                .get_mut(row as usize)
                .ok_or(DisplayError::InvalidCoordinates)?;
            slot.clear();
            slot.push_str(text)
                .map_err(|_| DisplayError::InvalidCoordinates)
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (SCREEN_COLS as u8, SCREEN_ROWS as u8)
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    #[test]
    fn test_long_line_is_cut() {
        let mut screen = Screen::new();
        screen.set_line(0, "0123456789abcdefXYZ");
        assert_eq!(screen.get_line(0), Some("0123456789abcdef"));
    }

    #[test]
    fn test_out_of_range_row_ignored() {
        let mut screen = Screen::new();
        screen.render(&mut RecordingBackend::new()).unwrap();
        screen.set_line(2, "nope");
        assert!(!screen.is_dirty());
        assert_eq!(screen.get_line(2), None);
    }

    #[test]
    fn test_render_pads_lines() {
        let mut screen = Screen::new();
        let mut backend = RecordingBackend::new();

        screen.set_line(0, "Capacitance");
        screen.render(&mut backend).unwrap();

        assert_eq!(backend.rows[0].as_str(), "Capacitance     ");
        assert_eq!(backend.rows[1].as_str(), "                ");
        assert_eq!(backend.flushes, 1);
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_clean_screen_not_redrawn() {
        let mut screen = Screen::new();
        let mut backend = RecordingBackend::new();

        screen.render(&mut backend).unwrap();
        screen.render(&mut backend).unwrap();
        assert_eq!(backend.flushes, 1);
    }

    #[test]
    fn test_render_needs_ready_backend() {
        let mut screen = Screen::new();
        let mut backend = RecordingBackend::new();
        backend.ready = false;

        assert_eq!(
            screen.render(&mut backend),
            Err(DisplayError::NotInitialized)
        );
        assert!(screen.is_dirty());
    }
}
