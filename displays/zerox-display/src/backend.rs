//! Character display backends
//!
//! A backend is anything that can put a line of text at a cell position:
//! the HD44780 LCD on hardware, a recording buffer in tests.

/// Errors reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// A pin or bus write failed
    Communication,
    /// Row or column outside the panel
    InvalidCoordinates,
    /// The panel was written before its init sequence ran
    NotInitialized,
}

/// Character cell display
///
/// [`Screen::render`](crate::Screen::render) only writes whole lines from
/// column 0. Backends still accept any start column inside the panel.
pub trait DisplayBackend {
    /// Blank every cell
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write `text` starting at cell (`row`, `col`)
    ///
    /// The caller cuts `text` to the panel width.
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Push pending writes to the panel
    ///
    /// Write-through panels keep the default no-op.
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Panel size as (columns, rows)
    fn dimensions(&self) -> (u8, u8);

    /// Whether the panel accepts writes
    fn is_ready(&self) -> bool;
}
