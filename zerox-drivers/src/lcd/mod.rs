//! Character LCD drivers

mod hd44780;

pub use hd44780::{cmd, Hd44780, LcdPins, LCD_COLS, LCD_ROWS};
