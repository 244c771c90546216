//! Display abstraction and meter screens for Zerox
//!
//! This crate provides:
//! - `DisplayBackend` trait for character displays (HD44780 and friends)
//! - `Screen`, a 2x16 text buffer that pads lines when rendered
//! - Renderers that lay out phase and capacitance readings
//!
//! # Architecture
//!
//! The firmware measures, hands the result to a renderer which fills a
//! `Screen`, and the screen is pushed to whatever `DisplayBackend` the board
//! provides. Renderers never touch hardware, so layouts are tested on the
//! host.

#![no_std]

pub mod backend;
pub mod render;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use render::{render_capacitance, render_phase, PhaseReadout, CAPACITANCE_TITLE};
pub use screen::{Screen, LINE_LEN, SCREEN_COLS, SCREEN_ROWS};
