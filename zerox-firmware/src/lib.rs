//! Zerox meter firmware support
//!
//! Shared by the `phase_meter` and `capacitance_meter` binaries: board
//! wiring, configuration loading, the reading signal and the report task.

#![no_std]

pub mod board;
pub mod channels;
pub mod config;
pub mod tasks;
