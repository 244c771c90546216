//! Timing primitives
//!
//! - [`ElapsedTime`]: two-level (overflow count, low word) duration
//! - [`TickClock`]: converts elapsed ticks to seconds
//! - [`OverflowExtendedTimer`]: extends a hardware counter past its wrap
//! - [`poll_until`]: the one busy-wait helper every wait goes through

pub mod elapsed;
pub mod poll;
pub mod reader;

pub use elapsed::{ElapsedTime, TickClock};
pub use poll::{poll_until, Deadline, PollBudget};
pub use reader::OverflowExtendedTimer;
