//! Busy-wait polling with an optional budget
//!
//! Every wait in the engine (edge waits, multi-period counting) goes through
//! [`poll_until`]. Whether a wait can give up is a configuration choice:
//! [`PollBudget::Unbounded`] spins until the condition holds, while
//! [`PollBudget::Counts`] gives up once the reference counter passes the
//! budget.

use zerox_hal::ReferenceCounter;

use crate::error::MeasureError;

/// How long a wait may spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollBudget {
    /// Wait forever
    #[default]
    Unbounded,
    /// Give up after this many reference counter counts
    Counts(u32),
}

impl From<Option<u32>> for PollBudget {
    fn from(timeout: Option<u32>) -> Self {
        match timeout {
            Some(counts) => PollBudget::Counts(counts),
            None => PollBudget::Unbounded,
        }
    }
}

/// A running budget
///
/// Created by [`Deadline::start`], which restarts the reference counter when
/// the budget is bounded. Only one deadline can be live per reference
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    budget: PollBudget,
}

impl Deadline {
    /// Start a budget now
    pub fn start<R: ReferenceCounter>(reference: &mut R, budget: PollBudget) -> Self {
        if let PollBudget::Counts(_) = budget {
            reference.restart();
        }
        Self { budget }
    }

    /// A deadline that never expires
    pub const fn never() -> Self {
        Self {
            budget: PollBudget::Unbounded,
        }
    }

    /// Check whether the budget has been used up
    pub fn expired<R: ReferenceCounter>(&self, reference: &R) -> bool {
        match self.budget {
            PollBudget::Unbounded => false,
            PollBudget::Counts(limit) => reference.elapsed() > limit,
        }
    }
}

/// Spin until `condition` returns `true`
///
/// The condition is evaluated first on every iteration; the budget is only
/// checked after a failed evaluation. Errors from the condition abort the
/// wait immediately.
pub fn poll_until<R, F>(reference: &R, deadline: &Deadline, mut condition: F) -> Result<(), MeasureError>
where
    R: ReferenceCounter,
    F: FnMut() -> Result<bool, MeasureError>,
{
    loop {
        if condition()? {
            return Ok(());
        }

        if deadline.expired(reference) {
            return Err(MeasureError::Timeout);
        }
    }
}
