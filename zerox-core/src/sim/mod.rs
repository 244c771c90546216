//! Simulated bench for host testing
//!
//! A shared [`SimClock`] drives every simulated device, so time only moves
//! when the engine does something: each sample costs a conversion time and
//! each delay advances the clock. Signals are pure functions of time.
//!
//! ```ignore
//! use zerox_core::sim::{SimClock, SimSampler, SimSignal};
//! use zerox_hal::{Channel, Sampler};
//!
//! let clock = SimClock::new(6_000_000);
//! let mut sampler = SimSampler::new(&clock, 16383, 20)
//!     .with_signal(Channel::new(0), SimSignal::Constant(100));
//!
//! assert_eq!(sampler.read_raw(Channel::new(0)), Ok(100));
//! assert_eq!(clock.now(), 20);
//! ```

pub mod bench;
pub mod signal;

pub use bench::{SimClock, SimDelay, SimReference, SimSampler, SimTimer};
pub use signal::SimSignal;
