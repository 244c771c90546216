//! Simulated clock and devices

use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use zerox_hal::{Channel, OverflowTimer, ReferenceCounter, SampleError, Sampler, WrapCounter};

use super::signal::SimSignal;

/// Maximum number of simulated channels
pub const MAX_SIM_CHANNELS: usize = 4;

/// Shared simulated time, in timer ticks
pub struct SimClock {
    now: Cell<u64>,
    ticks_per_second: u64,
}

impl SimClock {
    /// Create a clock at t = 0
    pub const fn new(ticks_per_second: u64) -> Self {
        Self {
            now: Cell::new(0),
            ticks_per_second,
        }
    }

    /// Current time in ticks
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Move time forward
    pub fn advance(&self, ticks: u64) {
        self.now.set(self.now.get() + ticks);
    }

    /// Tick rate
    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }
}

/// Sampler reading synthetic signals
///
/// Every read costs `conversion_ticks` of simulated time and returns the
/// signal value at the end of the conversion.
pub struct SimSampler<'a> {
    clock: &'a SimClock,
    signals: Vec<(Channel, SimSignal), MAX_SIM_CHANNELS>,
    full_scale: u16,
    conversion_ticks: u64,
    reads: u32,
}

impl<'a> SimSampler<'a> {
    /// Create a sampler with no channels
    pub fn new(clock: &'a SimClock, full_scale: u16, conversion_ticks: u64) -> Self {
        Self {
            clock,
            signals: Vec::new(),
            full_scale,
            conversion_ticks,
            reads: 0,
        }
    }

    /// Attach a signal to a channel, replacing any previous one
    ///
    /// Channels beyond [`MAX_SIM_CHANNELS`] are ignored.
    pub fn with_signal(mut self, channel: Channel, signal: SimSignal) -> Self {
        if let Some(slot) = self.signals.iter_mut().find(|(c, _)| *c == channel) {
            slot.1 = signal;
        } else {
            let _ = self.signals.push((channel, signal));
        }
        self
    }

    /// Number of conversions performed so far
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl Sampler for SimSampler<'_> {
    fn read_raw(&mut self, channel: Channel) -> Result<u16, SampleError> {
        let signal = self
            .signals
            .iter()
            .find(|(c, _)| *c == channel)
            .map(|(_, s)| *s)
            .ok_or(SampleError::InvalidChannel)?;

        self.clock.advance(self.conversion_ticks);
        self.reads += 1;

        Ok(signal.value_at(self.clock.now()).min(self.full_scale))
    }

    fn full_scale(&self) -> u16 {
        self.full_scale
    }
}

/// Hardware-like counter with a sticky overflow flag
///
/// Counts one per clock tick while running.
pub struct SimTimer<'a> {
    clock: &'a SimClock,
    counter: WrapCounter,
}

impl<'a> SimTimer<'a> {
    /// Create a stopped timer wrapping at `modulus`
    pub fn new(clock: &'a SimClock, modulus: u64) -> Self {
        Self {
            clock,
            counter: WrapCounter::new(modulus),
        }
    }
}

impl OverflowTimer for SimTimer<'_> {
    fn modulus(&self) -> u64 {
        self.counter.modulus()
    }

    fn start(&mut self) {
        self.counter.start(self.clock.now());
    }

    fn stop(&mut self) {
        self.counter.stop(self.clock.now());
    }

    fn reset(&mut self) {
        self.counter.reset(self.clock.now());
    }

    fn counter(&self) -> u32 {
        self.counter.counter(self.clock.now())
    }

    fn overflowed(&self) -> bool {
        self.counter.overflowed(self.clock.now())
    }

    fn clear_overflow(&mut self) {
        self.counter.clear_overflow(self.clock.now());
    }

    fn overrun(&self) -> bool {
        self.counter.overrun(self.clock.now())
    }
}

/// Free-running reference counter on the simulated clock
pub struct SimReference<'a> {
    clock: &'a SimClock,
    ticks_per_count: u64,
    started_at: u64,
}

impl<'a> SimReference<'a> {
    /// One count every `ticks_per_count` clock ticks
    pub fn new(clock: &'a SimClock, ticks_per_count: u64) -> Self {
        Self {
            clock,
            ticks_per_count: ticks_per_count.max(1),
            started_at: clock.now(),
        }
    }
}

impl ReferenceCounter for SimReference<'_> {
    fn restart(&mut self) {
        self.started_at = self.clock.now();
    }

    fn elapsed(&self) -> u32 {
        let counts = (self.clock.now() - self.started_at) / self.ticks_per_count;
        counts.min(u32::MAX as u64) as u32
    }
}

/// Blocking delay that advances the simulated clock
pub struct SimDelay<'a> {
    clock: &'a SimClock,
}

impl<'a> SimDelay<'a> {
    /// Create a delay on `clock`
    pub fn new(clock: &'a SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let ticks = ns as u128 * self.clock.ticks_per_second() as u128 / 1_000_000_000;
        self.clock.advance(ticks as u64);
    }
}
