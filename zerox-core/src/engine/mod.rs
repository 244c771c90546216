//! Signal timing engine
//!
//! Measurement primitives built from three injected capabilities: a
//! [`Sampler`] for channel readings, an [`OverflowTimer`] for elapsed time
//! and a [`ReferenceCounter`] for polling budgets. Everything is
//! busy-wait polling on the calling thread.
//!
//! Each primitive restarts the timer, so no state survives between calls
//! except the configuration. While the timer runs, every poll iteration
//! also services its overflow flag.
//!
//! # Boundaries
//!
//! | Primitive | Start | Stop |
//! |-----------|-------|------|
//! | [`half_period`](SignalTimingEngine::half_period) | rising edge | next low sample |
//! | [`time_difference`](SignalTimingEngine::time_difference) | falling edge of the reference | falling edge of the other channel |
//! | [`period_of`](SignalTimingEngine::period_of) | rising edge | `n`th following rising edge |

mod edge;

pub use edge::{Edge, Level};

use embedded_hal::delay::DelayNs;
use zerox_hal::{Channel, OverflowTimer, ReferenceCounter, Sampler};

use crate::config::{ConfigError, MeterConfig};
use crate::error::MeasureError;
use crate::quantity::{PeriodMeasurement, PhaseOffset, SampleScale};
use crate::timing::{
    poll_until, Deadline, ElapsedTime, OverflowExtendedTimer, PollBudget, TickClock,
};

/// Time between two signal boundaries
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    /// Raw timer reading
    pub elapsed: ElapsedTime,
    /// Elapsed time in seconds
    pub seconds: f32,
}

/// Several consecutive periods timed in one run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodCount {
    /// Raw timer reading covering all periods
    pub elapsed: ElapsedTime,
    /// Number of periods timed
    pub periods: u16,
    /// Average period in seconds
    pub period_seconds: f32,
}

impl PeriodCount {
    /// Average frequency in Hz
    pub fn frequency(&self) -> Option<f32> {
        (self.period_seconds > 0.0).then(|| 1.0 / self.period_seconds)
    }
}

/// Busy-wait measurement engine
pub struct SignalTimingEngine<S, T, R> {
    sampler: S,
    timer: OverflowExtendedTimer<T>,
    reference: R,
    clock: TickClock,
    scale: SampleScale,
    threshold: u16,
    budget: PollBudget,
}

impl<S, T, R> SignalTimingEngine<S, T, R>
where
    S: Sampler,
    T: OverflowTimer,
    R: ReferenceCounter,
{
    /// Create an engine from its capabilities and a configuration
    ///
    /// Voltages are scaled with the sampler's own full scale and the
    /// configured reference voltage. Fails if the configuration does not
    /// validate or the timer wraps at a different modulus than configured.
    pub fn new(sampler: S, timer: T, reference: R, config: &MeterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        if timer.modulus() != config.timer.width.modulus() {
            return Err(ConfigError::TimerMismatch);
        }

        let scale = SampleScale::new(sampler.full_scale(), config.adc.vref_volts);

        Ok(Self {
            sampler,
            timer: OverflowExtendedTimer::new(timer),
            reference,
            clock: TickClock::from_config(&config.timer),
            scale,
            threshold: config.poll.threshold,
            budget: config.poll.timeout_counts.into(),
        })
    }

    /// Tick-to-seconds conversion in use
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Raw-to-volts conversion in use
    pub fn scale(&self) -> &SampleScale {
        &self.scale
    }

    /// Edge detection threshold in raw counts
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Change the edge detection threshold
    pub fn set_threshold(&mut self, threshold: u16) {
        self.threshold = threshold;
    }

    /// Polling budget applied to each wait
    pub fn budget(&self) -> PollBudget {
        self.budget
    }

    /// Change the polling budget
    pub fn set_budget(&mut self, budget: PollBudget) {
        self.budget = budget;
    }

    /// Take a fresh raw reading
    pub fn sample(&mut self, channel: Channel) -> Result<u16, MeasureError> {
        Ok(self.sampler.read_raw(channel)?)
    }

    /// Take a fresh reading in volts
    pub fn sample_volts(&mut self, channel: Channel) -> Result<f32, MeasureError> {
        let raw = self.sample(channel)?;
        Ok(self.scale.to_volts(raw))
    }

    /// Block until `edge` is seen on `channel`
    ///
    /// Both levels of the edge must be observed in order, so a signal that
    /// is already in the second level counts only after it has left it.
    pub fn wait_for_edge(&mut self, channel: Channel, edge: Edge) -> Result<(), MeasureError> {
        self.wait_for_edge_within(channel, edge, self.budget)
    }

    /// [`wait_for_edge`](Self::wait_for_edge) with a budget for this call
    /// only
    ///
    /// The engine's own budget is left as it was.
    pub fn wait_for_edge_within(
        &mut self,
        channel: Channel,
        edge: Edge,
        budget: PollBudget,
    ) -> Result<(), MeasureError> {
        let deadline = Deadline::start(&mut self.reference, budget);
        self.wait_edge(channel, edge, &deadline, false)
    }

    /// Measure the positive half period of `channel`
    ///
    /// Settles on a low sample, starts timing at the rising edge and stops
    /// at the next low sample. Duty cycles other than 50% bias the result.
    pub fn half_period(&mut self, channel: Channel) -> Result<PeriodMeasurement, MeasureError> {
        self.wait_for_edge(channel, Edge::Rising)?;

        self.timer.start();
        let deadline = self.deadline();
        let waited = self.wait_level(channel, Level::Low, &deadline, true);
        let elapsed = self.finish(waited)?;

        Ok(PeriodMeasurement {
            elapsed,
            half_period: self.clock.seconds(elapsed),
        })
    }

    /// Time from the falling edge of `reference` to the falling edge of
    /// `other`
    ///
    /// Offsets longer than one period alias into `[0, period)`.
    pub fn time_difference(
        &mut self,
        reference: Channel,
        other: Channel,
    ) -> Result<Interval, MeasureError> {
        self.wait_for_edge(reference, Edge::Falling)?;

        self.timer.start();
        let deadline = self.deadline();
        let waited = self.wait_edge(other, Edge::Falling, &deadline, true);
        let elapsed = self.finish(waited)?;

        Ok(Interval {
            elapsed,
            seconds: self.clock.seconds(elapsed),
        })
    }

    /// Phase of `other` relative to `reference`, in degrees
    ///
    /// A positive result means `other` lags. `full_period` is checked
    /// before anything is measured.
    pub fn phase_offset(
        &mut self,
        reference: Channel,
        other: Channel,
        full_period: f32,
    ) -> Result<PhaseOffset, MeasureError> {
        if !(full_period > 0.0 && full_period.is_finite()) {
            return Err(MeasureError::DegeneratePeriod);
        }

        let interval = self.time_difference(reference, other)?;
        PhaseOffset::from_time_difference(interval.seconds, full_period)
    }

    /// Time `periods` consecutive full periods of `channel`
    ///
    /// A single budget covers all periods, so the budget bounds the whole
    /// run rather than each edge.
    pub fn period_of(&mut self, channel: Channel, periods: u16) -> Result<PeriodCount, MeasureError> {
        if periods == 0 {
            return Err(MeasureError::DegeneratePeriod);
        }

        self.wait_for_edge(channel, Edge::Rising)?;

        self.timer.start();
        let deadline = self.deadline();
        let waited =
            (0..periods).try_for_each(|_| self.wait_edge(channel, Edge::Rising, &deadline, true));
        let elapsed = self.finish(waited)?;

        let period_seconds = (self.clock.seconds_f64(elapsed) / periods as f64) as f32;

        Ok(PeriodCount {
            elapsed,
            periods,
            period_seconds,
        })
    }

    /// Peak voltage of `channel`
    ///
    /// Waits for the signal to rise from zero, then for half of
    /// `half_period` (the top of a sine's positive half) and samples once.
    pub fn peak_volts<D: DelayNs>(
        &mut self,
        channel: Channel,
        half_period: f32,
        delay: &mut D,
    ) -> Result<f32, MeasureError> {
        if !(half_period >= 0.0 && half_period.is_finite()) {
            return Err(MeasureError::DegeneratePeriod);
        }

        self.wait_for_edge(channel, Edge::Rising)?;

        // half_period / 2 seconds in microseconds
        delay.delay_us((half_period * 500_000.0) as u32);

        self.sample_volts(channel)
    }

    /// Release the capabilities
    pub fn release(self) -> (S, T, R) {
        (self.sampler, self.timer.free(), self.reference)
    }

    fn deadline(&mut self) -> Deadline {
        Deadline::start(&mut self.reference, self.budget)
    }

    /// Stop the timer and combine its reading with the wait result
    fn finish(&mut self, waited: Result<(), MeasureError>) -> Result<ElapsedTime, MeasureError> {
        let elapsed = self.timer.stop();
        waited?;
        elapsed
    }

    fn wait_edge(
        &mut self,
        channel: Channel,
        edge: Edge,
        deadline: &Deadline,
        timed: bool,
    ) -> Result<(), MeasureError> {
        let (first, second) = edge.levels();
        self.wait_level(channel, first, deadline, timed)?;
        self.wait_level(channel, second, deadline, timed)
    }

    fn wait_level(
        &mut self,
        channel: Channel,
        level: Level,
        deadline: &Deadline,
        timed: bool,
    ) -> Result<(), MeasureError> {
        let threshold = self.threshold;
        let sampler = &mut self.sampler;
        let timer = &mut self.timer;

        let result = poll_until(&self.reference, deadline, || {
            if timed {
                timer.service()?;
            }
            let raw = sampler.read_raw(channel)?;
            Ok(Level::of(raw, threshold) == level)
        });

        #[cfg(feature = "defmt")]
        if result == Err(MeasureError::Timeout) {
            defmt::debug!("channel {} never went {}", channel.index(), level);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CounterWidth;
    use crate::quantity::{rms_from_peak, AstableTiming, CapacitanceReading};
    use crate::sim::{SimClock, SimDelay, SimReference, SimSampler, SimSignal, SimTimer};
    use zerox_hal::SampleError;

    // 72 MHz / 12
    const PHASE_TICKS_PER_SECOND: u64 = 6_000_000;
    // One 60 Hz period
    const PERIOD: u64 = 100_000;
    const CONVERSION_TICKS: u64 = 20;

    const CH1: Channel = Channel::new(0);
    const CH2: Channel = Channel::new(1);

    type SimEngine<'a> = SignalTimingEngine<SimSampler<'a>, SimTimer<'a>, SimReference<'a>>;

    fn half_wave(delay: i64) -> SimSignal {
        SimSignal::HalfWave {
            period: PERIOD,
            peak: 8192,
            delay,
        }
    }

    fn phase_engine<'a>(clock: &'a SimClock, other_delay: i64) -> SimEngine<'a> {
        let sampler = SimSampler::new(clock, 16383, CONVERSION_TICKS)
            .with_signal(CH1, half_wave(0))
            .with_signal(CH2, half_wave(other_delay));
        let timer = SimTimer::new(clock, 65536);
        let reference = SimReference::new(clock, 1);

        let mut engine =
            SignalTimingEngine::new(sampler, timer, reference, &MeterConfig::phase_meter()).unwrap();
        // Keep a broken test from spinning forever
        engine.set_budget(PollBudget::Counts(PHASE_TICKS_PER_SECOND as u32));
        engine
    }

    fn ticks(seconds: f32) -> f32 {
        seconds * PHASE_TICKS_PER_SECOND as f32
    }

    fn measure_phase(other_delay: i64) -> f32 {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, other_delay);

        let half = engine.half_period(CH1).unwrap();
        engine
            .phase_offset(CH1, CH2, half.full_period())
            .unwrap()
            .degrees()
    }

    #[test]
    fn test_half_period() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, 0);

        let half = engine.half_period(CH1).unwrap();

        assert_eq!(half.elapsed.overflows, 0);
        assert!((ticks(half.half_period) - 50_000.0).abs() < 60.0);
        assert!((half.frequency().unwrap() - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_quarter_period_lag_is_90_degrees() {
        let phase = measure_phase(25_000);
        assert!((phase - 90.0).abs() < 0.5, "phase {}", phase);
    }

    #[test]
    fn test_quarter_period_lead_is_minus_90_degrees() {
        let phase = measure_phase(-25_000);
        assert!((phase + 90.0).abs() < 0.5, "phase {}", phase);
    }

    #[test]
    fn test_lag_past_one_wrap_counts_overflow() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, 70_000);

        let interval = engine.time_difference(CH1, CH2).unwrap();

        assert_eq!(interval.elapsed.overflows, 1);
        assert!((ticks(interval.seconds) - 70_000.0).abs() < 60.0);

        // 252 degrees reads as a 108 degree lead
        assert!((measure_phase(70_000) + 108.0).abs() < 0.5);
    }

    #[test]
    fn test_offsets_beyond_one_period_alias() {
        // Lag of P + d reads as d
        let lag = measure_phase(PERIOD as i64 + 10_000);
        assert!((lag - 36.0).abs() < 0.5, "lag {}", lag);

        // Lead of P + d reads as a lead of d
        let lead = measure_phase(-(PERIOD as i64 + 10_000));
        assert!((lead + 36.0).abs() < 0.5, "lead {}", lead);

        // The lead shows up as the other channel's next fall, P - d later
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, -(PERIOD as i64 + 10_000));
        let interval = engine.time_difference(CH1, CH2).unwrap();
        let lag_ticks = ticks(interval.seconds);
        assert!(
            (lag_ticks - (PERIOD - 10_000) as f32).abs() < 100.0,
            "time difference {} ticks",
            lag_ticks
        );
    }

    #[test]
    fn test_degenerate_period_measures_nothing() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, 0);

        assert_eq!(
            engine.phase_offset(CH1, CH2, 0.0),
            Err(MeasureError::DegeneratePeriod)
        );
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn test_timeout_on_constant_signal() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let sampler =
            SimSampler::new(&clock, 16383, CONVERSION_TICKS).with_signal(CH1, SimSignal::Constant(0));
        let timer = SimTimer::new(&clock, 65536);
        let reference = SimReference::new(&clock, 1);
        let mut engine =
            SignalTimingEngine::new(sampler, timer, reference, &MeterConfig::phase_meter()).unwrap();

        let quarter_second = TickClock::new(1.0 / PHASE_TICKS_PER_SECOND as f64, 65536).ticks_for(0.25);
        engine.set_budget(PollBudget::Counts(quarter_second as u32));

        assert_eq!(
            engine.wait_for_edge(CH1, Edge::Rising),
            Err(MeasureError::Timeout)
        );

        // Gives up on the first poll past the budget
        assert!(clock.now() > quarter_second);
        assert!(clock.now() <= quarter_second + 2 * CONVERSION_TICKS);
    }

    #[test]
    fn test_one_off_budget_leaves_engine_budget() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let sampler =
            SimSampler::new(&clock, 16383, CONVERSION_TICKS).with_signal(CH1, SimSignal::Constant(0));
        let timer = SimTimer::new(&clock, 65536);
        let reference = SimReference::new(&clock, 1);
        let mut engine =
            SignalTimingEngine::new(sampler, timer, reference, &MeterConfig::phase_meter()).unwrap();
        let budget = engine.budget();

        assert_eq!(
            engine.wait_for_edge_within(CH1, Edge::Rising, PollBudget::Counts(1_500_000)),
            Err(MeasureError::Timeout)
        );
        assert!(clock.now() > 1_500_000);
        assert!(clock.now() <= 1_500_000 + 2 * CONVERSION_TICKS);
        assert_eq!(engine.budget(), budget);
    }

    #[test]
    fn test_half_period_times_out_on_dc() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let sampler = SimSampler::new(&clock, 16383, CONVERSION_TICKS)
            .with_signal(CH1, SimSignal::Constant(100));
        let timer = SimTimer::new(&clock, 65536);
        let reference = SimReference::new(&clock, 1);
        let mut engine =
            SignalTimingEngine::new(sampler, timer, reference, &MeterConfig::phase_meter()).unwrap();
        engine.set_budget(PollBudget::Counts(200_000));

        // Never low, so the rising edge never starts
        assert_eq!(engine.half_period(CH1), Err(MeasureError::Timeout));
    }

    #[test]
    fn test_missed_overflow() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        // A conversion spans more than two wraps of an 8-bit counter
        let sampler = SimSampler::new(&clock, 16383, 600).with_signal(CH1, half_wave(0));
        let timer = SimTimer::new(&clock, 256);
        let reference = SimReference::new(&clock, 1);

        let mut config = MeterConfig::phase_meter();
        config.timer.width = CounterWidth::Bits8;
        let mut engine = SignalTimingEngine::new(sampler, timer, reference, &config).unwrap();

        assert_eq!(engine.half_period(CH1), Err(MeasureError::MissedOverflow));
    }

    #[test]
    fn test_timer_mismatch() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let sampler = SimSampler::new(&clock, 16383, CONVERSION_TICKS);
        let timer = SimTimer::new(&clock, 256);
        let reference = SimReference::new(&clock, 1);

        let result =
            SignalTimingEngine::new(sampler, timer, reference, &MeterConfig::phase_meter());
        assert!(matches!(result, Err(ConfigError::TimerMismatch)));
    }

    #[test]
    fn test_sampler_error_propagates() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, 0);

        assert_eq!(
            engine.half_period(Channel::new(7)),
            Err(MeasureError::Sampler(SampleError::InvalidChannel))
        );
    }

    #[test]
    fn test_peak_and_rms_volts() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, 0);
        let mut delay = SimDelay::new(&clock);

        let half = engine.half_period(CH1).unwrap();
        let peak = engine.peak_volts(CH1, half.half_period, &mut delay).unwrap();

        // 8192 / 16383 of 3.3035 V
        assert!((peak - 1.6518).abs() < 0.01, "peak {}", peak);
        assert!((rms_from_peak(peak) - 1.168).abs() < 0.01);
    }

    #[test]
    fn test_capacitance_from_period_count() {
        // 40 MHz core timer at SYSCLK / 2
        let clock = SimClock::new(20_000_000);
        let config = MeterConfig::capacitance_meter();
        let pin = config.channels.reference();

        // 5 nF on 1k + 2 * 2k oscillates at about 347 ticks
        let sampler = SimSampler::new(&clock, 1, 1).with_signal(
            pin,
            SimSignal::Square {
                period: 347,
                high_ticks: 173,
                delay: 0,
                high: 1,
            },
        );
        let timer = SimTimer::new(&clock, 1 << 32);
        let reference = SimReference::new(&clock, 1);
        let mut engine = SignalTimingEngine::new(sampler, timer, reference, &config).unwrap();

        let count = engine.period_of(pin, config.transducer.period_count).unwrap();
        assert_eq!(count.periods, 100);
        assert_eq!(count.elapsed.low, 34_700);

        let farads = AstableTiming::from_config(&config.transducer).capacitance(count.period_seconds);
        match CapacitanceReading::classify(farads) {
            CapacitanceReading::Nanofarads(nf) => assert!((nf - 4.527).abs() < 0.01, "nf {}", nf),
            other => panic!("unexpected bucket {:?}", other),
        }
    }

    #[test]
    fn test_period_count_times_out_without_signal() {
        let clock = SimClock::new(20_000_000);
        let config = MeterConfig::capacitance_meter();
        let pin = config.channels.reference();

        let sampler = SimSampler::new(&clock, 1, 1).with_signal(pin, SimSignal::Constant(0));
        let timer = SimTimer::new(&clock, 1 << 32);
        let reference = SimReference::new(&clock, 1);
        let mut engine = SignalTimingEngine::new(sampler, timer, reference, &config).unwrap();

        assert_eq!(engine.period_of(pin, 100), Err(MeasureError::Timeout));
        assert_eq!(engine.period_of(pin, 0), Err(MeasureError::DegeneratePeriod));
    }

    #[test]
    fn test_release_returns_capabilities() {
        let clock = SimClock::new(PHASE_TICKS_PER_SECOND);
        let mut engine = phase_engine(&clock, 0);
        engine.sample(CH1).unwrap();

        let (sampler, _timer, _reference) = engine.release();
        assert_eq!(sampler.reads(), 1);
    }
}
