//! Complete meter readings
//!
//! One call per display update. Each function runs the fixed sequence of
//! engine primitives a meter needs and derives the displayed quantities.

use embedded_hal::delay::DelayNs;
use zerox_hal::{Channel, OverflowTimer, ReferenceCounter, Sampler};

use crate::config::ChannelConfig;
use crate::engine::SignalTimingEngine;
use crate::error::MeasureError;
use crate::quantity::{rms_from_peak, AstableTiming, CapacitanceReading, PhaseOffset};

/// One phase meter cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseReading {
    /// Positive half period of the reference, seconds
    pub half_period: f32,
    /// Full period of the reference, seconds
    pub full_period: f32,
    /// Peak voltage of the reference
    pub peak_reference: f32,
    /// Peak voltage of the other signal
    pub peak_other: f32,
    /// Falling edge of the reference to falling edge of the other, seconds
    pub time_difference: f32,
    /// Phase of the other signal relative to the reference
    pub phase: PhaseOffset,
}

impl PhaseReading {
    /// RMS voltage of the reference
    pub fn rms_reference(&self) -> f32 {
        rms_from_peak(self.peak_reference)
    }

    /// RMS voltage of the other signal
    pub fn rms_other(&self) -> f32 {
        rms_from_peak(self.peak_other)
    }
}

/// Run a phase meter cycle
///
/// Half period of the reference, both peak voltages, then the time
/// difference and the phase derived from it.
pub fn read_phase<S, T, R, D>(
    engine: &mut SignalTimingEngine<S, T, R>,
    delay: &mut D,
    channels: &ChannelConfig,
) -> Result<PhaseReading, MeasureError>
where
    S: Sampler,
    T: OverflowTimer,
    R: ReferenceCounter,
    D: DelayNs,
{
    let reference = channels.reference();
    let other = channels.other();

    let half = engine.half_period(reference)?;
    let full_period = half.full_period();

    let peak_reference = engine.peak_volts(reference, half.half_period, delay)?;
    let peak_other = engine.peak_volts(other, half.half_period, delay)?;

    let interval = engine.time_difference(reference, other)?;
    let phase = PhaseOffset::from_time_difference(interval.seconds, full_period)?;

    Ok(PhaseReading {
        half_period: half.half_period,
        full_period,
        peak_reference,
        peak_other,
        time_difference: interval.seconds,
        phase,
    })
}

/// One capacitance meter cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacitanceMeasurement {
    /// Average oscillator period, seconds
    pub period: f32,
    /// Capacitance before bucketing, farads
    pub farads: f32,
    /// Value as displayed
    pub reading: CapacitanceReading,
}

/// Run a capacitance meter cycle on the oscillator output `channel`
pub fn read_capacitance<S, T, R>(
    engine: &mut SignalTimingEngine<S, T, R>,
    channel: Channel,
    periods: u16,
    timing: &AstableTiming,
) -> Result<CapacitanceMeasurement, MeasureError>
where
    S: Sampler,
    T: OverflowTimer,
    R: ReferenceCounter,
{
    let count = engine.period_of(channel, periods)?;
    let farads = timing.capacitance(count.period_seconds);

    Ok(CapacitanceMeasurement {
        period: count.period_seconds,
        farads,
        reading: CapacitanceReading::classify(farads),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeterConfig;
    use crate::sim::{SimClock, SimDelay, SimReference, SimSampler, SimSignal, SimTimer};
    use crate::timing::PollBudget;

    #[test]
    fn test_phase_cycle() {
        let clock = SimClock::new(6_000_000);
        let config = MeterConfig::phase_meter();
        let wave = |peak, delay| SimSignal::HalfWave {
            period: 100_000,
            peak,
            delay,
        };

        let sampler = SimSampler::new(&clock, 16383, 20)
            .with_signal(config.channels.reference(), wave(16383, 0))
            .with_signal(config.channels.other(), wave(8192, 25_000));
        let timer = SimTimer::new(&clock, 65536);
        let reference = SimReference::new(&clock, 1);
        let mut engine = SignalTimingEngine::new(sampler, timer, reference, &config).unwrap();
        engine.set_budget(PollBudget::Counts(6_000_000));
        let mut delay = SimDelay::new(&clock);

        let reading = read_phase(&mut engine, &mut delay, &config.channels).unwrap();

        assert!((reading.full_period - 1.0 / 60.0).abs() < 1e-4);
        assert!((reading.peak_reference - 3.3035).abs() < 0.01);
        assert!((reading.rms_other() - 1.168).abs() < 0.01);
        assert!((reading.time_difference - 0.25 / 60.0).abs() < 1e-5);
        assert!((reading.phase.degrees() - 90.0).abs() < 0.5);
    }

    #[test]
    fn test_capacitance_cycle_without_capacitor() {
        let clock = SimClock::new(20_000_000);
        let config = MeterConfig::capacitance_meter();
        let pin = config.channels.reference();

        // 200 pF oscillates at about 14 ticks
        let sampler = SimSampler::new(&clock, 1, 1).with_signal(
            pin,
            SimSignal::Square {
                period: 14,
                high_ticks: 7,
                delay: 0,
                high: 1,
            },
        );
        let timer = SimTimer::new(&clock, 1 << 32);
        let reference = SimReference::new(&clock, 1);
        let mut engine = SignalTimingEngine::new(sampler, timer, reference, &config).unwrap();

        let timing = AstableTiming::from_config(&config.transducer);
        let measurement = read_capacitance(&mut engine, pin, 100, &timing).unwrap();

        assert!((measurement.period - 0.7e-6).abs() < 1e-8);
        assert_eq!(measurement.reading, CapacitanceReading::NoCapacitor);
    }

    #[test]
    fn test_capacitance_uses_full_oscillator_period() {
        let clock = SimClock::new(20_000_000);
        let config = MeterConfig::capacitance_meter();
        let pin = config.channels.reference();

        // 347 ticks high plus low, about 5 nF on 1k/2k
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

        let timing = AstableTiming::from_config(&config.transducer);
        let measurement = read_capacitance(&mut engine, pin, 100, &timing).unwrap();

        assert!((measurement.period - 347.0 / 20e6).abs() < 1e-8);
        assert_eq!(measurement.farads, timing.capacitance(measurement.period));
        // 1.44 * 17.35 us / 5 kOhm; a half-period conversion would give half
        assert!((measurement.farads - 4.9968e-9).abs() < 2e-11);
    }
}
