//! Zerox phase meter
//!
//! Two rectified sines on ADC0 and ADC1. Every cycle measures the
//! reference period, both peak voltages and the phase of the second signal
//! against the first, then hands the reading to the report task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::Peri;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use zerox_core::{read_phase, SignalTimingEngine};
use zerox_firmware::board;
use zerox_firmware::channels::{Readout, READOUT};
use zerox_firmware::config;
use zerox_firmware::tasks;
use zerox_hal::UartConfig;
use zerox_hal_rp2040::{AdcInput, AdcSampler, InstantReference, InstantTimer};

/// Embedded configuration (validated by build.rs)
const METER_TOML: &str = include_str!("../../phase_meter.toml");

/// Pause between measurement cycles
const CYCLE_DELAY_MS: u64 = 1500;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Zerox phase meter starting...");

    let p = embassy_rp::init(Default::default());
    let config = config::load(board::phase_meter_preset(), METER_TOML);

    let lcd = board::lcd(
        Peri::<AnyPin>::from(p.PIN_16),
        Peri::<AnyPin>::from(p.PIN_17),
        Peri::<AnyPin>::from(p.PIN_18),
        Peri::<AnyPin>::from(p.PIN_19),
        Peri::<AnyPin>::from(p.PIN_20),
        Peri::<AnyPin>::from(p.PIN_21),
    );
    let log = board::diagnostic_log(p.UART0, p.PIN_0, UartConfig::default());
    spawner.spawn(tasks::report_task(lcd, log)).unwrap();

    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let sampler = AdcSampler::new(adc)
        .with_input(AdcInput::Adc0, AdcChannel::new_pin(p.PIN_26, Pull::None))
        .with_input(AdcInput::Adc1, AdcChannel::new_pin(p.PIN_27, Pull::None));

    let timer = InstantTimer::new(config.timer.width.modulus());
    let mut engine =
        unwrap!(SignalTimingEngine::new(sampler, timer, InstantReference::new(), &config));
    let mut delay = Delay;

    info!("Phase meter running");

    loop {
        Timer::after_millis(CYCLE_DELAY_MS).await;

        match read_phase(&mut engine, &mut delay, &config.channels) {
            Ok(reading) => {
                debug!("Phase {} deg, period {} s", reading.phase.degrees(), reading.full_period);
                READOUT.signal(Readout::Phase(reading));
            }
            Err(e) => warn!("Phase measurement failed: {}", e),
        }
    }
}
