//! Zerox capacitance meter
//!
//! A 555 astable oscillator whose timing capacitor is the part under test
//! drives GPIO6. Every cycle averages the oscillator period over the
//! configured number of periods and converts it to a capacitance.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use embassy_time::Timer;
use {defmt_rtt as _, panic_probe as _};

use zerox_core::quantity::AstableTiming;
use zerox_core::{read_capacitance, SignalTimingEngine};
use zerox_firmware::board;
use zerox_firmware::channels::{Readout, READOUT};
use zerox_firmware::config;
use zerox_firmware::tasks;
use zerox_hal::{PinSampler, UartConfig};
use zerox_hal_rp2040::{InstantReference, InstantTimer, RpInput};

/// Embedded configuration (validated by build.rs)
const METER_TOML: &str = include_str!("../../capacitance_meter.toml");

/// Pause between measurement cycles
const CYCLE_DELAY_MS: u64 = 200;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Zerox capacitance meter starting...");

    let p = embassy_rp::init(Default::default());
    let config = config::load(board::capacitance_meter_preset(), METER_TOML);

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

    let channel = config.channels.reference();
    let oscillator = RpInput::new(Input::new(p.PIN_6, Pull::None));
    let sampler = PinSampler::new(channel, oscillator);

    let timer = InstantTimer::new(config.timer.width.modulus());
    let mut engine =
        unwrap!(SignalTimingEngine::new(sampler, timer, InstantReference::new(), &config));
    let timing = AstableTiming::from_config(&config.transducer);

    info!(
        "Capacitance meter running, {} periods per reading",
        config.transducer.period_count
    );

    loop {
        match read_capacitance(&mut engine, channel, config.transducer.period_count, &timing) {
            Ok(measurement) => {
                debug!("Period {} s, {} F", measurement.period, measurement.farads);
                READOUT.signal(Readout::Capacitance(measurement));
            }
            Err(e) => warn!("Capacitance measurement failed: {}", e),
        }

        Timer::after_millis(CYCLE_DELAY_MS).await;
    }
}
