//! Board wiring
//!
//! | Signal            | Pin    |
//! |-------------------|--------|
//! | Diagnostic TX     | GPIO0 (UART0) |
//! | 555 output        | GPIO6  |
//! | LCD RS, E         | GPIO16, GPIO17 |
//! | LCD D4..D7        | GPIO18..GPIO21 |
//! | Reference signal  | GPIO26 (ADC0) |
//! | Other signal      | GPIO27 (ADC1) |

use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::peripherals::{PIN_0, UART0};
use embassy_rp::uart::{Blocking, Config as RpUartConfig, UartTx};
use embassy_rp::Peri;
use embassy_time::Delay;
use zerox_core::config::{MeterConfig, TimerPrescale};
use zerox_drivers::{DiagnosticLog, Hd44780, LcdPins};
use zerox_hal::UartConfig;
use zerox_hal_rp2040::{BlockingUart, InstantTimer};

/// LCD on the board's GPIO header
pub type Lcd = Hd44780<Output<'static>, Delay>;

/// Diagnostic log on UART0
pub type DiagLog = DiagnosticLog<BlockingUart<'static>>;

/// Phase meter defaults for this board
///
/// The measurement timer runs on the embassy time base, so the timer clock
/// is the embassy tick rather than a divided system clock.
pub fn phase_meter_preset() -> MeterConfig {
    let mut config = MeterConfig::phase_meter();
    use_time_base(&mut config);
    config
}

/// Capacitance meter defaults for this board
pub fn capacitance_meter_preset() -> MeterConfig {
    let mut config = MeterConfig::capacitance_meter();
    use_time_base(&mut config);
    config
}

/// Point the timer configuration at the embassy tick
pub fn use_time_base(config: &mut MeterConfig) {
    config.timer.sysclk_hz = InstantTimer::tick_hz() as u32;
    config.timer.prescale = TimerPrescale::Div1;
}

/// Check whether the timer configuration matches the embassy tick
pub fn matches_time_base(config: &MeterConfig) -> bool {
    let hz = config.timer.sysclk_hz as u64 / config.timer.prescale.divisor() as u64;
    hz == InstantTimer::tick_hz()
}

/// Build the LCD driver from its six GPIOs, all driven low
pub fn lcd(
    rs: Peri<'static, AnyPin>,
    e: Peri<'static, AnyPin>,
    d4: Peri<'static, AnyPin>,
    d5: Peri<'static, AnyPin>,
    d6: Peri<'static, AnyPin>,
    d7: Peri<'static, AnyPin>,
) -> Lcd {
    let pins = LcdPins {
        rs: Output::new(rs, Level::Low),
        e: Output::new(e, Level::Low),
        d4: Output::new(d4, Level::Low),
        d5: Output::new(d5, Level::Low),
        d6: Output::new(d6, Level::Low),
        d7: Output::new(d7, Level::Low),
    };

    Hd44780::new(pins, Delay)
}

/// Build the diagnostic log on UART0 TX
pub fn diagnostic_log(
    uart: Peri<'static, UART0>,
    tx: Peri<'static, PIN_0>,
    settings: UartConfig,
) -> DiagLog {
    let mut config = RpUartConfig::default();
    config.baudrate = settings.baudrate;

    let tx: UartTx<'static, Blocking> = UartTx::new_blocking(uart, tx, config);
    DiagnosticLog::new(BlockingUart::new(tx))
}
