//! Configuration loading
//!
//! Each binary embeds its TOML file. Keys the file leaves out keep the
//! board preset's value. A file that fails to parse or validate is
//! reported and the preset is used instead.

use defmt::*;
use zerox_core::config::{parse_config_with, MeterConfig};

use crate::board;

/// Load the embedded configuration on top of `preset`
pub fn load(preset: MeterConfig, embedded: &str) -> MeterConfig {
    info!("Loading meter configuration...");

    let mut config = match parse_config_with(preset, embedded) {
        Ok(config) => config,
        Err(e) => {
            warn!("Embedded configuration invalid: {:?}, using preset", e);
            preset
        }
    };

    if !board::matches_time_base(&config) {
        warn!(
            "Timer clock {} Hz / {} does not match the time base, using the time base",
            config.timer.sysclk_hz,
            config.timer.prescale.divisor()
        );
        board::use_time_base(&mut config);
    }

    if let Err(e) = config.validate() {
        warn!("Configuration rejected: {:?}, using preset", e);
        config = preset;
    }

    info!(
        "Timer {} bits, timeout {:?} counts, threshold {}",
        config.timer.width.bits(),
        config.poll.timeout_counts,
        config.poll.threshold
    );

    config
}
