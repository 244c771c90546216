//! Simple TOML parser for meter configuration
//!
//! This is a minimal parser that handles only the subset needed for the
//! meter configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - [section] headers
//! - Comments (# ...), including trailing comments
//!
//! Keys that are not set keep the value of the base configuration passed to
//! [`parse_config_with`].

use super::types::{
    AdcResolution, CounterWidth, MeterConfig, ReferenceSource, TimerPrescale,
};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Line is neither a header, a comment nor a key/value pair
    InvalidLine,
    /// Key is not known in its section
    UnknownKey,
    /// Invalid value type or out-of-range value
    InvalidValue,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timer,
    Adc,
    Poll,
    Transducer,
    Channels,
}

/// Parse a configuration, starting from the defaults
pub fn parse_config(input: &str) -> Result<MeterConfig, ParseError> {
    parse_config_with(MeterConfig::default(), input)
}

/// Parse a configuration on top of `base`
pub fn parse_config_with(base: MeterConfig, input: &str) -> Result<MeterConfig, ParseError> {
    let mut config = base;
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(line[1..line.len() - 1].trim())?;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidLine)?;
        apply_key(&mut config, section, key.trim(), value.trim())?;
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name {
        "timer" => Ok(Section::Timer),
        "adc" => Ok(Section::Adc),
        "poll" => Ok(Section::Poll),
        "transducer" => Ok(Section::Transducer),
        "channels" => Ok(Section::Channels),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_key(
    config: &mut MeterConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Timer, "sysclk_hz") => config.timer.sysclk_hz = parse_int(value)?,
        (Section::Timer, "prescale") => {
            config.timer.prescale =
                TimerPrescale::from_divisor(parse_int(value)?).ok_or(ParseError::InvalidValue)?
        }
        (Section::Timer, "width_bits") => {
            config.timer.width =
                CounterWidth::from_bits(parse_int(value)?).ok_or(ParseError::InvalidValue)?
        }

        (Section::Adc, "resolution_bits") => {
            config.adc.resolution =
                AdcResolution::from_bits(parse_int(value)?).ok_or(ParseError::InvalidValue)?
        }
        (Section::Adc, "reference") => config.adc.reference = parse_reference(value)?,
        (Section::Adc, "vref_volts") => config.adc.vref_volts = parse_float(value)?,

        (Section::Poll, "timeout_counts") => {
            // Zero disables the budget
            let counts: u32 = parse_int(value)?;
            config.poll.timeout_counts = (counts > 0).then_some(counts);
        }
        (Section::Poll, "threshold") => config.poll.threshold = parse_int(value)?,
        (Section::Poll, "poll_latency_ticks") => {
            config.poll.poll_latency_ticks = parse_int(value)?
        }

        (Section::Transducer, "ra_ohms") => config.transducer.ra_ohms = parse_float(value)?,
        (Section::Transducer, "rb_ohms") => config.transducer.rb_ohms = parse_float(value)?,
        (Section::Transducer, "period_count") => {
            config.transducer.period_count = parse_int(value)?
        }

        (Section::Channels, "reference") => config.channels.reference = parse_int(value)?,
        (Section::Channels, "other") => config.channels.other = parse_int(value)?,

        _ => return Err(ParseError::UnknownKey),
    }

    Ok(())
}

/// Remove a trailing `# comment`, ignoring `#` inside quoted strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse an integer, accepting `_` digit separators
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseError> {
    let mut acc: u64 = 0;
    let mut digits = 0;

    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(10).ok_or(ParseError::InvalidValue)?;
        acc = acc
            .checked_mul(10)
            .and_then(|a| a.checked_add(d as u64))
            .ok_or(ParseError::InvalidValue)?;
        digits += 1;
    }

    if digits == 0 {
        return Err(ParseError::InvalidValue);
    }

    T::try_from(acc).map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    let mut buf = [0u8; 24];
    let mut len = 0;

    for b in value.bytes().filter(|&b| b != b'_') {
        if len == buf.len() {
            return Err(ParseError::InvalidValue);
        }
        buf[len] = b;
        len += 1;
    }

    let cleaned = core::str::from_utf8(&buf[..len]).map_err(|_| ParseError::InvalidValue)?;
    cleaned.parse::<f32>().map_err(|_| ParseError::InvalidValue)
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_reference(value: &str) -> Result<ReferenceSource, ParseError> {
    match parse_string(value)? {
        "vref" => Ok(ReferenceSource::VrefPin),
        "vdd" => Ok(ReferenceSource::Vdd),
        "1v8" => Ok(ReferenceSource::Internal1v8),
        "internal" => Ok(ReferenceSource::Internal),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RP2040_CONFIG: &str = r#"
# Phase meter on an RP2040 board
[timer]
sysclk_hz = 1_000_000   # embassy time driver tick
prescale = 1
width_bits = 16

[adc]
resolution_bits = 12
reference = "vdd"
vref_volts = 3.3

[poll]
timeout_counts = 250_000
threshold = 0
poll_latency_ticks = 8

[channels]
reference = 0
other = 1
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(RP2040_CONFIG).unwrap();

        assert_eq!(config.timer.sysclk_hz, 1_000_000);
        assert_eq!(config.timer.prescale, TimerPrescale::Div1);
        assert_eq!(config.timer.width, CounterWidth::Bits16);
        assert_eq!(config.adc.resolution, AdcResolution::Bits12);
        assert_eq!(config.adc.reference, ReferenceSource::Vdd);
        assert!((config.adc.vref_volts - 3.3).abs() < 1e-6);
        assert_eq!(config.poll.timeout_counts, Some(250_000));
        assert_eq!(config.poll.poll_latency_ticks, 8);
        assert_eq!(config.channels.reference, 0);
        assert_eq!(config.channels.other, 1);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_missing_keys_keep_base() {
        let base = MeterConfig::capacitance_meter();
        let config = parse_config_with(base, "[transducer]\nperiod_count = 10\n").unwrap();

        assert_eq!(config.transducer.period_count, 10);
        assert_eq!(config.timer, base.timer);
        assert_eq!(config.poll, base.poll);
    }

    #[test]
    fn test_zero_timeout_disables_budget() {
        let config = parse_config("[poll]\ntimeout_counts = 0").unwrap();
        assert_eq!(config.poll.timeout_counts, None);
    }

    #[test]
    fn test_invalid_section() {
        assert_eq!(
            parse_config("[heater]\nmax_temp = 55"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[timer]\nturbo = 1"),
            Err(ParseError::UnknownKey)
        );
        // Keys outside a section are not accepted
        assert_eq!(parse_config("sysclk_hz = 1"), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[timer]\nprescale = 3"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[adc]\nreference = vdd"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[channels]\nother = 300"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[transducer]\nra_ohms = lots"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("[timer]\nsysclk_hz"), Err(ParseError::InvalidLine));
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment("reference = \"a#b\" # note"), "reference = \"a#b\" ");
        assert_eq!(strip_comment("# whole line"), "");
    }
}
