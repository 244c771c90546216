//! Build script for zerox-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates the embedded meter configurations at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Embedded configuration files and whether each needs a [transducer] section
const CONFIG_FILES: &[(&str, bool)] = &[
    ("phase_meter.toml", false),
    ("capacitance_meter.toml", true),
];

fn main() {
    setup_linker();

    for (file, needs_transducer) in CONFIG_FILES {
        validate_config(file, *needs_transducer);
    }
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    #[cfg(feature = "defmt")]
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate one meter configuration file
fn validate_config(file: &str, needs_transducer: bool) {
    println!("cargo:rerun-if-changed={}", file);

    let config_path = Path::new(file);

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: meter configuration not found                            ║\n\
            ║                                                                  ║\n\
            ║  Missing: {:<54} ║\n\
            ║  Each meter binary embeds its own TOML file from the             ║\n\
            ║  zerox-firmware directory.                                       ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            file
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read {:<41} ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                file, e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in {:<33} ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                file,
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    validate_sections(&config, needs_transducer, &mut errors);
    validate_timer(&config, &mut errors);
    validate_adc(&config, &mut errors);
    validate_poll(&config, &mut errors);
    validate_transducer(&config, &mut errors);
    validate_channels(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid meter configuration in {:<25} ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            file,
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning={} validated successfully", file);
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keys accepted in each section, mirroring the firmware's parser
const SECTION_KEYS: &[(&str, &[&str])] = &[
    ("timer", &["sysclk_hz", "prescale", "width_bits"]),
    ("adc", &["resolution_bits", "reference", "vref_volts"]),
    ("poll", &["timeout_counts", "threshold", "poll_latency_ticks"]),
    ("transducer", &["ra_ohms", "rb_ohms", "period_count"]),
    ("channels", &["reference", "other"]),
];

/// Check that sections are known, required ones exist, and keys are known
fn validate_sections(config: &toml::Value, needs_transducer: bool, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("Top level must be a table".to_string());
        return;
    };

    for (name, value) in root {
        let Some((_, keys)) = SECTION_KEYS.iter().find(|(section, _)| section == name) else {
            errors.push(format!("Unknown section [{}]", name));
            continue;
        };

        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }

    for required in ["timer", "poll", "channels"] {
        if root.get(required).is_none() {
            errors.push(format!("Missing [{}] section", required));
        }
    }

    if needs_transducer && root.get("transducer").is_none() {
        errors.push("Missing [transducer] section".to_string());
    }
}

fn integer(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

fn float(config: &toml::Value, section: &str, key: &str) -> Option<f64> {
    let value = config.get(section)?.get(key)?;
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

/// Check an integer key against an allowed range, if present
fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    let Some(value) = config.get(section).and_then(|s| s.get(key)) else {
        return;
    };

    match value.as_integer() {
        Some(i) if range.contains(&i) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
        None => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

/// Check an integer key against a set of legal values, if present
fn check_one_of(
    config: &toml::Value,
    section: &str,
    key: &str,
    allowed: &[i64],
    errors: &mut Vec<String>,
) {
    if config.get(section).and_then(|s| s.get(key)).is_none() {
        return;
    }

    match integer(config, section, key) {
        Some(i) if allowed.contains(&i) => {}
        _ => errors.push(format!("[{}] {} must be one of {:?}", section, key, allowed)),
    }
}

fn validate_timer(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "timer", "sysclk_hz", 1..=u32::MAX as i64, errors);
    check_one_of(config, "timer", "prescale", &[1, 2, 4, 8, 12, 48], errors);
    check_one_of(config, "timer", "width_bits", &[8, 16, 24, 32], errors);
}

fn validate_adc(config: &toml::Value, errors: &mut Vec<String>) {
    check_one_of(config, "adc", "resolution_bits", &[10, 12, 14], errors);

    if let Some(value) = config.get("adc").and_then(|a| a.get("reference")) {
        match value.as_str() {
            Some("vref" | "vdd" | "1v8" | "internal") => {}
            _ => errors.push(
                "[adc] reference must be 'vref', 'vdd', '1v8' or 'internal'".to_string(),
            ),
        }
    }

    if config.get("adc").and_then(|a| a.get("vref_volts")).is_some() {
        match float(config, "adc", "vref_volts") {
            Some(v) if v > 0.0 && v.is_finite() => {}
            _ => errors.push("[adc] vref_volts must be a positive number".to_string()),
        }
    }
}

fn validate_poll(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "poll", "timeout_counts", 0..=u32::MAX as i64, errors);
    check_range(config, "poll", "threshold", 0..=u16::MAX as i64, errors);
    check_range(config, "poll", "poll_latency_ticks", 0..=u32::MAX as i64, errors);

    let width = integer(config, "timer", "width_bits").unwrap_or(16);
    if let (Some(latency), 8..=32) = (integer(config, "poll", "poll_latency_ticks"), width) {
        if latency >= 1i64 << width {
            errors.push("[poll] poll_latency_ticks must be below one timer wrap".to_string());
        }
    }
}

fn validate_transducer(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "transducer", "period_count", 1..=u16::MAX as i64, errors);

    for key in ["ra_ohms", "rb_ohms"] {
        if config.get("transducer").and_then(|t| t.get(key)).is_none() {
            continue;
        }
        match float(config, "transducer", key) {
            Some(v) if v >= 0.0 && v.is_finite() => {}
            _ => errors.push(format!("[transducer] {} must be a non-negative number", key)),
        }
    }
}

fn validate_channels(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "channels", "reference", 0..=u8::MAX as i64, errors);
    check_range(config, "channels", "other", 0..=u8::MAX as i64, errors);
}
