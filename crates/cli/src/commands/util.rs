use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use vmlinux_core::config::{load_config, parse_codec, ExtractorConfig};
use vmlinux_core::CodecRegistry;

/// Effective settings for one run: config file values overridden by flags.
#[derive(Debug)]
pub struct RunSettings {
    pub registry: CodecRegistry,
    pub ignore_validation: bool,
    pub output_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Load the config file (if any) and apply command-line overrides.
///
/// `--codec` values replace the config's allow-list; `-i` can only turn
/// validation off, never back on.
pub fn resolve_settings(
    config_path: Option<&str>,
    codecs: &[String],
    ignore_validation: bool,
    output_dir: Option<&str>,
    report: Option<&str>,
) -> Result<RunSettings> {
    let mut config = match config_path {
        Some(path) => load_config(path).context("Failed to load extractor config")?,
        None => ExtractorConfig::default(),
    };

    if !codecs.is_empty() {
        for name in codecs {
            parse_codec(name)?;
        }
        config.codecs = codecs.to_vec();
    }
    config.ignore_validation |= ignore_validation;
    if let Some(dir) = output_dir {
        config.output_dir = Some(PathBuf::from(dir));
    }
    if let Some(path) = report {
        config.report = Some(PathBuf::from(path));
    }

    Ok(RunSettings {
        registry: config.registry()?,
        ignore_validation: config.ignore_validation,
        output_dir: config.output_dir,
        report: config.report,
    })
}

/// Pretty-print any serializable value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    println!("{}", serialized);
    Ok(())
}
