use anyhow::Result;

use vmlinux_core::{HeaderScan, KernelExtractor};

use crate::commands::{print_json, resolve_settings};
use crate::{canonicalize_or_current, read_input};

/// Quick reconnaissance: report where each codec's magic bytes occur
/// without decoding anything.
pub fn list_headers_command(
    file: &str,
    codecs: &[String],
    config: Option<&str>,
    json: bool,
) -> Result<Vec<HeaderScan>> {
    let settings = resolve_settings(config, codecs, false, None, None)?;
    let input_path = canonicalize_or_current(file)?;
    let data = read_input(&input_path)?;

    let extractor = KernelExtractor::new(&data, &settings.registry, settings.ignore_validation);
    let scans = extractor.list_headers_with(|event| {
        if !json {
            println!("{event}");
        }
    });

    if json {
        print_json(&scans)?;
    }
    Ok(scans)
}
