use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use vmlinux_core::{CandidateResult, ExtractionEvent, KernelExtractor};

use crate::commands::{print_json, resolve_settings};
use crate::{canonicalize_or_current, read_input, sha256_bytes, write_outputs, WrittenOutput};

/// Options for `extract`, mirroring the CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub file: String,
    pub ignore_validation: bool,
    pub output_dir: Option<String>,
    pub codecs: Vec<String>,
    pub config: Option<String>,
    pub report: Option<String>,
    pub json: bool,
}

/// Everything recorded about one extraction run (also the `--report` file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub tool_version: String,
    pub input_path: String,
    pub input_len: usize,
    pub input_sha256: String,
    pub ignore_validation: bool,
    pub codecs: Vec<String>,
    pub started_at: String,
    pub finished_at: String,
    pub outputs: Vec<WrittenOutput>,
    pub candidates: Vec<CandidateResult>,
    pub events: Vec<ExtractionEvent>,
}

/// Scan the input, extract every candidate that looks like a kernel, and
/// write the results.
///
/// Progress lines are printed as they happen unless `json` is set, in which
/// case only the final summary is printed.
pub fn extract_command(opts: &ExtractOptions) -> Result<RunSummary> {
    let settings = resolve_settings(
        opts.config.as_deref(),
        &opts.codecs,
        opts.ignore_validation,
        opts.output_dir.as_deref(),
        opts.report.as_deref(),
    )?;

    let input_path = canonicalize_or_current(&opts.file)?;
    let data = read_input(&input_path)?;
    let started_at = Utc::now().to_rfc3339();

    let extractor = KernelExtractor::new(&data, &settings.registry, settings.ignore_validation);
    let report = extractor.extract_all_with(|event| {
        if !opts.json {
            println!("{event}");
        }
    });

    let outputs = write_outputs(&report.files, settings.output_dir.as_deref())?;
    if !opts.json {
        if outputs.is_empty() {
            println!("No kernel image extracted");
        }
        for output in &outputs {
            println!("Wrote {} bytes to file: {}", output.len, output.path);
        }
    }

    let summary = RunSummary {
        tool_version: vmlinux_core::version().to_string(),
        input_path: input_path.display().to_string(),
        input_len: data.len(),
        input_sha256: sha256_bytes(&data),
        ignore_validation: settings.ignore_validation,
        codecs: settings.registry.identifiers().into_iter().map(String::from).collect(),
        started_at,
        finished_at: Utc::now().to_rfc3339(),
        outputs,
        candidates: report.candidates,
        events: report.events,
    };

    if let Some(path) = &settings.report {
        let body = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize run report")?;
        fs::write(path, body)
            .with_context(|| format!("Failed to write run report: {}", path.display()))?;
        if !opts.json {
            println!("Run report: {}", path.display());
        }
    }

    if opts.json {
        print_json(&summary)?;
    }

    Ok(summary)
}
