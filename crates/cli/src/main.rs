use anyhow::Result;
use clap::{Parser, Subcommand};

use extract_vmlinux::commands::{
    extract_command, list_codecs_command, list_headers_command, version_command, ExtractOptions,
};

/// Locate, decompress and validate Linux kernel images hidden in firmware blobs.
///
/// This CLI is a thin wrapper around `vmlinux-core` (exposed in code as
/// `vmlinux_core`). It only parses arguments, reads the input and writes
/// the outputs.
#[derive(Parser, Debug)]
#[command(
    name = "extract-vmlinux",
    version,
    about = "A more robust vmlinux extractor",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a blob and extract every compressed stream that decodes to a kernel.
    ///
    /// Each accepted image is written as `vmlinux_<CODEC>_<offset>.bin`,
    /// either into `--output-dir` or as a temp file.
    Extract {
        /// Kernel or firmware image to scan.
        #[arg(short = 'f', long)]
        file: String,

        /// Keep decoded output even if it doesn't look like a kernel.
        #[arg(short = 'i', long = "ignore", default_value_t = false)]
        ignore_validation: bool,

        /// Directory for extracted images. Defaults to the system temp dir.
        #[arg(short = 'o', long)]
        output_dir: Option<String>,

        /// Only consider these codecs (repeatable, e.g. `--codec gzip --codec xz`).
        #[arg(long = "codec")]
        codecs: Vec<String>,

        /// Extractor config file (.json, .yaml or .yml).
        #[arg(long)]
        config: Option<String>,

        /// Write a JSON run report to this path.
        #[arg(long)]
        report: Option<String>,

        /// Emit the run summary as JSON instead of progress lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the offsets of every known compression header without extracting.
    ListHeaders {
        /// Kernel or firmware image to scan.
        #[arg(short = 'f', long)]
        file: String,

        /// Only consider these codecs (repeatable).
        #[arg(long = "codec")]
        codecs: Vec<String>,

        /// Extractor config file (.json, .yaml or .yml).
        #[arg(long)]
        config: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the compression formats this build recognizes.
    ListCodecs {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            file,
            ignore_validation,
            output_dir,
            codecs,
            config,
            report,
            json,
        } => {
            let opts = ExtractOptions {
                file,
                ignore_validation,
                output_dir,
                codecs,
                config,
                report,
                json,
            };
            extract_command(&opts)?;
        }
        Command::ListHeaders { file, codecs, config, json } => {
            list_headers_command(&file, &codecs, config.as_deref(), json)?;
        }
        Command::ListCodecs { json } => {
            list_codecs_command(json)?;
        }
        Command::Version => version_command()?,
    }

    Ok(())
}
