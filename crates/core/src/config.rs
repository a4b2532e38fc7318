use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codecs::{default_codec_registry, Codec, CodecRegistry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read extractor config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse extractor config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("Unsupported config format '{0}'. Allowed: json, yaml, yml")]
    UnsupportedFormat(String),
    #[error("Unknown codec '{name}'. Known codecs: {known}")]
    UnknownCodec { name: String, known: String },
}

/// Serializable settings for an extraction run.
///
/// Every field is optional in the file; command-line flags override what
/// the file says.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Keep every decoded candidate, even ones that fail the kernel heuristic.
    #[serde(default)]
    pub ignore_validation: bool,
    /// Restrict scanning to these codec identifiers (e.g. `["GZIP", "XZ"]`).
    /// Empty means every known codec.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codecs: Vec<String>,
    /// Directory for extracted images. Unset means the system temp dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Where to write the JSON run report, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

impl ExtractorConfig {
    /// Resolve the `codecs` allow-list into codec values.
    pub fn selected_codecs(&self) -> Result<Vec<Codec>, ConfigError> {
        if self.codecs.is_empty() {
            return Ok(Codec::ALL.to_vec());
        }
        self.codecs.iter().map(|name| parse_codec(name)).collect()
    }

    /// Default registry trimmed to the configured codecs.
    pub fn registry(&self) -> Result<CodecRegistry, ConfigError> {
        let selected = self.selected_codecs()?;
        let mut registry = default_codec_registry();
        registry.retain(&selected);
        Ok(registry)
    }
}

/// Parse a codec identifier, with an error listing the known ones.
pub fn parse_codec(name: &str) -> Result<Codec, ConfigError> {
    Codec::from_identifier(name).ok_or_else(|| ConfigError::UnknownCodec {
        name: name.to_string(),
        known: Codec::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", "),
    })
}

/// Load an extractor config from a `.json`, `.yaml` or `.yml` file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ExtractorConfig, ConfigError> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();
    if !matches!(ext.as_str(), "json" | "yaml" | "yml") {
        return Err(ConfigError::UnsupportedFormat(ext));
    }

    let body = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let parsed: Result<ExtractorConfig, String> = if ext == "json" {
        serde_json::from_str(&body).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&body).map_err(|e| e.to_string())
    };
    let config =
        parsed.map_err(|message| ConfigError::Parse { path: path.to_path_buf(), message })?;

    config.selected_codecs()?;
    Ok(config)
}
