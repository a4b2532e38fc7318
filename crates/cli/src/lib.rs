use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod commands;

/// Canonicalize a path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(path: &str) -> Result<PathBuf> {
    let path = Path::new(path);
    match path.canonicalize() {
        Ok(p) => Ok(p),
        Err(_) if path.is_absolute() => Ok(path.to_path_buf()),
        Err(_) => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            Ok(cwd.join(path))
        }
    }
}

/// Read the whole input image into memory.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read input image at {}", path.display()))
}

/// SHA-256 of a byte slice as a lowercase hex string.
pub fn sha256_bytes(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("{:x}", digest)
}

/// One extracted image as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenOutput {
    pub name: String,
    pub path: String,
    pub len: usize,
    pub sha256: String,
}

/// Write every accepted image.
///
/// With an output dir each image lands at `<dir>/<name>`. Without one it
/// becomes a uniquely suffixed temp file whose name starts with `<name>`, so
/// repeated runs never clobber each other.
pub fn write_outputs(
    files: &BTreeMap<String, Vec<u8>>,
    output_dir: Option<&Path>,
) -> Result<Vec<WrittenOutput>> {
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output dir: {}", dir.display()))?;
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, data) in files {
        let path = match output_dir {
            Some(dir) => {
                let path = dir.join(name);
                fs::write(&path, data)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                path
            }
            None => {
                let mut file = tempfile::Builder::new()
                    .prefix(name.as_str())
                    .tempfile()
                    .with_context(|| format!("Failed to create temp file for {name}"))?;
                file.write_all(data)
                    .with_context(|| format!("Failed to write temp file for {name}"))?;
                let (_file, path) =
                    file.keep().with_context(|| format!("Failed to keep temp file for {name}"))?;
                path
            }
        };

        written.push(WrittenOutput {
            name: name.clone(),
            path: path.display().to_string(),
            len: data.len(),
            sha256: sha256_bytes(data),
        });
    }
    Ok(written)
}
