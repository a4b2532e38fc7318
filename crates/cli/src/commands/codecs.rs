use anyhow::Result;
use serde::Serialize;

use vmlinux_core::{default_codec_registry, CodecDescriptor};

use crate::commands::print_json;

#[derive(Debug, Serialize)]
pub struct CodecInfo {
    pub identifier: String,
    pub magic: String,
    pub suffix: String,
    pub decodable: bool,
}

impl From<&CodecDescriptor> for CodecInfo {
    fn from(descriptor: &CodecDescriptor) -> Self {
        Self {
            identifier: descriptor.identifier().to_string(),
            magic: hex_bytes(descriptor.magic),
            suffix: descriptor.suffix.to_string(),
            decodable: descriptor.is_decodable(),
        }
    }
}

/// Space-separated upper-case hex, e.g. `1F 8B 08`.
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

/// List the compression formats this build recognizes.
pub fn list_codecs_command(json: bool) -> Result<Vec<CodecInfo>> {
    let registry = default_codec_registry();
    let entries: Vec<CodecInfo> = registry.descriptors().iter().map(CodecInfo::from).collect();

    if json {
        print_json(&entries)?;
        return Ok(entries);
    }

    println!("Codecs:");
    for entry in &entries {
        let support = if entry.decodable { "extract" } else { "detect only" };
        println!("- {}: magic {} (.{}) [{}]", entry.identifier, entry.magic, entry.suffix, support);
    }

    Ok(entries)
}

/// Print the tool and library version.
pub fn version_command() -> Result<()> {
    println!("extract-vmlinux v{}", vmlinux_core::version());
    Ok(())
}
