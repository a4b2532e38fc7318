use std::collections::HashSet;

use vmlinux_core::codecs::DecoderFault;
use vmlinux_core::{default_codec_registry, Codec, CodecDescriptor, CodecRegistry};

fn noop_decoder(_input: &[u8], _output: &mut Vec<u8>) -> Result<(), DecoderFault> {
    Ok(())
}

#[test]
fn default_registry_has_every_required_signature() {
    let registry = default_codec_registry();
    let expected: [(&str, &[u8]); 7] = [
        ("GZIP", &[0x1f, 0x8b, 0x08]),
        ("BZIP2", b"BZh"),
        ("LZMA", &[0x5d, 0x00, 0x00]),
        ("LZOP", &[0x89, 0x4c, 0x5a]),
        ("LZ4", &[0x02, 0x21, 0x4c, 0x18]),
        ("XZ", &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]),
        ("ZSTD", &[0x28, 0xb5, 0x2f, 0xfd]),
    ];
    for (name, magic) in expected {
        let descriptor = registry.get_by_identifier(name).unwrap_or_else(|| panic!("{name}"));
        assert_eq!(descriptor.magic, magic, "magic for {name}");
    }
}

#[test]
fn identifiers_are_unique_and_patterns_non_empty() {
    let registry = default_codec_registry();
    let ids: HashSet<&str> = registry.identifiers().into_iter().collect();
    assert_eq!(ids.len(), registry.len());
    assert!(registry.descriptors().iter().all(|d| !d.magic.is_empty()));
}

#[test]
fn lzop_is_recognized_but_not_decodable() {
    let registry = default_codec_registry();
    let lzop = registry.get(Codec::Lzop).expect("lzop registered");
    assert!(!lzop.is_decodable());
    for codec in [Codec::Gzip, Codec::Bzip2, Codec::Lzma, Codec::Lz4, Codec::Xz, Codec::Zstd] {
        assert!(registry.get(codec).unwrap().is_decodable(), "{codec} should decode");
    }
}

#[test]
fn register_replaces_existing_codec_entry() {
    let mut registry = CodecRegistry::new();
    registry.register(CodecDescriptor::new(Codec::Gzip));
    registry.register(CodecDescriptor::recognized_only(Codec::Gzip));
    assert_eq!(registry.len(), 1);
    assert!(!registry.get(Codec::Gzip).unwrap().is_decodable());

    registry.register(CodecDescriptor::recognized_only(Codec::Lzop).with_decoder(noop_decoder));
    assert!(registry.get(Codec::Lzop).unwrap().is_decodable());
    assert_eq!(registry.identifiers(), vec!["GZIP", "LZOP"]);
}

#[test]
fn retain_keeps_registry_order() {
    let mut registry = default_codec_registry();
    registry.retain(&[Codec::Zstd, Codec::Gzip]);
    assert_eq!(registry.identifiers(), vec!["GZIP", "ZSTD"]);
}

#[test]
fn identifiers_parse_case_insensitively() {
    assert_eq!(Codec::from_identifier("gzip"), Some(Codec::Gzip));
    assert_eq!(Codec::from_identifier(" Xz "), Some(Codec::Xz));
    assert_eq!(Codec::from_identifier("BZIP"), Some(Codec::Bzip2));
    assert_eq!(Codec::from_identifier("rar"), None);
}
