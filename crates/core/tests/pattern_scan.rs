use vmlinux_core::scan::{find_all, PatternIndex};
use vmlinux_core::Codec;

fn inject(buffer: &mut [u8], offset: usize, pattern: &[u8]) {
    buffer[offset..offset + pattern.len()].copy_from_slice(pattern);
}

#[test]
fn no_pattern_yields_empty_list() {
    let data = vec![0u8; 50];
    assert!(find_all(&data, Codec::Gzip.magic()).is_empty());
    assert!(PatternIndex::build(&data).find_all(Codec::Gzip.magic()).is_empty());
}

#[test]
fn gzip_magic_found_at_both_offsets() {
    let mut data = vec![0u8; 50];
    inject(&mut data, 10, Codec::Gzip.magic());
    inject(&mut data, 30, Codec::Gzip.magic());

    assert_eq!(find_all(&data, Codec::Gzip.magic()), vec![10, 30]);
    assert_eq!(PatternIndex::build(&data).find_all(Codec::Gzip.magic()), vec![10, 30]);
}

#[test]
fn xz_magic_found_once() {
    let mut data = vec![0u8; 50];
    inject(&mut data, 10, Codec::Xz.magic());
    assert_eq!(PatternIndex::build(&data).find_all(Codec::Xz.magic()), vec![10]);
}

#[test]
fn magic_cut_off_by_end_of_buffer_is_not_reported() {
    // Only the first two XZ magic bytes fit in a 12-byte buffer at offset 10.
    let mut data = vec![0u8; 12];
    inject(&mut data, 10, &Codec::Xz.magic()[..2]);
    assert!(find_all(&data, Codec::Xz.magic()).is_empty());
    assert!(PatternIndex::build(&data).find_all(Codec::Xz.magic()).is_empty());
}

#[test]
fn every_codec_magic_found_at_offset_ten() {
    for codec in Codec::ALL {
        let mut data = vec![0u8; 50];
        inject(&mut data, 10, codec.magic());
        let index = PatternIndex::build(&data);
        assert_eq!(index.find_all(codec.magic()), vec![10], "{codec}");
    }
}

#[test]
fn lzma_magic_with_four_zero_bytes_still_matches_once() {
    let mut data = vec![0xffu8; 50];
    inject(&mut data, 10, &[0x5d, 0x00, 0x00, 0x00]);
    assert_eq!(find_all(&data, Codec::Lzma.magic()), vec![10]);
}

#[test]
fn overlapping_occurrences_are_all_reported() {
    let data = b"aaaa";
    assert_eq!(find_all(data, b"aa"), vec![0, 1, 2]);
    assert_eq!(PatternIndex::build(data).find_all(b"aa"), vec![0, 1, 2]);
    assert_eq!(PatternIndex::build(data).find_all(b"aaa"), vec![0, 1]);
}

#[test]
fn matches_at_buffer_edges() {
    let data = b"BZh....BZh";
    assert_eq!(find_all(data, b"BZh"), vec![0, 7]);
    assert_eq!(PatternIndex::build(data).find_all(b"BZh"), vec![0, 7]);
}

#[test]
fn single_byte_and_empty_patterns() {
    let data = b"xyxyx";
    let index = PatternIndex::build(data);
    assert_eq!(index.find_all(b"x"), vec![0, 2, 4]);
    assert!(index.find_all(b"").is_empty());
    assert!(find_all(data, b"").is_empty());
}

#[test]
fn tiny_buffers_are_handled() {
    assert!(PatternIndex::build(b"").find_all(b"ab").is_empty());
    assert_eq!(PatternIndex::build(b"a").find_all(b"a"), vec![0]);
    assert!(PatternIndex::build(b"a").find_all(b"ab").is_empty());
}

#[test]
fn index_agrees_with_direct_search_on_noisy_data() {
    // Deterministic pseudo-random bytes over a small alphabet so that
    // patterns repeat and overlap often.
    let mut state: u32 = 0x1234_5678;
    let data: Vec<u8> = (0..4096)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            b"abc"[(state >> 24) as usize % 3]
        })
        .collect();
    let index = PatternIndex::build(&data);
    for pattern in [&b"ab"[..], b"abc", b"aaa", b"cab", b"bcbc", b"c"] {
        let direct = find_all(&data, pattern);
        assert_eq!(index.find_all(pattern), direct, "pattern {:?}", pattern);
        assert!(direct.windows(2).all(|w| w[0] < w[1]));
    }
}
