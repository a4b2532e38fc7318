//! Exact byte-pattern search over an in-memory blob.
//!
//! Two entry points:
//! - [`find_all`]: one-off search, every occurrence (overlapping included).
//! - [`PatternIndex`]: built once per buffer, then answers many pattern
//!   queries without rescanning the whole buffer each time.
//!
//! Both return offsets in ascending order and an empty list when nothing
//! matches.

use memchr::memmem;

/// Number of distinct leading byte pairs.
const BIGRAM_BUCKETS: usize = 1 << 16;

/// Every offset at which `pattern` starts in `buffer`, ascending.
///
/// Overlapping occurrences are all reported (`"aa"` in `"aaaa"` is found
/// at 0, 1 and 2). An empty pattern matches nothing.
pub fn find_all(buffer: &[u8], pattern: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    if pattern.is_empty() || pattern.len() > buffer.len() {
        return offsets;
    }

    let finder = memmem::Finder::new(pattern);
    let mut start = 0;
    while let Some(hit) = finder.find(&buffer[start..]) {
        offsets.push(start + hit);
        start += hit + 1;
    }
    offsets
}

/// Positions of a buffer bucketed by their first two bytes.
///
/// Building is a single counting-sort pass, so positions inside a bucket are
/// already ascending. A query only has to verify the bucket of the
/// pattern's first two bytes.
#[derive(Debug, Clone)]
pub struct PatternIndex<'a> {
    data: &'a [u8],
    /// `bucket_starts[b]..bucket_starts[b + 1]` is the slice of `positions`
    /// whose bigram is `b`. Empty when the buffer is too large to index.
    bucket_starts: Vec<u32>,
    positions: Vec<u32>,
}

impl<'a> PatternIndex<'a> {
    /// Index `data`. Buffers whose offsets do not fit in `u32` are not
    /// indexed; queries then fall back to [`find_all`].
    pub fn build(data: &'a [u8]) -> Self {
        if data.len() < 2 || data.len() > u32::MAX as usize {
            return Self { data, bucket_starts: Vec::new(), positions: Vec::new() };
        }

        let bigram = |i: usize| ((data[i] as usize) << 8) | data[i + 1] as usize;
        let count = data.len() - 1;

        let mut bucket_starts = vec![0u32; BIGRAM_BUCKETS + 1];
        for i in 0..count {
            bucket_starts[bigram(i) + 1] += 1;
        }
        for b in 0..BIGRAM_BUCKETS {
            bucket_starts[b + 1] += bucket_starts[b];
        }

        let mut cursor: Vec<u32> = bucket_starts[..BIGRAM_BUCKETS].to_vec();
        let mut positions = vec![0u32; count];
        for i in 0..count {
            let slot = &mut cursor[bigram(i)];
            positions[*slot as usize] = i as u32;
            *slot += 1;
        }

        Self { data, bucket_starts, positions }
    }

    /// The buffer this index was built over.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn is_indexed(&self) -> bool {
        !self.bucket_starts.is_empty()
    }

    /// Every offset at which `pattern` starts, ascending. Same results as
    /// [`find_all`] on the indexed buffer.
    pub fn find_all(&self, pattern: &[u8]) -> Vec<usize> {
        match pattern.len() {
            0 => Vec::new(),
            1 => memchr::memchr_iter(pattern[0], self.data).collect(),
            _ if !self.is_indexed() => find_all(self.data, pattern),
            _ => {
                let b = ((pattern[0] as usize) << 8) | pattern[1] as usize;
                let bucket = &self.positions
                    [self.bucket_starts[b] as usize..self.bucket_starts[b + 1] as usize];
                bucket
                    .iter()
                    .map(|&p| p as usize)
                    .filter(|&p| self.data[p..].starts_with(pattern))
                    .collect()
            }
        }
    }
}
