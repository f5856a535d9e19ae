//! A bounded LRU-style hash table for finding lookback matches.
//!
//! Each 16-bit hash of a 4-byte prefix maps to a ring of the 8 most recently
//! inserted positions sharing that hash. Collisions and identical prefixes
//! share eviction: inserting into a full ring overwrites the oldest slot.
//! The table is a plain value owned by one compression call.

/// Number of prefix bytes fed to the hash.
pub const PREFIX_LEN: usize = 4;
/// Matches below this length are never worth a back-reference token.
pub const MIN_MATCH_LEN: usize = 1;
/// Longest length the match-token encoding can carry (15 bits).
pub const MAX_MATCH_LEN: usize = 0x7FFF;
/// Largest distance the 5-byte bucket can carry.
pub const MAX_DISTANCE: u64 = 0x3_FFFF_FFFF;

// Hash output width in bits. Values much above 16 cost exponentially more
// memory for little gain.
const HASH_BITS: u32 = 16;
// log2 of the ring size per bucket. Larger rings find more matches but scan
// slower.
const BUCKET_SHL: u32 = 3;

const BUCKET_COUNT: usize = 1 << HASH_BITS;
const BUCKET_SLOTS: usize = 1 << BUCKET_SHL;
const SLOT_MASK: u8 = (BUCKET_SLOTS - 1) as u8;

/// Sentinel for a slot that has never been written. Distinct from every real
/// position, so position 0 is a first-class candidate.
const EMPTY: u64 = u64::MAX;

const HASH_SEED: u32 = 0xA68B_F1D7;
const HASH_MULT: u32 = 0x4706_DA51;

/// Tracks recent occurrence positions of 4-byte prefixes. Zeroed state is
/// "no matches known"; build one per compression call.
pub struct MatchTable {
    /// Candidate positions, `BUCKET_SLOTS` contiguous slots per bucket.
    slots: Vec<u64>,
    /// Per-bucket ring cursor pointing at the next slot to overwrite.
    cursors: Vec<u8>,
}

impl MatchTable {
    pub fn new() -> Self {
        Self {
            slots: vec![EMPTY; BUCKET_COUNT * BUCKET_SLOTS],
            cursors: vec![0; BUCKET_COUNT],
        }
    }

    fn hash(prefix: &[u8]) -> usize {
        let mut temp = HASH_SEED;
        for &byte in &prefix[..PREFIX_LEN] {
            temp = temp.wrapping_add(byte as u32).wrapping_mul(HASH_MULT);
        }
        temp ^= temp >> 16;
        (temp as usize) & (BUCKET_COUNT - 1)
    }

    /// Record `pos` as an occurrence of the 4-byte prefix starting there.
    /// Ignored near the end of the input where no full prefix remains.
    pub fn insert(&mut self, input: &[u8], pos: usize) {
        if pos + PREFIX_LEN >= input.len() {
            return;
        }
        let bucket = Self::hash(&input[pos..]);
        let base = bucket << BUCKET_SHL;
        self.slots[base + self.cursors[bucket] as usize] = pos as u64;
        self.cursors[bucket] = (self.cursors[bucket] + 1) & SLOT_MASK;
    }

    /// Find the longest match for the bytes at `pos` among the bucket's
    /// candidates, newest first. Only positions strictly before `pos` are
    /// considered; equal-length matches prefer the more recent position.
    /// Non-final passes may settle early for a short match; a final pass
    /// keeps scanning until the candidates are exhausted or the match is
    /// plainly good enough.
    fn find(&mut self, input: &[u8], pos: usize, final_pass: bool) -> Option<(u64, usize)> {
        if pos + PREFIX_LEN > input.len() {
            return None;
        }
        let bucket = Self::hash(&input[pos..]);
        let base = bucket << BUCKET_SHL;
        let remaining = input.len() - pos;

        let mut best: Option<u64> = None;
        let mut best_size = MIN_MATCH_LEN - 1;
        let mut best_slot = 0_usize;

        for j in 0..BUCKET_SLOTS as u8 {
            let slot = (self.cursors[bucket].wrapping_add(SLOT_MASK).wrapping_sub(j)
                & SLOT_MASK) as usize;
            let value = self.slots[base + slot];

            // Unwritten slots and forward references end the scan: everything
            // older in the ring is no better.
            if value >= pos as u64 {
                break;
            }
            let candidate = value as usize;

            // Cheap prefilter before the real comparison.
            if input[pos] != input[candidate] || input[pos + 1] != input[candidate + 1] {
                continue;
            }

            // Measure the match length, 16 bytes at a time, then byte-wise.
            const CHUNK: usize = 16;
            let mut size = 0;
            while size + CHUNK < remaining
                && input[pos + size..pos + size + CHUNK]
                    == input[candidate + size..candidate + size + CHUNK]
            {
                size += CHUNK;
            }
            while size < remaining && input[pos + size] == input[candidate + size] {
                size += 1;
            }

            let newer_tie = size == best_size && best.map_or(false, |b| value > b);
            if size > best_size || newer_tie {
                // The displaced entry was expensive to compare against and
                // still lost; evict it so later probes skip it.
                if best_size >= 64 {
                    self.slots[base + best_slot] = EMPTY;
                }
                best = Some(value);
                best_size = size;
                best_slot = slot;

                if best_size >= 256 {
                    break;
                }
                if !final_pass && best_size >= 8 {
                    break;
                }
            }
        }

        best.map(|value| (value, best_size))
    }

    /// Find a match at `pos` and return `(distance, length)` only if encoding
    /// it beats keeping the bytes literal. The overhead is the serialized
    /// distance width (1-5 bytes by magnitude) plus a length byte; the match
    /// must replace strictly more bytes than that. On a final pass the true
    /// full length is measured before the decision.
    pub fn find_economical(
        &mut self,
        input: &[u8],
        pos: usize,
        final_pass: bool,
    ) -> Option<(u64, usize)> {
        if pos >= input.len() || input.len() - pos <= MIN_MATCH_LEN {
            return None;
        }
        let remaining = (input.len() - pos).min(0x8000);

        let (found, mut size) = self.find(input, pos, final_pass)?;
        let dist = (pos as u64) - found;
        if dist > MAX_DISTANCE {
            return None;
        }

        if final_pass {
            // Early-terminated scans under-measure; emission decisions need
            // the true length.
            let candidate = found as usize;
            while size < remaining && input[pos + size] == input[candidate + size] {
                size += 1;
            }
        }
        size = size.min(MAX_MATCH_LEN);

        let overhead = distance_overhead(dist) + 1;
        if overhead < size {
            Some((dist, size))
        } else {
            None
        }
    }
}

impl Default for MatchTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized width in bytes of a distance, by magnitude bucket.
pub fn distance_overhead(dist: u64) -> usize {
    match dist {
        0..=0x3F => 1,
        0x40..=0x1FFF => 2,
        0x2000..=0xF_FFFF => 3,
        0x10_0000..=0x7F_FFFF => 4,
        _ => 5,
    }
}
