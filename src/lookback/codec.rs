//! The lookback stream format and its greedy parser.
//!
//! A compressed stream is an 8-byte little-endian original length followed by
//! tokens. Bit 0 of a token's first byte picks the kind:
//!
//! - back-reference: a variable-width distance (the count of `1` tag bits in
//!   the low end of the first byte picks a 1-5 byte magnitude bucket, the
//!   remaining distance bits packed above the tag), then a length byte whose
//!   low bit flags a second, high-bits extension byte.
//! - literal run: 6 length bits above a flag bit (bit 1) that marks a second
//!   length byte, then the literal bytes verbatim.

use log::trace;

use crate::error::{LohError, Result};
use crate::lookback::match_table::MatchTable;

/// Literal run lengths carry at most 14 bits.
const MAX_LITERAL_LEN: usize = 0x3FFF;

/// Compress `input` into a lookback token stream.
pub fn lookback_compress(input: &[u8]) -> Vec<u8> {
    let mut table = MatchTable::new();
    let mut out = Vec::with_capacity(input.len() / 2 + 16);
    out.extend_from_slice(&(input.len() as u64).to_le_bytes());

    let mut matches = 0_usize;
    let mut i = 0;
    while i < input.len() {
        if let Some((dist, size)) = table.find_economical(input, i, true) {
            assert!(
                dist <= i as u64,
                "lookback: broken distance calculation ({} at {})",
                dist,
                i
            );
            matches += 1;
            push_distance(&mut out, dist);
            push_match_len(&mut out, size);
            // Every covered position joins the table so later matches can
            // reference inside this one.
            for _ in 0..size {
                table.insert(input, i);
                i += 1;
            }
            continue;
        }

        // No match here: grow a literal run, committing at least one byte so
        // the parser always makes progress, and stopping as soon as a
        // profitable match turns up.
        let start = i;
        let mut size = 0;
        while size < MAX_LITERAL_LEN && start + size < input.len() {
            if size > 0 && table.find_economical(input, start + size, false).is_some() {
                break;
            }
            table.insert(input, start + size);
            size += 1;
        }

        if size > 0x3F {
            out.push(((size << 2) | 2) as u8);
            out.push((size >> 6) as u8);
        } else {
            out.push((size << 2) as u8);
        }
        out.extend_from_slice(&input[start..start + size]);
        i = start + size;
    }

    trace!(
        "lookback: {} bytes -> {} bytes, {} matches",
        input.len(),
        out.len(),
        matches
    );
    out
}

/// Expand a lookback token stream. Decoding stops once the declared original
/// length has been produced; anything structurally wrong with the stream is a
/// reported error, never a panic.
pub fn lookback_decompress(input: &[u8]) -> Result<Vec<u8>> {
    if input.len() < 8 {
        return Err(LohError::Truncated);
    }
    let declared = u64::from_le_bytes(input[..8].try_into().unwrap());

    // The declared length is attacker-controlled; don't let it drive the
    // allocation on its own.
    let mut out = Vec::with_capacity((declared as usize).min(input.len().saturating_mul(4)));
    let mut i = 8;

    while (out.len() as u64) < declared {
        let dat = take(input, &mut i)?;

        if dat & 1 != 0 {
            let dist = pop_distance(dat, input, &mut i)?;
            if dist == 0 || dist > out.len() as u64 {
                return Err(LohError::BadBackref {
                    distance: dist,
                    produced: out.len(),
                });
            }

            let size_dat = take(input, &mut i)?;
            let mut size = (size_dat >> 1) as usize;
            if size_dat & 1 != 0 {
                size |= (take(input, &mut i)? as usize) << 7;
            }

            // Source and destination may overlap (distance < length copies
            // read bytes this same token wrote), so copy one byte at a time.
            for _ in 0..size {
                let byte = out[out.len() - dist as usize];
                out.push(byte);
            }
        } else {
            let mut size = (dat >> 2) as usize;
            if dat & 2 != 0 {
                size |= (take(input, &mut i)? as usize) << 6;
            }
            if i + size > input.len() {
                return Err(LohError::Truncated);
            }
            out.extend_from_slice(&input[i..i + size]);
            i += size;
        }
    }

    if out.len() as u64 != declared {
        return Err(LohError::LengthMismatch {
            declared,
            produced: out.len(),
        });
    }
    // The encoder consumes the stream exactly; leftover bytes mean the
    // stream (or an upstream length field) was damaged.
    if i != input.len() {
        return Err(LohError::TrailingData);
    }
    Ok(out)
}

fn take(input: &[u8], i: &mut usize) -> Result<u8> {
    let byte = *input.get(*i).ok_or(LohError::Truncated)?;
    *i += 1;
    Ok(byte)
}

/// Serialize a distance into its magnitude bucket. The tag is a run of `1`
/// bits (one per extra byte) in the low end of the first byte; the distance
/// bits are packed contiguously above it.
fn push_distance(out: &mut Vec<u8>, dist: u64) {
    if dist <= 0x3F {
        out.push((1 | (dist << 2)) as u8);
    } else if dist <= 0x1FFF {
        out.push((3 | (dist << 3)) as u8);
        out.push((dist >> 5) as u8);
    } else if dist <= 0xF_FFFF {
        out.push((7 | (dist << 4)) as u8);
        out.push((dist >> 4) as u8);
        out.push((dist >> 12) as u8);
    } else if dist <= 0x7F_FFFF {
        out.push((0xF | (dist << 5)) as u8);
        out.push((dist >> 3) as u8);
        out.push((dist >> 11) as u8);
        out.push((dist >> 19) as u8);
    } else if dist <= 0x3_FFFF_FFFF {
        out.push((0x1F | (dist << 6)) as u8);
        out.push((dist >> 2) as u8);
        out.push((dist >> 10) as u8);
        out.push((dist >> 18) as u8);
        out.push((dist >> 26) as u8);
    } else {
        // The match finder pre-filters distances; getting here is an encoder
        // logic defect, not bad input.
        panic!("lookback distance {} exceeds the largest bucket", dist);
    }
}

fn pop_distance(dat: u8, input: &[u8], i: &mut usize) -> Result<u64> {
    let dist = if dat & 2 == 0 {
        (dat >> 2) as u64
    } else if dat & 4 == 0 {
        (dat >> 3) as u64 | (take(input, i)? as u64) << 5
    } else if dat & 8 == 0 {
        (dat >> 4) as u64 | (take(input, i)? as u64) << 4 | (take(input, i)? as u64) << 12
    } else if dat & 0x10 == 0 {
        (dat >> 5) as u64
            | (take(input, i)? as u64) << 3
            | (take(input, i)? as u64) << 11
            | (take(input, i)? as u64) << 19
    } else if dat & 0x20 == 0 {
        (dat >> 6) as u64
            | (take(input, i)? as u64) << 2
            | (take(input, i)? as u64) << 10
            | (take(input, i)? as u64) << 18
            | (take(input, i)? as u64) << 26
    } else {
        return Err(LohError::BadTag(dat));
    };
    Ok(dist)
}

fn push_match_len(out: &mut Vec<u8>, size: usize) {
    if size > 0x7F {
        out.push((1 | (size << 1)) as u8);
        out.push((size >> 7) as u8);
    } else {
        out.push((size << 1) as u8);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(input: &[u8]) {
        let packed = lookback_compress(input);
        let unpacked = lookback_decompress(&packed).expect("well-formed stream");
        assert_eq!(unpacked, input);
    }

    #[test]
    fn empty_roundtrip() {
        let packed = lookback_compress(&[]);
        assert_eq!(packed.len(), 8);
        assert_eq!(lookback_decompress(&packed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn single_byte_roundtrip() {
        roundtrip(b"x");
    }

    #[test]
    fn text_roundtrip() {
        roundtrip(b"the quick brown fox jumps over the lazy dog; the quick brown fox again");
    }

    #[test]
    fn long_run_collapses() {
        let input = vec![0x41_u8; 300];
        let packed = lookback_compress(&input);
        // A short literal plus one long overlapping match, nowhere near the
        // raw 300 bytes.
        assert!(packed.len() < 32, "got {} bytes", packed.len());
        assert_eq!(lookback_decompress(&packed).unwrap(), input);
    }

    #[test]
    fn incompressible_roundtrip() {
        // A fixed pseudo-random buffer with no repeats worth coding.
        let mut state = 0x12345678_u32;
        let input: Vec<u8> = (0..1000)
            .map(|_| {
                state = state.wrapping_mul(1103515245).wrapping_add(12345);
                (state >> 16) as u8
            })
            .collect();
        roundtrip(&input);
    }

    #[test]
    fn periodic_roundtrip() {
        let input: Vec<u8> = (0..5000).map(|i| (i % 7) as u8).collect();
        roundtrip(&input);
    }

    #[test]
    fn run_longer_than_max_match_roundtrip() {
        // Forces multiple maximum-length match tokens back to back.
        roundtrip(&vec![0xAB_u8; 0x7FFF * 2 + 100]);
    }

    #[test]
    fn long_literal_roundtrip() {
        // All-distinct 2-byte pairs defeat matching past the 6-bit literal
        // length, forcing the two-byte literal header.
        let input: Vec<u8> = (0..=u8::MAX)
            .flat_map(|a| (0..=u8::MAX).map(move |b| [a, b]))
            .flatten()
            .take(20_000)
            .collect();
        roundtrip(&input);
    }

    #[test]
    fn distance_buckets_roundtrip() {
        for dist in [1_u64, 0x3F, 0x40, 0x1FFF, 0x2000, 0xF_FFFF, 0x10_0000] {
            let mut out = Vec::new();
            push_distance(&mut out, dist);
            let dat = out[0];
            let mut i = 1;
            assert_eq!(pop_distance(dat, &out, &mut i).unwrap(), dist);
            assert_eq!(i, out.len());
        }
    }

    #[test]
    fn truncated_stream_is_error() {
        let packed = lookback_compress(b"abcabcabcabcabcabc");
        for cut in 0..packed.len() {
            let result = lookback_decompress(&packed[..cut]);
            assert!(result.is_err(), "cut at {} should not decode", cut);
        }
    }

    #[test]
    fn backref_before_start_is_error() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&10_u64.to_le_bytes());
        // One literal byte, then a back-reference with distance 5.
        stream.push(1 << 2);
        stream.push(b'q');
        push_distance(&mut stream, 5);
        push_match_len(&mut stream, 4);
        assert_eq!(
            lookback_decompress(&stream),
            Err(LohError::BadBackref {
                distance: 5,
                produced: 1
            })
        );
    }

    #[test]
    fn all_tag_bits_set_is_error() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&4_u64.to_le_bytes());
        stream.push(0x3F); // lookback token with every tag bit set
        stream.extend_from_slice(&[0, 0, 0, 0, 0]);
        assert_eq!(lookback_decompress(&stream), Err(LohError::BadTag(0x3F)));
    }

    #[test]
    fn unconsumed_trailing_byte_is_error() {
        // An upstream corruption can hand the decoder a stream with an
        // extra byte past the last token; the decode must not quietly
        // ignore it.
        let mut packed = lookback_compress(b"plain text, nothing fancy");
        packed.push(0x00);
        assert_eq!(lookback_decompress(&packed), Err(LohError::TrailingData));
    }

    #[test]
    fn declared_length_overshoot_is_error() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&2_u64.to_le_bytes());
        stream.push(3 << 2); // literal of 3 bytes, one past the declared 2
        stream.extend_from_slice(b"abc");
        assert_eq!(
            lookback_decompress(&stream),
            Err(LohError::LengthMismatch {
                declared: 2,
                produced: 3
            })
        );
    }
}
