//! Byte-frequency histogram feeding the huffman tree build.

use rayon::prelude::*;

/// Below this size, splitting the work costs more than it saves.
const PARALLEL_CUTOFF: usize = 64 * 1024;

/// Count how often each byte value occurs. Large inputs are tallied in
/// parallel chunks and the partial histograms summed.
pub fn freqs(data: &[u8]) -> [u64; 256] {
    if data.len() < PARALLEL_CUTOFF {
        return tally(data);
    }
    data.par_chunks(16 * 1024).map(tally).reduce(
        || [0_u64; 256],
        |mut acc, part| {
            for (a, p) in acc.iter_mut().zip(part.iter()) {
                *a += p;
            }
            acc
        },
    )
}

fn tally(chunk: &[u8]) -> [u64; 256] {
    let mut counts = [0_u64; 256];
    for &byte in chunk {
        counts[byte as usize] += 1;
    }
    counts
}
