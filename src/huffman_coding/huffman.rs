use log::trace;

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{LohError, Result};
use crate::tools::freq_count::freqs;

/// Hard ceiling on arena size: 256 leaves plus 255 internal nodes. A correct
/// build can never exceed it, and a serialized tree that would is malformed.
const MAX_NODES: usize = 511;

/// One arena slot: a leaf carries a symbol, an internal node two child
/// indices. `children` is None for leaves.
#[derive(Debug, Clone)]
struct Node {
    freq: u64,
    symbol: u8,
    children: Option<(u16, u16)>,
}

/// A huffman code for a symbol from an N-byte input never exceeds log2(N)
/// bits, so a u64 code word covers any input addressable in 64 bits.
#[derive(Debug, Clone, Copy, Default)]
struct Code {
    bits: u64,
    len: u8,
}

/// Build the code tree from 256 frequency buckets. Returns the arena and the
/// root index. Zero-frequency symbols get no leaf; an input with no symbols
/// at all keeps one placeholder leaf so the degenerate tree still serializes.
fn build_tree(counts: &[u64]) -> (Vec<Node>, usize) {
    debug_assert_eq!(counts.len(), 256);

    // Sort symbols by descending frequency (ties toward the higher symbol),
    // then drop the zero-frequency tail.
    let mut by_freq: Vec<u8> = (0..=255).collect();
    by_freq.sort_unstable_by(|&a, &b| {
        (counts[b as usize], b).cmp(&(counts[a as usize], a))
    });
    let mut live = by_freq
        .iter()
        .filter(|&&sym| counts[sym as usize] > 0)
        .count();
    if live == 0 {
        live = 1;
    }

    let mut arena: Vec<Node> = by_freq[..live]
        .iter()
        .map(|&sym| Node {
            freq: counts[sym as usize],
            symbol: sym,
            children: None,
        })
        .collect();

    // Worklist of arena indices, highest frequency first. The two lowest
    // nodes come off the tail; the merged node is reinserted in sorted
    // position, ahead of any equal-frequency nodes so it merges later.
    let mut worklist: Vec<usize> = (0..arena.len()).collect();
    while worklist.len() > 1 {
        let lowest = worklist.pop().unwrap();
        let next_lowest = worklist.pop().unwrap();

        let merged = Node {
            freq: arena[lowest].freq + arena[next_lowest].freq,
            symbol: 0,
            children: Some((lowest as u16, next_lowest as u16)),
        };
        arena.push(merged);
        assert!(arena.len() <= MAX_NODES, "huffman worklist overflow");

        worklist.push(arena.len() - 1);
        let mut pos = worklist.len() - 1;
        while pos > 0 && arena[worklist[pos - 1]].freq <= arena[worklist[pos]].freq {
            worklist.swap(pos - 1, pos);
            pos -= 1;
        }
    }

    let root = worklist[0];
    (arena, root)
}

/// Assign prefix-free codes by depth-first walk: left edge 0, right edge 1,
/// with the root-level bit at the lowest significance so `BitWriter` emits it
/// first. A single-leaf tree yields the zero-length code.
fn assign_codes(arena: &[Node], root: usize) -> [Code; 256] {
    let mut codes = [Code::default(); 256];
    let mut stack = vec![(root, 0_u64, 0_u8)];
    while let Some((idx, bits, len)) = stack.pop() {
        match arena[idx].children {
            Some((left, right)) => {
                stack.push((left as usize, bits, len + 1));
                stack.push((right as usize, bits | 1 << len, len + 1));
            }
            None => {
                codes[arena[idx].symbol as usize] = Code { bits, len };
            }
        }
    }
    codes
}

/// Serialize the tree pre-order: `1` then both subtrees for an internal
/// node, `0` then the 8-bit symbol for a leaf.
fn push_tree(bw: &mut BitWriter, arena: &[Node], idx: usize) {
    match arena[idx].children {
        Some((left, right)) => {
            bw.push_bit(1);
            push_tree(bw, arena, left as usize);
            push_tree(bw, arena, right as usize);
        }
        None => {
            bw.push_bit(0);
            bw.push_bits(arena[idx].symbol as u64, 8);
        }
    }
}

/// Rebuild the arena from the pre-order grammar. The node cap bounds both
/// the arena and the recursion depth, so an adversarial stream cannot blow
/// either up.
fn pop_tree(br: &mut BitReader<'_>, arena: &mut Vec<Node>) -> Result<usize> {
    if arena.len() >= MAX_NODES {
        return Err(LohError::BadHuffmanTree);
    }
    if br.bit().ok_or(LohError::Truncated)? == 1 {
        let idx = arena.len();
        arena.push(Node {
            freq: 0,
            symbol: 0,
            children: Some((0, 0)),
        });
        let left = pop_tree(br, arena)? as u16;
        let right = pop_tree(br, arena)? as u16;
        arena[idx].children = Some((left, right));
        Ok(idx)
    } else {
        let symbol = br.bits(8).ok_or(LohError::Truncated)? as u8;
        arena.push(Node {
            freq: 0,
            symbol,
            children: None,
        });
        Ok(arena.len() - 1)
    }
}

/// Entropy-code `input` into a packed huffman stream.
pub fn huff_pack(input: &[u8]) -> Vec<u8> {
    let counts = freqs(input);
    let (arena, root) = build_tree(&counts);
    let codes = assign_codes(&arena, root);
    trace!(
        "huffman: {} distinct symbols over {} bytes",
        arena.iter().filter(|n| n.children.is_none()).count(),
        input.len()
    );

    let mut bw = BitWriter::new();
    bw.push_bits(input.len() as u64, 64);
    push_tree(&mut bw, &arena, root);
    // Codes start on a byte boundary.
    bw.align();

    for &byte in input {
        let code = codes[byte as usize];
        bw.push_bits(code.bits, code.len);
    }
    bw.into_bytes()
}

/// Decode a packed huffman stream back into the original bytes.
pub fn huff_unpack(input: &[u8]) -> Result<Vec<u8>> {
    let mut br = BitReader::new(input);
    let declared = br.bits(64).ok_or(LohError::Truncated)?;

    let mut arena = Vec::new();
    let root = pop_tree(&mut br, &mut arena)?;
    // The packer always pads the tree with zero bits, so any set bit here
    // means the stream was damaged.
    if br.align() != 0 {
        return Err(LohError::TrailingData);
    }

    // The declared length is attacker-controlled; don't let it drive the
    // allocation on its own.
    let mut out = Vec::with_capacity((declared as usize).min(input.len().saturating_mul(16)));

    if arena[root].children.is_none() {
        // Degenerate single-leaf tree: codes are zero bits wide, the count
        // alone carries the content.
        out.resize(declared as usize, arena[root].symbol);
    } else {
        // Every symbol costs at least one bit, so a declared length past the
        // remaining bit count can never be satisfied.
        if declared > (input.len() as u64).saturating_mul(8) {
            return Err(LohError::Truncated);
        }
        while (out.len() as u64) < declared {
            let mut idx = root;
            loop {
                let bit = br.bit().ok_or(LohError::Truncated)?;
                let (left, right) = arena[idx].children.unwrap();
                idx = if bit == 0 { left as usize } else { right as usize };
                if arena[idx].children.is_none() {
                    out.push(arena[idx].symbol);
                    break;
                }
            }
        }
    }

    // Only zero padding may follow the coded body.
    while let Some(bit) = br.bit() {
        if bit != 0 {
            return Err(LohError::TrailingData);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(input: &[u8]) {
        let packed = huff_pack(input);
        assert_eq!(huff_unpack(&packed).expect("well-formed stream"), input);
    }

    #[test]
    fn empty_roundtrip() {
        roundtrip(&[]);
    }

    #[test]
    fn single_byte_roundtrip() {
        roundtrip(b"z");
    }

    #[test]
    fn single_distinct_symbol_roundtrip() {
        // Degenerate tree: one leaf, zero-length codes.
        roundtrip(&[0x41_u8; 300]);
    }

    #[test]
    fn text_roundtrip() {
        roundtrip(b"it was the best of times, it was the worst of times");
    }

    #[test]
    fn all_symbols_roundtrip() {
        let input: Vec<u8> = (0..=255_u8).cycle().take(4096).collect();
        roundtrip(&input);
    }

    #[test]
    fn skewed_input_shrinks() {
        // 'e' dominates, so the coded body must beat 8 bits per byte by a
        // wide margin even after paying for the tree.
        let mut input = vec![b'e'; 10_000];
        input.extend_from_slice(b"qxzjvkw");
        let packed = huff_pack(&input);
        assert!(packed.len() < input.len() / 4);
        assert_eq!(huff_unpack(&packed).unwrap(), input);
    }

    #[test]
    fn frequent_symbols_get_shorter_codes() {
        let mut counts = vec![0_u64; 256];
        counts[b'a' as usize] = 1000;
        counts[b'b' as usize] = 10;
        counts[b'c' as usize] = 1;
        let (arena, root) = build_tree(&counts);
        let codes = assign_codes(&arena, root);
        assert!(codes[b'a' as usize].len < codes[b'c' as usize].len);
        assert_eq!(codes[b'a' as usize].len, 1);
    }

    #[test]
    fn codes_are_prefix_free() {
        let input = b"abracadabra alakazam";
        let counts = freqs(input);
        let (arena, root) = build_tree(&counts);
        let codes = assign_codes(&arena, root);
        let mut used: Vec<(u8, Code)> = input.iter().map(|&b| (b, codes[b as usize])).collect();
        used.sort_unstable_by_key(|(sym, _)| *sym);
        used.dedup_by_key(|(sym, _)| *sym);
        for &(_, a) in &used {
            assert!(a.len > 0);
            for &(_, b) in &used {
                if a.len < b.len {
                    let mask = (1_u64 << a.len) - 1;
                    assert_ne!(
                        a.bits,
                        b.bits & mask,
                        "{:b}/{} prefixes {:b}/{}",
                        a.bits,
                        a.len,
                        b.bits,
                        b.len
                    );
                }
            }
        }
    }

    #[test]
    fn truncated_stream_is_error() {
        let packed = huff_pack(b"some reasonably ordinary input text");
        assert!(huff_unpack(&packed[..4]).is_err());
        assert!(huff_unpack(&packed[..packed.len() - 1]).is_err());
    }

    #[test]
    fn oversized_tree_is_error() {
        // 64-bit length header, then an endless run of `1` (internal node)
        // bits: the preorder grammar would need more nodes than any byte
        // alphabet permits.
        let mut stream = vec![0_u8; 8];
        stream.extend_from_slice(&[0xFF; 200]);
        assert_eq!(huff_unpack(&stream), Err(LohError::BadHuffmanTree));
    }
}
