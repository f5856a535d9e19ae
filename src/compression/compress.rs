use log::{debug, info};

use super::{HEADER_LEN, MAGIC};
use crate::huffman_coding::huffman::huff_pack;
use crate::lookback::codec::lookback_compress;
use crate::tools::checksum::checksum;
use crate::tools::delta::delta_encode;

/// Compress `input` into a self-describing container. `delta_distance` of 0
/// disables the delta filter; `lookback` and `huffman` enable their stages.
/// With everything disabled this is the identity transform plus framing.
///
/// Compression cannot fail: every stage is total over arbitrary input, and
/// the stage flags are recorded in the header for the decompressor.
pub fn compress(input: &[u8], lookback: bool, huffman: bool, delta_distance: u8) -> Vec<u8> {
    let sum = checksum(input);

    let mut buf = input.to_vec();
    if delta_distance > 0 {
        delta_encode(&mut buf, delta_distance);
        debug!("delta filter applied at distance {}", delta_distance);
    }
    if lookback {
        buf = lookback_compress(&buf);
        debug!("lookback stage: {} -> {} bytes", input.len(), buf.len());
    }
    if huffman {
        let before = buf.len();
        buf = huff_pack(&buf);
        debug!("huffman stage: {} -> {} bytes", before, buf.len());
    }

    let mut out = Vec::with_capacity(HEADER_LEN + buf.len());
    out.extend_from_slice(&MAGIC);
    out.push(delta_distance);
    out.push(lookback as u8);
    out.push(huffman as u8);
    out.extend_from_slice(&sum.to_le_bytes());
    out.extend_from_slice(&buf);

    info!(
        "compressed {} bytes to {} ({:.1}%)",
        input.len(),
        out.len(),
        if input.is_empty() {
            100.0
        } else {
            out.len() as f64 * 100.0 / input.len() as f64
        }
    );
    out
}

#[cfg(test)]
mod test {
    use super::compress;
    use crate::compression::HEADER_LEN;

    #[test]
    fn identity_mode_is_framing_plus_input() {
        let input = b"identity payload";
        let out = compress(input, false, false, 0);
        assert_eq!(out.len(), HEADER_LEN + input.len());
        assert_eq!(&out[HEADER_LEN..], input);
    }

    #[test]
    fn header_records_flags() {
        let out = compress(b"abc", true, false, 3);
        assert_eq!(&out[..5], &[b'L', b'O', b'H', b'z', 0x01]);
        assert_eq!(out[5], 3); // delta distance
        assert_eq!(out[6], 1); // lookback
        assert_eq!(out[7], 0); // huffman
    }

    #[test]
    fn repetitive_input_shrinks() {
        let input = vec![0x41_u8; 300];
        let out = compress(&input, true, true, 0);
        assert!(out.len() < 64, "expected far fewer than 300 bytes, got {}", out.len());
    }
}
