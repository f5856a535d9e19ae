use log::{debug, error, info};

use super::{HEADER_LEN, MAGIC};
use crate::error::{LohError, Result};
use crate::huffman_coding::huffman::huff_unpack;
use crate::lookback::codec::lookback_decompress;
use crate::tools::checksum::checksum;
use crate::tools::delta::delta_decode;

/// Decompress a container produced by `compress`. The stored checksum is
/// always recomputed over the reconstructed bytes and verified; on any
/// failure the caller gets an error, never partial or corrupted data.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if input.len() < HEADER_LEN || input[..MAGIC.len()] != MAGIC {
        error!("not a lohz container");
        return Err(LohError::BadMagic);
    }

    let delta_distance = input[5];
    let lookback = input[6] != 0;
    let huffman = input[7] != 0;
    let stored = u32::from_le_bytes(input[8..12].try_into().unwrap());
    debug!(
        "container flags: delta={} lookback={} huffman={}",
        delta_distance, lookback, huffman
    );

    let mut buf = input[HEADER_LEN..].to_vec();
    if huffman {
        buf = huff_unpack(&buf)?;
    }
    if lookback {
        buf = lookback_decompress(&buf)?;
    }
    if delta_distance > 0 {
        delta_decode(&mut buf, delta_distance);
    }

    let computed = checksum(&buf);
    if computed != stored {
        error!(
            "checksum mismatch: stored {:#010x}, computed {:#010x}",
            stored, computed
        );
        return Err(LohError::Checksum { stored, computed });
    }

    info!("decompressed {} bytes to {}", input.len(), buf.len());
    Ok(buf)
}
