//! Reversible byte-distance delta filter.
//!
//! Replaces each byte with its wrapping difference from the byte `distance`
//! positions earlier. Helps lookback and huffman on data with periodic
//! structure (multi-channel samples, RGB/RGBA pixels) and is a no-op choice
//! for everything else. A distance of 0 disables the filter entirely.

/// Apply the delta filter in place. Runs back-to-front so every subtraction
/// still sees the original value of its reference byte.
pub fn delta_encode(data: &mut [u8], distance: u8) {
    if distance == 0 {
        return;
    }
    let distance = distance as usize;
    for i in (distance..data.len()).rev() {
        data[i] = data[i].wrapping_sub(data[i - distance]);
    }
}

/// Invert the delta filter in place. Runs front-to-back so every addition
/// sees the already-reconstructed reference byte.
pub fn delta_decode(data: &mut [u8], distance: u8) {
    if distance == 0 {
        return;
    }
    let distance = distance as usize;
    for i in distance..data.len() {
        data[i] = data[i].wrapping_add(data[i - distance]);
    }
}
