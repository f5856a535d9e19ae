//! Rolling content checksum for the container header.
//!
//! An order-dependent multiply-add accumulator: position matters because each
//! byte folded in is scaled by a further power of the multiplier. Both sides
//! of the pipeline must use this exact fold, so it lives in one place.

const SEED: u32 = 0x8765_4321;
const MULT: u32 = 0x1011_B0D5;

/// Checksum the whole input. Computed over the raw bytes before any transform
/// stage runs, and again over the fully reconstructed bytes on decompression.
pub fn checksum(data: &[u8]) -> u32 {
    data.iter().fold(SEED, |sum, &byte| {
        sum.wrapping_add(byte as u32).wrapping_mul(MULT)
    })
}

#[cfg(test)]
mod test {
    use super::checksum;

    #[test]
    fn empty_is_seed() {
        assert_eq!(checksum(&[]), 0x8765_4321);
    }

    #[test]
    fn single_byte() {
        let expected = 0x8765_4321_u32.wrapping_add(0x41).wrapping_mul(0x1011_B0D5);
        assert_eq!(checksum(b"A"), expected);
    }

    #[test]
    fn order_dependent() {
        assert_ne!(checksum(b"ab"), checksum(b"ba"));
    }

    #[test]
    fn single_bit_sensitivity() {
        let base = b"hello world".to_vec();
        let reference = checksum(&base);
        for i in 0..base.len() {
            let mut corrupt = base.clone();
            corrupt[i] ^= 1;
            assert_ne!(checksum(&corrupt), reference);
        }
    }
}
