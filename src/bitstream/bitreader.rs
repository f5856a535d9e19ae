//! BitReader: the read-side cursor over a packed bitstream.
//!
//! Reads bits in the same least-significant-first order that `BitWriter`
//! packs them. The reader borrows its input and never copies it; running off
//! the end of the buffer yields `None`, which callers surface as a
//! malformed-stream error.

/// Reads a packed bitstream from a borrowed byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_index: usize,
    bit_index: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_index: 0,
            bit_index: 0,
        }
    }

    /// Return the next bit (0 or 1), or None if the input is exhausted.
    pub fn bit(&mut self) -> Option<u8> {
        if self.bit_index == 8 {
            self.byte_index += 1;
            self.bit_index = 0;
        }
        let byte = *self.data.get(self.byte_index)?;
        let bit = (byte >> self.bit_index) & 1;
        self.bit_index += 1;
        Some(bit)
    }

    /// Return the next `width` (0-64) bits, lowest significance first, or
    /// None if the input runs out before `width` bits are read.
    pub fn bits(&mut self, width: u8) -> Option<u64> {
        debug_assert!(width <= 64);
        let mut result = 0_u64;
        for n in 0..width {
            result |= (self.bit()? as u64) << n;
        }
        Some(result)
    }

    /// Consume any remaining bits of the current byte so the next read starts
    /// on a byte boundary, and return them (low bit first). Matches
    /// `BitWriter::align`, which pads with zeros; a caller that wants strict
    /// framing can reject nonzero padding.
    pub fn align(&mut self) -> u64 {
        let mut skipped = 0_u64;
        let mut n = 0;
        while self.bit_index > 0 && self.bit_index < 8 {
            match self.bit() {
                Some(bit) => {
                    skipped |= (bit as u64) << n;
                    n += 1;
                }
                None => break,
            }
        }
        skipped
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn bits_come_back_low_first() {
        let data = [0b1000_0001_u8];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bit(), Some(1));
        for _ in 0..6 {
            assert_eq!(br.bit(), Some(0));
        }
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn multi_bit_read() {
        let data = [0b0001_1011_u8];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bits(5), Some(0b11011));
        assert_eq!(br.bits(3), Some(0));
    }

    #[test]
    fn read_crossing_byte_boundary() {
        let data = [0xFF, 0x01];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bits(4), Some(0xF));
        assert_eq!(br.bits(8), Some(0x1F));
        assert_eq!(br.bits(4), Some(0));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn exhaustion_mid_field_is_none() {
        let data = [0xAA];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bits(16), None);
    }

    #[test]
    fn align_skips_to_next_byte() {
        let data = [0b0000_0001, 0b0000_0010];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.align(), 0);
        assert_eq!(br.bits(8), Some(0b0000_0010));
    }

    #[test]
    fn align_returns_skipped_padding() {
        let data = [0b0000_0110];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.align(), 0b011);
    }

    #[test]
    fn align_on_boundary_is_noop() {
        let data = [0x03, 0x04];
        let mut br = BitReader::new(&data);
        assert_eq!(br.bits(8), Some(0x03));
        assert_eq!(br.align(), 0);
        assert_eq!(br.bits(8), Some(0x04));
    }

    #[test]
    fn writer_reader_roundtrip() {
        let mut bw = crate::bitstream::bitwriter::BitWriter::new();
        bw.push_bits(1234, 11);
        bw.push_bit(1);
        bw.align();
        bw.push_bits(0xDEADBEEF, 32);
        let bytes = bw.into_bytes();

        let mut br = BitReader::new(&bytes);
        assert_eq!(br.bits(11), Some(1234));
        assert_eq!(br.bit(), Some(1));
        br.align();
        assert_eq!(br.bits(32), Some(0xDEADBEEF));
    }
}
