/// Writes a bitstream into an owned byte buffer. Bits go into each byte least
/// significant first; bytes are appended as bits spill over, so the buffer is
/// always exactly large enough for the bits written so far.
pub struct BitWriter {
    /// Output buffer. The last byte is partially filled while `bit_index` < 8.
    output: Vec<u8>,
    /// Count of valid bits in the last byte of the output buffer (1-8).
    bit_index: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            // Forces the first push to open a fresh byte.
            bit_index: 8,
        }
    }

    /// Append a single bit. Any nonzero `bit` counts as 1.
    pub fn push_bit(&mut self, bit: u8) {
        if self.bit_index == 8 {
            self.output.push(0);
            self.bit_index = 0;
        }
        if bit != 0 {
            let last = self.output.last_mut().unwrap();
            *last |= 1 << self.bit_index;
        }
        self.bit_index += 1;
    }

    /// Append the low `width` bits of `data`, lowest significance first.
    /// `width` may be 0-64.
    pub fn push_bits(&mut self, mut data: u64, mut width: u8) {
        debug_assert!(width <= 64);
        // Fill out the current partial byte first.
        while width > 0 && self.bit_index != 8 {
            self.push_bit((data & 1) as u8);
            data >>= 1;
            width -= 1;
        }
        // Then move whole bytes at a time.
        while width >= 8 {
            self.output.push((data & 0xFF) as u8);
            data >>= 8;
            width -= 8;
        }
        while width > 0 {
            self.push_bit((data & 1) as u8);
            data >>= 1;
            width -= 1;
        }
    }

    /// Pad the current byte with zero bits so the next push starts on a byte
    /// boundary. A no-op when already aligned.
    pub fn align(&mut self) {
        self.bit_index = 8;
    }

    /// Total number of bits written.
    pub fn bit_count(&self) -> usize {
        if self.output.is_empty() {
            0
        } else {
            (self.output.len() - 1) * 8 + self.bit_index as usize
        }
    }

    /// Consume the writer and take the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
