//! The compression module composes the transform stages into the container
//! format.
//!
//! Compression happens in the following steps:
//! - Checksum: a rolling checksum over the raw input, stored in the header
//!   and verified after decompression.
//! - Delta filter (optional): each byte becomes its difference from the byte
//!   a fixed distance earlier, which collapses periodic structure.
//! - Lookback (optional): repeated byte runs become (distance, length)
//!   back-references into already-emitted output.
//! - Huffman (optional): frequent byte values get shorter bit codes.
//!
//! Each stage consumes one buffer and produces the next; no stage knows the
//! others' internals. Decompression reverses the enabled stages in the
//! opposite order (huffman, lookback, delta) and refuses to return data whose
//! checksum does not match.

pub mod compress;
pub mod decompress;

/// Container magic: format tag plus a version byte. The version pins the
/// exact wire encodings of every stage; nothing about the format is ever
/// inferred from payload content.
pub(crate) const MAGIC: [u8; 5] = [b'L', b'O', b'H', b'z', 0x01];

/// Magic, three stage flags, and a 4-byte checksum.
pub(crate) const HEADER_LEN: usize = 12;
