use thiserror::Error;

/// Decompression failure taxonomy. Everything here is reachable from
/// malformed or corrupted input and must be reported, never panicked on.
/// Encoder-side invariant violations are not represented: a correct encoder
/// cannot produce them, so they abort instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LohError {
    #[error("not a lohz container (bad magic or unsupported version)")]
    BadMagic,
    #[error("input exhausted mid-field")]
    Truncated,
    #[error("back-reference outside decoded bounds (distance {distance}, produced {produced})")]
    BadBackref { distance: u64, produced: usize },
    #[error("invalid token tag byte {0:#04x}")]
    BadTag(u8),
    #[error("serialized huffman tree exceeds the byte-alphabet node bound")]
    BadHuffmanTree,
    #[error("stream declared {declared} bytes but produced {produced}")]
    LengthMismatch { declared: u64, produced: usize },
    #[error("payload carries data past the declared length")]
    TrailingData,
    #[error("checksum mismatch (stored {stored:#010x}, computed {computed:#010x})")]
    Checksum { stored: u32, computed: u32 },
}

pub type Result<T> = std::result::Result<T, LohError>;
