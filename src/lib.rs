//! Lossless byte compression in the LOH container format.
//!
//! Provides safe compression and decompression of byte buffers through up
//! to three stages: a delta filter for structured numeric data, a lookback
//! stage that replaces repeated data with short backreferences, and a
//! huffman entropy coder. Each stage can be switched off independently, so
//! the format also serves as a checksummed passthrough container.
//!
//! Every container carries a checksum of the original bytes which is
//! verified on decompression. Corrupt input surfaces as [`LohError`],
//! never as silently wrong output.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> lohz -z test.txt`
//!
//! This will compress the file and create the file test.txt.loh. The
//! original file is kept.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod lookback;
pub mod tools;

pub use compression::compress::compress;
pub use compression::decompress::decompress;
pub use error::{LohError, Result};
