//! The tools module provides the small helpers shared by the transform
//! stages and the pipeline.
//!
//! The tools are:
//! - cli: Command line interface for the lohz binary.
//! - checksum: Rolling content checksum stored in the container header.
//! - delta: Reversible byte-distance delta filter.
//! - freq_count: Byte-frequency histogram feeding the huffman stage.

pub mod checksum;
pub mod cli;
pub mod delta;
pub mod freq_count;
