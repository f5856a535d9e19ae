//! The bitstream module provides the bit-level buffer primitives shared by the
//! transform stages.
//!
//! Bits are packed least-significant-first within each byte: the first bit
//! written lands in bit 0 of the first byte, and the reader hands bits back in
//! the same order. Writing and reading are handled by two separate cursor
//! types, so a stage can never interleave the two directions over one buffer.

pub mod bitreader;
pub mod bitwriter;
