//! The huffman module implements the entropy stage: a minimum-redundancy
//! binary code over byte values, built bottom-up from observed frequencies.
//!
//! A packed stream is an 8-byte little-endian original length, the code tree
//! serialized pre-order (self-delimiting, no node count), zero-bit padding to
//! the next byte boundary, and the concatenated per-byte codes in input
//! order. Tree nodes live in an index-addressed arena rather than behind
//! owned child pointers, which keeps the build loop, the serializer and the
//! decoder all walking plain indices.

pub mod huffman;
