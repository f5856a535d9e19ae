//! The lookback module implements the dictionary stage: an LZ-style scheme
//! that replaces repeated byte runs with (distance, length) back-references
//! into the already-emitted output.
//!
//! Match candidates come from a bounded hash table over 4-byte prefixes
//! (`match_table`); the stream format and the greedy literal/back-reference
//! parser live in `codec`. The table is owned by each compression call, so
//! independent compressions never share state.

pub mod codec;
pub mod match_table;
