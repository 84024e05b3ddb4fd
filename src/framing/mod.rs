//! Frame geometry helpers.

/// Shrink-and-paste zoom-out framing.
pub mod shrink;
