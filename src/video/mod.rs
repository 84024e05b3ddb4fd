//! Frame-sequence video assembly.

/// One-shot writer for a complete frame list.
pub mod batch;
/// Incremental writer for frames produced over several calls.
pub mod continuous;
