//! Zoomreel turns still frames from a generative image pipeline into zoom videos.
//!
//! Two pieces:
//!
//! - **Framing**: [`shrink_and_paste_on_blank`] shrinks a frame and re-centres it on a
//!   near-transparent canvas of the original size, leaving a blank margin to be filled in by the
//!   next generation step.
//! - **Assembly**: [`write_video`] encodes a complete frame list, and [`ContinuousVideoWriter`]
//!   encodes frames as they are produced. Both pad the sequence with repeated first/last frames
//!   and stream into a [`FrameSink`]; the default sink pipes raw RGBA into the system `ffmpeg`.
//!
//! The key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No silent loss**: clamped geometry and dropped frames are reported and logged via
//!   `tracing`.
//! - **Straight RGBA8** in, as produced by the `image` crate.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Encoding sinks.
pub mod encode;
/// Frame geometry helpers.
pub mod framing;
/// Frame-sequence video assembly.
pub mod video;

pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{ZoomreelError, ZoomreelResult};

pub use crate::encode::ffmpeg::{
    AlphaMode, FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::framing::shrink::{
    BLANK_ALPHA, MAX_RESAMPLE_EDGE, MIN_RESAMPLE_EDGE, Resample, ShrinkOpts, ShrinkOutput,
    ShrinkPlan, shrink_and_paste_on_blank, shrink_and_paste_on_blank_with,
};
pub use crate::video::batch::{
    DEFAULT_LAST_FRAME_DUPE_AMOUNT, DEFAULT_START_FRAME_DUPE_AMOUNT, WriteVideoOpts,
    WriteVideoReport, write_video, write_video_to_sink,
};
pub use crate::video::continuous::ContinuousVideoWriter;
