use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ZoomreelError, ZoomreelResult};
use image::RgbaImage;
use std::path::Path;

/// Default number of copies of the first frame written before the sequence.
pub const DEFAULT_START_FRAME_DUPE_AMOUNT: usize = 15;
/// Default number of copies of the last frame written after the sequence.
pub const DEFAULT_LAST_FRAME_DUPE_AMOUNT: usize = 30;

/// Options for [`write_video`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WriteVideoOpts {
    /// Encode frames last-to-first.
    pub reversed: bool,
    /// Copies of the first frame prepended to the sequence.
    pub start_frame_dupe_amount: usize,
    /// Copies of the last frame appended to the sequence.
    pub last_frame_dupe_amount: usize,
}

impl Default for WriteVideoOpts {
    fn default() -> Self {
        Self {
            reversed: true,
            start_frame_dupe_amount: DEFAULT_START_FRAME_DUPE_AMOUNT,
            last_frame_dupe_amount: DEFAULT_LAST_FRAME_DUPE_AMOUNT,
        }
    }
}

/// What [`write_video`] actually encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteVideoReport {
    /// Total frames pushed to the encoder, duplicates included.
    pub frames_written: u64,
    /// Input frames skipped because their size differed from the first frame.
    pub dropped_frames: usize,
}

/// Encode `frames` to an MP4 at `path`.
///
/// See [`write_video_to_sink`] for the ordering, filtering and duplication rules.
#[tracing::instrument(skip(path, frames), fields(path = %path.as_ref().display(), frames = frames.len()))]
pub fn write_video(
    path: impl AsRef<Path>,
    frames: &[RgbaImage],
    fps: f64,
    opts: &WriteVideoOpts,
) -> ZoomreelResult<WriteVideoReport> {
    let fps = Fps::from_f64(fps)?;
    if frames.is_empty() {
        return Err(ZoomreelError::EmptyFrameSequence);
    }
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(path.as_ref()));
    write_video_to_sink(&mut sink, frames, fps, opts)
}

/// Stream `frames` into `sink`.
///
/// 1. Reverse the order if `opts.reversed`.
/// 2. Drop every frame whose size differs from the (new) first frame; the count is logged and
///    returned in [`WriteVideoReport::dropped_frames`].
/// 3. Push `start_frame_dupe_amount` copies of the first frame, the kept frames, then
///    `last_frame_dupe_amount` copies of the last kept frame, and end the sink.
///
/// An empty `frames` fails with [`ZoomreelError::EmptyFrameSequence`] before the sink is begun.
#[tracing::instrument(skip(sink, frames), fields(frames = frames.len()))]
pub fn write_video_to_sink<S: FrameSink + ?Sized>(
    sink: &mut S,
    frames: &[RgbaImage],
    fps: Fps,
    opts: &WriteVideoOpts,
) -> ZoomreelResult<WriteVideoReport> {
    let ordered: Vec<&RgbaImage> = if opts.reversed {
        frames.iter().rev().collect()
    } else {
        frames.iter().collect()
    };

    let Some(reference) = ordered.first().map(|f| f.dimensions()) else {
        return Err(ZoomreelError::EmptyFrameSequence);
    };
    let kept: Vec<&RgbaImage> = ordered
        .into_iter()
        .filter(|f| f.dimensions() == reference)
        .collect();
    let dropped_frames = frames.len() - kept.len();
    if dropped_frames > 0 {
        tracing::warn!(
            dropped_frames,
            width = reference.0,
            height = reference.1,
            "dropping frames whose size differs from the first frame"
        );
    }

    // `reference` came from the first ordered frame, so `kept` is non-empty.
    let (Some(&first), Some(&last)) = (kept.first(), kept.last()) else {
        return Err(ZoomreelError::EmptyFrameSequence);
    };

    sink.begin(SinkConfig::new(reference.0, reference.1, fps))?;

    let next = match push_sequence(sink, first, &kept, last, opts) {
        Ok(next) => next,
        Err(err) => {
            if let Err(end_err) = sink.end() {
                tracing::warn!(error = %end_err, "closing encoder after failure also failed");
            }
            return Err(err);
        }
    };

    sink.end()?;
    tracing::debug!(frames_written = next, "video written");

    Ok(WriteVideoReport {
        frames_written: next,
        dropped_frames,
    })
}

/// Push the leading dupes, the frames, then the trailing dupes. Returns the frame count.
fn push_sequence<S: FrameSink + ?Sized>(
    sink: &mut S,
    first: &RgbaImage,
    frames: &[&RgbaImage],
    last: &RgbaImage,
    opts: &WriteVideoOpts,
) -> ZoomreelResult<u64> {
    let mut next = 0u64;
    let mut push = |frame: &RgbaImage| -> ZoomreelResult<()> {
        sink.push_frame(FrameIndex(next), frame)?;
        next += 1;
        Ok(())
    };
    for _ in 0..opts.start_frame_dupe_amount {
        push(first)?;
    }
    for &frame in frames {
        push(frame)?;
    }
    for _ in 0..opts.last_frame_dupe_amount {
        push(last)?;
    }
    Ok(next)
}

#[cfg(test)]
#[path = "../../tests/unit/video/batch.rs"]
mod tests;
