use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ZoomreelError, ZoomreelResult};
use image::RgbaImage;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriterState {
    Open,
    Finished,
}

/// Incremental video writer for frames that arrive over several calls.
///
/// Lifecycle: [`open`](Self::open) writes the leading duplicates, [`append`](Self::append) may be
/// called any number of times, [`finish`](Self::finish) writes the trailing duplicates and closes
/// the sink. Every call after `finish` fails with [`ZoomreelError::UseAfterFinish`].
///
/// A failed push closes the sink and finishes the writer. Dropping an open writer ends the sink.
pub struct ContinuousVideoWriter<S: FrameSink = FfmpegSink> {
    sink: S,
    state: WriterState,
    next: u64,
}

impl ContinuousVideoWriter<FfmpegSink> {
    /// Open an MP4 at `path` sized after `initial_frame` and write it
    /// `start_frame_dupe_amount` times.
    pub fn open(
        path: impl Into<PathBuf>,
        initial_frame: &RgbaImage,
        fps: f64,
        start_frame_dupe_amount: usize,
    ) -> ZoomreelResult<Self> {
        let fps = Fps::from_f64(fps)?;
        let sink = FfmpegSink::new(FfmpegSinkOpts::new(path));
        Self::open_with_sink(sink, initial_frame, fps, start_frame_dupe_amount)
    }
}

impl<S: FrameSink> ContinuousVideoWriter<S> {
    /// Begin `sink` and write `initial_frame` `start_frame_dupe_amount` times.
    #[tracing::instrument(skip(sink, initial_frame), fields(width = initial_frame.width(), height = initial_frame.height()))]
    pub fn open_with_sink(
        mut sink: S,
        initial_frame: &RgbaImage,
        fps: Fps,
        start_frame_dupe_amount: usize,
    ) -> ZoomreelResult<Self> {
        sink.begin(SinkConfig::for_frame(initial_frame, fps))?;
        let mut writer = Self {
            sink,
            state: WriterState::Open,
            next: 0,
        };
        writer.push_repeated(initial_frame, start_frame_dupe_amount)?;
        Ok(writer)
    }

    /// Write `frames` in order. Sizes are not filtered; a mismatch is an encoder error.
    pub fn append<'a, I>(&mut self, frames: I) -> ZoomreelResult<()>
    where
        I: IntoIterator<Item = &'a RgbaImage>,
    {
        self.ensure_open()?;
        for frame in frames {
            self.push(frame)?;
        }
        Ok(())
    }

    /// Write `final_frame` `last_frame_dupe_amount` times, then flush and close the sink.
    ///
    /// Returns the total number of frames written.
    #[tracing::instrument(skip(self, final_frame), fields(written = self.next))]
    pub fn finish(
        &mut self,
        final_frame: &RgbaImage,
        last_frame_dupe_amount: usize,
    ) -> ZoomreelResult<u64> {
        self.ensure_open()?;
        self.push_repeated(final_frame, last_frame_dupe_amount)?;
        self.state = WriterState::Finished;
        self.sink.end()?;
        tracing::debug!(frames_written = self.next, "continuous video finished");
        Ok(self.next)
    }

    /// Frames written so far, duplicates included.
    pub fn frames_written(&self) -> u64 {
        self.next
    }

    /// `true` after `finish`, or after a failure closed the writer.
    pub fn is_finished(&self) -> bool {
        self.state == WriterState::Finished
    }

    /// Borrow the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn ensure_open(&self) -> ZoomreelResult<()> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Finished => Err(ZoomreelError::UseAfterFinish),
        }
    }

    fn push_repeated(&mut self, frame: &RgbaImage, times: usize) -> ZoomreelResult<()> {
        for _ in 0..times {
            self.push(frame)?;
        }
        Ok(())
    }

    fn push(&mut self, frame: &RgbaImage) -> ZoomreelResult<()> {
        if let Err(err) = self.sink.push_frame(FrameIndex(self.next), frame) {
            self.release();
            return Err(err);
        }
        self.next += 1;
        Ok(())
    }

    /// End the sink after a failure; secondary errors are only logged.
    fn release(&mut self) {
        self.state = WriterState::Finished;
        if let Err(err) = self.sink.end() {
            tracing::warn!(error = %err, "closing encoder after failure also failed");
        }
    }
}

impl<S: FrameSink> Drop for ContinuousVideoWriter<S> {
    fn drop(&mut self) {
        if self.state == WriterState::Open {
            tracing::warn!(
                frames_written = self.next,
                "continuous video writer dropped without finish, closing encoder"
            );
            self.release();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/continuous.rs"]
mod tests;
