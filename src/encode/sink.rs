use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ZoomreelError, ZoomreelResult};
use image::RgbaImage;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Align encoded dimensions up to a multiple of this block size. `None` disables alignment.
    pub macro_block_size: Option<u32>,
}

impl SinkConfig {
    /// Config for `width x height` frames with alignment disabled.
    pub fn new(width: u32, height: u32, fps: Fps) -> Self {
        Self {
            width,
            height,
            fps,
            macro_block_size: None,
        }
    }

    /// Config sized after `frame`.
    pub fn for_frame(frame: &RgbaImage, fps: Fps) -> Self {
        Self::new(frame.width(), frame.height(), fps)
    }

    /// Reject zero-area frames and zero block sizes.
    pub fn validate(&self) -> ZoomreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ZoomreelError::invalid_geometry(format!(
                "sink frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.macro_block_size == Some(0) {
            return Err(ZoomreelError::validation("macro_block_size must be > 0"));
        }
        Ok(())
    }
}

/// Sink contract for consuming frames in output order.
///
/// `push_frame` is called with strictly increasing [`FrameIndex`] values between one `begin` and
/// one `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ZoomreelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> ZoomreelResult<()>;
    /// Called once after the last frame; flushes and closes the output.
    fn end(&mut self) -> ZoomreelResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn begin(&mut self, cfg: SinkConfig) -> ZoomreelResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> ZoomreelResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn end(&mut self) -> ZoomreelResult<()> {
        (**self).end()
    }
}

/// In-memory sink for tests and debugging.
///
/// Enforces the same ordering and geometry rules as the ffmpeg sink.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RgbaImage)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, RgbaImage)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ZoomreelResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> ZoomreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ZoomreelError::encoder("in-memory sink not started"))?;
        if self.ended {
            return Err(ZoomreelError::encoder("in-memory sink is already finalized"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(ZoomreelError::encoder(
                "in-memory sink received out-of-order frame index",
            ));
        }
        if frame.dimensions() != (cfg.width, cfg.height) {
            return Err(ZoomreelError::encoder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ZoomreelResult<()> {
        if self.cfg.is_none() {
            return Err(ZoomreelError::encoder("in-memory sink not started"));
        }
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
