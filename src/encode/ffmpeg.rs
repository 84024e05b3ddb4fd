use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ZoomreelError, ZoomreelResult};
use crate::foundation::math::mul_div255_u16;
use image::RgbaImage;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// What to do with the alpha channel of incoming frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlphaMode {
    /// Hand RGBA to ffmpeg as-is; the yuv420p conversion drops alpha.
    #[default]
    Discard,
    /// Composite straight-alpha frames over this RGBA8 background first.
    Flatten([u8; 4]),
}

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Alpha handling.
    pub alpha: AlphaMode,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            alpha: AlphaMode::default(),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    /// Output path this sink writes to.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ZoomreelResult<()> {
        if self.child.is_some() {
            return Err(ZoomreelError::encoder("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ZoomreelError::validation("fps must be non-zero"));
        }
        cfg.validate()?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ZoomreelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(ZoomreelError::encoder(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(ffmpeg_args(&cfg, self.opts.overwrite))
            .arg(&self.opts.out_path);

        tracing::debug!(
            out_path = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            fps = %cfg.fps,
            "spawning ffmpeg"
        );

        let mut child = cmd.spawn().map_err(|e| {
            ZoomreelError::encoder(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ZoomreelError::encoder("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ZoomreelError::encoder("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = match self.opts.alpha {
            AlphaMode::Discard => Vec::new(),
            AlphaMode::Flatten(_) => vec![0u8; cfg.width as usize * cfg.height as usize * 4],
        };
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> ZoomreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ZoomreelError::encoder("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(ZoomreelError::encoder(
                "ffmpeg sink received out-of-order frame index",
            ));
        }

        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(ZoomreelError::encoder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let bytes: &[u8] = match self.opts.alpha {
            AlphaMode::Discard => frame.as_raw(),
            AlphaMode::Flatten(bg) => {
                flatten_straight_over_bg_to_opaque_rgba8(&mut self.scratch, frame.as_raw(), bg)?;
                &self.scratch
            }
        };

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ZoomreelError::encoder("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(bytes).map_err(|e| {
            ZoomreelError::encoder(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> ZoomreelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ZoomreelError::encoder("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            ZoomreelError::encoder(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ZoomreelError::encoder("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ZoomreelError::encoder(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ZoomreelError::encoder(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        tracing::warn!(
            out_path = %self.opts.out_path.display(),
            "ffmpeg sink dropped without end, killing encoder"
        );
        drop(self.stdin.take());
        let _ = child.kill();
        let _ = child.wait();
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

/// Arguments for one encode, excluding the trailing output path.
pub(crate) fn ffmpeg_args(cfg: &SinkConfig, overwrite: bool) -> Vec<String> {
    let mut args = vec![
        (if overwrite { "-y" } else { "-n" }).to_string(),
        "-loglevel".into(),
        "error".into(),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-s".into(),
        format!("{}x{}", cfg.width, cfg.height),
    ];
    push_input_fps(&mut args, cfg.fps);
    args.extend(["-i".into(), "pipe:0".into(), "-an".into()]);

    let (out_w, out_h) = encoded_dims(cfg);
    if (out_w, out_h) != (cfg.width, cfg.height) {
        // yuv420p needs even sizes; pad instead of rescaling so pixels stay put.
        args.extend(["-vf".into(), format!("pad={out_w}:{out_h}:0:0")]);
    }

    args.extend(
        [
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args
}

fn push_input_fps(args: &mut Vec<String>, fps: Fps) {
    // For rawvideo input, `-r` goes before `-i`.
    args.extend(["-r".into(), fps.to_string()]);
}

/// Encoded frame size: aligned up to `macro_block_size` (if any), then up to even.
pub(crate) fn encoded_dims(cfg: &SinkConfig) -> (u32, u32) {
    let align = cfg.macro_block_size.unwrap_or(1).max(1);
    let fit = |v: u32| round_up(round_up(v, align), 2);
    (fit(cfg.width), fit(cfg.height))
}

fn round_up(v: u32, to: u32) -> u32 {
    v.div_ceil(to).saturating_mul(to)
}

fn flatten_straight_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg_rgba: [u8; 4],
) -> ZoomreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ZoomreelError::validation(
            "flatten_straight_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        for c in 0..3 {
            let v = mul_div255_u16(u16::from(s[c]), a) + mul_div255_u16(bg[c], inv);
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ZoomreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
