//! Zoom-out framing: shrink a frame and re-centre it on a near-transparent canvas.
//!
//! The output always has the input's dimensions. The shaved margin becomes a frame of
//! blank pixels that an inpainting step can later fill in.

use crate::foundation::error::{ZoomreelError, ZoomreelResult};
use crate::foundation::math::{
    opacity_to_alpha, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use image::{Rgba, RgbaImage, imageops};

/// Smallest edge (px) a frame is resampled to, however large the mask.
pub const MIN_RESAMPLE_EDGE: u32 = 8;

/// Largest edge (px) a negative mask may grow a frame to.
pub const MAX_RESAMPLE_EDGE: u32 = 1 << 16;

/// Alpha of the blank canvas when no opacity is applied.
pub const BLANK_ALPHA: u8 = 1;

/// Resampling filter used when shrinking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic (Catmull-Rom).
    #[default]
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl Resample {
    /// The matching `image` filter.
    pub fn filter_type(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Triangle => imageops::FilterType::Triangle,
            Self::CatmullRom => imageops::FilterType::CatmullRom,
            Self::Gaussian => imageops::FilterType::Gaussian,
            Self::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Options for [`shrink_and_paste_on_blank_with`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShrinkOpts {
    /// Pixels shaved from the left and right edges.
    pub mask_width: i32,
    /// Pixels shaved from the top and bottom edges.
    pub mask_height: i32,
    /// Canvas opacity in `[0, 1]`. `1` keeps the near-transparent blank canvas.
    pub opacity: f64,
    /// Filter used to resample the frame.
    pub resample: Resample,
}

impl Default for ShrinkOpts {
    fn default() -> Self {
        Self {
            mask_width: 0,
            mask_height: 0,
            opacity: 1.0,
            resample: Resample::default(),
        }
    }
}

impl ShrinkOpts {
    /// Fully opaque options with the given margins.
    pub fn new(mask_width: i32, mask_height: i32) -> Self {
        Self {
            mask_width,
            mask_height,
            ..Self::default()
        }
    }

    /// Set the canvas opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the resampling filter.
    pub fn with_resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }
}

/// Geometry of one shrink: where the resampled frame lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShrinkPlan {
    /// Width the frame is resampled to.
    pub resized_width: u32,
    /// Height the frame is resampled to.
    pub resized_height: u32,
    /// Horizontal paste offset (equals `mask_width`, may be negative).
    pub offset_x: i64,
    /// Vertical paste offset (equals `mask_height`, may be negative).
    pub offset_y: i64,
    /// `true` when either axis was raised to [`MIN_RESAMPLE_EDGE`].
    pub clamped: bool,
}

impl ShrinkPlan {
    /// Compute the resample size and paste offset for a `width x height` frame.
    ///
    /// Fails with [`ZoomreelError::InvalidGeometry`] when a negative mask would grow an axis past
    /// [`MAX_RESAMPLE_EDGE`].
    pub fn compute(
        width: u32,
        height: u32,
        mask_width: i32,
        mask_height: i32,
    ) -> ZoomreelResult<Self> {
        let (resized_width, clamped_x) = shrunk_edge(width, mask_width, "width")?;
        let (resized_height, clamped_y) = shrunk_edge(height, mask_height, "height")?;
        Ok(Self {
            resized_width,
            resized_height,
            offset_x: i64::from(mask_width),
            offset_y: i64::from(mask_height),
            clamped: clamped_x || clamped_y,
        })
    }
}

fn shrunk_edge(edge: u32, mask: i32, axis: &str) -> ZoomreelResult<(u32, bool)> {
    let target = i64::from(edge) - 2 * i64::from(mask);
    if target < i64::from(MIN_RESAMPLE_EDGE) {
        return Ok((MIN_RESAMPLE_EDGE, true));
    }
    if target > i64::from(edge.max(MAX_RESAMPLE_EDGE)) {
        return Err(ZoomreelError::invalid_geometry(format!(
            "mask {mask} grows {axis} {edge} to {target}, above {MAX_RESAMPLE_EDGE}"
        )));
    }
    Ok((target as u32, false))
}

/// Result of [`shrink_and_paste_on_blank_with`].
#[derive(Clone, Debug)]
pub struct ShrinkOutput {
    /// The framed image, same size as the input.
    pub image: RgbaImage,
    /// Geometry that produced it.
    pub plan: ShrinkPlan,
}

/// Shrink `image` by `mask_width`/`mask_height` on each side and paste it onto a blank canvas of
/// the original size.
///
/// With `opacity == 1` the canvas is black with alpha [`BLANK_ALPHA`]; otherwise every canvas
/// pixel gets alpha `round(255 * opacity)`. The pasted frame replaces canvas pixels outright
/// (alpha included), it is not blended.
pub fn shrink_and_paste_on_blank(
    image: &RgbaImage,
    mask_width: i32,
    mask_height: i32,
    opacity: f64,
) -> ZoomreelResult<RgbaImage> {
    let opts = ShrinkOpts::new(mask_width, mask_height).with_opacity(opacity);
    shrink_and_paste_on_blank_with(image, &opts).map(|out| out.image)
}

/// Options form of [`shrink_and_paste_on_blank`], also returning the computed [`ShrinkPlan`].
pub fn shrink_and_paste_on_blank_with(
    image: &RgbaImage,
    opts: &ShrinkOpts,
) -> ZoomreelResult<ShrinkOutput> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ZoomreelError::invalid_geometry(format!(
            "cannot shrink a {width}x{height} image"
        )));
    }

    let canvas_alpha = if opts.opacity == 1.0 {
        BLANK_ALPHA
    } else {
        opacity_to_alpha(opts.opacity)?
    };

    let plan = ShrinkPlan::compute(width, height, opts.mask_width, opts.mask_height)?;
    if plan.clamped {
        tracing::debug!(
            width,
            height,
            mask_width = opts.mask_width,
            mask_height = opts.mask_height,
            resized_width = plan.resized_width,
            resized_height = plan.resized_height,
            "shrink target below minimum edge, clamped"
        );
    }

    let resized = resample(image, &plan, opts.resample);

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, canvas_alpha]));
    imageops::replace(&mut canvas, &resized, plan.offset_x, plan.offset_y);

    Ok(ShrinkOutput {
        image: canvas,
        plan,
    })
}

/// Resize to the plan's size. Weighted filters run on premultiplied alpha so transparent pixels
/// do not bleed their colour into visible neighbours.
fn resample(image: &RgbaImage, plan: &ShrinkPlan, resample: Resample) -> RgbaImage {
    let filter = resample.filter_type();
    if resample == Resample::Nearest {
        return imageops::resize(image, plan.resized_width, plan.resized_height, filter);
    }

    let mut premultiplied = image.clone();
    premultiply_rgba8_in_place(&mut premultiplied);
    let mut resized = imageops::resize(
        &premultiplied,
        plan.resized_width,
        plan.resized_height,
        filter,
    );
    unpremultiply_rgba8_in_place(&mut resized);
    resized
}

#[cfg(test)]
#[path = "../../tests/unit/framing/shrink.rs"]
mod tests;
