use crate::foundation::error::{ZoomreelError, ZoomreelResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Scale colour channels by alpha, in place. Fully transparent pixels become `[0, 0, 0, 0]`.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u16(u16::from(px[0]), a) as u8;
        px[1] = mul_div255_u16(u16::from(px[1]), a) as u8;
        px[2] = mul_div255_u16(u16::from(px[2]), a) as u8;
    }
}

/// Inverse of [`premultiply_rgba8_in_place`], saturating at 255.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Map an opacity in `[0, 1]` to an 8-bit alpha, rounding half to even.
pub(crate) fn opacity_to_alpha(opacity: f64) -> ZoomreelResult<u8> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(ZoomreelError::validation(format!(
            "opacity must be within [0, 1], got {opacity}"
        )));
    }
    Ok((255.0 * opacity).round_ties_even() as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
