use crate::foundation::error::{ZoomreelError, ZoomreelResult};

/// Absolute 0-based position of a frame in an output stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Denominator used when a fractional float rate is converted.
    const FLOAT_DEN: u32 = 1000;

    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ZoomreelResult<Self> {
        if den == 0 {
            return Err(ZoomreelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ZoomreelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert a floating-point rate (e.g. `30.0`, `29.97`) into a rational.
    ///
    /// Whole rates map to `n/1`. Fractional rates keep millisecond precision and are reduced.
    pub fn from_f64(fps: f64) -> ZoomreelResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ZoomreelError::validation(format!(
                "fps must be finite and > 0, got {fps}"
            )));
        }

        let whole = fps.round();
        if (fps - whole).abs() < 1e-9 {
            if whole > f64::from(u32::MAX) {
                return Err(ZoomreelError::validation(format!("fps {fps} is too large")));
            }
            return Self::new(whole as u32, 1);
        }

        let scaled = (fps * f64::from(Self::FLOAT_DEN)).round();
        if scaled < 1.0 {
            return Err(ZoomreelError::validation(format!(
                "fps {fps} is below the supported precision"
            )));
        }
        if scaled > f64::from(u32::MAX) {
            return Err(ZoomreelError::validation(format!("fps {fps} is too large")));
        }

        let num = scaled as u32;
        let g = gcd(num, Self::FLOAT_DEN);
        Self::new(num / g, Self::FLOAT_DEN / g)
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
