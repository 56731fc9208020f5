//! Angle helpers shared by the pie and radar builders.
//!
//! Pie angles use the math convention (0° east, counter-clockwise positive);
//! radar angles use the compass convention (0° north, clockwise positive).
//! Both are given in degrees and converted to pixel directions with `y` down.

use crate::core::PixelPoint;

/// Sweeps at or above this many degrees are drawn as a full ring.
pub const FULL_CIRCLE_THRESHOLD_DEG: f64 = 359.9;

const ANGLE_EPSILON_DEG: f64 = 1e-9;

/// Wraps `degrees` into `[0, 360)`.
#[must_use]
pub fn normalize_deg(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit pixel direction of a math-convention angle.
#[must_use]
pub fn math_direction(degrees: f64) -> PixelPoint {
    let rad = degrees.to_radians();
    PixelPoint::new(rad.cos(), -rad.sin())
}

/// Unit pixel direction of a compass-convention angle.
#[must_use]
pub fn compass_direction(degrees: f64) -> PixelPoint {
    let rad = degrees.to_radians();
    PixelPoint::new(rad.sin(), -rad.cos())
}

/// Math-convention angle of `point` seen from `center`, in `[0, 360)`.
#[must_use]
pub fn math_angle_of(center: PixelPoint, point: PixelPoint) -> f64 {
    normalize_deg((center.y - point.y).atan2(point.x - center.x).to_degrees())
}

/// Pixel-space radians (as used by `PathCommand::Arc`) for a math-convention angle.
#[must_use]
pub fn math_to_pixel_radians(degrees: f64) -> f64 {
    -degrees.to_radians()
}

#[must_use]
pub fn polar_point(center: PixelPoint, direction: PixelPoint, radius: f64) -> PixelPoint {
    center.offset(direction.x * radius, direction.y * radius)
}

/// Whether `angle` lies within the signed span starting at `start`, wraparound-aware.
#[must_use]
pub fn angle_in_span(angle: f64, start: f64, sweep: f64) -> bool {
    if !sweep.is_finite() || sweep == 0.0 {
        return false;
    }
    let (low, length) = if sweep > 0.0 {
        (start, sweep)
    } else {
        (start + sweep, -sweep)
    };
    if length >= 360.0 - ANGLE_EPSILON_DEG {
        return true;
    }
    normalize_deg(angle - low) <= length + ANGLE_EPSILON_DEG
}
