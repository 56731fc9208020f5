use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::core::types::finite_or_zero;
use crate::core::{PixelPoint, PixelRect};
use crate::render::Path;

/// Upper bound on segments per rounded corner.
pub const MAX_CORNER_SEGMENTS: usize = 16;

/// Which corners of a rectangle get rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
}

impl Corners {
    pub const NONE: Self = Self {
        top_left: false,
        top_right: false,
        bottom_right: false,
        bottom_left: false,
    };
    pub const ALL: Self = Self {
        top_left: true,
        top_right: true,
        bottom_right: true,
        bottom_left: true,
    };
    pub const TOP: Self = Self {
        top_left: true,
        top_right: true,
        bottom_right: false,
        bottom_left: false,
    };
    pub const BOTTOM: Self = Self {
        top_left: false,
        top_right: false,
        bottom_right: true,
        bottom_left: true,
    };
    pub const LEFT: Self = Self {
        top_left: true,
        top_right: false,
        bottom_right: false,
        bottom_left: true,
    };
    pub const RIGHT: Self = Self {
        top_left: false,
        top_right: true,
        bottom_right: true,
        bottom_left: false,
    };

    #[must_use]
    pub fn any(self) -> bool {
        self.top_left || self.top_right || self.bottom_right || self.bottom_left
    }
}

/// Radius clamped to `[0, min(width, height) / 2]`.
#[must_use]
pub fn clamp_corner_radius(rect: PixelRect, radius: f64) -> f64 {
    let limit = rect.width.min(rect.height) * 0.5;
    finite_or_zero(radius).max(0.0).min(finite_or_zero(limit).max(0.0))
}

/// Outline of `rect` with the selected corners rounded, clockwise from the top-left.
///
/// Each rounded corner contributes `segments + 1` points (`segments` clamped to
/// `1..=16`); square corners contribute one. Degenerate rectangles yield no points.
#[must_use]
pub fn rounded_rect_points(
    rect: PixelRect,
    radius: f64,
    corners: Corners,
    segments: usize,
) -> Vec<PixelPoint> {
    if rect.is_degenerate() || !rect.x.is_finite() || !rect.y.is_finite() {
        return Vec::new();
    }
    let radius = clamp_corner_radius(rect, radius);
    let segments = segments.clamp(1, MAX_CORNER_SEGMENTS);
    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    // (rounded, corner point, arc center, start angle in pixel radians)
    let layout = [
        (
            corners.top_left,
            PixelPoint::new(left, top),
            PixelPoint::new(left + radius, top + radius),
            PI,
        ),
        (
            corners.top_right,
            PixelPoint::new(right, top),
            PixelPoint::new(right - radius, top + radius),
            PI + FRAC_PI_2,
        ),
        (
            corners.bottom_right,
            PixelPoint::new(right, bottom),
            PixelPoint::new(right - radius, bottom - radius),
            0.0,
        ),
        (
            corners.bottom_left,
            PixelPoint::new(left, bottom),
            PixelPoint::new(left + radius, bottom - radius),
            FRAC_PI_2,
        ),
    ];

    let mut points = Vec::with_capacity(4 * (segments + 1));
    for (rounded, corner, center, start) in layout {
        if !rounded || radius <= 0.0 {
            points.push(corner);
            continue;
        }
        for step in 0..=segments {
            let angle = start + FRAC_PI_2 * step as f64 / segments as f64;
            points.push(PixelPoint::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
    }
    points
}

/// Closed path over `rounded_rect_points`.
#[must_use]
pub fn rounded_rect_path(rect: PixelRect, radius: f64, corners: Corners, segments: usize) -> Path {
    Path::from_points(&rounded_rect_points(rect, radius, corners, segments), true)
}
