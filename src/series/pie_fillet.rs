//! Closed-form rounded corners for pie and donut wedges.
//!
//! Each corner is a circle of radius `f` tangent to a radial edge and to one
//! of the two arcs. In the edge's local frame (`u` along the edge, `n` into
//! the slice) the circle center sits at `u·x + n·f`, where
//!
//! * outer corner: `x_o = √((r_out − f)² − f²)` (internally tangent),
//! * inner corner: `x_i = √((r_in + f)² − f²)` (externally tangent).
//!
//! The arc tangent point lies at angle `atan2(f, x)` from the edge.

use tracing::trace;

use crate::core::polar::{math_direction, polar_point};
use crate::core::{PixelPoint, finite_or_zero};
use crate::render::{arc_point, arc_segment_count, dedup_points};
use crate::series::pie::{SliceShape, arc_points};

/// Fillet radius limited to half the outer radius and half the ring thickness.
#[must_use]
pub fn clamp_fillet_radius(inner_radius: f64, outer_radius: f64, radius: f64) -> f64 {
    let thickness = (outer_radius - inner_radius.max(0.0)).max(0.0);
    finite_or_zero(radius)
        .max(0.0)
        .min(outer_radius * 0.5)
        .min(thickness * 0.5)
}

/// Points on the circle around `center` from `from` to `to`, along the shorter way.
fn fillet_arc(center: PixelPoint, radius: f64, from: PixelPoint, to: PixelPoint) -> Vec<PixelPoint> {
    let start = (from.y - center.y).atan2(from.x - center.x);
    let end = (to.y - center.y).atan2(to.x - center.x);
    let mut delta = end - start;
    while delta > std::f64::consts::PI {
        delta -= std::f64::consts::TAU;
    }
    while delta <= -std::f64::consts::PI {
        delta += std::f64::consts::TAU;
    }
    let segments = arc_segment_count(delta);
    (0..=segments)
        .map(|i| arc_point(center, radius, start + delta * i as f64 / segments as f64))
        .collect()
}

/// Outline of a wedge with rounded corners, or `None` when the requested
/// radius does not fit and the caller must draw the plain wedge.
///
/// Pie wedges (no inner radius) round their two outer corners and keep a
/// sharp apex; donut wedges round all four.
#[must_use]
pub fn rounded_wedge(shape: &SliceShape, corner_radius: f64) -> Option<Vec<PixelPoint>> {
    let outer = shape.outer_radius;
    let inner = shape.inner_radius.max(0.0);
    let sweep = shape.sweep.abs();
    let sign = shape.sweep.signum();
    let f = clamp_fillet_radius(inner, outer, corner_radius);
    if f <= 0.0 || sweep <= 0.0 {
        return None;
    }

    let x_outer = ((outer - f).powi(2) - f * f).sqrt();
    if !x_outer.is_finite() || x_outer <= 0.0 {
        trace!(outer, f, "pie fillet: outer corner does not fit");
        return None;
    }
    let phi_outer = f.atan2(x_outer).to_degrees();
    if 2.0 * phi_outer >= sweep {
        trace!(sweep, phi_outer, "pie fillet: arc too short for outer corners");
        return None;
    }

    let donut = inner > 0.0;
    let (x_inner, phi_inner) = if donut {
        let x = ((inner + f).powi(2) - f * f).sqrt();
        let phi = f.atan2(x).to_degrees();
        if !x.is_finite() || 2.0 * phi >= sweep || x >= x_outer {
            trace!(inner, f, "pie fillet: inner corners do not fit");
            return None;
        }
        (x, phi)
    } else {
        (0.0, 0.0)
    };

    let center = shape.center;
    let start = shape.start_angle;
    let end = start + shape.sweep;
    let u0 = math_direction(start);
    let u1 = math_direction(end);
    let n0 = math_direction(start + sign * 90.0);
    let n1 = math_direction(end - sign * 90.0);
    let along = |u: PixelPoint, distance: f64| polar_point(center, u, distance);
    let fillet_center =
        |u: PixelPoint, n: PixelPoint, x: f64| along(u, x).offset(n.x * f, n.y * f);

    let mut points = Vec::with_capacity(64);
    points.push(if donut { along(u0, x_inner) } else { center });

    let outer_start = start + sign * phi_outer;
    let outer_end = end - sign * phi_outer;
    points.extend(fillet_arc(
        fillet_center(u0, n0, x_outer),
        f,
        along(u0, x_outer),
        polar_point(center, math_direction(outer_start), outer),
    ));
    points.extend(arc_points(center, outer, outer_start, outer_end - outer_start));
    points.extend(fillet_arc(
        fillet_center(u1, n1, x_outer),
        f,
        polar_point(center, math_direction(outer_end), outer),
        along(u1, x_outer),
    ));

    if donut {
        let inner_end = end - sign * phi_inner;
        let inner_start = start + sign * phi_inner;
        points.extend(fillet_arc(
            fillet_center(u1, n1, x_inner),
            f,
            along(u1, x_inner),
            polar_point(center, math_direction(inner_end), inner),
        ));
        points.extend(arc_points(center, inner, inner_end, inner_start - inner_end));
        points.extend(fillet_arc(
            fillet_center(u0, n0, x_inner),
            f,
            polar_point(center, math_direction(inner_start), inner),
            along(u0, x_inner),
        ));
    }

    let points = dedup_points(&points);
    if points.iter().any(|p| !p.is_finite()) {
        trace!("pie fillet: non-finite outline discarded");
        return None;
    }
    Some(points.into_vec())
}
