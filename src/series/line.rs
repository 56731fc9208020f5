use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{
    CoordinateMapper, LineInterpolation, LineSettings, PixelPoint, Serie, SeriesKind,
    finite_or_zero,
};
use crate::labels::{LabelAnchor, LabelDescriptor, LabelStyle, format_label_value, series_label_key};
use crate::render::{
    Color, DrawSurface, MeshData, Path, StrokeStyle, fill_path, ribbon_mesh, split_cubic,
    stroke_path,
};
use crate::series::{SeriesFrame, resolve_color};

/// A line vertex projected into pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub point_index: usize,
    /// Data X after category wraparound.
    pub x: f64,
    pub y: f64,
    pub pixel: PixelPoint,
}

/// Projects the visible points of `serie`.
///
/// On category axes, hidden categories are dropped and the rest re-sorted by
/// wrapped X so a window crossing the end of the label list stays monotone.
#[must_use]
pub fn project_line_points(serie: &Serie, mapper: &CoordinateMapper) -> Vec<LinePoint> {
    let window = mapper.category_window();
    let mut points: Vec<LinePoint> = serie
        .data
        .iter()
        .enumerate()
        .filter(|(_, point)| point.x.is_finite() && point.y.is_finite())
        .filter(|(_, point)| window.is_none_or(|w| w.is_category_index_visible(point.x)))
        .map(|(point_index, point)| LinePoint {
            point_index,
            x: window.map_or(point.x, |w| w.wrap_index(point.x)),
            y: point.y,
            pixel: mapper.to_pixel(point.x, point.y),
        })
        .collect();
    if window.is_some() {
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    points
}

/// Offset along the X data axis beyond which the path is cut during the
/// reveal animation; `length` is the pixel length of that axis.
///
/// Once a category preload is in play the clip is pushed to twice the width,
/// which disables it.
#[must_use]
pub fn line_clip_x(progress: f64, length: f64, preloading: bool) -> f64 {
    if preloading {
        2.0 * length
    } else {
        finite_or_zero(progress).clamp(0.0, 1.0) * length
    }
}

/// Bézier parameter at which the smooth segment reaches fraction `s` of its width.
///
/// With control points offset horizontally by half the segment width,
/// `x(t)/dx = 1.5·t·(1−t) + t³`; substituting `t = u + ½` gives the depressed
/// cubic `u³ + ¾u + (½ − s) = 0`, which has exactly one real root.
#[must_use]
pub fn smooth_clip_parameter(s: f64) -> f64 {
    let s = finite_or_zero(s).clamp(0.0, 1.0);
    let q = 0.5 - s;
    let root = (q * q / 4.0 + 1.0 / 64.0).sqrt();
    let u = (-q / 2.0 + root).cbrt() + (-q / 2.0 - root).cbrt();
    (u + 0.5).clamp(0.0, 1.0)
}

fn smooth_controls(a: PixelPoint, b: PixelPoint) -> (PixelPoint, PixelPoint) {
    let half = (b.x - a.x) * 0.5;
    (PixelPoint::new(a.x + half, a.y), PixelPoint::new(b.x - half, b.y))
}

/// Builds the stroke path through `points`, truncated at `clip_x`.
///
/// The segment crossing the clip is cut exactly at the boundary: linearly for
/// straight segments, on the horizontal leg first for steps, and by a
/// De Casteljau split for smooth segments.
#[must_use]
pub fn build_line_path(
    points: &[PixelPoint],
    interpolation: LineInterpolation,
    clip_x: f64,
) -> Path {
    let mut path = Path::with_capacity(points.len() * 2);
    let Some(first) = points.first() else {
        return path;
    };
    if first.x > clip_x {
        return path;
    }
    path.move_to(*first);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        match interpolation {
            LineInterpolation::Straight => {
                if b.x <= clip_x {
                    path.line_to(b);
                } else {
                    let t = (clip_x - a.x) / (b.x - a.x);
                    path.line_to(a.lerp(b, finite_or_zero(t)));
                    break;
                }
            }
            LineInterpolation::Step => {
                let corner = PixelPoint::new(b.x, a.y);
                if corner.x <= clip_x {
                    path.line_to(corner);
                    path.line_to(b);
                } else {
                    path.line_to(PixelPoint::new(clip_x, a.y));
                    break;
                }
            }
            LineInterpolation::Smooth => {
                let (control1, control2) = smooth_controls(a, b);
                if b.x <= clip_x {
                    path.cubic_to(control1, control2, b);
                } else {
                    let s = (clip_x - a.x) / (b.x - a.x);
                    let t = smooth_clip_parameter(s);
                    let (left, _) = split_cubic([a, control1, control2, b], t);
                    path.cubic_to(left[1], left[2], left[3]);
                    break;
                }
            }
        }
    }
    path
}

/// Closes the clipped line down to `baseline_y` from its last and first drawn vertices.
#[must_use]
pub fn build_area_path(
    points: &[PixelPoint],
    interpolation: LineInterpolation,
    clip_x: f64,
    baseline_y: f64,
) -> Path {
    let mut path = build_line_path(points, interpolation, clip_x);
    let (Some(first), Some(last)) = (points.first().copied(), path.current_point()) else {
        return Path::new();
    };
    if path.len() < 2 {
        return Path::new();
    }
    path.line_to(PixelPoint::new(last.x, baseline_y));
    path.line_to(PixelPoint::new(first.x, baseline_y));
    path.close();
    path
}

/// Textured ribbon over the flattened `path`, one strip per sub-path.
#[must_use]
pub fn build_ribbon_mesh(path: &Path, width: f64, tile_length: f64, tint: Color) -> MeshData {
    let mut mesh = MeshData::default();
    for polyline in path.flatten() {
        let strip = ribbon_mesh(&polyline.points, width * 0.5, tile_length, tint);
        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(strip.vertices);
        mesh.indices.extend(strip.indices.iter().map(|index| index + base));
    }
    mesh
}

/// Line vertex picked by a pointer query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    pub point_index: usize,
    pub pixel: PixelPoint,
    pub category: Option<usize>,
}

/// Nearest line point to `point`.
///
/// On category axes this is the point on the category under the pointer; on
/// value axes it is the closest X within `threshold_ratio` of the visible range.
#[must_use]
pub fn hit_test_line(
    points: &[LinePoint],
    mapper: &CoordinateMapper,
    point: PixelPoint,
    threshold_ratio: f64,
) -> Option<LineHit> {
    if let Some(window) = mapper.category_window() {
        let category = mapper.pixel_to_category(point)?;
        let count = window.label_count().max(1) as i64;
        return points
            .iter()
            .find(|p| (p.x.round() as i64).rem_euclid(count) == category as i64)
            .map(|p| LineHit {
                point_index: p.point_index,
                pixel: p.pixel,
                category: Some(category),
            });
    }

    let value = mapper.pixel_to_value_x(point);
    let range = mapper.range();
    let threshold = finite_or_zero(threshold_ratio * (range.x_max - range.x_min).abs());
    points
        .iter()
        .map(|p| (p, (p.x - value).abs()))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
        .map(|(p, _)| LineHit {
            point_index: p.point_index,
            pixel: p.pixel,
            category: None,
        })
}

/// Draws one line series: optional area, stroke (plain, dashed or textured)
/// and faded hover symbols.
pub fn draw_line<S: DrawSurface + ?Sized>(
    surface: &mut S,
    serie_index: usize,
    serie: &Serie,
    settings: &LineSettings,
    mapper: &CoordinateMapper,
    frame: &SeriesFrame<'_>,
) {
    let points = project_line_points(serie, mapper);
    if points.is_empty() {
        return;
    }
    let preloading = mapper
        .category_window()
        .is_some_and(|window| window.is_windowing());
    let clip_x = line_clip_x(frame.progress, mapper.x_length(), preloading);
    // Clip with the X data axis laid out horizontally, then map back.
    let revealed: Vec<PixelPoint> = points
        .iter()
        .map(|p| mapper.to_reveal_frame(p.pixel))
        .collect();
    let color = resolve_color(settings.color, serie_index);

    if let Some(area) = settings.area {
        let area_color = area.color.unwrap_or(color);
        let fill = area_color.with_alpha(area_color.alpha * area.opacity.clamp(0.0, 1.0));
        let baseline = if mapper.is_transposed() {
            0.0
        } else {
            mapper.viewport().height
        };
        let path = build_area_path(&revealed, settings.interpolation, clip_x, baseline)
            .map_points(|p| mapper.from_reveal_frame(p));
        fill_path(surface, &path, fill);
    }

    let path = build_line_path(&revealed, settings.interpolation, clip_x)
        .map_points(|p| mapper.from_reveal_frame(p));
    let stroked = match &settings.dash {
        Some(dash) => path.dashed(dash),
        None => path,
    };
    match settings.texture {
        Some(texture) if frame.capabilities.extended_rendering => {
            build_ribbon_mesh(&stroked, settings.width, settings.texture_tile_px, color)
                .upload(surface, Some(texture));
        }
        _ => stroke_path(surface, &stroked, StrokeStyle::new(settings.width, color)),
    }

    let radius = settings.symbol_size * 0.5;
    for point in points
        .iter()
        .filter(|p| mapper.to_reveal_frame(p.pixel).x <= clip_x)
    {
        let alpha = frame.highlight((serie_index, point.point_index));
        if alpha <= 0.0 || radius <= 0.0 {
            continue;
        }
        trace!(serie = serie_index, point = point.point_index, alpha, "line hover symbol");
        let mut symbol = Path::new();
        symbol.move_to(point.pixel.offset(radius, 0.0));
        symbol.arc(point.pixel, radius, 0.0, std::f64::consts::TAU);
        symbol.close();
        fill_path(surface, &symbol, color.with_alpha(color.alpha * alpha));
    }
}

/// Value labels above each revealed point.
#[must_use]
pub fn line_labels(
    serie_index: usize,
    serie: &Serie,
    settings: &LineSettings,
    mapper: &CoordinateMapper,
    progress: f64,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    if !settings.show_labels {
        return Vec::new();
    }
    let window = mapper.category_window();
    let preloading = window.is_some_and(|w| w.is_windowing());
    let clip_x = line_clip_x(progress, mapper.x_length(), preloading);
    project_line_points(serie, mapper)
        .into_iter()
        .filter(|p| mapper.to_reveal_frame(p.pixel).x <= clip_x)
        .filter(|p| !window.is_some_and(|w| w.is_edge_category_index_for_label(p.x)))
        .map(|p| {
            let point = &serie.data[p.point_index];
            LabelDescriptor::new(
                series_label_key(SeriesKind::Line, serie_index, &point.key_fragment(p.point_index)),
                format_label_value(point.y),
                p.pixel,
            )
            .with_offset(0.0, -settings.label_offset)
            .with_anchor_mode(LabelAnchor::Bottom)
            .with_style(style)
        })
        .collect()
}
