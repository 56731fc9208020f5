use smallvec::smallvec;
use tracing::trace;

use crate::core::polar::{
    FULL_CIRCLE_THRESHOLD_DEG, angle_in_span, math_angle_of, math_direction, polar_point,
};
use crate::core::{
    ExplodeMode, PieLabelFormat, PieLabelPlacement, PieSettings, PixelPoint, Serie,
    SliceGapMode, Viewport, finite_or_zero,
};
use crate::labels::{
    LabelAnchor, LabelDescriptor, LabelStyle, LeaderLine, format_label_value, pie_label_key,
};
use crate::render::{
    Color, DrawSurface, Path, StrokeStyle, arc_segment_count, fan_mesh, fill_path, palette_color,
    stroke_path,
};
use crate::series::SeriesFrame;
use crate::series::pie_fillet::rounded_wedge;

/// Width of the highlight stroke drawn in `ExplodeMode::Stroke`.
const HIGHLIGHT_STROKE_WIDTH: f64 = 2.0;

/// Tessellated circular arc in math-convention degrees, start included.
#[must_use]
pub fn arc_points(center: PixelPoint, radius: f64, start_deg: f64, sweep_deg: f64) -> Vec<PixelPoint> {
    let segments = arc_segment_count(sweep_deg.to_radians());
    (0..=segments)
        .map(|i| {
            let angle = start_deg + sweep_deg * i as f64 / segments as f64;
            polar_point(center, math_direction(angle), radius)
        })
        .collect()
}

/// One laid-out slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// Position in layout order; doubles as the hover point index.
    pub index: usize,
    /// Source point, `None` for the aggregated "Others" slice.
    pub point_index: Option<usize>,
    pub id: String,
    pub name: Option<String>,
    pub value: f64,
    /// Share of the visible total, in percent.
    pub percent: f64,
    pub color: Color,
    /// Math-convention degrees.
    pub start_angle: f64,
    /// Signed degrees; negative when laid out clockwise.
    pub sweep: f64,
    pub is_others: bool,
}

impl PieSlice {
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep * 0.5
    }

    /// Name when present, else the formatted value.
    #[must_use]
    pub fn label_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format_label_value(self.value))
    }
}

struct SliceEntry {
    point_index: Option<usize>,
    id: String,
    name: Option<String>,
    value: f64,
    color: Color,
}

/// Builds the visible slice list of a pie series.
///
/// Non-positive and hidden values are dropped. With `top_n`, slices are ranked
/// by value and the remainder merged into one "Others" slice that can itself
/// be hidden through its id.
#[must_use]
pub fn build_pie_slices(serie: &Serie, settings: &PieSettings) -> Vec<PieSlice> {
    let mut entries: Vec<SliceEntry> = serie
        .data
        .iter()
        .enumerate()
        .filter(|(_, point)| point.value.is_finite() && point.value > 0.0)
        .filter(|(index, point)| !settings.hidden_ids.contains(&point.key_fragment(*index)))
        .map(|(index, point)| SliceEntry {
            point_index: Some(index),
            id: point.key_fragment(index),
            name: point.name.clone(),
            value: point.value,
            color: point.color.unwrap_or_else(|| palette_color(index)),
        })
        .collect();

    if settings.sort_descending || settings.top_n.is_some() {
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    }
    if let Some(top_n) = settings.top_n {
        if entries.len() > top_n {
            let rest = entries.split_off(top_n);
            let value: f64 = rest.iter().map(|entry| entry.value).sum();
            if settings.hidden_ids.contains(&settings.others_id) {
                trace!(merged = rest.len(), "pie: hidden others slice dropped");
            } else {
                entries.push(SliceEntry {
                    point_index: None,
                    id: settings.others_id.clone(),
                    name: Some(settings.others_name.clone()),
                    value,
                    color: settings
                        .others_color
                        .unwrap_or_else(|| palette_color(top_n)),
                });
            }
        }
    }

    let total: f64 = entries.iter().map(|entry| entry.value).sum();
    if !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }
    let range = finite_or_zero(settings.angle_range_deg).clamp(0.0, 360.0);
    let sign = if settings.clockwise { -1.0 } else { 1.0 };
    let mut angle = settings.start_angle_deg;
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let sweep = entry.value / total * range;
            let slice = PieSlice {
                index,
                point_index: entry.point_index,
                is_others: entry.point_index.is_none(),
                id: entry.id,
                name: entry.name,
                value: entry.value,
                percent: entry.value / total * 100.0,
                color: entry.color,
                start_angle: angle,
                sweep: sign * sweep,
            };
            angle += sign * sweep;
            slice
        })
        .collect()
}

/// Center and radii shared by all slices of a pie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieLayout {
    pub center: PixelPoint,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Outer radius given up so exploded or translated slices stay inside the plot.
    pub explode_reserve: f64,
}

impl PieLayout {
    #[must_use]
    pub fn resolve(viewport: Viewport, settings: &PieSettings) -> Option<Self> {
        if !viewport.is_valid() {
            return None;
        }
        let base = viewport.width.min(viewport.height) * 0.5;
        let full_outer = finite_or_zero(base * settings.outer_radius_ratio).max(0.0);
        let mut reserve = match settings.explode_mode {
            ExplodeMode::Translate | ExplodeMode::Pull => {
                finite_or_zero(settings.explode_offset).max(0.0)
            }
            _ => 0.0,
        };
        if settings.gap_mode == SliceGapMode::Translate {
            reserve += finite_or_zero(settings.gap_px).max(0.0) * 0.5;
        }
        let reserve = reserve.min(full_outer * 0.5);
        let outer_radius = full_outer - reserve;
        if outer_radius <= 0.0 {
            return None;
        }
        let inner_radius = finite_or_zero(base * settings.inner_radius_ratio)
            .max(0.0)
            .min(outer_radius);
        let (cx, cy) = settings.center_ratio;
        Some(Self {
            center: PixelPoint::new(viewport.width * cx, viewport.height * cy),
            inner_radius,
            outer_radius,
            explode_reserve: reserve,
        })
    }
}

/// Drawn parameters of one slice after gap and explode adjustments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceShape {
    pub center: PixelPoint,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
    pub full_ring: bool,
}

impl SliceShape {
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep * 0.5
    }

    /// Radial and angular containment test.
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        let distance = self.center.distance(point);
        if distance < self.inner_radius || distance > self.outer_radius {
            return false;
        }
        self.full_ring
            || angle_in_span(math_angle_of(self.center, point), self.start_angle, self.sweep)
    }
}

/// Resolves the drawn shape of `slice`, or `None` when the gap consumes it.
///
/// Hit-testing passes `exploded = false` so the hover target does not move
/// with the exploded slice.
#[must_use]
pub fn slice_shape(
    slice: &PieSlice,
    layout: &PieLayout,
    settings: &PieSettings,
    exploded: bool,
) -> Option<SliceShape> {
    let mut center = layout.center;
    let mut outer = layout.outer_radius;
    let mut inner = layout.inner_radius;
    let mut start = slice.start_angle;
    let mut sweep = slice.sweep;
    let full_ring = sweep.abs() >= FULL_CIRCLE_THRESHOLD_DEG;
    let direction = math_direction(slice.mid_angle());
    let gap = finite_or_zero(settings.gap_px).max(0.0);

    if !full_ring && gap > 0.0 {
        match settings.gap_mode {
            SliceGapMode::None => {}
            SliceGapMode::Radial => {
                let gap_angle = (gap / outer).to_degrees();
                let remaining = sweep.abs() - gap_angle;
                if !remaining.is_finite() || remaining <= 0.0 {
                    trace!(slice = slice.index, "pie: radial gap consumed slice");
                    return None;
                }
                start += sweep.signum() * gap_angle * 0.5;
                sweep = sweep.signum() * remaining;
            }
            SliceGapMode::Translate => {
                center = polar_point(center, direction, gap * 0.5);
            }
            SliceGapMode::Uniform => {
                // Translate to open the gap, then shrink to stay inside the layout radius.
                let half = (sweep.abs() * 0.5).min(90.0).to_radians();
                let sin = half.sin();
                if sin <= 1e-9 {
                    return None;
                }
                let offset = gap / (2.0 * sin);
                center = polar_point(center, direction, offset);
                outer -= offset;
                inner = (inner - offset).max(0.0);
                if outer <= inner {
                    trace!(slice = slice.index, "pie: uniform gap consumed slice");
                    return None;
                }
            }
        }
    }

    if exploded {
        let offset = finite_or_zero(settings.explode_offset).max(0.0);
        match settings.explode_mode {
            ExplodeMode::Translate => center = polar_point(center, direction, offset),
            ExplodeMode::Pull => outer += offset,
            ExplodeMode::None | ExplodeMode::Color | ExplodeMode::Stroke => {}
        }
    }

    Some(SliceShape {
        center,
        inner_radius: inner,
        outer_radius: outer,
        start_angle: start,
        sweep,
        full_ring,
    })
}

/// Tessellated slice outline: one ring for wedges and disks, two for annuli.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceOutline {
    pub rings: Vec<Vec<PixelPoint>>,
    pub rounded: bool,
}

impl SliceOutline {
    #[must_use]
    pub fn path(&self) -> Path {
        let mut path = Path::new();
        for ring in &self.rings {
            path.extend(&Path::from_points(ring, true));
        }
        path
    }
}

fn plain_wedge(shape: &SliceShape) -> Vec<PixelPoint> {
    let mut points = arc_points(shape.center, shape.outer_radius, shape.start_angle, shape.sweep);
    if shape.inner_radius > 0.0 {
        points.extend(arc_points(
            shape.center,
            shape.inner_radius,
            shape.start_angle + shape.sweep,
            -shape.sweep,
        ));
    } else {
        points.push(shape.center);
    }
    points
}

fn circle(center: PixelPoint, radius: f64, reverse: bool) -> Vec<PixelPoint> {
    let sweep = if reverse { -360.0 } else { 360.0 };
    let mut points = arc_points(center, radius, 0.0, sweep);
    points.pop();
    points
}

/// Outline of `shape`.
///
/// Near-full sweeps draw a full disk or annulus. Otherwise rounded corners
/// are attempted when `allow_rounding` is set, falling back to the sharp
/// wedge when the fillet does not fit.
#[must_use]
pub fn slice_outline(shape: &SliceShape, corner_radius: f64, allow_rounding: bool) -> SliceOutline {
    if shape.full_ring {
        let mut rings = vec![circle(shape.center, shape.outer_radius, false)];
        if shape.inner_radius > 0.0 {
            rings.push(circle(shape.center, shape.inner_radius, true));
        }
        return SliceOutline {
            rings,
            rounded: false,
        };
    }
    if allow_rounding && corner_radius > 0.0 {
        if let Some(points) = rounded_wedge(shape, corner_radius) {
            return SliceOutline {
                rings: vec![points],
                rounded: true,
            };
        }
        trace!(corner_radius, "pie: fillet guard fell back to sharp wedge");
    }
    SliceOutline {
        rings: vec![plain_wedge(shape)],
        rounded: false,
    }
}

/// Index into `slices` of the slice under `point`, using non-exploded geometry.
#[must_use]
pub fn hit_test_pie(
    slices: &[PieSlice],
    layout: &PieLayout,
    settings: &PieSettings,
    point: PixelPoint,
) -> Option<usize> {
    slices.iter().position(|slice| {
        slice_shape(slice, layout, settings, false).is_some_and(|shape| shape.contains(point))
    })
}

fn exploded(settings: &PieSettings, hovered: Option<usize>, slice: &PieSlice) -> bool {
    hovered == Some(slice.index)
        && matches!(
            settings.explode_mode,
            ExplodeMode::Translate | ExplodeMode::Pull
        )
}

fn label_text(slice: &PieSlice, format: PieLabelFormat) -> String {
    let name = slice.name.clone().unwrap_or_else(|| slice.id.clone());
    let value = format_label_value(slice.value);
    let percent = format!("{}%", format_label_value((slice.percent * 10.0).round() / 10.0));
    match format {
        PieLabelFormat::Value => value,
        PieLabelFormat::Percent => percent,
        PieLabelFormat::Name => name,
        PieLabelFormat::NameValue => format!("{name}: {value}"),
        PieLabelFormat::NamePercent => format!("{name}: {percent}"),
    }
}

/// Slice labels: centred in the ring, or outside with a three-point leader
/// (arc point, radial extension, horizontal run toward the label's side).
#[must_use]
pub fn pie_labels(
    slices: &[PieSlice],
    layout: &PieLayout,
    settings: &PieSettings,
    hovered: Option<usize>,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    let label = &settings.label;
    if label.placement == PieLabelPlacement::Hidden {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(slices.len());
    for slice in slices {
        let Some(shape) = slice_shape(slice, layout, settings, exploded(settings, hovered, slice))
        else {
            continue;
        };
        let mid = if shape.full_ring {
            slice.mid_angle()
        } else {
            shape.mid_angle()
        };
        let direction = math_direction(mid);
        let key = pie_label_key(slice.index, &slice.label_name());
        let text = label_text(slice, label.format);
        let descriptor = match label.placement {
            PieLabelPlacement::Center => {
                let radius = (shape.inner_radius + shape.outer_radius) * 0.5;
                LabelDescriptor::new(key, text, polar_point(shape.center, direction, radius))
                    .with_anchor_mode(LabelAnchor::Center)
            }
            PieLabelPlacement::Outside => {
                let on_arc = polar_point(shape.center, direction, shape.outer_radius);
                let elbow = polar_point(
                    shape.center,
                    direction,
                    shape.outer_radius + label.radial_length,
                );
                let right = direction.x >= 0.0;
                let run = if right {
                    label.horizontal_length
                } else {
                    -label.horizontal_length
                };
                let end = elbow.offset(run, 0.0);
                LabelDescriptor::new(key, text, end)
                    .with_anchor_mode(if right {
                        LabelAnchor::Left
                    } else {
                        LabelAnchor::Right
                    })
                    .with_leader(LeaderLine {
                        points: smallvec![on_arc, elbow, end],
                        stroke: label.leader_stroke,
                    })
                    .clipped(false)
            }
            PieLabelPlacement::Hidden => continue,
        };
        out.push(descriptor.with_style(style));
    }
    out
}

/// Draws every slice of a pie series, then leader lines for outside labels.
pub fn draw_pie<S: DrawSurface + ?Sized>(
    surface: &mut S,
    serie_index: usize,
    serie: &Serie,
    settings: &PieSettings,
    viewport: Viewport,
    frame: &SeriesFrame<'_>,
) {
    let Some(layout) = PieLayout::resolve(viewport, settings) else {
        trace!(serie = serie_index, "pie: degenerate layout skipped");
        return;
    };
    let slices = build_pie_slices(serie, settings);
    let hovered = frame
        .hover
        .primary()
        .filter(|(serie, _)| *serie == serie_index)
        .map(|(_, slice)| slice);

    for slice in &slices {
        let key = (serie_index, slice.index);
        let is_exploded = exploded(settings, hovered, slice);
        let Some(shape) = slice_shape(slice, &layout, settings, is_exploded) else {
            continue;
        };
        let allow_rounding = !(is_exploded && settings.explode_mode == ExplodeMode::Translate);
        let outline = slice_outline(&shape, settings.corner_radius, allow_rounding);
        let color = if settings.explode_mode == ExplodeMode::Color {
            frame.tinted(slice.color, key)
        } else {
            slice.color
        };

        let path = outline.path();
        match settings.texture {
            Some(texture)
                if frame.capabilities.extended_rendering
                    && shape.inner_radius <= 0.0
                    && outline.rings.len() == 1 =>
            {
                fan_mesh(shape.center, &outline.rings[0], color).upload(surface, Some(texture));
            }
            _ => fill_path(surface, &path, color),
        }
        if let Some(stroke) = settings.stroke {
            stroke_path(surface, &path, stroke);
        }
        if settings.explode_mode == ExplodeMode::Stroke {
            let alpha = frame.highlight(key);
            if alpha > 0.0 {
                stroke_path(
                    surface,
                    &path,
                    StrokeStyle::new(HIGHLIGHT_STROKE_WIDTH, slice.color.with_alpha(alpha)),
                );
            }
        }
    }

    if settings.label.placement == PieLabelPlacement::Outside {
        for label in pie_labels(&slices, &layout, settings, hovered, frame.label_style) {
            if let Some(leader) = &label.leader {
                stroke_path(surface, &Path::from_points(&leader.points, false), leader.stroke);
            }
        }
    }
}
