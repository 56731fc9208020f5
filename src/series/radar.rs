use tracing::{trace, warn};

use crate::core::polar::{compass_direction, polar_point};
use crate::core::{
    AxisConfig, LinearScale, PixelPoint, PolarLayout, RadarSettings, Serie, SeriesKind, Viewport,
    finite_or_zero,
};
use crate::labels::{LabelAnchor, LabelDescriptor, LabelStyle, format_label_value, series_label_key};
use crate::render::{DrawSurface, Path, StrokeStyle, fill_path, stroke_path};
use crate::series::{SeriesFrame, resolve_color};

/// Radar charts need at least this many dimensions.
pub const MIN_RADAR_DIMENSIONS: usize = 3;

/// A visible radar series with its settings.
#[derive(Debug, Clone, Copy)]
pub struct RadarSerie<'a> {
    pub index: usize,
    pub serie: &'a Serie,
    pub settings: &'a RadarSettings,
}

/// Resolved polar geometry shared by every radar series of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarLayout {
    pub center: PixelPoint,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub dimension_count: usize,
    pub min: f64,
    pub max: f64,
    /// Compass degrees of dimension 0.
    pub start_angle: f64,
    pub clockwise: bool,
    pub ring_count: usize,
    pub progress: f64,
}

fn round_down(value: f64, unit: Option<f64>) -> f64 {
    unit.map_or(value, |unit| (value / unit).floor() * unit)
}

fn round_up(value: f64, unit: Option<f64>) -> f64 {
    unit.map_or(value, |unit| (value / unit).ceil() * unit)
}

impl RadarLayout {
    /// Derives the layout, or `None` when the plot is degenerate or there are
    /// fewer than three dimensions.
    ///
    /// The dimension count comes from the angle-axis labels, else the longest
    /// series. The value range defaults to `[min(0, data_min), data_max]`,
    /// rounded outward to the configured unit; radius-axis min/max override it.
    #[must_use]
    pub fn resolve(
        series: &[RadarSerie<'_>],
        angle_axis: &AxisConfig,
        radius_axis: &AxisConfig,
        polar: &PolarLayout,
        viewport: Viewport,
        progress: f64,
    ) -> Option<Self> {
        if !viewport.is_valid() {
            return None;
        }
        let dimension_count = if angle_axis.labels.is_empty() {
            series
                .iter()
                .map(|radar| radar.serie.data.len())
                .max()
                .unwrap_or(0)
        } else {
            angle_axis.labels.len()
        };
        if dimension_count < MIN_RADAR_DIMENSIONS {
            warn!(dimension_count, "radar needs at least three dimensions");
            return None;
        }

        let values = series
            .iter()
            .flat_map(|radar| radar.serie.data.iter().take(dimension_count))
            .map(|point| point.value)
            .filter(|value| value.is_finite());
        let (data_min, data_max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |acc, v| {
            (acc.0.min(v), acc.1.max(v))
        });
        let (data_min, data_max) = if data_min.is_finite() {
            (data_min, data_max)
        } else {
            (0.0, 1.0)
        };
        let unit = polar.rounding.unit();
        let min = radius_axis
            .min
            .unwrap_or_else(|| round_down(data_min.min(0.0), unit));
        let max = radius_axis
            .max
            .unwrap_or_else(|| round_up(data_max, unit));

        let base = viewport.width.min(viewport.height) * 0.5;
        let outer_radius = finite_or_zero(base * polar.outer_radius_ratio).max(0.0);
        let inner_radius = finite_or_zero(base * polar.inner_radius_ratio)
            .max(0.0)
            .min(outer_radius);
        let (cx, cy) = polar.center_ratio;
        Some(Self {
            center: PixelPoint::new(viewport.width * cx, viewport.height * cy),
            inner_radius,
            outer_radius,
            dimension_count,
            min,
            max,
            start_angle: polar.start_angle_deg,
            clockwise: polar.clockwise,
            ring_count: polar.ring_count.max(1),
            progress: finite_or_zero(progress).clamp(0.0, 1.0),
        })
    }

    /// Compass angle of dimension `index`.
    #[must_use]
    pub fn dimension_angle(&self, index: usize) -> f64 {
        let sign = if self.clockwise { 1.0 } else { -1.0 };
        self.start_angle + sign * index as f64 * 360.0 / self.dimension_count as f64
    }

    #[must_use]
    pub fn direction(&self, index: usize) -> PixelPoint {
        compass_direction(self.dimension_angle(index))
    }

    /// Radius of `value`, scaled toward the inner radius by reveal progress.
    #[must_use]
    pub fn radius_for(&self, value: f64) -> f64 {
        let ratio = LinearScale::new(self.min, self.max).ratio(value);
        let full = self.inner_radius + ratio * (self.outer_radius - self.inner_radius);
        finite_or_zero(self.inner_radius + (full - self.inner_radius) * self.progress)
    }

    #[must_use]
    pub fn vertex(&self, index: usize, value: f64) -> PixelPoint {
        polar_point(self.center, self.direction(index), self.radius_for(value))
    }

    /// Radius of grid ring `k` in `1..=ring_count`.
    #[must_use]
    pub fn ring_radius(&self, ring: usize) -> f64 {
        self.inner_radius
            + (self.outer_radius - self.inner_radius) * ring as f64 / self.ring_count as f64
    }

    #[must_use]
    pub fn ring_polygon(&self, ring: usize) -> Vec<PixelPoint> {
        let radius = self.ring_radius(ring);
        (0..self.dimension_count)
            .map(|i| polar_point(self.center, self.direction(i), radius))
            .collect()
    }

    /// Spokes from the inner to the outer radius along each dimension.
    #[must_use]
    pub fn spokes(&self) -> Vec<(PixelPoint, PixelPoint)> {
        (0..self.dimension_count)
            .map(|i| {
                let direction = self.direction(i);
                (
                    polar_point(self.center, direction, self.inner_radius),
                    polar_point(self.center, direction, self.outer_radius),
                )
            })
            .collect()
    }

    /// Polygon vertices of `serie`, one per dimension that has a finite value.
    #[must_use]
    pub fn polygon(&self, serie: &Serie) -> Vec<(usize, PixelPoint)> {
        serie
            .data
            .iter()
            .take(self.dimension_count)
            .enumerate()
            .filter(|(_, point)| point.value.is_finite())
            .map(|(index, point)| (index, self.vertex(index, point.value)))
            .collect()
    }
}

/// Draws rings (outer ring in the edge colour) and spokes.
pub fn draw_radar_grid<S: DrawSurface + ?Sized>(
    surface: &mut S,
    layout: &RadarLayout,
    polar: &PolarLayout,
) {
    for ring in 1..=layout.ring_count {
        let color = if ring == layout.ring_count {
            polar.edge_color
        } else {
            polar.ring_color
        };
        let path = Path::from_points(&layout.ring_polygon(ring), true);
        stroke_path(surface, &path, StrokeStyle::new(polar.grid_width, color));
    }
    for (from, to) in layout.spokes() {
        let path = Path::from_points(&[from, to], false);
        stroke_path(surface, &path, StrokeStyle::new(polar.grid_width, polar.spoke_color));
    }
}

/// Draws one radar polygon with optional fill and hover-faded vertex symbols.
pub fn draw_radar<S: DrawSurface + ?Sized>(
    surface: &mut S,
    radar: &RadarSerie<'_>,
    layout: &RadarLayout,
    frame: &SeriesFrame<'_>,
) {
    let vertices = layout.polygon(radar.serie);
    if vertices.len() < 2 {
        trace!(serie = radar.index, "radar: polygon skipped");
        return;
    }
    let color = resolve_color(radar.settings.color, radar.index);
    let points: Vec<PixelPoint> = vertices.iter().map(|(_, p)| *p).collect();
    let path = Path::from_points(&points, true);
    if let Some(opacity) = radar.settings.area_opacity {
        fill_path(surface, &path, color.with_alpha(color.alpha * opacity.clamp(0.0, 1.0)));
    }
    stroke_path(surface, &path, StrokeStyle::new(radar.settings.line_width, color));

    let radius = radar.settings.symbol_size * 0.5;
    if radius <= 0.0 {
        return;
    }
    for (index, vertex) in &vertices {
        let highlight = frame.highlight((radar.index, *index));
        let fill = if highlight > 0.0 {
            color.lighten(crate::series::HOVER_TINT * highlight)
        } else {
            color
        };
        let mut symbol = Path::new();
        symbol.move_to(vertex.offset(radius, 0.0));
        symbol.arc(*vertex, radius, 0.0, std::f64::consts::TAU);
        symbol.close();
        fill_path(surface, &symbol, fill);
    }
}

/// Vertex hit by a pointer query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarHit {
    pub serie_index: usize,
    pub dimension: usize,
    pub pixel: PixelPoint,
    pub value: f64,
}

/// Closest vertex across all series within its series pick radius.
#[must_use]
pub fn hit_test_radar(
    series: &[RadarSerie<'_>],
    layout: &RadarLayout,
    point: PixelPoint,
) -> Option<RadarHit> {
    let mut best: Option<(f64, RadarHit)> = None;
    for radar in series {
        let pick = radar.settings.pick_radius.max(0.0);
        for (dimension, vertex) in layout.polygon(radar.serie) {
            let distance = vertex.distance_squared(point);
            if distance > pick * pick {
                continue;
            }
            if best.as_ref().is_none_or(|(current, _)| distance < *current) {
                best = Some((
                    distance,
                    RadarHit {
                        serie_index: radar.index,
                        dimension,
                        pixel: vertex,
                        value: radar.serie.data[dimension].value,
                    },
                ));
            }
        }
    }
    best.map(|(_, hit)| hit)
}

/// Vertex value labels.
#[must_use]
pub fn radar_labels(
    radar: &RadarSerie<'_>,
    layout: &RadarLayout,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    if !radar.settings.show_labels {
        return Vec::new();
    }
    layout
        .polygon(radar.serie)
        .into_iter()
        .map(|(index, vertex)| {
            let point = &radar.serie.data[index];
            LabelDescriptor::new(
                series_label_key(SeriesKind::Radar, radar.index, &point.key_fragment(index)),
                format_label_value(point.value),
                vertex,
            )
            .with_offset(0.0, -(radar.settings.symbol_size * 0.5 + 2.0))
            .with_anchor_mode(LabelAnchor::Bottom)
            .with_style(style)
        })
        .collect()
}

/// Dimension name labels just outside the outer ring.
#[must_use]
pub fn indicator_labels(
    layout: &RadarLayout,
    angle_axis: &AxisConfig,
    polar: &PolarLayout,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    (0..layout.dimension_count)
        .filter_map(|index| {
            let text = angle_axis.category_label(index)?;
            let direction = layout.direction(index);
            let anchor = polar_point(
                layout.center,
                direction,
                layout.outer_radius + polar.indicator_gap,
            );
            let mode = if direction.x > 1e-6 {
                LabelAnchor::Left
            } else if direction.x < -1e-6 {
                LabelAnchor::Right
            } else if direction.y < 0.0 {
                LabelAnchor::Bottom
            } else {
                LabelAnchor::Top
            };
            Some(
                LabelDescriptor::new(format!("radar-indicator:{index}"), text, anchor)
                    .with_anchor_mode(mode)
                    .with_style(style)
                    .clipped(false),
            )
        })
        .collect()
}
