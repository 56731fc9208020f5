use std::collections::HashMap;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{
    BarSettings, CategoryWindow, CoordinateMapper, Corners, PixelPoint, PixelRect, Serie,
    SeriesKind, clamp_corner_radius, finite_or_zero, rounded_rect_path,
};
use crate::interaction::HoverKey;
use crate::labels::{LabelAnchor, LabelDescriptor, LabelStyle, format_label_value, series_label_key};
use crate::render::{Color, DrawSurface, Path, StrokeStyle, fill_path, stroke_path};
use crate::series::{SeriesFrame, resolve_color};

/// Fraction of a category slot shared by all bar groups.
pub const BAR_SLOT_FILL: f64 = 0.8;

/// A visible bar series with its settings.
#[derive(Debug, Clone, Copy)]
pub struct BarSerie<'a> {
    pub index: usize,
    pub serie: &'a Serie,
    pub settings: &'a BarSettings,
}

/// Stack group identity: a shared key, or a lone ungrouped series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StackKey {
    Named(String),
    Single(usize),
}

/// Groups series by stack key in first-seen order; values are positions in `series`.
#[must_use]
pub fn stack_groups(series: &[BarSerie<'_>]) -> IndexMap<StackKey, Vec<usize>> {
    let mut groups: IndexMap<StackKey, Vec<usize>> = IndexMap::new();
    for (position, bar) in series.iter().enumerate() {
        let key = match &bar.settings.stack_group {
            Some(name) => StackKey::Named(name.clone()),
            None => StackKey::Single(bar.index),
        };
        groups.entry(key).or_default().push(position);
    }
    groups
}

/// Resolved bar sizing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub bar_width: f64,
    pub bar_gap: f64,
    pub group_count: usize,
    pub total_group_width: f64,
    pub edge_padding: f64,
}

impl BarLayout {
    /// `bar_width = min(configured, (length / slots · 0.8) / groups)`.
    #[must_use]
    pub fn resolve(
        configured_width: f64,
        bar_gap: f64,
        group_count: usize,
        slot_count: f64,
        plot_length: f64,
        window: Option<CategoryWindow>,
    ) -> Self {
        let groups = group_count.max(1) as f64;
        let slots = if slot_count.is_finite() && slot_count >= 1.0 {
            slot_count
        } else {
            1.0
        };
        let auto_width = (plot_length / slots * BAR_SLOT_FILL) / groups;
        let bar_width = finite_or_zero(configured_width.min(auto_width)).max(0.0);
        let bar_gap = finite_or_zero(bar_gap).max(0.0);
        let total_group_width = groups * bar_width + (groups - 1.0) * bar_gap;
        let edge_padding = window
            .map(|w| w.edge_padding(total_group_width, plot_length))
            .unwrap_or(0.0);
        Self {
            bar_width,
            bar_gap,
            group_count,
            total_group_width,
            edge_padding,
        }
    }

    /// Offset of group `group_index` from its category center.
    #[must_use]
    pub fn group_offset(&self, group_index: usize) -> f64 {
        group_index as f64 * (self.bar_width + self.bar_gap) - self.total_group_width * 0.5
            + self.bar_width * 0.5
    }
}

/// Number of category slots visible on the X axis of `mapper`.
#[must_use]
pub fn slot_count(mapper: &CoordinateMapper) -> f64 {
    match mapper.category_window() {
        Some(window) => window.span(),
        None => {
            let range = mapper.range();
            let raw = (range.x_max - range.x_min + 1.0).round();
            if raw.is_finite() && raw >= 1.0 { raw } else { 1.0 }
        }
    }
}

/// One stacked bar segment in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedBar {
    pub serie_index: usize,
    pub point_index: usize,
    pub group_index: usize,
    pub x: f64,
    pub category_index: i64,
    pub value: f64,
    pub base: f64,
    pub top: f64,
    /// Last series of its stack group; only these get rounded ends.
    pub is_outer: bool,
}

/// Accumulates bar values per stack group and category.
///
/// Positive and negative values keep separate running totals, so mixed-sign
/// stacks grow away from the baseline in both directions. Values are scaled by
/// `progress` first.
#[must_use]
pub fn stack_bars(series: &[BarSerie<'_>], progress: f64) -> Vec<StackedBar> {
    let progress = finite_or_zero(progress).clamp(0.0, 1.0);
    let groups = stack_groups(series);
    let mut out = Vec::new();
    for (group_index, members) in groups.values().enumerate() {
        let mut totals: HashMap<i64, (f64, f64)> = HashMap::new();
        for (member, &position) in members.iter().enumerate() {
            let bar = series[position];
            let is_outer = member + 1 == members.len();
            for (point_index, point) in bar.serie.data.iter().enumerate() {
                if !point.value.is_finite() || !point.x.is_finite() {
                    trace!(serie = bar.index, point = point_index, "bar: non-finite point skipped");
                    continue;
                }
                let category_index = point.category_index();
                let value = point.value * progress;
                let (positive, negative) = totals.entry(category_index).or_insert((0.0, 0.0));
                let (base, top) = if value >= 0.0 {
                    let base = *positive;
                    *positive += value;
                    (base, *positive)
                } else {
                    let base = *negative;
                    *negative += value;
                    (base, *negative)
                };
                out.push(StackedBar {
                    serie_index: bar.index,
                    point_index,
                    group_index,
                    x: point.x,
                    category_index,
                    value,
                    base,
                    top,
                    is_outer,
                });
            }
        }
    }
    out
}

/// Pixel geometry of one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub serie_index: usize,
    pub point_index: usize,
    pub category_index: i64,
    pub x: f64,
    /// Unscaled data value.
    pub value: f64,
    pub rect: PixelRect,
    pub corners: Corners,
    pub corner_radius: f64,
    pub corner_segments: usize,
    pub color: Color,
    pub border: Option<StrokeStyle>,
    pub pick_radius: f64,
}

impl BarGeometry {
    #[must_use]
    pub fn key(&self) -> HoverKey {
        (self.serie_index, self.point_index)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.value >= 0.0
    }

    /// Whether the bar sits on category `category` once folded into the label list.
    #[must_use]
    pub fn matches_category(&self, category: usize, label_count: usize) -> bool {
        if label_count == 0 {
            return self.category_index == category as i64;
        }
        self.category_index.rem_euclid(label_count as i64) == category as i64
    }

    #[must_use]
    pub fn path(&self) -> Path {
        if self.corners.any() && self.corner_radius > 0.0 {
            rounded_rect_path(self.rect, self.corner_radius, self.corners, self.corner_segments)
        } else {
            rounded_rect_path(self.rect, 0.0, Corners::NONE, 1)
        }
    }
}

/// Projects stacked bars into pixel rectangles.
///
/// `mapper` gets the layout's edge padding applied. Bars on hidden categories
/// are dropped.
#[must_use]
pub fn build_bar_geometry(
    series: &[BarSerie<'_>],
    mapper: &CoordinateMapper,
    layout: &BarLayout,
    progress: f64,
) -> Vec<BarGeometry> {
    let mapper = mapper.with_edge_padding(layout.edge_padding);
    let window = mapper.category_window();
    let half = layout.bar_width * 0.5;
    let mut out = Vec::new();

    for stacked in stack_bars(series, progress) {
        if let Some(window) = window {
            if !window.is_category_index_visible(stacked.x) {
                continue;
            }
        }
        let Some(bar) = series.iter().find(|bar| bar.index == stacked.serie_index) else {
            continue;
        };
        let point = &bar.serie.data[stacked.point_index];
        let offset = layout.group_offset(stacked.group_index);
        let base = mapper.to_pixel(stacked.x, stacked.base);
        let top = mapper.to_pixel(stacked.x, stacked.top);

        let positive = stacked.value >= 0.0;
        let (rect, outer_corners) = if mapper.is_transposed() {
            let center_y = base.y - offset;
            let rect = PixelRect::from_corners(
                PixelPoint::new(base.x, center_y - half),
                PixelPoint::new(top.x, center_y + half),
            );
            (rect, if positive { Corners::RIGHT } else { Corners::LEFT })
        } else {
            let center_x = base.x + offset;
            let rect = PixelRect::from_corners(
                PixelPoint::new(center_x - half, base.y),
                PixelPoint::new(center_x + half, top.y),
            );
            (rect, if positive { Corners::TOP } else { Corners::BOTTOM })
        };

        let rounded = stacked.is_outer && bar.settings.corner_radius > 0.0;
        let corner_radius = if rounded {
            clamp_corner_radius(rect, bar.settings.corner_radius)
        } else {
            0.0
        };
        out.push(BarGeometry {
            serie_index: stacked.serie_index,
            point_index: stacked.point_index,
            category_index: stacked.category_index,
            x: stacked.x,
            value: point.value,
            rect,
            corners: if rounded { outer_corners } else { Corners::NONE },
            corner_radius,
            corner_segments: bar.settings.corner_segments,
            color: point
                .color
                .unwrap_or_else(|| resolve_color(bar.settings.color, bar.index)),
            border: bar.settings.border,
            pick_radius: finite_or_zero(bar.settings.pick_radius).max(0.0),
        });
    }
    out
}

/// Fills every non-degenerate bar, tinted by its hover fade, then strokes borders.
pub fn draw_bars<S: DrawSurface + ?Sized>(
    surface: &mut S,
    geometry: &[BarGeometry],
    frame: &SeriesFrame<'_>,
) {
    for bar in geometry {
        if bar.rect.is_degenerate() {
            trace!(serie = bar.serie_index, point = bar.point_index, "bar: degenerate rect skipped");
            continue;
        }
        let path = bar.path();
        fill_path(surface, &path, frame.tinted(bar.color, bar.key()));
        if let Some(border) = bar.border {
            stroke_path(surface, &path, border);
        }
    }
}

/// Index of the bar containing `point` (rects inflated by pick radius) whose
/// center is closest.
#[must_use]
pub fn hit_test_bars(geometry: &[BarGeometry], point: PixelPoint) -> Option<usize> {
    geometry
        .iter()
        .enumerate()
        .filter(|(_, bar)| bar.rect.inflate(bar.pick_radius).contains(point))
        .min_by_key(|(_, bar)| OrderedFloat(bar.rect.center().distance_squared(point)))
        .map(|(index, _)| index)
}

/// Indices of every bar on `category`, regardless of containment.
#[must_use]
pub fn category_hover_bars(
    geometry: &[BarGeometry],
    category: usize,
    label_count: usize,
) -> Vec<usize> {
    geometry
        .iter()
        .enumerate()
        .filter(|(_, bar)| bar.matches_category(category, label_count))
        .map(|(index, _)| index)
        .collect()
}

/// Value labels at the outer end of each bar.
///
/// The preloaded category past the window edge is drawn but not labelled.
#[must_use]
pub fn bar_labels(
    geometry: &[BarGeometry],
    series: &[BarSerie<'_>],
    window: Option<CategoryWindow>,
    transposed: bool,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    let mut labels = Vec::new();
    for bar in geometry {
        let Some(owner) = series.iter().find(|owner| owner.index == bar.serie_index) else {
            continue;
        };
        if !owner.settings.show_labels {
            continue;
        }
        if window.is_some_and(|w| w.is_edge_category_index_for_label(bar.x)) {
            continue;
        }
        let point = &owner.serie.data[bar.point_index];
        let gap = owner.settings.label_offset;
        let center = bar.rect.center();
        let (anchor, dx, dy, mode) = match (transposed, bar.is_positive()) {
            (false, true) => (PixelPoint::new(center.x, bar.rect.y), 0.0, -gap, LabelAnchor::Bottom),
            (false, false) => (
                PixelPoint::new(center.x, bar.rect.bottom()),
                0.0,
                gap,
                LabelAnchor::Top,
            ),
            (true, true) => (
                PixelPoint::new(bar.rect.right(), center.y),
                gap,
                0.0,
                LabelAnchor::Left,
            ),
            (true, false) => (PixelPoint::new(bar.rect.x, center.y), -gap, 0.0, LabelAnchor::Right),
        };
        labels.push(
            LabelDescriptor::new(
                series_label_key(
                    SeriesKind::Bar,
                    bar.serie_index,
                    &point.key_fragment(bar.point_index),
                ),
                format_label_value(bar.value),
                anchor,
            )
            .with_offset(dx, dy)
            .with_anchor_mode(mode)
            .with_style(style),
        );
    }
    labels
}
