use tracing::{trace, warn};

use crate::core::{
    AxisRole, CoordinateMapper, HeatmapSettings, LinearScale, PixelPoint, PixelRect, Serie,
    SeriesKind, finite_or_zero,
};
use crate::interaction::HoverKey;
use crate::labels::{LabelAnchor, LabelDescriptor, LabelStyle, format_label_value, series_label_key};
use crate::render::{Color, DrawSurface, Path, fill_path, stroke_path};
use crate::series::SeriesFrame;

/// One projected heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapCell {
    pub serie_index: usize,
    pub point_index: usize,
    pub value: f64,
    pub rect: PixelRect,
    pub color: Color,
}

impl HeatmapCell {
    #[must_use]
    pub fn key(&self) -> HoverKey {
        (self.serie_index, self.point_index)
    }
}

/// Value domain: the explicit range, else the finite data extent.
#[must_use]
pub fn heatmap_value_range(serie: &Serie, settings: &HeatmapSettings) -> (f64, f64) {
    if let Some(range) = settings.value_range {
        return range;
    }
    let (min, max) = serie
        .data
        .iter()
        .map(|point| point.value)
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min.is_finite() { (min, max) } else { (0.0, 1.0) }
}

/// Interpolates between the min and max colours; a flat domain maps to the min colour.
#[must_use]
pub fn heatmap_color(settings: &HeatmapSettings, range: (f64, f64), value: f64) -> Color {
    let t = LinearScale::new(range.0, range.1).ratio(value).clamp(0.0, 1.0);
    settings.min_color.lerp(settings.max_color, t)
}

/// Projects cells of a heatmap whose X and Y axes are both category axes.
///
/// Returns an empty list (with a warning) on any other axis combination.
#[must_use]
pub fn build_heatmap_cells(
    serie_index: usize,
    serie: &Serie,
    settings: &HeatmapSettings,
    mapper: &CoordinateMapper,
) -> Vec<HeatmapCell> {
    let (Some(columns), Some(rows)) = (
        mapper.scale(AxisRole::X).window(),
        mapper.scale(AxisRole::Y).window(),
    ) else {
        warn!(serie = serie_index, "heatmap needs category axes on both X and Y");
        return Vec::new();
    };
    let column_px = columns.slot_width(mapper.x_length());
    let row_px = rows.slot_width(mapper.y_length());
    let (cell_w, cell_h) = if mapper.is_transposed() {
        (row_px, column_px)
    } else {
        (column_px, row_px)
    };
    let gap = finite_or_zero(settings.cell_gap).max(0.0);
    let width = (cell_w - gap).max(0.0);
    let height = (cell_h - gap).max(0.0);
    let range = heatmap_value_range(serie, settings);

    serie
        .data
        .iter()
        .enumerate()
        .filter(|(_, point)| point.x.is_finite() && point.y.is_finite() && point.value.is_finite())
        .filter(|(_, point)| {
            columns.is_category_index_visible(point.x) && rows.is_category_index_visible(point.y)
        })
        .map(|(point_index, point)| {
            let center = mapper.to_pixel(point.x, point.y);
            HeatmapCell {
                serie_index,
                point_index,
                value: point.value,
                rect: PixelRect::new(
                    center.x - width * 0.5,
                    center.y - height * 0.5,
                    width,
                    height,
                ),
                color: point
                    .color
                    .unwrap_or_else(|| heatmap_color(settings, range, point.value)),
            }
        })
        .collect()
}

/// Fills cells faded in by reveal progress; hovered cells are tinted.
pub fn draw_heatmap<S: DrawSurface + ?Sized>(
    surface: &mut S,
    cells: &[HeatmapCell],
    settings: &HeatmapSettings,
    frame: &SeriesFrame<'_>,
) {
    for cell in cells {
        if cell.rect.is_degenerate() {
            trace!(serie = cell.serie_index, point = cell.point_index, "heatmap: empty cell skipped");
            continue;
        }
        let color = frame.tinted(cell.color, cell.key());
        let path = Path::from_points(
            &[
                PixelPoint::new(cell.rect.x, cell.rect.y),
                PixelPoint::new(cell.rect.right(), cell.rect.y),
                PixelPoint::new(cell.rect.right(), cell.rect.bottom()),
                PixelPoint::new(cell.rect.x, cell.rect.bottom()),
            ],
            true,
        );
        fill_path(surface, &path, color.with_alpha(color.alpha * frame.progress));
        if let Some(border) = settings.border {
            stroke_path(surface, &path, border);
        }
    }
}

#[must_use]
pub fn hit_test_heatmap(cells: &[HeatmapCell], point: PixelPoint) -> Option<usize> {
    cells.iter().position(|cell| cell.rect.contains(point))
}

/// Value labels centred in each cell.
#[must_use]
pub fn heatmap_labels(
    serie: &Serie,
    cells: &[HeatmapCell],
    settings: &HeatmapSettings,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    if !settings.show_labels {
        return Vec::new();
    }
    cells
        .iter()
        .map(|cell| {
            let point = &serie.data[cell.point_index];
            LabelDescriptor::new(
                series_label_key(
                    SeriesKind::Heatmap,
                    cell.serie_index,
                    &point.key_fragment(cell.point_index),
                ),
                format_label_value(cell.value),
                cell.rect.center(),
            )
            .with_anchor_mode(LabelAnchor::Center)
            .with_style(style)
        })
        .collect()
}
