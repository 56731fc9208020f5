use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{
    CoordinateMapper, PixelPoint, PixelRect, ScatterSettings, Serie, SeriesKind, SymbolShape,
    finite_or_zero,
};
use crate::interaction::HoverKey;
use crate::labels::{LabelAnchor, LabelDescriptor, LabelStyle, format_label_value, series_label_key};
use crate::render::{Color, DrawSurface, Path, fill_path, quad_mesh, stroke_path};
use crate::series::{SeriesFrame, resolve_color};

/// A projected scatter symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterSymbol {
    pub serie_index: usize,
    pub point_index: usize,
    pub center: PixelPoint,
    /// Diameter in pixels.
    pub size: f64,
    pub color: Color,
}

impl ScatterSymbol {
    #[must_use]
    pub fn key(&self) -> HoverKey {
        (self.serie_index, self.point_index)
    }

    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        let half = self.size * 0.5;
        PixelRect::new(self.center.x - half, self.center.y - half, self.size, self.size)
    }
}

/// Symbol diameter: `|z| · factor` in bubble mode, else the fixed size.
#[must_use]
pub fn symbol_size(settings: &ScatterSettings, z: f64) -> f64 {
    match settings.z_size_factor {
        Some(factor) => finite_or_zero(z.abs() * factor).max(0.0),
        None => finite_or_zero(settings.symbol_size).max(0.0),
    }
}

/// Outline of one symbol of diameter `size` centred on `center`.
#[must_use]
pub fn symbol_path(center: PixelPoint, size: f64, shape: SymbolShape) -> Path {
    let half = size * 0.5;
    let mut path = Path::new();
    if half <= 0.0 || !center.is_finite() {
        return path;
    }
    match shape {
        SymbolShape::Circle => {
            path.move_to(center.offset(half, 0.0));
            path.arc(center, half, 0.0, std::f64::consts::TAU);
            path.close();
        }
        SymbolShape::Square => {
            path = Path::from_points(
                &[
                    center.offset(-half, -half),
                    center.offset(half, -half),
                    center.offset(half, half),
                    center.offset(-half, half),
                ],
                true,
            );
        }
        SymbolShape::Diamond => {
            path = Path::from_points(
                &[
                    center.offset(0.0, -half),
                    center.offset(half, 0.0),
                    center.offset(0.0, half),
                    center.offset(-half, 0.0),
                ],
                true,
            );
        }
    }
    path
}

/// Projects visible, finite points of a scatter series.
#[must_use]
pub fn project_scatter(
    serie_index: usize,
    serie: &Serie,
    settings: &ScatterSettings,
    mapper: &CoordinateMapper,
) -> Vec<ScatterSymbol> {
    let window = mapper.category_window();
    let base_color = resolve_color(settings.color, serie_index);
    serie
        .data
        .iter()
        .enumerate()
        .filter(|(_, point)| point.x.is_finite() && point.y.is_finite())
        .filter(|(_, point)| window.is_none_or(|w| w.is_category_index_visible(point.x)))
        .map(|(point_index, point)| ScatterSymbol {
            serie_index,
            point_index,
            center: mapper.to_pixel(point.x, point.y),
            size: symbol_size(settings, point.z),
            color: point.color.unwrap_or(base_color),
        })
        .collect()
}

/// Closest symbol whose radius plus `pick_radius` reaches `point`.
#[must_use]
pub fn hit_test_scatter(
    symbols: &[ScatterSymbol],
    point: PixelPoint,
    pick_radius: f64,
) -> Option<usize> {
    symbols
        .iter()
        .enumerate()
        .map(|(index, symbol)| (index, symbol, symbol.center.distance(point)))
        .filter(|(_, symbol, distance)| *distance <= symbol.size * 0.5 + pick_radius)
        .min_by_key(|(_, _, distance)| OrderedFloat(*distance))
        .map(|(index, _, _)| index)
}

/// Draws symbols scaled by reveal progress; textured quads when available.
pub fn draw_scatter<S: DrawSurface + ?Sized>(
    surface: &mut S,
    symbols: &[ScatterSymbol],
    settings: &ScatterSettings,
    frame: &SeriesFrame<'_>,
) {
    for symbol in symbols {
        let size = symbol.size * frame.progress;
        if size <= 0.0 {
            trace!(serie = symbol.serie_index, point = symbol.point_index, "scatter: empty symbol skipped");
            continue;
        }
        let color = frame.tinted(symbol.color, symbol.key());
        match settings.texture {
            Some(texture) if frame.capabilities.extended_rendering => {
                let half = size * 0.5;
                let rect = PixelRect::new(symbol.center.x - half, symbol.center.y - half, size, size);
                quad_mesh(rect, color).upload(surface, Some(texture));
            }
            _ => {
                let path = symbol_path(symbol.center, size, settings.symbol);
                fill_path(surface, &path, color);
                if let Some(border) = settings.border {
                    stroke_path(surface, &path, border);
                }
            }
        }
    }
}

#[must_use]
pub fn scatter_labels(
    serie: &Serie,
    symbols: &[ScatterSymbol],
    settings: &ScatterSettings,
    mapper: &CoordinateMapper,
    style: LabelStyle,
) -> Vec<LabelDescriptor> {
    if !settings.show_labels {
        return Vec::new();
    }
    let window = mapper.category_window();
    symbols
        .iter()
        .filter(|symbol| {
            let x = serie.data[symbol.point_index].x;
            !window.is_some_and(|w| w.is_edge_category_index_for_label(x))
        })
        .map(|symbol| {
            let point = &serie.data[symbol.point_index];
            LabelDescriptor::new(
                series_label_key(
                    SeriesKind::Scatter,
                    symbol.serie_index,
                    &point.key_fragment(symbol.point_index),
                ),
                format_label_value(point.y),
                symbol.center,
            )
            .with_offset(0.0, -(symbol.size * 0.5 + settings.label_offset))
            .with_anchor_mode(LabelAnchor::Bottom)
            .with_style(style)
        })
        .collect()
}
