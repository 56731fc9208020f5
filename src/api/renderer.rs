use tracing::{debug, trace, warn};

use crate::core::polar::{math_direction, polar_point};
use crate::core::{
    AxisConfig, ChartData, CoordinateMapper, CoordinateSystem, PixelPoint, PolarLayout, Serie,
    SeriesKind, SeriesSettings,
};
use crate::error::ChartResult;
use crate::interaction::{HitItem, HoverFade, HoverKey, HoverState, TooltipResult};
use crate::labels::{LabelController, LabelDescriptor, LabelPool};
use crate::render::{Color, DrawSurface};
use crate::series::SeriesFrame;
use crate::series::bar::{
    BarGeometry, BarLayout, BarSerie, bar_labels, build_bar_geometry, category_hover_bars,
    draw_bars, hit_test_bars, slot_count, stack_groups,
};
use crate::series::heatmap::{build_heatmap_cells, draw_heatmap, heatmap_labels, hit_test_heatmap};
use crate::series::line::{draw_line, hit_test_line, line_labels, project_line_points};
use crate::series::pie::{
    PieLayout, build_pie_slices, draw_pie, hit_test_pie, pie_labels, slice_shape,
};
use crate::series::radar::{
    RadarLayout, RadarSerie, draw_radar, draw_radar_grid, hit_test_radar, indicator_labels,
    radar_labels,
};
use crate::series::resolve_color;
use crate::series::scatter::{draw_scatter, hit_test_scatter, project_scatter, scatter_labels};
use crate::telemetry::{FRAME_TARGET, HOVER_TARGET};

use super::{FrameContext, RenderConfig};

/// Cartesian state resolved once per call.
struct CartesianPlot<'a> {
    /// Carries the bar edge padding so every series shares one category layout.
    mapper: CoordinateMapper,
    x_axis: &'a AxisConfig,
    bars: Vec<BarSerie<'a>>,
    bar_geometry: Vec<BarGeometry>,
}

/// Polar state resolved once per call.
struct PolarPlot<'a> {
    angle_axis: &'a AxisConfig,
    polar: PolarLayout,
    radars: Vec<RadarSerie<'a>>,
    layout: RadarLayout,
}

fn visible_series(data: &ChartData) -> impl Iterator<Item = (usize, &Serie)> {
    data.series
        .iter()
        .enumerate()
        .filter(|(_, serie)| serie.visible)
}

fn is_cartesian_kind(kind: SeriesKind) -> bool {
    matches!(
        kind,
        SeriesKind::Bar | SeriesKind::Line | SeriesKind::Scatter | SeriesKind::Heatmap
    )
}

fn resolve_cartesian<'a>(
    data: &'a ChartData,
    config: &RenderConfig,
    context: &FrameContext,
) -> Option<CartesianPlot<'a>> {
    let CoordinateSystem::Cartesian {
        x_axis,
        y_axis,
        transposed,
    } = data.coordinate_system
    else {
        return None;
    };
    let axes = data.axis(x_axis).and_then(|x| Ok((x, data.axis(y_axis)?)));
    let (x_axis, y_axis) = match axes {
        Ok(axes) => axes,
        Err(err) => {
            warn!(error = %err, "cartesian series skipped");
            return None;
        }
    };
    let mapper = CoordinateMapper::new(x_axis, y_axis, context.range, context.viewport)
        .transposed(transposed);

    let bars: Vec<BarSerie<'a>> = visible_series(data)
        .filter_map(|(index, serie)| match &serie.settings {
            SeriesSettings::Bar(settings) => Some(BarSerie {
                index,
                serie,
                settings,
            }),
            _ => None,
        })
        .collect();
    if bars.is_empty() {
        return Some(CartesianPlot {
            mapper,
            x_axis,
            bars,
            bar_geometry: Vec::new(),
        });
    }

    let layout = BarLayout::resolve(
        config.bar_width,
        config.bar_gap,
        stack_groups(&bars).len(),
        slot_count(&mapper),
        mapper.x_length(),
        mapper.category_window(),
    );
    let bar_geometry = build_bar_geometry(&bars, &mapper, &layout, context.progress());
    Some(CartesianPlot {
        mapper: mapper.with_edge_padding(layout.edge_padding),
        x_axis,
        bars,
        bar_geometry,
    })
}

fn resolve_polar<'a>(data: &'a ChartData, context: &FrameContext) -> Option<PolarPlot<'a>> {
    let CoordinateSystem::Polar {
        angle_axis,
        radius_axis,
        layout: polar,
    } = data.coordinate_system
    else {
        return None;
    };
    let axes = data
        .axis(angle_axis)
        .and_then(|angle| Ok((angle, data.axis(radius_axis)?)));
    let (angle_axis, radius_axis) = match axes {
        Ok(axes) => axes,
        Err(err) => {
            warn!(error = %err, "radar series skipped");
            return None;
        }
    };
    let radars: Vec<RadarSerie<'a>> = visible_series(data)
        .filter_map(|(index, serie)| match &serie.settings {
            SeriesSettings::Radar(settings) => Some(RadarSerie {
                index,
                serie,
                settings,
            }),
            _ => None,
        })
        .collect();
    let layout = RadarLayout::resolve(
        &radars,
        angle_axis,
        radius_axis,
        &polar,
        context.viewport,
        context.progress(),
    )?;
    Some(PolarPlot {
        angle_axis,
        polar,
        radars,
        layout,
    })
}

fn push_item(items: &mut Vec<HitItem>, item: HitItem) {
    if !items.iter().any(|existing| existing.key() == item.key()) {
        items.push(item);
    }
}

fn bar_item(data: &ChartData, plot: &CartesianPlot<'_>, bar: &BarGeometry) -> HitItem {
    let serie = &data.series[bar.serie_index];
    let point = &serie.data[bar.point_index];
    let label = point.name.clone().or_else(|| {
        plot.mapper
            .category_window()
            .and_then(|window| {
                let count = window.label_count().max(1) as i64;
                plot.x_axis
                    .category_label(bar.category_index.rem_euclid(count) as usize)
            })
            .map(str::to_owned)
    });
    let center = bar.rect.center();
    let anchor = match (plot.mapper.is_transposed(), bar.is_positive()) {
        (false, true) => PixelPoint::new(center.x, bar.rect.y),
        (false, false) => PixelPoint::new(center.x, bar.rect.bottom()),
        (true, true) => PixelPoint::new(bar.rect.right(), center.y),
        (true, false) => PixelPoint::new(bar.rect.x, center.y),
    };
    HitItem {
        serie_index: bar.serie_index,
        point_index: bar.point_index,
        kind: SeriesKind::Bar,
        serie_name: serie.name.clone(),
        label,
        x: bar.x,
        value: bar.value,
        color: bar.color,
        anchor,
    }
}

fn point_item(
    serie_index: usize,
    serie: &Serie,
    point_index: usize,
    value: f64,
    color: Color,
    anchor: PixelPoint,
) -> HitItem {
    let point = &serie.data[point_index];
    HitItem {
        serie_index,
        point_index,
        kind: serie.kind(),
        serie_name: serie.name.clone(),
        label: point.name.clone(),
        x: point.x,
        value,
        color: point.color.unwrap_or(color),
        anchor,
    }
}

/// Per-chart renderer: owns hover, fade and label-pool state across frames.
///
/// Inputs are read-only per call; the same renderer must not be driven from
/// two threads at once, but separate renderers are independent.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    config: RenderConfig,
    hover: HoverState,
    fade: HoverFade,
    labels: LabelPool,
}

impl ChartRenderer {
    pub fn new(config: RenderConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            fade: HoverFade::new(config.hover_fade_rate),
            config,
            hover: HoverState::default(),
            labels: LabelPool::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    #[must_use]
    pub fn fade(&self) -> &HoverFade {
        &self.fade
    }

    #[must_use]
    pub fn labels(&self) -> &LabelPool {
        &self.labels
    }

    fn series_frame(&self, context: &FrameContext) -> SeriesFrame<'_> {
        SeriesFrame {
            progress: context.progress(),
            capabilities: self.config.capabilities,
            hover: &self.hover,
            fade: &self.fade,
            label_style: self.config.label_style(),
        }
    }

    /// Draws every visible series onto `surface`.
    ///
    /// Bars are stacked across series and drawn together at the position of
    /// the first bar series; radar grids precede radar polygons. Series that
    /// need a missing coordinate system are skipped with a warning.
    pub fn generate_visual_content<S: DrawSurface + ?Sized>(
        &self,
        data: &ChartData,
        context: &FrameContext,
        surface: &mut S,
    ) {
        if !context.viewport.is_valid() {
            debug!(
                target: FRAME_TARGET,
                width = context.viewport.width,
                height = context.viewport.height,
                "degenerate viewport, nothing drawn"
            );
            return;
        }
        let frame = self.series_frame(context);
        let cartesian = resolve_cartesian(data, &self.config, context);
        let polar = resolve_polar(data, context);
        let mut bars_drawn = false;
        let mut radar_grid_drawn = false;
        let mut drawn = 0_usize;

        for (index, serie) in visible_series(data) {
            let kind = serie.kind();
            if is_cartesian_kind(kind) && cartesian.is_none() {
                warn!(serie = index, kind = kind.tag(), "series needs a cartesian coordinate system");
                continue;
            }
            match (&serie.settings, &cartesian) {
                (SeriesSettings::Bar(_), Some(plot)) => {
                    if !bars_drawn {
                        draw_bars(surface, &plot.bar_geometry, &frame);
                        bars_drawn = true;
                    }
                }
                (SeriesSettings::Line(settings), Some(plot)) => {
                    draw_line(surface, index, serie, settings, &plot.mapper, &frame);
                }
                (SeriesSettings::Scatter(settings), Some(plot)) => {
                    let symbols = project_scatter(index, serie, settings, &plot.mapper);
                    draw_scatter(surface, &symbols, settings, &frame);
                }
                (SeriesSettings::Heatmap(settings), Some(plot)) => {
                    let cells = build_heatmap_cells(index, serie, settings, &plot.mapper);
                    draw_heatmap(surface, &cells, settings, &frame);
                }
                (SeriesSettings::Pie(settings), _) => {
                    draw_pie(surface, index, serie, settings, context.viewport, &frame);
                }
                (SeriesSettings::Radar(_), _) => {
                    let Some(plot) = &polar else {
                        warn!(serie = index, "radar series needs a polar coordinate system");
                        continue;
                    };
                    if !radar_grid_drawn {
                        draw_radar_grid(surface, &plot.layout, &plot.polar);
                        radar_grid_drawn = true;
                    }
                    if let Some(radar) = plot.radars.iter().find(|radar| radar.index == index) {
                        draw_radar(surface, radar, &plot.layout, &frame);
                    }
                }
                _ => continue,
            }
            drawn += 1;
        }
        debug!(
            target: FRAME_TARGET,
            series = drawn,
            progress = frame.progress,
            "visual content generated"
        );
    }

    /// Rebuilds the label set for this frame and syncs it into `controller`.
    pub fn update_labels<C: LabelController + ?Sized>(
        &mut self,
        data: &ChartData,
        context: &FrameContext,
        controller: &mut C,
    ) {
        self.labels.begin_frame(context.viewport);
        if context.viewport.is_valid() {
            let labels = self.collect_labels(data, context);
            self.labels.extend(labels);
        }
        self.labels.finish_frame();
        self.labels.flush(controller);
    }

    fn collect_labels(&self, data: &ChartData, context: &FrameContext) -> Vec<LabelDescriptor> {
        let style = self.config.label_style();
        let progress = context.progress();
        let cartesian = resolve_cartesian(data, &self.config, context);
        let polar = resolve_polar(data, context);
        let mut out = Vec::new();

        if let Some(plot) = &cartesian {
            out.extend(bar_labels(
                &plot.bar_geometry,
                &plot.bars,
                plot.mapper.category_window(),
                plot.mapper.is_transposed(),
                style,
            ));
        }
        for (index, serie) in visible_series(data) {
            match (&serie.settings, &cartesian) {
                (SeriesSettings::Line(settings), Some(plot)) => {
                    out.extend(line_labels(index, serie, settings, &plot.mapper, progress, style));
                }
                (SeriesSettings::Scatter(settings), Some(plot)) => {
                    let symbols = project_scatter(index, serie, settings, &plot.mapper);
                    out.extend(scatter_labels(serie, &symbols, settings, &plot.mapper, style));
                }
                (SeriesSettings::Heatmap(settings), Some(plot)) => {
                    let cells = build_heatmap_cells(index, serie, settings, &plot.mapper);
                    out.extend(heatmap_labels(serie, &cells, settings, style));
                }
                (SeriesSettings::Pie(settings), _) => {
                    let Some(layout) = PieLayout::resolve(context.viewport, settings) else {
                        continue;
                    };
                    let slices = build_pie_slices(serie, settings);
                    let hovered = self
                        .hover
                        .primary()
                        .filter(|(serie_index, _)| *serie_index == index)
                        .map(|(_, slice)| slice);
                    out.extend(pie_labels(&slices, &layout, settings, hovered, style));
                }
                _ => {}
            }
        }
        if let Some(plot) = &polar {
            out.extend(indicator_labels(&plot.layout, plot.angle_axis, &plot.polar, style));
            for radar in &plot.radars {
                out.extend(radar_labels(radar, &plot.layout, style));
            }
        }
        out
    }

    /// Resolves the items under `point` and updates hover state.
    ///
    /// On category X axes every bar and line point sharing the hovered
    /// category is reported and the cursor snaps to the category center.
    pub fn get_tooltip(
        &mut self,
        data: &ChartData,
        context: &FrameContext,
        point: PixelPoint,
    ) -> TooltipResult {
        let inside = context.viewport.is_valid()
            && point.is_finite()
            && context.viewport.rect().contains(point);
        if !inside {
            let changed = self.hover.clear();
            return TooltipResult {
                repaint_requested: changed,
                ..TooltipResult::default()
            };
        }

        let mut result = TooltipResult::default();
        let mut primary: Option<HoverKey> = None;
        let mut category: Option<usize> = None;

        if let Some(plot) = resolve_cartesian(data, &self.config, context) {
            category = self.cartesian_hits(data, &plot, point, &mut result, &mut primary);
        }
        self.pie_hits(data, context, point, &mut result, &mut primary);
        if let Some(plot) = resolve_polar(data, context) {
            if let Some(hit) = hit_test_radar(&plot.radars, &plot.layout, point) {
                let serie = &data.series[hit.serie_index];
                let color = plot
                    .radars
                    .iter()
                    .find(|radar| radar.index == hit.serie_index)
                    .map(|radar| resolve_color(radar.settings.color, radar.index))
                    .unwrap_or_else(|| resolve_color(None, hit.serie_index));
                let mut item =
                    point_item(hit.serie_index, serie, hit.dimension, hit.value, color, hit.pixel);
                item.x = hit.dimension as f64;
                item.label = plot
                    .angle_axis
                    .category_label(hit.dimension)
                    .map(str::to_owned)
                    .or(item.label);
                primary.get_or_insert(item.key());
                result.snapped_cursor.get_or_insert(hit.pixel);
                push_item(&mut result.items, item);
            }
        }

        let hits: Vec<HoverKey> = result.items.iter().map(HitItem::key).collect();
        result.repaint_requested = self.hover.set(primary, category, hits);
        if result.repaint_requested {
            debug!(
                target: HOVER_TARGET,
                items = result.items.len(),
                primary = ?primary,
                category = ?category,
                "hover changed"
            );
        }
        result
    }

    /// Bar, line, scatter and heatmap hits; returns the hovered category.
    fn cartesian_hits(
        &self,
        data: &ChartData,
        plot: &CartesianPlot<'_>,
        point: PixelPoint,
        result: &mut TooltipResult,
        primary: &mut Option<HoverKey>,
    ) -> Option<usize> {
        let mapper = &plot.mapper;
        let window = mapper.category_window();
        let category = mapper.pixel_to_category(point);

        if let Some(hit) = hit_test_bars(&plot.bar_geometry, point) {
            let bar = &plot.bar_geometry[hit];
            primary.get_or_insert(bar.key());
            push_item(&mut result.items, bar_item(data, plot, bar));
        }

        if let (Some(window), Some(category)) = (window, category) {
            for index in category_hover_bars(&plot.bar_geometry, category, window.label_count()) {
                push_item(&mut result.items, bar_item(data, plot, &plot.bar_geometry[index]));
            }
            let center = mapper.to_pixel(category as f64, mapper.range().y_min);
            result.snapped_cursor = Some(if mapper.is_transposed() {
                PixelPoint::new(point.x, center.y)
            } else {
                PixelPoint::new(center.x, point.y)
            });
            result.category_label = plot.x_axis.category_label(category).map(str::to_owned);
        }

        for (index, serie) in visible_series(data) {
            match &serie.settings {
                SeriesSettings::Line(settings) => {
                    let points = project_line_points(serie, mapper);
                    let Some(hit) = hit_test_line(
                        &points,
                        mapper,
                        point,
                        self.config.line_hit_threshold_ratio,
                    ) else {
                        continue;
                    };
                    let value = serie.data[hit.point_index].y;
                    let color = resolve_color(settings.color, index);
                    let item = point_item(index, serie, hit.point_index, value, color, hit.pixel);
                    if hit.category.is_none() {
                        primary.get_or_insert(item.key());
                        result.snapped_cursor.get_or_insert(hit.pixel);
                    }
                    push_item(&mut result.items, item);
                }
                SeriesSettings::Scatter(settings) => {
                    let symbols = project_scatter(index, serie, settings, mapper);
                    let Some(hit) = hit_test_scatter(&symbols, point, settings.pick_radius) else {
                        continue;
                    };
                    let symbol = &symbols[hit];
                    let value = serie.data[symbol.point_index].y;
                    let item = point_item(
                        index,
                        serie,
                        symbol.point_index,
                        value,
                        symbol.color,
                        symbol.center,
                    );
                    primary.get_or_insert(item.key());
                    push_item(&mut result.items, item);
                }
                SeriesSettings::Heatmap(settings) => {
                    let cells = build_heatmap_cells(index, serie, settings, mapper);
                    let Some(hit) = hit_test_heatmap(&cells, point) else {
                        continue;
                    };
                    let cell = &cells[hit];
                    let item = point_item(
                        index,
                        serie,
                        cell.point_index,
                        cell.value,
                        cell.color,
                        cell.rect.center(),
                    );
                    primary.get_or_insert(item.key());
                    push_item(&mut result.items, item);
                }
                _ => {}
            }
        }
        trace!(category = ?category, items = result.items.len(), "cartesian hit-test");
        category
    }

    fn pie_hits(
        &self,
        data: &ChartData,
        context: &FrameContext,
        point: PixelPoint,
        result: &mut TooltipResult,
        primary: &mut Option<HoverKey>,
    ) {
        for (index, serie) in visible_series(data) {
            let SeriesSettings::Pie(settings) = &serie.settings else {
                continue;
            };
            let Some(layout) = PieLayout::resolve(context.viewport, settings) else {
                continue;
            };
            let slices = build_pie_slices(serie, settings);
            let Some(hit) = hit_test_pie(&slices, &layout, settings, point) else {
                continue;
            };
            let slice = &slices[hit];
            let anchor = slice_shape(slice, &layout, settings, false)
                .map(|shape| {
                    let mid = if shape.full_ring {
                        slice.mid_angle()
                    } else {
                        shape.mid_angle()
                    };
                    polar_point(
                        shape.center,
                        math_direction(mid),
                        (shape.inner_radius + shape.outer_radius) * 0.5,
                    )
                })
                .unwrap_or(layout.center);
            let item = HitItem {
                serie_index: index,
                point_index: slice.index,
                kind: SeriesKind::Pie,
                serie_name: serie.name.clone(),
                label: Some(slice.name.clone().unwrap_or_else(|| slice.id.clone())),
                x: slice.index as f64,
                value: slice.value,
                color: slice.color,
                anchor,
            };
            primary.get_or_insert(item.key());
            push_item(&mut result.items, item);
        }
    }

    /// Drops the hover selection and every fading highlight.
    pub fn clear_hover(&mut self) -> bool {
        let had_hover = self.hover.clear();
        let had_fade = !self.fade.is_empty();
        self.fade.clear();
        had_hover || had_fade
    }

    /// Steps hover highlight fades by `dt` seconds; `true` while still animating.
    pub fn advance_hover_animation(&mut self, dt: f64) -> bool {
        let targets = self.hover.targets();
        self.fade.advance(dt, &targets)
    }
}
