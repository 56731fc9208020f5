use serde::{Deserialize, Serialize};

use crate::render::{Color, DashPattern, StrokeStyle, TextureId};

/// Per-series render settings, one variant per series kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesSettings {
    Bar(BarSettings),
    Line(LineSettings),
    Scatter(ScatterSettings),
    Pie(PieSettings),
    Radar(RadarSettings),
    Heatmap(HeatmapSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSettings {
    #[serde(default)]
    pub color: Option<Color>,
    /// Series sharing a key accumulate on top of each other.
    #[serde(default)]
    pub stack_group: Option<String>,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default = "default_corner_segments")]
    pub corner_segments: usize,
    /// Extra pixels added around each bar for hit-testing.
    #[serde(default)]
    pub pick_radius: f64,
    #[serde(default)]
    pub border: Option<StrokeStyle>,
    #[serde(default)]
    pub show_labels: bool,
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            color: None,
            stack_group: None,
            corner_radius: 0.0,
            corner_segments: default_corner_segments(),
            pick_radius: 0.0,
            border: None,
            show_labels: false,
            label_offset: default_label_offset(),
        }
    }
}

impl BarSettings {
    #[must_use]
    pub fn stacked(group: impl Into<String>) -> Self {
        Self {
            stack_group: Some(group.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineInterpolation {
    #[default]
    Straight,
    /// Horizontal-then-vertical corner before each point.
    Step,
    /// Cubic Bézier with control points offset horizontally by half the segment width.
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaStyle {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_area_opacity")]
    pub opacity: f64,
}

impl Default for AreaStyle {
    fn default() -> Self {
        Self {
            color: None,
            opacity: default_area_opacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSettings {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_line_width")]
    pub width: f64,
    #[serde(default)]
    pub interpolation: LineInterpolation,
    #[serde(default)]
    pub dash: Option<DashPattern>,
    #[serde(default)]
    pub area: Option<AreaStyle>,
    /// Textured ribbon stroke; requires extended rendering.
    #[serde(default)]
    pub texture: Option<TextureId>,
    #[serde(default = "default_texture_tile")]
    pub texture_tile_px: f64,
    /// Diameter of the hover highlight symbol.
    #[serde(default = "default_line_symbol_size")]
    pub symbol_size: f64,
    #[serde(default)]
    pub show_labels: bool,
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            color: None,
            width: default_line_width(),
            interpolation: LineInterpolation::default(),
            dash: None,
            area: None,
            texture: None,
            texture_tile_px: default_texture_tile(),
            symbol_size: default_line_symbol_size(),
            show_labels: false,
            label_offset: default_label_offset(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SymbolShape {
    #[default]
    Circle,
    Square,
    Diamond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSettings {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub symbol: SymbolShape,
    #[serde(default = "default_symbol_size")]
    pub symbol_size: f64,
    /// When set, symbol diameter is `z * factor` (bubble mode).
    #[serde(default)]
    pub z_size_factor: Option<f64>,
    #[serde(default = "default_scatter_pick_radius")]
    pub pick_radius: f64,
    #[serde(default)]
    pub border: Option<StrokeStyle>,
    /// Textured quad symbols; requires extended rendering.
    #[serde(default)]
    pub texture: Option<TextureId>,
    #[serde(default)]
    pub show_labels: bool,
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            color: None,
            symbol: SymbolShape::default(),
            symbol_size: default_symbol_size(),
            z_size_factor: None,
            pick_radius: default_scatter_pick_radius(),
            border: None,
            texture: None,
            show_labels: false,
            label_offset: default_label_offset(),
        }
    }
}

/// How gaps between adjacent pie slices are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SliceGapMode {
    #[default]
    None,
    /// Each slice's angular span shrinks by the gap's arc angle at the outer radius.
    Radial,
    /// Slice shape unchanged, pushed outward along its mid-angle.
    Translate,
    /// Slice apex moved outward by `gap / (2·sin(half sweep))` and both radii
    /// shrunk by that amount.
    ///
    /// The move alone opens a gap of exactly `gap` pixels with parallel edges
    /// between neighbours; the shrink pulls the outer arc back so it still
    /// touches the layout circle along the slice bisector.
    Uniform,
}

/// Visual reaction of a hovered pie slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExplodeMode {
    #[default]
    None,
    /// Slice rigidly offset along its mid-angle; rounded corners are skipped.
    Translate,
    /// Outer arc pushed out; inner boundary stays anchored to the center.
    Pull,
    /// Fill tint only.
    Color,
    /// Highlight stroke only.
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PieLabelPlacement {
    Hidden,
    Center,
    #[default]
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PieLabelFormat {
    Value,
    #[default]
    Percent,
    Name,
    NameValue,
    NamePercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieLabelSettings {
    #[serde(default)]
    pub placement: PieLabelPlacement,
    #[serde(default)]
    pub format: PieLabelFormat,
    #[serde(default = "default_leader_radial")]
    pub radial_length: f64,
    #[serde(default = "default_leader_horizontal")]
    pub horizontal_length: f64,
    #[serde(default = "default_leader_stroke")]
    pub leader_stroke: StrokeStyle,
}

impl Default for PieLabelSettings {
    fn default() -> Self {
        Self {
            placement: PieLabelPlacement::default(),
            format: PieLabelFormat::default(),
            radial_length: default_leader_radial(),
            horizontal_length: default_leader_horizontal(),
            leader_stroke: default_leader_stroke(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSettings {
    /// Center as a fraction of plot width/height.
    #[serde(default = "default_center_ratio")]
    pub center_ratio: (f64, f64),
    /// Fraction of `min(width, height) / 2`.
    #[serde(default)]
    pub inner_radius_ratio: f64,
    #[serde(default = "default_outer_radius_ratio")]
    pub outer_radius_ratio: f64,
    /// Degrees, 0 = east, counter-clockwise positive.
    #[serde(default = "default_pie_start_angle")]
    pub start_angle_deg: f64,
    #[serde(default = "default_true")]
    pub clockwise: bool,
    #[serde(default = "default_angle_range")]
    pub angle_range_deg: f64,
    #[serde(default)]
    pub sort_descending: bool,
    /// Slices beyond the first `top_n` are merged into one "Others" slice.
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default = "default_others_id")]
    pub others_id: String,
    #[serde(default = "default_others_name")]
    pub others_name: String,
    #[serde(default)]
    pub others_color: Option<Color>,
    /// Point ids (or `others_id`) excluded from the layout.
    #[serde(default)]
    pub hidden_ids: Vec<String>,
    #[serde(default)]
    pub gap_mode: SliceGapMode,
    #[serde(default)]
    pub gap_px: f64,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub explode_mode: ExplodeMode,
    #[serde(default = "default_explode_offset")]
    pub explode_offset: f64,
    #[serde(default)]
    pub stroke: Option<StrokeStyle>,
    #[serde(default)]
    pub label: PieLabelSettings,
    /// Textured fans; requires extended rendering.
    #[serde(default)]
    pub texture: Option<TextureId>,
}

impl Default for PieSettings {
    fn default() -> Self {
        Self {
            center_ratio: default_center_ratio(),
            inner_radius_ratio: 0.0,
            outer_radius_ratio: default_outer_radius_ratio(),
            start_angle_deg: default_pie_start_angle(),
            clockwise: true,
            angle_range_deg: default_angle_range(),
            sort_descending: false,
            top_n: None,
            others_id: default_others_id(),
            others_name: default_others_name(),
            others_color: None,
            hidden_ids: Vec::new(),
            gap_mode: SliceGapMode::default(),
            gap_px: 0.0,
            corner_radius: 0.0,
            explode_mode: ExplodeMode::default(),
            explode_offset: default_explode_offset(),
            stroke: None,
            label: PieLabelSettings::default(),
            texture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSettings {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Polygon fill opacity; `None` leaves the polygon unfilled.
    #[serde(default)]
    pub area_opacity: Option<f64>,
    #[serde(default = "default_radar_symbol_size")]
    pub symbol_size: f64,
    #[serde(default = "default_radar_pick_radius")]
    pub pick_radius: f64,
    #[serde(default)]
    pub show_labels: bool,
}

impl Default for RadarSettings {
    fn default() -> Self {
        Self {
            color: None,
            line_width: default_line_width(),
            area_opacity: None,
            symbol_size: default_radar_symbol_size(),
            pick_radius: default_radar_pick_radius(),
            show_labels: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSettings {
    #[serde(default = "default_heatmap_min_color")]
    pub min_color: Color,
    #[serde(default = "default_heatmap_max_color")]
    pub max_color: Color,
    /// Explicit value domain; derived from data when absent.
    #[serde(default)]
    pub value_range: Option<(f64, f64)>,
    #[serde(default = "default_cell_gap")]
    pub cell_gap: f64,
    #[serde(default)]
    pub border: Option<StrokeStyle>,
    #[serde(default)]
    pub show_labels: bool,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            min_color: default_heatmap_min_color(),
            max_color: default_heatmap_max_color(),
            value_range: None,
            cell_gap: default_cell_gap(),
            border: None,
            show_labels: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_corner_segments() -> usize {
    4
}

fn default_label_offset() -> f64 {
    4.0
}

fn default_area_opacity() -> f64 {
    0.35
}

fn default_line_width() -> f64 {
    2.0
}

fn default_texture_tile() -> f64 {
    32.0
}

fn default_line_symbol_size() -> f64 {
    8.0
}

fn default_symbol_size() -> f64 {
    10.0
}

fn default_scatter_pick_radius() -> f64 {
    4.0
}

fn default_center_ratio() -> (f64, f64) {
    (0.5, 0.5)
}

fn default_outer_radius_ratio() -> f64 {
    0.8
}

fn default_pie_start_angle() -> f64 {
    90.0
}

fn default_angle_range() -> f64 {
    360.0
}

fn default_others_id() -> String {
    "others".to_owned()
}

fn default_others_name() -> String {
    "Others".to_owned()
}

fn default_explode_offset() -> f64 {
    10.0
}

fn default_leader_radial() -> f64 {
    12.0
}

fn default_leader_horizontal() -> f64 {
    16.0
}

fn default_leader_stroke() -> StrokeStyle {
    StrokeStyle::new(1.0, Color::rgba(0.4, 0.4, 0.4, 1.0))
}

fn default_radar_symbol_size() -> f64 {
    6.0
}

fn default_radar_pick_radius() -> f64 {
    8.0
}

fn default_heatmap_min_color() -> Color {
    Color::rgb(0.894, 0.945, 0.996)
}

fn default_heatmap_max_color() -> Color {
    Color::rgb(0.051, 0.278, 0.631)
}

fn default_cell_gap() -> f64 {
    1.0
}
