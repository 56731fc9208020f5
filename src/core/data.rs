use serde::{Deserialize, Serialize};

use crate::core::settings::{
    BarSettings, HeatmapSettings, LineSettings, PieSettings, RadarSettings, ScatterSettings,
    SeriesSettings,
};
use crate::core::AxisConfig;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// One datum of a series.
///
/// Bars, pie slices, radar vertices and heatmap cells read `value`; lines and
/// scatter symbols read `y`. `id`/`name` give labels a stable pooling key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<Color>,
}

impl DataPoint {
    /// Point for line/scatter series.
    #[must_use]
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            value: y,
            ..Self::default()
        }
    }

    /// Category-indexed value for bar/radar/heatmap series.
    #[must_use]
    pub fn category(x: f64, value: f64) -> Self {
        Self {
            x,
            y: value,
            value,
            ..Self::default()
        }
    }

    /// Value-only point for pie series.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// Stable identity used in label keys: id, then name, then index.
    #[must_use]
    pub fn key_fragment(&self, index: usize) -> String {
        self.id
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| index.to_string())
    }

    /// Category index addressed by `x`.
    #[must_use]
    pub fn category_index(&self) -> i64 {
        if self.x.is_finite() {
            self.x.round() as i64
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Bar,
    Line,
    Scatter,
    Pie,
    Radar,
    Heatmap,
}

impl SeriesKind {
    /// Lowercase tag used as the first component of label keys.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Radar => "radar",
            Self::Heatmap => "heatmap",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serie {
    pub name: String,
    pub data: Vec<DataPoint>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub settings: SeriesSettings,
}

fn default_visible() -> bool {
    true
}

impl Serie {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<DataPoint>, settings: SeriesSettings) -> Self {
        Self {
            name: name.into(),
            data,
            visible: true,
            settings,
        }
    }

    #[must_use]
    pub fn bar(name: impl Into<String>, data: Vec<DataPoint>, settings: BarSettings) -> Self {
        Self::new(name, data, SeriesSettings::Bar(settings))
    }

    #[must_use]
    pub fn line(name: impl Into<String>, data: Vec<DataPoint>, settings: LineSettings) -> Self {
        Self::new(name, data, SeriesSettings::Line(settings))
    }

    #[must_use]
    pub fn scatter(
        name: impl Into<String>,
        data: Vec<DataPoint>,
        settings: ScatterSettings,
    ) -> Self {
        Self::new(name, data, SeriesSettings::Scatter(settings))
    }

    #[must_use]
    pub fn pie(name: impl Into<String>, data: Vec<DataPoint>, settings: PieSettings) -> Self {
        Self::new(name, data, SeriesSettings::Pie(settings))
    }

    #[must_use]
    pub fn radar(name: impl Into<String>, data: Vec<DataPoint>, settings: RadarSettings) -> Self {
        Self::new(name, data, SeriesSettings::Radar(settings))
    }

    #[must_use]
    pub fn heatmap(
        name: impl Into<String>,
        data: Vec<DataPoint>,
        settings: HeatmapSettings,
    ) -> Self {
        Self::new(name, data, SeriesSettings::Heatmap(settings))
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        match self.settings {
            SeriesSettings::Bar(_) => SeriesKind::Bar,
            SeriesSettings::Line(_) => SeriesKind::Line,
            SeriesSettings::Scatter(_) => SeriesKind::Scatter,
            SeriesSettings::Pie(_) => SeriesKind::Pie,
            SeriesSettings::Radar(_) => SeriesKind::Radar,
            SeriesSettings::Heatmap(_) => SeriesKind::Heatmap,
        }
    }
}

/// Rounding applied to auto-derived radar min/max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum MinMaxRounding {
    #[default]
    None,
    Integer,
    Tens,
    Hundreds,
    Custom(f64),
}

impl MinMaxRounding {
    #[must_use]
    pub fn unit(self) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Integer => Some(1.0),
            Self::Tens => Some(10.0),
            Self::Hundreds => Some(100.0),
            Self::Custom(unit) if unit.is_finite() && unit > 0.0 => Some(unit),
            Self::Custom(_) => None,
        }
    }
}

/// Radar grid geometry shared by every series on a polar system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarLayout {
    #[serde(default = "default_center_ratio")]
    pub center_ratio: (f64, f64),
    #[serde(default)]
    pub inner_radius_ratio: f64,
    #[serde(default = "default_outer_radius_ratio")]
    pub outer_radius_ratio: f64,
    /// Degrees, 0 = north, clockwise positive.
    #[serde(default)]
    pub start_angle_deg: f64,
    #[serde(default = "default_clockwise")]
    pub clockwise: bool,
    #[serde(default = "default_ring_count")]
    pub ring_count: usize,
    #[serde(default)]
    pub rounding: MinMaxRounding,
    #[serde(default = "default_grid_color")]
    pub ring_color: Color,
    #[serde(default = "default_edge_color")]
    pub edge_color: Color,
    #[serde(default = "default_grid_color")]
    pub spoke_color: Color,
    #[serde(default = "default_grid_width")]
    pub grid_width: f64,
    #[serde(default = "default_indicator_gap")]
    pub indicator_gap: f64,
}

impl Default for PolarLayout {
    fn default() -> Self {
        Self {
            center_ratio: default_center_ratio(),
            inner_radius_ratio: 0.0,
            outer_radius_ratio: default_outer_radius_ratio(),
            start_angle_deg: 0.0,
            clockwise: default_clockwise(),
            ring_count: default_ring_count(),
            rounding: MinMaxRounding::default(),
            ring_color: default_grid_color(),
            edge_color: default_edge_color(),
            spoke_color: default_grid_color(),
            grid_width: default_grid_width(),
            indicator_gap: default_indicator_gap(),
        }
    }
}

fn default_center_ratio() -> (f64, f64) {
    (0.5, 0.5)
}

fn default_outer_radius_ratio() -> f64 {
    0.75
}

fn default_clockwise() -> bool {
    true
}

fn default_ring_count() -> usize {
    5
}

fn default_grid_color() -> Color {
    Color::rgba(0.85, 0.85, 0.85, 1.0)
}

fn default_edge_color() -> Color {
    Color::rgba(0.6, 0.6, 0.6, 1.0)
}

fn default_grid_width() -> f64 {
    1.0
}

fn default_indicator_gap() -> f64 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CoordinateSystem {
    /// Indices into `ChartData::axes`. `transposed` swaps the pixel roles of X and Y.
    Cartesian {
        x_axis: usize,
        y_axis: usize,
        #[serde(default)]
        transposed: bool,
    },
    /// Angle axis labels name radar dimensions; radius axis min/max pin the value range.
    Polar {
        angle_axis: usize,
        radius_axis: usize,
        #[serde(default)]
        layout: PolarLayout,
    },
    #[default]
    None,
}

/// Read-only input graph for one render/hit-test call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub series: Vec<Serie>,
    #[serde(default)]
    pub axes: Vec<AxisConfig>,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
}

impl ChartData {
    #[must_use]
    pub fn new(series: Vec<Serie>) -> Self {
        Self {
            series,
            axes: Vec::new(),
            coordinate_system: CoordinateSystem::None,
        }
    }

    #[must_use]
    pub fn cartesian(series: Vec<Serie>, x_axis: AxisConfig, y_axis: AxisConfig) -> Self {
        Self {
            series,
            axes: vec![x_axis, y_axis],
            coordinate_system: CoordinateSystem::Cartesian {
                x_axis: 0,
                y_axis: 1,
                transposed: false,
            },
        }
    }

    #[must_use]
    pub fn polar(series: Vec<Serie>, angle_axis: AxisConfig, layout: PolarLayout) -> Self {
        Self {
            series,
            axes: vec![angle_axis, AxisConfig::value()],
            coordinate_system: CoordinateSystem::Polar {
                angle_axis: 0,
                radius_axis: 1,
                layout,
            },
        }
    }

    #[must_use]
    pub fn transposed(mut self) -> Self {
        if let CoordinateSystem::Cartesian { transposed, .. } = &mut self.coordinate_system {
            *transposed = true;
        }
        self
    }

    pub fn axis(&self, index: usize) -> ChartResult<&AxisConfig> {
        self.axes
            .get(index)
            .ok_or(ChartError::MissingAxis { index })
    }

    /// Validates axes and coordinate-system references.
    pub fn validate(&self) -> ChartResult<()> {
        for axis in &self.axes {
            axis.validate()?;
        }
        match self.coordinate_system {
            CoordinateSystem::Cartesian { x_axis, y_axis, .. } => {
                self.axis(x_axis)?;
                self.axis(y_axis)?;
            }
            CoordinateSystem::Polar {
                angle_axis,
                radius_axis,
                ..
            } => {
                self.axis(angle_axis)?;
                self.axis(radius_axis)?;
            }
            CoordinateSystem::None => {}
        }
        Ok(())
    }
}
