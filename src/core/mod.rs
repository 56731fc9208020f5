pub mod axis;
pub mod data;
pub mod mapper;
pub mod polar;
pub mod rounded_rect;
pub mod scale;
pub mod settings;
pub mod types;
pub mod windowing;

pub use axis::{AxisConfig, AxisPosition, AxisType, LabelPlacement};
pub use data::{
    ChartData, CoordinateSystem, DataPoint, MinMaxRounding, PolarLayout, Serie, SeriesKind,
};
pub use mapper::{AxisRole, AxisScale, CoordinateMapper};
pub use rounded_rect::{
    Corners, MAX_CORNER_SEGMENTS, clamp_corner_radius, rounded_rect_path, rounded_rect_points,
};
pub use scale::LinearScale;
pub use settings::{
    AreaStyle, BarSettings, ExplodeMode, HeatmapSettings, LineInterpolation, LineSettings,
    PieLabelFormat, PieLabelPlacement, PieLabelSettings, PieSettings, RadarSettings,
    ScatterSettings, SeriesSettings, SliceGapMode, SymbolShape,
};
pub use types::{PixelPoint, PixelRect, Viewport, VisibleRange, finite_or_zero};
pub use windowing::{CATEGORY_EPSILON, CATEGORY_PRELOAD, CategoryWindow};
