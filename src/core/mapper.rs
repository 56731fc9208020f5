use crate::core::types::finite_or_zero;
use crate::core::{
    AxisConfig, AxisPosition, CategoryWindow, LabelPlacement, LinearScale, PixelPoint, Viewport,
    VisibleRange,
};

/// Data axis addressed by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    X,
    Y,
}

/// Resolved per-frame scale for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisScale {
    Category(CategoryWindow),
    Value(LinearScale),
}

impl AxisScale {
    #[must_use]
    pub fn from_axis(axis: &AxisConfig, min: f64, max: f64) -> Self {
        if axis.is_category() {
            Self::Category(CategoryWindow::from_axis(axis, min, max))
        } else {
            Self::Value(LinearScale::new(min, max))
        }
    }

    #[must_use]
    pub fn ratio(self, value: f64) -> f64 {
        match self {
            Self::Category(window) => window.ratio(value),
            Self::Value(scale) => scale.ratio(value),
        }
    }

    #[must_use]
    pub fn window(self) -> Option<CategoryWindow> {
        match self {
            Self::Category(window) => Some(window),
            Self::Value(_) => None,
        }
    }
}

/// Data-to-pixel transform for a Cartesian plot.
///
/// Pixel Y grows downward, so the vertical axis is inverted unless the axis
/// in the horizontal role sits at the top of the plot. A transposed mapper
/// drives pixel X from the Y data axis and pixel Y from the X data axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    x: AxisScale,
    y: AxisScale,
    x_position: AxisPosition,
    y_position: AxisPosition,
    range: VisibleRange,
    viewport: Viewport,
    transposed: bool,
    edge_padding: f64,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(
        x_axis: &AxisConfig,
        y_axis: &AxisConfig,
        range: VisibleRange,
        viewport: Viewport,
    ) -> Self {
        Self {
            x: AxisScale::from_axis(x_axis, range.x_min, range.x_max),
            y: AxisScale::from_axis(y_axis, range.y_min, range.y_max),
            x_position: x_axis.position,
            y_position: y_axis.position,
            range,
            viewport,
            transposed: false,
            edge_padding: 0.0,
        }
    }

    #[must_use]
    pub fn transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    /// Padding reserved at both ends of a category X axis.
    #[must_use]
    pub fn with_edge_padding(mut self, edge_padding: f64) -> Self {
        self.edge_padding = finite_or_zero(edge_padding).max(0.0);
        self
    }

    #[must_use]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn range(&self) -> VisibleRange {
        self.range
    }

    #[must_use]
    pub fn edge_padding(&self) -> f64 {
        self.edge_padding
    }

    #[must_use]
    pub fn scale(&self, role: AxisRole) -> AxisScale {
        match role {
            AxisRole::X => self.x,
            AxisRole::Y => self.y,
        }
    }

    /// Category window of the X axis, when it is a category axis.
    #[must_use]
    pub fn category_window(&self) -> Option<CategoryWindow> {
        self.x.window()
    }

    /// Pixel length available to the X data axis.
    #[must_use]
    pub fn x_length(&self) -> f64 {
        if self.transposed {
            self.viewport.height
        } else {
            self.viewport.width
        }
    }

    /// Pixel length available to the Y data axis.
    #[must_use]
    pub fn y_length(&self) -> f64 {
        if self.transposed {
            self.viewport.width
        } else {
            self.viewport.height
        }
    }

    #[must_use]
    pub fn axis_ratio(&self, role: AxisRole, value: f64) -> f64 {
        self.scale(role).ratio(value)
    }

    fn axis_offset(&self, role: AxisRole, value: f64, length: f64) -> f64 {
        let pad = match role {
            AxisRole::X if self.x.window().is_some() => self.edge_padding.min(length * 0.5),
            _ => 0.0,
        };
        finite_or_zero(pad + self.axis_ratio(role, value) * (length - 2.0 * pad))
    }

    fn inverts_vertical(&self) -> bool {
        let horizontal = if self.transposed {
            self.y_position
        } else {
            self.x_position
        };
        horizontal != AxisPosition::Top
    }

    /// Maps a data point to pixel space; degenerate plots collapse to the bottom-left.
    #[must_use]
    pub fn to_pixel(&self, x: f64, y: f64) -> PixelPoint {
        if !self.viewport.is_valid() {
            return self.viewport.bottom_left();
        }
        let (width, height) = (self.viewport.width, self.viewport.height);
        let (h_role, h_value, v_role, v_value) = if self.transposed {
            (AxisRole::Y, y, AxisRole::X, x)
        } else {
            (AxisRole::X, x, AxisRole::Y, y)
        };
        let px = self.axis_offset(h_role, h_value, width);
        let v = self.axis_offset(v_role, v_value, height);
        let py = if self.inverts_vertical() { height - v } else { v };
        PixelPoint::new(px, py)
    }

    /// Offset of `point` along the X data axis, measured from where ratio 0 lands.
    fn x_axis_offset(&self, point: PixelPoint) -> f64 {
        if !self.transposed {
            return point.x;
        }
        if self.inverts_vertical() {
            self.viewport.height - point.y
        } else {
            point.y
        }
    }

    /// Re-expresses `point` so the X data axis runs along `x` from its ratio-0 end.
    ///
    /// Identity unless transposed; the other coordinate keeps the pixel X.
    #[must_use]
    pub fn to_reveal_frame(&self, point: PixelPoint) -> PixelPoint {
        if self.transposed {
            PixelPoint::new(self.x_axis_offset(point), point.x)
        } else {
            point
        }
    }

    /// Inverse of [`CoordinateMapper::to_reveal_frame`].
    #[must_use]
    pub fn from_reveal_frame(&self, point: PixelPoint) -> PixelPoint {
        if !self.transposed {
            return point;
        }
        let y = if self.inverts_vertical() {
            self.viewport.height - point.x
        } else {
            point.x
        };
        PixelPoint::new(point.y, y)
    }

    /// Category index under `point`, folded into `0..label_count`.
    #[must_use]
    pub fn pixel_to_category(&self, point: PixelPoint) -> Option<usize> {
        let window = self.x.window()?;
        if !self.viewport.is_valid() {
            return None;
        }
        let length = self.x_length();
        let pad = self.edge_padding.min(length * 0.5);
        window.pixel_to_category_index(self.x_axis_offset(point), length, pad)
    }

    /// X data value under `point`.
    #[must_use]
    pub fn pixel_to_value_x(&self, point: PixelPoint) -> f64 {
        let length = self.x_length();
        if !length.is_finite() || length <= 0.0 {
            return finite_or_zero(self.range.x_min);
        }
        let pad = if self.x.window().is_some() {
            self.edge_padding.min(length * 0.5)
        } else {
            0.0
        };
        let inner = length - 2.0 * pad;
        let ratio = finite_or_zero((self.x_axis_offset(point) - pad) / inner);
        match self.x {
            AxisScale::Category(window) => {
                let (x_min, x_max) = window.range();
                match window.placement() {
                    LabelPlacement::Tick => {
                        LinearScale::new(x_min, x_max).value_at(ratio)
                    }
                    LabelPlacement::CellCenter => {
                        finite_or_zero(x_min + ratio * window.span() - 0.5)
                    }
                }
            }
            AxisScale::Value(scale) => scale.value_at(ratio),
        }
    }
}
