use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Moves each RGB channel towards white by `amount` (0..=1).
    #[must_use]
    pub fn lighten(self, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        Self {
            red: self.red + (1.0 - self.red) * t,
            green: self.green + (1.0 - self.green) * t,
            blue: self.blue + (1.0 - self.blue) * t,
            alpha: self.alpha,
        }
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }
}

/// Default palette cycled by series and pie slices without explicit colors.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0.329, 0.439, 0.776),
    Color::rgb(0.569, 0.800, 0.459),
    Color::rgb(0.980, 0.784, 0.345),
    Color::rgb(0.933, 0.400, 0.400),
    Color::rgb(0.451, 0.753, 0.871),
    Color::rgb(0.231, 0.635, 0.447),
    Color::rgb(0.988, 0.518, 0.322),
    Color::rgb(0.604, 0.376, 0.706),
];

#[must_use]
pub fn palette_color(index: usize) -> Color {
    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
}

/// Opaque texture handle owned by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// On/off dash lengths in pixels, applied along path arclength.
///
/// Deserialization goes through [`DashPattern::new`], so a decoded pattern
/// obeys the same rules as one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDashPattern")]
pub struct DashPattern {
    segments: Vec<f64>,
    offset: f64,
}

#[derive(Deserialize)]
struct RawDashPattern {
    segments: Vec<f64>,
    #[serde(default)]
    offset: f64,
}

impl TryFrom<RawDashPattern> for DashPattern {
    type Error = ChartError;

    fn try_from(raw: RawDashPattern) -> ChartResult<Self> {
        Self::new(raw.segments, raw.offset)
    }
}

impl DashPattern {
    pub fn new(segments: Vec<f64>, offset: f64) -> ChartResult<Self> {
        if segments.is_empty() {
            return Err(ChartError::InvalidData(
                "dash pattern must not be empty".to_owned(),
            ));
        }
        if segments.iter().any(|len| !len.is_finite() || *len < 0.0) {
            return Err(ChartError::InvalidData(
                "dash lengths must be finite and >= 0".to_owned(),
            ));
        }
        if segments.iter().sum::<f64>() <= 0.0 {
            return Err(ChartError::InvalidData(
                "dash pattern total length must be > 0".to_owned(),
            ));
        }
        if !offset.is_finite() {
            return Err(ChartError::InvalidData(
                "dash offset must be finite".to_owned(),
            ));
        }
        Ok(Self { segments, offset })
    }

    pub fn dashed(dash: f64, gap: f64) -> ChartResult<Self> {
        Self::new(vec![dash, gap], 0.0)
    }

    pub fn dotted(gap: f64) -> ChartResult<Self> {
        Self::new(vec![1.0, gap], 0.0)
    }

    #[must_use]
    pub fn segments(&self) -> &[f64] {
        &self.segments
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn period(&self) -> f64 {
        self.segments.iter().sum()
    }
}

/// Stroke parameters passed to `DrawSurface::stroke`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Color,
}

impl StrokeStyle {
    #[must_use]
    pub const fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.color.alpha > 0.0
    }
}
