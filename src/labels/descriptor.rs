use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PixelPoint, SeriesKind, Viewport};
use crate::render::{Color, StrokeStyle};

/// Which part of the text box sits on the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LabelAnchor {
    #[default]
    Center,
    /// Text extends to the right of the anchor.
    Left,
    /// Text extends to the left of the anchor.
    Right,
    /// Text hangs below the anchor.
    Top,
    /// Text sits above the anchor.
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub font_size: f64,
    pub color: Color,
    #[serde(default)]
    pub background: Option<Color>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            color: Color::rgb(0.2, 0.2, 0.2),
            background: None,
        }
    }
}

/// Polyline connecting a label to the geometry it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderLine {
    pub points: SmallVec<[PixelPoint; 3]>,
    pub stroke: StrokeStyle,
}

/// A positioned text label handed to the host's label controller.
///
/// `key` stays stable across frames for the same logical datum so the host can
/// reuse and animate its label objects.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDescriptor {
    pub key: String,
    pub text: String,
    pub anchor: PixelPoint,
    pub offset: PixelPoint,
    pub anchor_mode: LabelAnchor,
    /// Labels whose position falls outside the plot are dropped.
    pub clip_to_plot: bool,
    pub style: LabelStyle,
    pub leader: Option<LeaderLine>,
}

impl LabelDescriptor {
    #[must_use]
    pub fn new(key: impl Into<String>, text: impl Into<String>, anchor: PixelPoint) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            anchor,
            offset: PixelPoint::default(),
            anchor_mode: LabelAnchor::default(),
            clip_to_plot: true,
            style: LabelStyle::default(),
            leader: None,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset = PixelPoint::new(dx, dy);
        self
    }

    #[must_use]
    pub fn with_anchor_mode(mut self, anchor_mode: LabelAnchor) -> Self {
        self.anchor_mode = anchor_mode;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_leader(mut self, leader: LeaderLine) -> Self {
        self.leader = Some(leader);
        self
    }

    #[must_use]
    pub fn clipped(mut self, clip_to_plot: bool) -> Self {
        self.clip_to_plot = clip_to_plot;
        self
    }

    /// Final text position: anchor plus offset.
    #[must_use]
    pub fn position(&self) -> PixelPoint {
        self.anchor.offset(self.offset.x, self.offset.y)
    }

    #[must_use]
    pub fn is_inside(&self, viewport: Viewport) -> bool {
        let position = self.position();
        position.is_finite() && viewport.rect().contains(position)
    }
}

/// `"{kind}:{serie_index}:{point_id}"`.
#[must_use]
pub fn series_label_key(kind: SeriesKind, serie_index: usize, point_id: &str) -> String {
    format!("{}:{serie_index}:{point_id}", kind.tag())
}

/// `"pie:{slice_index}:{name_or_value}"`.
#[must_use]
pub fn pie_label_key(slice_index: usize, name_or_value: &str) -> String {
    format!("pie:{slice_index}:{name_or_value}")
}

/// Compact numeric label text: integers without decimals, otherwise up to two.
#[must_use]
pub fn format_label_value(value: f64) -> String {
    if !value.is_finite() {
        return String::from("-");
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.2}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_owned()
}
