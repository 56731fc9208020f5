//! Per-series-kind geometry builders.
//!
//! Every builder owns three concerns for its kind: geometry (drawn onto a
//! `DrawSurface`), hit-testing, and label emission. Builders skip degenerate
//! elements individually and never fail a whole frame.

pub mod bar;
pub mod heatmap;
pub mod line;
pub mod pie;
pub mod pie_fillet;
pub mod radar;
pub mod scatter;

use crate::api::Capabilities;
use crate::interaction::{HoverFade, HoverKey, HoverState};
use crate::labels::LabelStyle;
use crate::render::{Color, palette_color};

/// Lightening applied to a fully hovered fill.
pub const HOVER_TINT: f64 = 0.25;

/// Shared per-frame state handed to every builder.
#[derive(Debug, Clone, Copy)]
pub struct SeriesFrame<'a> {
    pub progress: f64,
    pub capabilities: Capabilities,
    pub hover: &'a HoverState,
    pub fade: &'a HoverFade,
    pub label_style: LabelStyle,
}

impl SeriesFrame<'_> {
    /// Highlight strength for `key`, driven by the hover fade.
    #[must_use]
    pub fn highlight(&self, key: HoverKey) -> f64 {
        self.fade.alpha(key)
    }

    #[must_use]
    pub fn tinted(&self, color: Color, key: HoverKey) -> Color {
        let highlight = self.highlight(key);
        if highlight > 0.0 {
            color.lighten(HOVER_TINT * highlight)
        } else {
            color
        }
    }
}

/// Series colour: explicit setting, else the palette entry for the series index.
#[must_use]
pub fn resolve_color(explicit: Option<Color>, serie_index: usize) -> Color {
    explicit.unwrap_or_else(|| palette_color(serie_index))
}
