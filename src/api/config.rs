use serde::{Deserialize, Serialize};

use crate::core::{Viewport, VisibleRange};
use crate::error::{ChartError, ChartResult};
use crate::interaction::DEFAULT_HOVER_FADE_RATE;
use crate::labels::LabelStyle;
use crate::render::Color;

/// Rendering features that depend on what the host surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Enables textured ribbons, fans and quads.
    #[serde(default)]
    pub extended_rendering: bool,
}

impl Capabilities {
    #[must_use]
    pub fn extended() -> Self {
        Self {
            extended_rendering: true,
        }
    }
}

/// Chart-level renderer configuration.
///
/// Serializable so hosts can persist it alongside their chart setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Upper bound on bar width; bars shrink below it when slots get crowded.
    #[serde(default = "default_bar_width")]
    pub bar_width: f64,
    #[serde(default = "default_bar_gap")]
    pub bar_gap: f64,
    /// Line hit radius on value X axes, as a fraction of the visible X range.
    #[serde(default = "default_line_hit_threshold_ratio")]
    pub line_hit_threshold_ratio: f64,
    /// Hover highlight alpha change per second.
    #[serde(default = "default_hover_fade_rate")]
    pub hover_fade_rate: f64,
    #[serde(default = "default_label_font_size")]
    pub label_font_size: f64,
    #[serde(default = "default_label_color")]
    pub label_color: Color,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            bar_gap: default_bar_gap(),
            line_hit_threshold_ratio: default_line_hit_threshold_ratio(),
            hover_fade_rate: default_hover_fade_rate(),
            label_font_size: default_label_font_size(),
            label_color: default_label_color(),
            capabilities: Capabilities::default(),
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.bar_width = bar_width;
        self
    }

    #[must_use]
    pub fn with_bar_gap(mut self, bar_gap: f64) -> Self {
        self.bar_gap = bar_gap;
        self
    }

    #[must_use]
    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            font_size: self.label_font_size,
            color: self.label_color,
            background: None,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.bar_width.is_finite() || self.bar_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "bar width must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("bar gap", self.bar_gap),
            ("line hit threshold ratio", self.line_hit_threshold_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for (name, value) in [
            ("hover fade rate", self.hover_fade_rate),
            ("label font size", self.label_font_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        self.label_color
            .validate()
            .map_err(|err| ChartError::InvalidConfig(format!("label color: {err}")))
    }
}

fn default_bar_width() -> f64 {
    24.0
}

fn default_bar_gap() -> f64 {
    4.0
}

fn default_line_hit_threshold_ratio() -> f64 {
    0.05
}

fn default_hover_fade_rate() -> f64 {
    DEFAULT_HOVER_FADE_RATE
}

fn default_label_font_size() -> f64 {
    12.0
}

fn default_label_color() -> Color {
    Color::rgb(0.2, 0.2, 0.2)
}

/// Per-frame inputs set by the host's scroll and animation controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    pub viewport: Viewport,
    pub range: VisibleRange,
    /// Reveal animation in `[0, 1]`; out-of-range values are clamped.
    #[serde(default = "default_animation_progress")]
    pub animation_progress: f64,
}

impl FrameContext {
    #[must_use]
    pub fn new(viewport: Viewport, range: VisibleRange) -> Self {
        Self {
            viewport,
            range,
            animation_progress: default_animation_progress(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, animation_progress: f64) -> Self {
        self.animation_progress = animation_progress;
        self
    }

    /// Animation progress clamped to `[0, 1]`; NaN counts as finished.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.animation_progress.is_nan() {
            1.0
        } else {
            self.animation_progress.clamp(0.0, 1.0)
        }
    }
}

fn default_animation_progress() -> f64 {
    1.0
}
