use crate::core::types::finite_or_zero;
use crate::core::{AxisConfig, LabelPlacement, LinearScale};

/// Tolerance used by category visibility tests.
pub const CATEGORY_EPSILON: f64 = 1e-4;
/// Extra category slot rendered past `x_max` while windowing, for smooth scroll.
pub const CATEGORY_PRELOAD: f64 = 1.0;

/// Visible sub-range of a category axis.
///
/// When the label list is longer than the visible span the window is
/// "windowing": one extra item is preloaded past `x_max`, and if the preloaded
/// window reaches the end of the list, indices left of `x_min` wrap around to
/// `index + label_count` so scrolling appears circular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWindow {
    label_count: usize,
    x_min: f64,
    x_max: f64,
    placement: LabelPlacement,
}

impl CategoryWindow {
    #[must_use]
    pub fn new(label_count: usize, x_min: f64, x_max: f64, placement: LabelPlacement) -> Self {
        Self {
            label_count,
            x_min: finite_or_zero(x_min),
            x_max: finite_or_zero(x_max),
            placement,
        }
    }

    #[must_use]
    pub fn from_axis(axis: &AxisConfig, x_min: f64, x_max: f64) -> Self {
        Self::new(axis.labels.len(), x_min, x_max, axis.label_placement)
    }

    #[must_use]
    pub fn label_count(self) -> usize {
        self.label_count
    }

    #[must_use]
    pub fn placement(self) -> LabelPlacement {
        self.placement
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// Number of visible category slots, `round(x_max − x_min + 1)`, at least 1.
    #[must_use]
    pub fn span(self) -> f64 {
        let raw = (self.x_max - self.x_min + 1.0).round();
        if raw.is_finite() && raw >= 1.0 { raw } else { 1.0 }
    }

    #[must_use]
    pub fn is_windowing(self) -> bool {
        self.label_count as f64 > self.span()
    }

    #[must_use]
    pub fn preload_extra(self) -> f64 {
        if self.is_windowing() {
            CATEGORY_PRELOAD
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn effective_max(self) -> f64 {
        self.x_max + self.preload_extra()
    }

    /// Whether indices left of the window are folded past the end of the list.
    #[must_use]
    pub fn wraps(self) -> bool {
        self.is_windowing() && self.effective_max() >= self.label_count as f64
    }

    /// Applies the wraparound rule to a raw category index.
    #[must_use]
    pub fn wrap_index(self, index: f64) -> f64 {
        if self.wraps() && index + 1.0 <= self.x_min + CATEGORY_EPSILON {
            index + self.label_count as f64
        } else {
            index
        }
    }

    #[must_use]
    pub fn is_category_index_visible(self, index: f64) -> bool {
        let wrapped = self.wrap_index(index);
        wrapped >= self.x_min - CATEGORY_EPSILON
            && wrapped <= self.effective_max() + CATEGORY_EPSILON
    }

    /// Position of `index` along the axis as a ratio of the axis length.
    #[must_use]
    pub fn ratio(self, index: f64) -> f64 {
        let wrapped = self.wrap_index(index);
        match self.placement {
            LabelPlacement::Tick => LinearScale::new(self.x_min, self.x_max).ratio(wrapped),
            LabelPlacement::CellCenter => {
                finite_or_zero((wrapped - self.x_min + 0.5) / self.span())
            }
        }
    }

    /// Padding kept at both plot edges so bar groups on tick positions are not clipped.
    ///
    /// Cell-center layouts and true windowing never clip at the boundary, so
    /// they get no padding.
    #[must_use]
    pub fn edge_padding(self, total_group_width: f64, width: f64) -> f64 {
        if self.is_windowing() || self.placement == LabelPlacement::CellCenter {
            return 0.0;
        }
        finite_or_zero((total_group_width * 0.5).min(width * 0.5)).max(0.0)
    }

    /// Pixel X of a category along an axis of `width` pixels.
    #[must_use]
    pub fn category_pixel_x(self, index: f64, width: f64, edge_padding: f64) -> f64 {
        let inner = width - 2.0 * edge_padding;
        finite_or_zero(edge_padding + self.ratio(index) * inner)
    }

    /// Width of one category slot in pixels.
    #[must_use]
    pub fn slot_width(self, width: f64) -> f64 {
        finite_or_zero(width / self.span())
    }

    /// The preloaded item past `x_max` is drawn but never labelled.
    #[must_use]
    pub fn is_edge_category_index_for_label(self, index: f64) -> bool {
        self.is_windowing() && self.wrap_index(index) > self.x_max + CATEGORY_EPSILON
    }

    /// Nearest category index under pixel `px`, folded back into `0..label_count`.
    #[must_use]
    pub fn pixel_to_category_index(self, px: f64, width: f64, edge_padding: f64) -> Option<usize> {
        if self.label_count == 0 || !width.is_finite() || width <= 0.0 || !px.is_finite() {
            return None;
        }
        let inner = width - 2.0 * edge_padding;
        if inner <= 0.0 {
            return None;
        }
        let ratio = (px - edge_padding) / inner;
        let raw = match self.placement {
            LabelPlacement::Tick => (self.x_min + ratio * (self.x_max - self.x_min)).round(),
            LabelPlacement::CellCenter => (self.x_min + ratio * self.span()).floor(),
        };
        let low = (self.x_min - CATEGORY_EPSILON).ceil();
        let high = (self.effective_max() + CATEGORY_EPSILON).floor();
        let clamped = finite_or_zero(raw.clamp(low, high.max(low)));
        let count = self.label_count as i64;
        let index = clamped as i64;
        let folded = if self.wraps() {
            index.rem_euclid(count)
        } else {
            index.clamp(0, count - 1)
        };
        Some(folded as usize)
    }

    /// Visible category indices ordered by on-screen position.
    #[must_use]
    pub fn visible_indices(self) -> Vec<usize> {
        if self.label_count == 0 {
            return Vec::new();
        }
        let count = self.label_count as i64;
        let mut start = (self.x_min - CATEGORY_EPSILON).ceil() as i64;
        let mut end = (self.effective_max() + CATEGORY_EPSILON).floor() as i64;
        if self.wraps() {
            // Folding repeats after one full lap.
            end = end.min(start.saturating_add(count - 1));
        } else {
            start = start.max(0);
            end = end.min(count - 1);
        }
        if start > end {
            return Vec::new();
        }
        let mut seen = vec![false; self.label_count];
        let mut out = Vec::new();
        for raw in start..=end {
            let index = raw.rem_euclid(count) as usize;
            if !seen[index] && self.is_category_index_visible(index as f64) {
                seen[index] = true;
                out.push(index);
            }
        }
        out
    }
}
