use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{PixelPoint, SeriesKind};
use crate::render::Color;

/// `(serie_index, point_index)`; pie slices use their layout index as the point.
pub type HoverKey = (usize, usize);

/// Alpha units per second used when no rate is configured.
pub const DEFAULT_HOVER_FADE_RATE: f64 = 6.0;

/// One datum reported by a tooltip query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitItem {
    pub serie_index: usize,
    pub point_index: usize,
    pub kind: SeriesKind,
    pub serie_name: String,
    /// Point name, slice name or category label when one exists.
    pub label: Option<String>,
    pub x: f64,
    pub value: f64,
    pub color: Color,
    /// Pixel position the tooltip should point at.
    pub anchor: PixelPoint,
}

impl HitItem {
    #[must_use]
    pub fn key(&self) -> HoverKey {
        (self.serie_index, self.point_index)
    }
}

/// Renderer-local hover selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverState {
    primary: Option<HoverKey>,
    category_index: Option<usize>,
    category_hits: SmallVec<[HoverKey; 8]>,
}

impl HoverState {
    /// Replaces the selection; returns `true` when anything changed.
    pub fn set<I>(
        &mut self,
        primary: Option<HoverKey>,
        category_index: Option<usize>,
        category_hits: I,
    ) -> bool
    where
        I: IntoIterator<Item = HoverKey>,
    {
        let hits: SmallVec<[HoverKey; 8]> = category_hits.into_iter().collect();
        let changed = self.primary != primary
            || self.category_index != category_index
            || self.category_hits != hits;
        self.primary = primary;
        self.category_index = category_index;
        self.category_hits = hits;
        changed
    }

    /// Drops the selection; returns `true` when something was hovered.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.is_empty();
        self.primary = None;
        self.category_index = None;
        self.category_hits.clear();
        had_any
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.category_index.is_none() && self.category_hits.is_empty()
    }

    #[must_use]
    pub fn primary(&self) -> Option<HoverKey> {
        self.primary
    }

    #[must_use]
    pub fn category_index(&self) -> Option<usize> {
        self.category_index
    }

    #[must_use]
    pub fn category_hits(&self) -> &[HoverKey] {
        &self.category_hits
    }

    #[must_use]
    pub fn is_hovered(&self, key: HoverKey) -> bool {
        self.primary == Some(key) || self.category_hits.contains(&key)
    }

    /// Every key whose highlight should fade in.
    #[must_use]
    pub fn targets(&self) -> SmallVec<[HoverKey; 8]> {
        let mut out = self.category_hits.clone();
        if let Some(primary) = self.primary {
            if !out.contains(&primary) {
                out.push(primary);
            }
        }
        out
    }
}

/// Moves `current` toward `target` by at most `max_delta`.
#[must_use]
pub fn move_towards(current: f64, target: f64, max_delta: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Time-based highlight alpha per hover key.
///
/// Alphas approach 1 for hovered keys and 0 otherwise at a constant rate;
/// keys that reach 0 without being targeted are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverFade {
    rate: f64,
    alphas: IndexMap<HoverKey, f64>,
}

impl Default for HoverFade {
    fn default() -> Self {
        Self::new(DEFAULT_HOVER_FADE_RATE)
    }
}

impl HoverFade {
    #[must_use]
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            DEFAULT_HOVER_FADE_RATE
        };
        Self {
            rate,
            alphas: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Steps every alpha by `dt` seconds; returns `true` while any alpha is still moving.
    pub fn advance(&mut self, dt: f64, targets: &[HoverKey]) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        for key in targets {
            self.alphas.entry(*key).or_insert(0.0);
        }
        let step = self.rate * dt;
        let mut animating = false;
        for (key, alpha) in &mut self.alphas {
            let target = if targets.contains(key) { 1.0 } else { 0.0 };
            *alpha = move_towards(*alpha, target, step);
            if *alpha != target {
                animating = true;
            }
        }
        let before = self.alphas.len();
        self.alphas
            .retain(|key, alpha| *alpha > 0.0 || targets.contains(key));
        if self.alphas.len() != before {
            trace!(removed = before - self.alphas.len(), "hover fade: settled keys dropped");
        }
        animating
    }

    #[must_use]
    pub fn alpha(&self, key: HoverKey) -> f64 {
        self.alphas.get(&key).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alphas.is_empty()
    }

    pub fn clear(&mut self) {
        self.alphas.clear();
    }
}

/// Result of one pointer query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipResult {
    pub items: Vec<HitItem>,
    /// Cursor snapped to the hovered category center or data point.
    pub snapped_cursor: Option<PixelPoint>,
    pub category_label: Option<String>,
    /// Set when the hover state changed and the host should repaint.
    pub repaint_requested: bool,
}

impl TooltipResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
