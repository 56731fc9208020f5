use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisType {
    /// Finite ordered label list addressed by integer index.
    Category,
    /// Continuous numeric range.
    #[default]
    Value,
}

/// Where category points sit inside their slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LabelPlacement {
    /// Each category owns an equal-width cell and renders at its center.
    #[default]
    CellCenter,
    /// Categories sit on evenly spaced tick marks.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub axis_type: AxisType,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "default_split_count")]
    pub split_count: usize,
    #[serde(default)]
    pub label_placement: LabelPlacement,
    #[serde(default)]
    pub position: AxisPosition,
}

fn default_split_count() -> usize {
    5
}

impl AxisConfig {
    #[must_use]
    pub fn value() -> Self {
        Self {
            axis_type: AxisType::Value,
            labels: Vec::new(),
            min: None,
            max: None,
            split_count: default_split_count(),
            label_placement: LabelPlacement::default(),
            position: AxisPosition::default(),
        }
    }

    #[must_use]
    pub fn category<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            axis_type: AxisType::Category,
            labels: labels.into_iter().map(Into::into).collect(),
            ..Self::value()
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: LabelPlacement) -> Self {
        self.label_placement = placement;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: AxisPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn is_category(&self) -> bool {
        self.axis_type == AxisType::Category
    }

    /// Label for a (possibly wrapped) category index.
    #[must_use]
    pub fn category_label(&self, index: usize) -> Option<&str> {
        if self.labels.is_empty() {
            return None;
        }
        self.labels
            .get(index % self.labels.len())
            .map(String::as_str)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.is_category() && self.labels.is_empty() {
            return Err(ChartError::InvalidConfig(
                "category axis requires at least one label".to_owned(),
            ));
        }
        for (name, value) in [("min", self.min), ("max", self.max)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ChartError::InvalidConfig(format!(
                    "axis `{name}` must be finite"
                )));
            }
        }
        Ok(())
    }
}
