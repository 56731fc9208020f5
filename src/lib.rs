//! chart-geom: geometry core for 2D charts.
//!
//! Maps data to pixels on value and category axes (with windowed, wrapping
//! category scroll), builds bar, line, scatter, pie, radar and heatmap
//! geometry onto a host [`render::DrawSurface`], resolves pointer hits into
//! tooltips and emits pooled label descriptors. Drawing and text layout stay
//! with the host.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod labels;
pub mod render;
pub mod series;
pub mod telemetry;

pub use api::{Capabilities, ChartRenderer, FrameContext, RenderConfig};
pub use error::{ChartError, ChartResult};
