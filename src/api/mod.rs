//! Host-facing entry points: renderer state and its configuration.

mod config;
mod renderer;

pub use config::{Capabilities, FrameContext, RenderConfig};
pub use renderer::ChartRenderer;
