mod frame;
mod mesh;
mod path;
mod primitives;

pub use frame::{DrawOp, RenderFrame};
pub use mesh::{
    Mesh, MeshData, MeshSlot, MeshVertex, RIBBON_MITER_LIMIT, fan_mesh, quad_mesh, ribbon_mesh,
};
pub use path::{
    ARC_FLATTEN_STEP_RAD, CUBIC_FLATTEN_STEPS, MIN_ARC_SEGMENTS, Path, PathCommand, Polyline,
    arc_point, arc_segment_count, cubic_point, dedup_points, flatten_arc, split_cubic,
};
pub use primitives::{
    Color, DEFAULT_PALETTE, DashPattern, StrokeStyle, TextureId, palette_color,
};

use crate::core::PixelPoint;

/// Immediate-mode 2D drawing surface supplied by the host.
///
/// Path calls accumulate into a current path that `fill`/`stroke` paint;
/// `begin_path` discards it. Meshes are indexed triangle lists written into
/// storage the surface hands out.
pub trait DrawSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, point: PixelPoint);
    fn line_to(&mut self, point: PixelPoint);
    fn bezier_to(&mut self, control1: PixelPoint, control2: PixelPoint, to: PixelPoint);
    /// Arc in pixel space: angles in radians, `y` down, `sweep` signed.
    fn arc(&mut self, center: PixelPoint, radius: f64, start_angle: f64, sweep: f64);
    fn close_path(&mut self);
    fn stroke(&mut self, style: StrokeStyle);
    fn fill(&mut self, color: Color);
    fn allocate_mesh(
        &mut self,
        vertex_count: usize,
        index_count: usize,
        texture: Option<TextureId>,
    ) -> MeshSlot<'_>;
}

/// Replays `path` and fills it when it is non-empty and the color is visible.
pub fn fill_path<S: DrawSurface + ?Sized>(surface: &mut S, path: &Path, color: Color) {
    if path.is_empty() || color.alpha <= 0.0 {
        return;
    }
    path.replay(surface);
    surface.fill(color);
}

/// Replays `path` and strokes it when it is non-empty and the stroke is visible.
pub fn stroke_path<S: DrawSurface + ?Sized>(surface: &mut S, path: &Path, style: StrokeStyle) {
    if path.is_empty() || !style.is_visible() {
        return;
    }
    path.replay(surface);
    surface.stroke(style);
}
