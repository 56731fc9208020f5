use tracing::trace;

use crate::core::{PixelPoint, PixelRect};
use crate::render::{Color, DrawSurface, TextureId};
use crate::render::path::dedup_points;

/// Ribbon mitre offsets never exceed this multiple of the half width.
pub const RIBBON_MITER_LIMIT: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: PixelPoint,
    pub uv: (f64, f64),
    pub tint: Color,
}

impl Default for MeshVertex {
    fn default() -> Self {
        Self {
            position: PixelPoint::default(),
            uv: (0.0, 0.0),
            tint: Color::WHITE,
        }
    }
}

/// Indexed triangle list owned by a recording surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub texture: Option<TextureId>,
}

impl Mesh {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Writable view over storage returned by `DrawSurface::allocate_mesh`.
#[derive(Debug)]
pub struct MeshSlot<'a> {
    pub vertices: &'a mut [MeshVertex],
    pub indices: &'a mut [u32],
}

impl MeshSlot<'_> {
    /// Copies as many vertices/indices as both sides can hold.
    pub fn write(&mut self, vertices: &[MeshVertex], indices: &[u32]) {
        let vertex_count = self.vertices.len().min(vertices.len());
        self.vertices[..vertex_count].copy_from_slice(&vertices[..vertex_count]);
        let index_count = self.indices.len().min(indices.len());
        self.indices[..index_count].copy_from_slice(&indices[..index_count]);
    }
}

/// Triangulated geometry built in core before upload to a surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Allocates a mesh on `surface` and copies this data into it.
    pub fn upload<S: DrawSurface + ?Sized>(&self, surface: &mut S, texture: Option<TextureId>) {
        if self.is_empty() {
            return;
        }
        let mut slot = surface.allocate_mesh(self.vertices.len(), self.indices.len(), texture);
        slot.write(&self.vertices, &self.indices);
    }
}

/// Two-triangle textured quad covering `rect` with full 0..1 UVs.
#[must_use]
pub fn quad_mesh(rect: PixelRect, tint: Color) -> MeshData {
    if rect.is_degenerate() {
        return MeshData::default();
    }
    let corners = [
        (PixelPoint::new(rect.x, rect.y), (0.0, 0.0)),
        (PixelPoint::new(rect.right(), rect.y), (1.0, 0.0)),
        (PixelPoint::new(rect.right(), rect.bottom()), (1.0, 1.0)),
        (PixelPoint::new(rect.x, rect.bottom()), (0.0, 1.0)),
    ];
    MeshData {
        vertices: corners
            .iter()
            .map(|(position, uv)| MeshVertex {
                position: *position,
                uv: *uv,
                tint,
            })
            .collect(),
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// Triangle fan from `center` over a closed `outline`, UVs planar over the outline bounds.
#[must_use]
pub fn fan_mesh(center: PixelPoint, outline: &[PixelPoint], tint: Color) -> MeshData {
    let outline = dedup_points(outline);
    if outline.len() < 2 {
        return MeshData::default();
    }

    let (mut min_x, mut min_y) = (center.x, center.y);
    let (mut max_x, mut max_y) = (center.x, center.y);
    for p in &outline {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let width = (max_x - min_x).max(f64::EPSILON);
    let height = (max_y - min_y).max(f64::EPSILON);
    let uv = |p: PixelPoint| ((p.x - min_x) / width, (p.y - min_y) / height);

    let mut vertices = Vec::with_capacity(outline.len() + 1);
    vertices.push(MeshVertex {
        position: center,
        uv: uv(center),
        tint,
    });
    vertices.extend(outline.iter().map(|p| MeshVertex {
        position: *p,
        uv: uv(*p),
        tint,
    }));

    let n = outline.len() as u32;
    let mut indices = Vec::with_capacity(outline.len() * 3);
    for i in 1..=n {
        let next = if i == n { 1 } else { i + 1 };
        indices.extend_from_slice(&[0, i, next]);
    }
    MeshData { vertices, indices }
}

/// Triangulated stroke ribbon along `points`.
///
/// Vertex normals are the normalized sum of adjacent segment normals, scaled by
/// the mitre factor. `u` grows with arclength (`s / tile_length`), `v` is 0 on
/// the left edge and 1 on the right edge.
#[must_use]
pub fn ribbon_mesh(points: &[PixelPoint], half_width: f64, tile_length: f64, tint: Color) -> MeshData {
    let points = dedup_points(points);
    if points.len() < 2 || !half_width.is_finite() || half_width <= 0.0 {
        return MeshData::default();
    }

    let mut normals = Vec::with_capacity(points.len() - 1);
    for pair in points.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f64::EPSILON {
            trace!("ribbon: zero-length segment skipped");
            normals.push((0.0, 0.0));
            continue;
        }
        normals.push((-dy / len, dx / len));
    }

    let mut arclength = Vec::with_capacity(points.len());
    let mut total = 0.0;
    arclength.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(pair[1]);
        arclength.push(total);
    }
    let tile = if tile_length.is_finite() && tile_length > 0.0 {
        tile_length
    } else {
        total.max(f64::EPSILON)
    };

    let last = points.len() - 1;
    let mut vertices = Vec::with_capacity(points.len() * 2);
    for (i, point) in points.iter().enumerate() {
        let (nx, ny) = if i == 0 {
            normals[0]
        } else if i == last {
            normals[last - 1]
        } else {
            mitre_normal(normals[i - 1], normals[i])
        };
        let offset_x = nx * half_width;
        let offset_y = ny * half_width;
        let u = arclength[i] / tile;
        vertices.push(MeshVertex {
            position: point.offset(offset_x, offset_y),
            uv: (u, 0.0),
            tint,
        });
        vertices.push(MeshVertex {
            position: point.offset(-offset_x, -offset_y),
            uv: (u, 1.0),
            tint,
        });
    }

    let mut indices = Vec::with_capacity(last * 6);
    for i in 0..last as u32 {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }
    MeshData { vertices, indices }
}

fn mitre_normal(previous: (f64, f64), next: (f64, f64)) -> (f64, f64) {
    let sum = (previous.0 + next.0, previous.1 + next.1);
    let len = (sum.0 * sum.0 + sum.1 * sum.1).sqrt();
    if len <= 1e-9 {
        return next;
    }
    let unit = (sum.0 / len, sum.1 / len);
    let reference = if next == (0.0, 0.0) { previous } else { next };
    let cos = unit.0 * reference.0 + unit.1 * reference.1;
    let scale = if cos > 1.0 / RIBBON_MITER_LIMIT {
        1.0 / cos
    } else {
        RIBBON_MITER_LIMIT
    };
    (unit.0 * scale, unit.1 * scale)
}
