use crate::core::{PixelPoint, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, DrawSurface, Mesh, MeshSlot, MeshVertex, Path, PathCommand, StrokeStyle, TextureId,
};

/// One finished path with the paint applied to it.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { path: Path, color: Color },
    Stroke { path: Path, style: StrokeStyle },
}

impl DrawOp {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Fill { path, .. } | Self::Stroke { path, .. } => path,
        }
    }
}

/// Headless recording surface.
///
/// Captures every filled/stroked path and every allocated mesh of one
/// visual-content pass so hosts can replay it and tests can inspect it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub ops: Vec<DrawOp>,
    pub meshes: Vec<Mesh>,
    current: Path,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ops: Vec::new(),
            meshes: Vec::new(),
            current: Path::new(),
        }
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Path, Color)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill { path, color } => Some((path, *color)),
            DrawOp::Stroke { .. } => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&Path, StrokeStyle)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Stroke { path, style } => Some((path, *style)),
            DrawOp::Fill { .. } => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.meshes.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.meshes.clear();
        self.current.clear();
    }

    /// Checks that every recorded coordinate is finite.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for op in &self.ops {
            for command in op.path().commands() {
                let finite = match *command {
                    PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p.is_finite(),
                    PathCommand::CubicTo {
                        control1,
                        control2,
                        to,
                    } => control1.is_finite() && control2.is_finite() && to.is_finite(),
                    PathCommand::Arc {
                        center,
                        radius,
                        start_angle,
                        sweep,
                    } => {
                        center.is_finite()
                            && radius.is_finite()
                            && start_angle.is_finite()
                            && sweep.is_finite()
                    }
                    PathCommand::Close => true,
                };
                if !finite {
                    return Err(ChartError::InvalidData(
                        "path coordinates must be finite".to_owned(),
                    ));
                }
            }
        }

        for mesh in &self.meshes {
            if mesh.indices.iter().any(|i| *i as usize >= mesh.vertices.len()) {
                return Err(ChartError::InvalidData(
                    "mesh index out of bounds".to_owned(),
                ));
            }
            if mesh.vertices.iter().any(|v| !v.position.is_finite()) {
                return Err(ChartError::InvalidData(
                    "mesh vertices must be finite".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

impl DrawSurface for RenderFrame {
    fn begin_path(&mut self) {
        self.current.clear();
    }

    fn move_to(&mut self, point: PixelPoint) {
        self.current.move_to(point);
    }

    fn line_to(&mut self, point: PixelPoint) {
        self.current.line_to(point);
    }

    fn bezier_to(&mut self, control1: PixelPoint, control2: PixelPoint, to: PixelPoint) {
        self.current.cubic_to(control1, control2, to);
    }

    fn arc(&mut self, center: PixelPoint, radius: f64, start_angle: f64, sweep: f64) {
        self.current.arc(center, radius, start_angle, sweep);
    }

    fn close_path(&mut self) {
        self.current.close();
    }

    fn stroke(&mut self, style: StrokeStyle) {
        if self.current.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Stroke {
            path: self.current.clone(),
            style,
        });
    }

    fn fill(&mut self, color: Color) {
        if self.current.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Fill {
            path: self.current.clone(),
            color,
        });
    }

    fn allocate_mesh(
        &mut self,
        vertex_count: usize,
        index_count: usize,
        texture: Option<TextureId>,
    ) -> MeshSlot<'_> {
        self.meshes.push(Mesh {
            vertices: vec![MeshVertex::default(); vertex_count],
            indices: vec![0; index_count],
            texture,
        });
        let mesh = self
            .meshes
            .last_mut()
            .map(|mesh| (&mut mesh.vertices, &mut mesh.indices));
        match mesh {
            Some((vertices, indices)) => MeshSlot {
                vertices: vertices.as_mut_slice(),
                indices: indices.as_mut_slice(),
            },
            None => MeshSlot {
                vertices: &mut [],
                indices: &mut [],
            },
        }
    }
}
