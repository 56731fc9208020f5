use smallvec::SmallVec;

use crate::core::PixelPoint;
use crate::render::{DashPattern, DrawSurface};

/// Angular step used when flattening arcs into polylines.
pub const ARC_FLATTEN_STEP_RAD: f64 = 4.0 * std::f64::consts::PI / 180.0;
/// Fixed subdivision count used when flattening cubic segments.
pub const CUBIC_FLATTEN_STEPS: usize = 16;
/// Arcs are never flattened into fewer segments than this.
pub const MIN_ARC_SEGMENTS: usize = 2;

/// One drawing command in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(PixelPoint),
    LineTo(PixelPoint),
    CubicTo {
        control1: PixelPoint,
        control2: PixelPoint,
        to: PixelPoint,
    },
    /// Circular arc; angles in radians in pixel space (`y` down), `sweep` signed.
    Arc {
        center: PixelPoint,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
    Close,
}

/// Ordered list of path commands, replayable onto any `DrawSurface`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

/// A flattened sub-path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<PixelPoint>,
    pub closed: bool,
}

impl Polyline {
    #[must_use]
    pub fn length(&self) -> f64 {
        let open: f64 = self
            .points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + last.distance(*first),
            _ => open,
        }
    }
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Builds an open or closed polyline path from points.
    #[must_use]
    pub fn from_points(points: &[PixelPoint], closed: bool) -> Self {
        let mut path = Self::with_capacity(points.len() + 1);
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for point in iter {
                path.line_to(*point);
            }
            if closed {
                path.close();
            }
        }
        path
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn move_to(&mut self, point: PixelPoint) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    pub fn line_to(&mut self, point: PixelPoint) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn cubic_to(&mut self, control1: PixelPoint, control2: PixelPoint, to: PixelPoint) {
        self.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            to,
        });
    }

    pub fn arc(&mut self, center: PixelPoint, radius: f64, start_angle: f64, sweep: f64) {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            sweep,
        });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    pub fn extend(&mut self, other: &Path) {
        self.commands.extend_from_slice(&other.commands);
    }

    /// Last point reached by the path, if any.
    #[must_use]
    pub fn current_point(&self) -> Option<PixelPoint> {
        self.commands.iter().rev().find_map(|command| match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { to, .. } => Some(to),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Some(arc_point(center, radius, start_angle + sweep)),
            PathCommand::Close => None,
        })
    }

    /// Flattens curves and arcs into polylines.
    #[must_use]
    pub fn flatten(&self) -> Vec<Polyline> {
        let mut out = Vec::new();
        let mut current = Polyline::default();

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    if current.points.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                    current = Polyline {
                        points: vec![p],
                        closed: false,
                    };
                }
                PathCommand::LineTo(p) => current.points.push(p),
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    let start = current.points.last().copied().unwrap_or(control1);
                    if current.points.is_empty() {
                        current.points.push(start);
                    }
                    for step in 1..=CUBIC_FLATTEN_STEPS {
                        let t = step as f64 / CUBIC_FLATTEN_STEPS as f64;
                        current
                            .points
                            .push(cubic_point([start, control1, control2, to], t));
                    }
                }
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep,
                } => {
                    current.points.extend(flatten_arc(center, radius, start_angle, sweep));
                }
                PathCommand::Close => {
                    current.closed = true;
                    if current.points.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    } else {
                        current = Polyline::default();
                    }
                }
            }
        }
        if current.points.len() > 1 {
            out.push(current);
        }
        out
    }

    /// Applies `map` to every vertex and control point.
    ///
    /// Arcs are flattened first since a general point map does not keep them circular.
    #[must_use]
    pub fn map_points(&self, map: impl Fn(PixelPoint) -> PixelPoint) -> Path {
        let mut out = Path::with_capacity(self.commands.len());
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => out.move_to(map(p)),
                PathCommand::LineTo(p) => out.line_to(map(p)),
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => out.cubic_to(map(control1), map(control2), map(to)),
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep,
                } => {
                    for point in flatten_arc(center, radius, start_angle, sweep) {
                        out.line_to(map(point));
                    }
                }
                PathCommand::Close => out.close(),
            }
        }
        out
    }

    /// Largest x reached by the flattened path.
    #[must_use]
    pub fn max_x(&self) -> Option<f64> {
        self.flatten()
            .iter()
            .flat_map(|poly| poly.points.iter())
            .map(|p| p.x)
            .reduce(f64::max)
    }

    /// Splits the flattened path into dash sub-paths following `pattern`.
    #[must_use]
    pub fn dashed(&self, pattern: &DashPattern) -> Path {
        let mut out = Path::new();
        let period = pattern.period();
        if period <= 0.0 {
            return self.clone();
        }

        for poly in self.flatten() {
            let mut points = poly.points.clone();
            if poly.closed {
                if let Some(first) = points.first().copied() {
                    points.push(first);
                }
            }

            let mut cursor = DashCursor::new(pattern);
            let mut pen_down = false;
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let length = a.distance(b);
                if length <= f64::EPSILON {
                    continue;
                }
                let mut consumed = 0.0;
                while consumed < length {
                    let step = cursor.remaining.min(length - consumed);
                    let from = a.lerp(b, consumed / length);
                    let to = a.lerp(b, (consumed + step) / length);
                    if cursor.on {
                        if !pen_down {
                            out.move_to(from);
                            pen_down = true;
                        }
                        out.line_to(to);
                    }
                    consumed += step;
                    cursor.advance(step);
                    if cursor.remaining <= 0.0 {
                        cursor.next_segment();
                        pen_down = false;
                    }
                }
            }
        }
        out
    }

    /// Replays all commands onto `surface` inside a fresh path.
    pub fn replay<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.begin_path();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => surface.move_to(p),
                PathCommand::LineTo(p) => surface.line_to(p),
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => surface.bezier_to(control1, control2, to),
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep,
                } => surface.arc(center, radius, start_angle, sweep),
                PathCommand::Close => surface.close_path(),
            }
        }
    }
}

struct DashCursor<'a> {
    pattern: &'a DashPattern,
    index: usize,
    remaining: f64,
    on: bool,
}

impl<'a> DashCursor<'a> {
    fn new(pattern: &'a DashPattern) -> Self {
        let mut cursor = Self {
            pattern,
            index: 0,
            remaining: pattern.segments()[0],
            on: true,
        };
        let period = pattern.period();
        let mut skip = pattern.offset().rem_euclid(period);
        while skip > 0.0 {
            let step = cursor.remaining.min(skip);
            cursor.advance(step);
            skip -= step;
            if cursor.remaining <= 0.0 {
                cursor.next_segment();
            }
        }
        cursor
    }

    fn advance(&mut self, step: f64) {
        self.remaining -= step;
    }

    fn next_segment(&mut self) {
        let segments = self.pattern.segments();
        self.index = (self.index + 1) % segments.len();
        self.remaining = segments[self.index];
        self.on = self.index % 2 == 0;
    }
}

#[must_use]
pub fn arc_point(center: PixelPoint, radius: f64, angle: f64) -> PixelPoint {
    PixelPoint::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Number of segments used to flatten an arc of `sweep` radians.
#[must_use]
pub fn arc_segment_count(sweep: f64) -> usize {
    let raw = (sweep.abs() / ARC_FLATTEN_STEP_RAD).ceil();
    if raw.is_finite() {
        (raw as usize).max(MIN_ARC_SEGMENTS)
    } else {
        MIN_ARC_SEGMENTS
    }
}

/// Flattens an arc into `arc_segment_count(sweep) + 1` points, start included.
#[must_use]
pub fn flatten_arc(center: PixelPoint, radius: f64, start_angle: f64, sweep: f64) -> Vec<PixelPoint> {
    let segments = arc_segment_count(sweep);
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            arc_point(center, radius, start_angle + sweep * t)
        })
        .collect()
}

/// Evaluates a cubic Bézier at `t`.
#[must_use]
pub fn cubic_point(points: [PixelPoint; 4], t: f64) -> PixelPoint {
    let [p0, p1, p2, p3] = points;
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    PixelPoint::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// De Casteljau split of a cubic Bézier at `t` into its left and right halves.
#[must_use]
pub fn split_cubic(points: [PixelPoint; 4], t: f64) -> ([PixelPoint; 4], [PixelPoint; 4]) {
    let [p0, p1, p2, p3] = points;
    let p01 = p0.lerp(p1, t);
    let p12 = p1.lerp(p2, t);
    let p23 = p2.lerp(p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    ([p0, p01, p012, mid], [mid, p123, p23, p3])
}

/// Collects the distinct vertices of a closed outline, dropping consecutive duplicates.
#[must_use]
pub fn dedup_points(points: &[PixelPoint]) -> SmallVec<[PixelPoint; 64]> {
    let mut out: SmallVec<[PixelPoint; 64]> = SmallVec::with_capacity(points.len());
    for point in points {
        if out
            .last()
            .is_none_or(|last| last.distance_squared(*point) > 1e-18)
        {
            out.push(*point);
        }
    }
    out
}
