//! Bulge polylines in the section plane.
//!
//! A [`Boundary`] is the host's lightweight polyline: an ordered list of 2D
//! vertices, each carrying the bulge of the edge that leaves it. A bulge of
//! `0` is a straight edge; otherwise the edge is a circular arc whose
//! included angle is `4 * atan(bulge)`, counter-clockwise when positive.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};
use tunnelcad_math::{Point2, Vec2};

/// A polyline vertex with the bulge of its outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in section coordinates.
    pub point: Point2,
    /// Bulge of the edge from this vertex to the next (`tan(θ/4)`).
    pub bulge: f64,
}

impl Vertex {
    /// A vertex whose outgoing edge is straight.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point2::new(x, y),
            bulge: 0.0,
        }
    }

    /// A vertex whose outgoing edge is an arc with the given bulge.
    pub fn with_bulge(x: f64, y: f64, bulge: f64) -> Self {
        Self {
            point: Point2::new(x, y),
            bulge,
        }
    }
}

/// One edge of a boundary, resolved to explicit geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    /// Straight edge.
    Line {
        /// Start point.
        start: Point2,
        /// End point.
        end: Point2,
    },
    /// Circular arc edge.
    Arc {
        /// Start point.
        start: Point2,
        /// End point.
        end: Point2,
        /// Arc center.
        center: Point2,
        /// Arc radius.
        radius: f64,
        /// Signed included angle, positive for counter-clockwise.
        sweep: f64,
    },
}

impl Edge {
    fn from_bulge(start: Point2, end: Point2, bulge: f64) -> Self {
        let chord = end - start;
        let len = chord.norm();
        // Any nonzero chord keeps its arc, however short.
        if bulge.abs() < 1e-12 || len == 0.0 {
            return Edge::Line { start, end };
        }
        let sweep = 4.0 * bulge.atan();
        let radius = len * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
        let mid = Point2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        // Positive bulges sit to the right of the chord direction.
        let right = Vec2::new(chord.y, -chord.x) / len;
        let center = mid + right * (len * (bulge * bulge - 1.0) / (4.0 * bulge));
        Edge::Arc {
            start,
            end,
            center,
            radius,
            sweep,
        }
    }

    /// Edge length.
    pub fn length(&self) -> f64 {
        match self {
            Edge::Line { start, end } => (end - start).norm(),
            Edge::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    /// Points along the edge, excluding the end point.
    fn sample(&self, arc_segments: usize, out: &mut Vec<Point2>) {
        match *self {
            Edge::Line { start, .. } => out.push(start),
            Edge::Arc {
                start,
                center,
                radius,
                sweep,
                ..
            } => {
                let a0 = (start.y - center.y).atan2(start.x - center.x);
                let n = arc_segments.max(1);
                for i in 0..n {
                    let a = a0 + sweep * i as f64 / n as f64;
                    out.push(Point2::new(
                        center.x + radius * a.cos(),
                        center.y + radius * a.sin(),
                    ));
                }
            }
        }
    }
}

/// Axis-aligned bounds in the section plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Bounds2 {
    fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    fn include(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds2) -> Bounds2 {
        let mut b = *self;
        b.include(other.min);
        b.include(other.max);
        b
    }

    /// Extent along X.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point.
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Midpoint of the bottom edge.
    pub fn bottom_mid(&self) -> Point2 {
        Point2::new((self.min.x + self.max.x) / 2.0, self.min.y)
    }
}

/// A planar polyline with per-vertex bulges, open or closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Ordered vertices.
    pub vertices: Vec<Vertex>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
}

impl Boundary {
    /// A closed boundary through the given vertices.
    pub fn closed(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            closed: true,
        }
    }

    /// An open polyline through the given vertices.
    pub fn open(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    /// Closed straight-edged polygon through `(x, y)` pairs.
    pub fn polygon(points: &[(f64, f64)]) -> Self {
        Self::closed(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
    }

    /// Axis-aligned rectangle with corners `(x0, y0)` and `(x1, y1)`.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True when there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when every edge is straight.
    pub fn is_polygon(&self) -> bool {
        self.edges().all(|e| matches!(e, Edge::Line { .. }))
    }

    /// Resolved edges in traversal order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.vertices.len();
        let count = match (self.closed, n) {
            (_, 0) | (_, 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            Edge::from_bulge(a.point, b.point, a.bulge)
        })
    }

    /// Total edge length.
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    /// Signed enclosed area, positive when counter-clockwise.
    ///
    /// Arc edges contribute their circular segment. Zero for open polylines.
    pub fn signed_area(&self) -> f64 {
        if !self.closed {
            return 0.0;
        }
        self.edges()
            .map(|e| match e {
                Edge::Line { start, end } => (start.x * end.y - end.x * start.y) / 2.0,
                Edge::Arc {
                    start,
                    end,
                    radius,
                    sweep,
                    ..
                } => {
                    let chord = (start.x * end.y - end.x * start.y) / 2.0;
                    chord + radius * radius * (sweep - sweep.sin()) / 2.0
                }
            })
            .sum()
    }

    /// Unsigned enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Bounds including arc extremes.
    pub fn bounds(&self) -> Bounds2 {
        let mut b = Bounds2::empty();
        for v in &self.vertices {
            b.include(v.point);
        }
        for edge in self.edges() {
            if let Edge::Arc {
                start,
                center,
                radius,
                sweep,
                ..
            } = edge
            {
                let a0 = (start.y - center.y).atan2(start.x - center.x);
                for k in 0..4 {
                    let axis_angle = k as f64 * FRAC_PI_2;
                    if angle_within_sweep(a0, sweep, axis_angle) {
                        b.include(Point2::new(
                            center.x + radius * axis_angle.cos(),
                            center.y + radius * axis_angle.sin(),
                        ));
                    }
                }
            }
        }
        b
    }

    /// Approximate the boundary with straight edges.
    pub fn tessellate(&self, arc_segments: usize) -> Vec<Point2> {
        let mut out = Vec::with_capacity(self.vertices.len() * arc_segments.max(1));
        for edge in self.edges() {
            edge.sample(arc_segments, &mut out);
        }
        if !self.closed {
            if let Some(last) = self.vertices.last() {
                out.push(last.point);
            }
        }
        out
    }

    /// Copy of the boundary moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let delta = Vec2::new(dx, dy);
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex {
                    point: v.point + delta,
                    bulge: v.bulge,
                })
                .collect(),
            closed: self.closed,
        }
    }

    /// Copy of the boundary scaled uniformly about `center`.
    ///
    /// Bulges are scale-invariant.
    pub fn scaled_about(&self, center: Point2, factor: f64) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex {
                    point: center + (v.point - center) * factor,
                    bulge: v.bulge,
                })
                .collect(),
            closed: self.closed,
        }
    }
}

fn angle_within_sweep(start: f64, sweep: f64, angle: f64) -> bool {
    let rel = if sweep >= 0.0 {
        (angle - start).rem_euclid(2.0 * PI)
    } else {
        (start - angle).rem_euclid(2.0 * PI)
    };
    rel <= sweep.abs() + 1e-12
}
