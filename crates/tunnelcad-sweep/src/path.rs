//! Path point files.
//!
//! One point per line, fields separated by any run of spaces, commas or
//! tabs. The first three fields are X, Y and Z. Lines that don't start with
//! three finite numbers are skipped, not reported as errors.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};
use tunnelcad_math::Point3;

use crate::{Result, SweepError};

/// Ordered tunnel path, at least two points long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPoints {
    points: Vec<Point3>,
}

impl PathPoints {
    /// Wrap a point list, rejecting fewer than two points.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SweepError::InsufficientPathPoints(points.len()));
        }
        Ok(Self { points })
    }

    /// Points in traversal order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Last point.
    pub fn end(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// Parse path text.
pub fn load_path(text: &str) -> Result<PathPoints> {
    let mut points = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(p) => points.push(p),
            None => warn!(line = number + 1, content = line, "skipping malformed path line"),
        }
    }
    debug!(points = points.len(), "path loaded");
    PathPoints::new(points)
}

/// Read and parse a path file.
pub fn read_path_file(path: impl AsRef<Path>) -> Result<PathPoints> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SweepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_path(&text)
}

fn parse_line(line: &str) -> Option<Point3> {
    let mut fields = line
        .split([' ', ',', '\t'])
        .filter(|f| !f.is_empty())
        .map(|f| f.trim().parse::<f64>().ok().filter(|v| v.is_finite()));
    let x = fields.next()??;
    let y = fields.next()??;
    let z = fields.next()??;
    Some(Point3::new(x, y, z))
}
