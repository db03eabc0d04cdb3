//! Frame at the far end of a tunnel path.

use std::fmt;

use serde::Serialize;
use tunnelcad_math::{section_axes, Dir3, LocalFrame, Point3, Tolerance, Vec3};

use crate::path::PathPoints;
use crate::{Result, SweepError};

/// Direction and section axes at the last path point.
///
/// The operator reuses this as the coordinate system for the coal seam in
/// front of the tunnel face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndFrame {
    /// Last path point.
    pub origin: Point3,
    /// Unit direction of travel at the end.
    pub tangent: Dir3,
    /// `−normalize(tangent × Z)`.
    pub x_axis: Dir3,
    /// `normalize(tangent × X)`.
    pub y_axis: Dir3,
}

impl EndFrame {
    /// The frame as a coordinate system with origin, X and Y as reported.
    pub fn local_frame(&self) -> LocalFrame {
        LocalFrame {
            origin: self.origin,
            x_axis: self.x_axis,
            y_axis: self.y_axis,
            z_axis: Dir3::new_normalize(self.x_axis.cross(self.y_axis.as_ref())),
        }
    }
}

impl fmt::Display for EndFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "End point: {}", triple(&self.origin.coords))?;
        writeln!(f, "Tangent:   {}", triple(&self.tangent))?;
        writeln!(f, "X axis:    {}", triple(&self.x_axis))?;
        write!(f, "Y axis:    {}", triple(&self.y_axis))
    }
}

fn triple(v: &Vec3) -> String {
    // Values that round to zero print without a sign.
    let c = |x: f64| if x.abs() < 5e-5 { 0.0 } else { x };
    format!("({:.4}, {:.4}, {:.4})", c(v.x), c(v.y), c(v.z))
}

/// Frame at the end of `path`.
///
/// The tangent runs from the last point distinct from the end to the end.
/// Fails with `DegeneratePathSegment` when every point coincides with the
/// end.
pub fn end_frame(path: &PathPoints) -> Result<EndFrame> {
    let tol = Tolerance::DEFAULT;
    let points = path.points();
    let last = path.end();
    let previous = points
        .iter()
        .rev()
        .skip(1)
        .find(|p| !tol.points_equal(p, &last))
        .ok_or(SweepError::DegeneratePathSegment)?;

    let direction = last - previous;
    let tangent = Dir3::new_normalize(direction);
    let (x_axis, y_axis) = section_axes(&direction).ok_or(SweepError::DegeneratePathSegment)?;
    Ok(EndFrame {
        origin: last,
        tangent,
        x_axis,
        y_axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::load_path;
    use approx::assert_relative_eq;

    #[test]
    fn test_straight_path_along_x() {
        let path = load_path("0 0 0\n10 0 0\n").unwrap();
        let frame = end_frame(&path).unwrap();
        assert_relative_eq!(frame.tangent.into_inner(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(frame.x_axis.into_inner(), Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(frame.y_axis.into_inner(), Vec3::z(), epsilon = 1e-12);
        assert_eq!(frame.origin, Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_uses_last_segment_only() {
        let path = load_path("0 0 0\n10 0 0\n10 5 0\n").unwrap();
        let frame = end_frame(&path).unwrap();
        assert_relative_eq!(frame.tangent.into_inner(), Vec3::y(), epsilon = 1e-12);
        // -(Y × Z) = -X
        assert_relative_eq!(frame.x_axis.into_inner(), -Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_pair_is_degenerate() {
        let path = load_path("1 2 3\n1 2 3\n").unwrap();
        assert!(matches!(end_frame(&path), Err(SweepError::DegeneratePathSegment)));
    }

    #[test]
    fn test_repeated_end_point_walks_back() {
        let path = load_path("0 0 0\n0 4 0\n0 4 0\n").unwrap();
        let frame = end_frame(&path).unwrap();
        assert_relative_eq!(frame.tangent.into_inner(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_end_uses_world_y() {
        let path = load_path("0 0 0\n0 0 -5\n").unwrap();
        let frame = end_frame(&path).unwrap();
        let lf = frame.local_frame();
        assert_relative_eq!(lf.x_axis.dot(lf.y_axis.as_ref()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(frame.tangent.dot(frame.x_axis.as_ref()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_report_lists_axes() {
        let path = load_path("0 0 0\n10 0 0\n").unwrap();
        let text = end_frame(&path).unwrap().to_string();
        assert!(text.starts_with("End point: (10.0000, 0.0000, 0.0000)"));
        assert!(text.contains("X axis:    (0.0000, 1.0000, 0.0000)"));
    }
}
