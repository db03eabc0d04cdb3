//! Coal-seam input parameters.

use serde::{Deserialize, Serialize};
use tunnelcad_math::{FrameError, LocalFrame, Point3, Vec3};

use crate::{Result, SeamError};

/// Largest tilt accepted about either axis, in degrees.
const MAX_TILT_DEGREES: f64 = 90.0;

/// Most grid crossings a seam may carry.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Everything needed to lay out one coal seam.
///
/// Sizes are along the local axes: `length` on X, `width` on Y, `thickness`
/// on Z. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoalSeamSpec {
    /// Frame origin, usually the tunnel face.
    pub origin: Point3,
    /// Frame X axis as entered; need not be unit length.
    pub x_axis: Vec3,
    /// Frame Y axis as entered; need not be unit length.
    pub y_axis: Vec3,
    /// Distance from the origin to the seam's near face along local Z.
    pub towards: f64,
    /// Extent along local X.
    pub length: f64,
    /// Extent along local Y.
    pub width: f64,
    /// Extent along local Z.
    pub thickness: f64,
    /// Tilt about local X.
    pub angle_x: f64,
    /// Tilt about local Y, applied after `angle_x`.
    pub angle_y: f64,
    /// Grid spacing along X.
    pub grid_length: f64,
    /// Grid spacing along Y.
    pub grid_width: f64,
}

impl CoalSeamSpec {
    /// Check every field and build the local frame.
    ///
    /// Orthogonality is checked first, on the axes as entered.
    pub fn validate(&self) -> Result<LocalFrame> {
        let frame = LocalFrame::new(self.origin, self.x_axis, self.y_axis).map_err(|e| match e {
            FrameError::NonOrthogonal(dot) => SeamError::NonOrthogonalFrame(dot),
            FrameError::ZeroAxis(axis) => SeamError::InvalidParameter {
                name: if axis == 'X' { "x_axis" } else { "y_axis" },
                reason: "axis has zero length".into(),
            },
        })?;

        for (name, value) in [
            ("length", self.length),
            ("width", self.width),
            ("thickness", self.thickness),
            ("grid_length", self.grid_length),
            ("grid_width", self.grid_width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SeamError::InvalidParameter {
                    name,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        for (name, value) in [("angle_x", self.angle_x), ("angle_y", self.angle_y)] {
            if !(-MAX_TILT_DEGREES..=MAX_TILT_DEGREES).contains(&value) {
                return Err(SeamError::InvalidParameter {
                    name,
                    reason: format!("must be within ±{MAX_TILT_DEGREES}°, got {value}"),
                });
            }
        }
        if !self.towards.is_finite() {
            return Err(SeamError::InvalidParameter {
                name: "towards",
                reason: format!("must be finite, got {}", self.towards),
            });
        }

        let (x_count, y_count) = self.grid_counts();
        let (x_lines, y_lines) = (2.0 * x_count + 1.0, 2.0 * y_count + 1.0);
        if x_lines * y_lines > MAX_GRID_POINTS as f64 {
            return Err(SeamError::InvalidParameter {
                name: if x_lines >= y_lines { "grid_length" } else { "grid_width" },
                reason: format!(
                    "{x_lines} x {y_lines} grid exceeds {MAX_GRID_POINTS} crossings"
                ),
            });
        }
        Ok(frame)
    }

    /// Grid lines on each side of the center, along X and Y.
    pub(crate) fn grid_counts(&self) -> (f64, f64) {
        (
            (self.length / self.grid_length / 2.0).floor(),
            (self.width / self.grid_width / 2.0).floor(),
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_spec() -> CoalSeamSpec {
    CoalSeamSpec {
        origin: Point3::origin(),
        x_axis: Vec3::x(),
        y_axis: Vec3::y(),
        towards: 0.0,
        length: 100.0,
        width: 60.0,
        thickness: 4.0,
        angle_x: 0.0,
        angle_y: 0.0,
        grid_length: 10.0,
        grid_width: 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        assert!(sample_spec().validate().is_ok());
    }

    #[test]
    fn test_non_orthogonal_rejected() {
        let spec = CoalSeamSpec {
            y_axis: Vec3::new(0.1, 1.0, 0.0),
            ..sample_spec()
        };
        assert!(matches!(spec.validate(), Err(SeamError::NonOrthogonalFrame(_))));
    }

    #[test]
    fn test_orthogonality_checked_before_sizes() {
        let spec = CoalSeamSpec {
            y_axis: Vec3::new(0.1, 1.0, 0.0),
            length: -1.0,
            ..sample_spec()
        };
        assert!(matches!(spec.validate(), Err(SeamError::NonOrthogonalFrame(_))));
    }

    #[test]
    fn test_tilt_limits_inclusive() {
        let edge = CoalSeamSpec {
            angle_x: -90.0,
            angle_y: 90.0,
            ..sample_spec()
        };
        assert!(edge.validate().is_ok());
        let over = CoalSeamSpec {
            angle_y: 90.5,
            ..sample_spec()
        };
        assert!(matches!(
            over.validate(),
            Err(SeamError::InvalidParameter { name: "angle_y", .. })
        ));
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let spec = CoalSeamSpec {
            grid_width: 0.0,
            ..sample_spec()
        };
        assert!(matches!(
            spec.validate(),
            Err(SeamError::InvalidParameter { name: "grid_width", .. })
        ));
    }

    #[test]
    fn test_short_parallel_axes_rejected() {
        let spec = CoalSeamSpec {
            x_axis: Vec3::new(1e-3, 0.0, 0.0),
            y_axis: Vec3::new(1e-3, 0.0, 0.0),
            ..sample_spec()
        };
        assert!(matches!(spec.validate(), Err(SeamError::NonOrthogonalFrame(_))));
    }

    #[test]
    fn test_grid_size_capped() {
        // 999 x 999 crossings fit, 1001 x 1001 do not.
        let fits = CoalSeamSpec {
            length: 998.0,
            width: 998.0,
            grid_length: 1.0,
            grid_width: 1.0,
            ..sample_spec()
        };
        assert!(fits.validate().is_ok());
        let over = CoalSeamSpec {
            length: 1000.0,
            width: 1000.0,
            ..fits.clone()
        };
        assert!(matches!(
            over.validate(),
            Err(SeamError::InvalidParameter { name: "grid_length", .. })
        ));
    }

    #[test]
    fn test_huge_grid_rejected_without_overflow() {
        let spec = CoalSeamSpec {
            length: 1e300,
            grid_width: 1e-300,
            ..sample_spec()
        };
        assert!(matches!(
            spec.validate(),
            Err(SeamError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let spec = CoalSeamSpec {
            x_axis: Vec3::zeros(),
            ..sample_spec()
        };
        assert!(matches!(
            spec.validate(),
            Err(SeamError::InvalidParameter { name: "x_axis", .. })
        ));
    }
}
