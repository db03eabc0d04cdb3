#![warn(missing_docs)]

//! Math types for tunnelcad.
//!
//! Thin wrappers around nalgebra providing the pieces the tunnel and
//! coal-seam planners need: points, vectors, directions, 4x4 affine
//! transforms in the host's vocabulary (displacement, rotation about an
//! axis through a point, coordinate-system alignment), local frames and
//! tolerance constants.

use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D section plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Displacement by a vector.
    pub fn displacement(v: &Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    ///
    /// Uses Rodrigues' rotation formula.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self { matrix: m }
    }

    /// Rotation by `angle` radians about the axis through `pivot`.
    pub fn rotation(angle: f64, axis: &Dir3, pivot: &Point3) -> Self {
        let to_origin = Self::translation(-pivot.x, -pivot.y, -pivot.z);
        let back = Self::translation(pivot.x, pivot.y, pivot.z);
        to_origin
            .then(&Self::rotation_about_axis(axis, angle))
            .then(&back)
    }

    /// Maps the coordinate system `(from_origin, from_axes)` onto
    /// `(to_origin, to_axes)`.
    ///
    /// A point expressed with coordinates `(a, b, c)` in the source system
    /// lands at `to_origin + a*to_x + b*to_y + c*to_z`. Returns `None` when
    /// the source axes are linearly dependent.
    pub fn align_coordinate_system(
        from_origin: &Point3,
        from_axes: [&Vec3; 3],
        to_origin: &Point3,
        to_axes: [&Vec3; 3],
    ) -> Option<Self> {
        let from = Self::basis_matrix(from_origin, from_axes);
        let to = Self::basis_matrix(to_origin, to_axes);
        from.try_inverse().map(|inv| Self { matrix: to * inv })
    }

    fn basis_matrix(origin: &Point3, axes: [&Vec3; 3]) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        for (col, axis) in axes.iter().enumerate() {
            m[(0, col)] = axis.x;
            m[(1, col)] = axis.y;
            m[(2, col)] = axis.z;
        }
        m[(0, 3)] = origin.x;
        m[(1, 3)] = origin.y;
        m[(2, 3)] = origin.z;
        m
    }

    /// Compose: apply `self`, then `next`.
    pub fn then(&self, next: &Transform) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Compose a sequence of transforms applied in order.
    pub fn chain<'a>(steps: impl IntoIterator<Item = &'a Transform>) -> Self {
        steps
            .into_iter()
            .fold(Self::identity(), |acc, step| acc.then(step))
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Errors from building a [`LocalFrame`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameError {
    /// One of the basis vectors has zero length.
    #[error("frame axis {0} has zero length")]
    ZeroAxis(char),

    /// The X and Y axes are not perpendicular.
    #[error("frame axes are not orthogonal (X·Y = {0:.6})")]
    NonOrthogonal(f64),
}

/// A user coordinate system: origin plus orthonormal X, Y and derived Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    /// Origin in world coordinates.
    pub origin: Point3,
    /// Unit X axis.
    pub x_axis: Dir3,
    /// Unit Y axis.
    pub y_axis: Dir3,
    /// Unit Z axis, `normalize(X × Y)`.
    pub z_axis: Dir3,
}

impl LocalFrame {
    /// Dot-product limit for accepting two axes as orthogonal.
    pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-4;

    /// Build a frame from an origin and two axes.
    ///
    /// The orthogonality check runs on the axes as given and again on their
    /// unit directions, so short skewed axes are caught too. The frame is
    /// rejected rather than corrected.
    pub fn new(origin: Point3, x_axis: Vec3, y_axis: Vec3) -> Result<Self, FrameError> {
        let tol = Tolerance::DEFAULT;
        if x_axis.norm() < tol.linear {
            return Err(FrameError::ZeroAxis('X'));
        }
        if y_axis.norm() < tol.linear {
            return Err(FrameError::ZeroAxis('Y'));
        }
        let dot = x_axis.dot(&y_axis);
        if dot.abs() > Self::ORTHOGONALITY_TOLERANCE {
            return Err(FrameError::NonOrthogonal(dot));
        }

        let x = Dir3::new_normalize(x_axis);
        let y = Dir3::new_normalize(y_axis);
        let cos = x.as_ref().dot(y.as_ref());
        if cos.abs() > Self::ORTHOGONALITY_TOLERANCE {
            return Err(FrameError::NonOrthogonal(cos));
        }
        let z = Dir3::try_new(x.as_ref().cross(y.as_ref()), tol.linear)
            .ok_or(FrameError::NonOrthogonal(cos))?;
        Ok(Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
        })
    }

    /// Transform taking canonical (world) coordinates into this frame.
    pub fn to_world(&self) -> Transform {
        // The world basis is never singular.
        Transform::align_coordinate_system(
            &Point3::origin(),
            [&Vec3::x(), &Vec3::y(), &Vec3::z()],
            &self.origin,
            [self.x_axis.as_ref(), self.y_axis.as_ref(), self.z_axis.as_ref()],
        )
        .unwrap_or_default()
    }
}

/// Section axes for a path tangent.
///
/// `X = −normalize(t × Z)`, `Y = normalize(t × X)`. A tangent parallel to
/// world Z uses world Y in place of Z. Returns `None` for a zero tangent.
pub fn section_axes(tangent: &Vec3) -> Option<(Dir3, Dir3)> {
    let t = tangent.try_normalize(Tolerance::DEFAULT.linear)?;
    let mut side = t.cross(&Vec3::z());
    if side.norm() < Tolerance::DEFAULT.linear {
        side = t.cross(&Vec3::y());
    }
    let x = Dir3::try_new(-side, Tolerance::DEFAULT.linear)?;
    let y = Dir3::try_new(t.cross(x.as_ref()), Tolerance::DEFAULT.linear)?;
    Some((x, y))
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in drawing units.
    pub linear: f64,
}

impl Tolerance {
    /// Default CAD tolerance, 1e-6 drawing units.
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
