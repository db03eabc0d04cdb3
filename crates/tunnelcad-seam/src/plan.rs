//! Box transform sequence and sampling grid for a coal seam.

use serde::Serialize;
use tracing::{debug, info};
use tunnelcad_emit::{EntityId, GeometryEmitter};
use tunnelcad_math::{LocalFrame, Point3, Transform, Vec3};

use crate::spec::CoalSeamSpec;
use crate::Result;

/// Which local axis a grid line is fixed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAxis {
    /// Line at fixed local X, running across the seam width.
    X,
    /// Line at fixed local Y, running along the seam length.
    Y,
}

/// One sampling line in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSegment {
    /// Axis the line is fixed on.
    pub axis: GridAxis,
    /// Local coordinate on that axis.
    pub offset: f64,
    /// World start point.
    pub start: Point3,
    /// World end point.
    pub end: Point3,
}

/// A grid crossing, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    /// One-based index, X-outer then Y-inner.
    pub index: usize,
    /// World position.
    pub point: Point3,
}

/// Everything needed to realize a coal seam.
#[derive(Debug, Clone, Serialize)]
pub struct CoalSeamPlan {
    /// Validated frame.
    pub frame: LocalFrame,
    /// Canonical frame onto the seam frame.
    pub local_to_world: Transform,
    /// Box edge lengths along local X, Y and Z.
    pub box_size: [f64; 3],
    /// Transforms applied to the origin-centered box, in order: lift by
    /// half the thickness, push `towards`, tilt about X, tilt about Y,
    /// local to world.
    pub box_steps: Vec<Transform>,
    /// Grid lines fixed on X, then those fixed on Y.
    pub grid_segments: Vec<GridSegment>,
    /// Grid crossings.
    pub grid_points: Vec<GridPoint>,
    /// Lines on each side of the center along X.
    pub x_count: usize,
    /// Lines on each side of the center along Y.
    pub y_count: usize,
}

impl CoalSeamPlan {
    /// The box steps composed into one transform.
    pub fn box_transform(&self) -> Transform {
        Transform::chain(&self.box_steps)
    }
}

/// Entities created for a coal seam.
#[derive(Debug, Clone, Serialize)]
pub struct SeamEntities {
    /// The seam box.
    pub solid: EntityId,
    /// Grid lines, in plan order.
    pub lines: Vec<EntityId>,
}

/// Plan a coal seam.
///
/// The grid is placed with `towards → tilt X → tilt Y → world`, computed
/// per line and per point rather than taken from the box transform, so it
/// lies on the box's near face.
pub fn plan_coal_seam(spec: &CoalSeamSpec) -> Result<CoalSeamPlan> {
    let frame = spec.validate()?;
    let local_to_world = frame.to_world();

    let pivot = Point3::new(0.0, 0.0, spec.towards);
    let push = Transform::translation(0.0, 0.0, spec.towards);
    let tilt_x = Transform::rotation(spec.angle_x.to_radians(), &Vec3::x_axis(), &pivot);
    let tilt_y = Transform::rotation(spec.angle_y.to_radians(), &Vec3::y_axis(), &pivot);
    let lift = Transform::translation(0.0, 0.0, spec.thickness / 2.0);

    let placement = Transform::chain([&push, &tilt_x, &tilt_y, &local_to_world]);
    let box_steps = vec![lift, push, tilt_x, tilt_y, local_to_world.clone()];

    // Counts are finite and capped once validated.
    let (x_count, y_count) = spec.grid_counts();
    let (x_count, y_count) = (x_count as usize, y_count as usize);
    let xs = symmetric(x_count, spec.grid_length);
    let ys = symmetric(y_count, spec.grid_width);
    let (half_l, half_w) = (spec.length / 2.0, spec.width / 2.0);

    let mut grid_segments = Vec::with_capacity(xs.len() + ys.len());
    for &x in &xs {
        grid_segments.push(GridSegment {
            axis: GridAxis::X,
            offset: x,
            start: placement.apply_point(&Point3::new(x, -half_w, 0.0)),
            end: placement.apply_point(&Point3::new(x, half_w, 0.0)),
        });
    }
    for &y in &ys {
        grid_segments.push(GridSegment {
            axis: GridAxis::Y,
            offset: y,
            start: placement.apply_point(&Point3::new(-half_l, y, 0.0)),
            end: placement.apply_point(&Point3::new(half_l, y, 0.0)),
        });
    }

    let mut grid_points = Vec::with_capacity(xs.len() * ys.len());
    for &x in &xs {
        for &y in &ys {
            grid_points.push(GridPoint {
                index: grid_points.len() + 1,
                point: placement.apply_point(&Point3::new(x, y, 0.0)),
            });
        }
    }

    debug!(
        x_count,
        y_count,
        lines = grid_segments.len(),
        points = grid_points.len(),
        "coal seam planned"
    );
    Ok(CoalSeamPlan {
        frame,
        local_to_world,
        box_size: [spec.length, spec.width, spec.thickness],
        box_steps,
        grid_segments,
        grid_points,
        x_count,
        y_count,
    })
}

/// `-count..=count` multiples of `spacing`.
fn symmetric(count: usize, spacing: f64) -> Vec<f64> {
    let n = count as i64;
    (-n..=n).map(|i| i as f64 * spacing).collect()
}

/// Create the seam box and its grid lines. Runs inside the caller's
/// transaction.
pub fn emit_coal_seam<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    plan: &CoalSeamPlan,
) -> Result<SeamEntities> {
    let [length, width, thickness] = plan.box_size;
    let solid = emitter.create_box(length, width, thickness)?;
    for step in &plan.box_steps {
        emitter.transform(solid, step)?;
    }

    let mut lines = Vec::with_capacity(plan.grid_segments.len());
    for segment in &plan.grid_segments {
        lines.push(emitter.create_line(&segment.start, &segment.end)?);
    }
    info!(solid = %solid, lines = lines.len(), "coal seam emitted");
    Ok(SeamEntities { solid, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::sample_spec;
    use crate::SeamError;
    use approx::assert_relative_eq;
    use tunnelcad_emit::{Entity, MemoryEmitter, Scope, SolidShape};

    #[test]
    fn test_grid_counts() {
        let plan = plan_coal_seam(&sample_spec()).unwrap();
        assert_eq!((plan.x_count, plan.y_count), (5, 3));
        assert_eq!(plan.grid_points.len(), 77);
        assert_eq!(plan.grid_segments.len(), 11 + 7);
    }

    #[test]
    fn test_counts_floor_fractional_ratio() {
        let spec = CoalSeamSpec {
            length: 39.0,
            width: 10.0,
            grid_length: 10.0,
            grid_width: 6.0,
            ..sample_spec()
        };
        let plan = plan_coal_seam(&spec).unwrap();
        assert_eq!((plan.x_count, plan.y_count), (1, 0));
        assert_eq!(plan.grid_points.len(), 3);
    }

    #[test]
    fn test_points_indexed_x_outer() {
        let plan = plan_coal_seam(&sample_spec()).unwrap();
        let first = plan.grid_points[0];
        assert_eq!(first.index, 1);
        assert_relative_eq!(first.point, Point3::new(-50.0, -30.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            plan.grid_points[1].point,
            Point3::new(-50.0, -20.0, 0.0),
            epsilon = 1e-12
        );
        let last = plan.grid_points[76];
        assert_eq!(last.index, 77);
        assert_relative_eq!(last.point, Point3::new(50.0, 30.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_trivial_inputs_only_lift_the_box() {
        let plan = plan_coal_seam(&sample_spec()).unwrap();
        let expected = Transform::translation(0.0, 0.0, 2.0);
        assert_relative_eq!(plan.box_transform().matrix, expected.matrix, epsilon = 1e-12);
    }

    #[test]
    fn test_tilt_about_x_through_pivot() {
        let spec = CoalSeamSpec {
            towards: 5.0,
            angle_x: 90.0,
            ..sample_spec()
        };
        let plan = plan_coal_seam(&spec).unwrap();
        // Last point is local (50, 30): pushed to z = 5, then y swings up.
        let p = plan.grid_points[76].point;
        assert_relative_eq!(p, Point3::new(50.0, 0.0, 35.0), epsilon = 1e-9);
    }

    #[test]
    fn test_grid_lies_on_box_near_face() {
        let spec = CoalSeamSpec {
            origin: Point3::new(10.0, -4.0, 7.0),
            x_axis: Vec3::new(0.0, 1.0, 0.0),
            y_axis: Vec3::new(0.0, 0.0, 2.0),
            towards: 12.0,
            angle_x: 30.0,
            angle_y: -20.0,
            ..sample_spec()
        };
        let plan = plan_coal_seam(&spec).unwrap();
        let box_t = plan.box_transform();
        let half = spec.thickness / 2.0;
        for gp in &plan.grid_points {
            let i = (gp.index - 1) / (2 * plan.y_count + 1);
            let j = (gp.index - 1) % (2 * plan.y_count + 1);
            let x = (i as f64 - plan.x_count as f64) * spec.grid_length;
            let y = (j as f64 - plan.y_count as f64) * spec.grid_width;
            let on_face = box_t.apply_point(&Point3::new(x, y, -half));
            assert_relative_eq!(gp.point, on_face, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_world_frame_applied_last() {
        let spec = CoalSeamSpec {
            origin: Point3::new(100.0, 200.0, 0.0),
            x_axis: Vec3::new(0.0, 3.0, 0.0),
            y_axis: Vec3::new(-1.0, 0.0, 0.0),
            ..sample_spec()
        };
        let plan = plan_coal_seam(&spec).unwrap();
        // Local (-50, -30, 0) -> 100 + 30, 200 - 50
        assert_relative_eq!(
            plan.grid_points[0].point,
            Point3::new(130.0, 150.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_non_orthogonal_frame_plans_nothing() {
        let spec = CoalSeamSpec {
            x_axis: Vec3::new(1.0, 0.0, 0.0),
            y_axis: Vec3::new(0.1, 1.0, 0.0),
            ..sample_spec()
        };
        match plan_coal_seam(&spec) {
            Err(SeamError::NonOrthogonalFrame(dot)) => assert_relative_eq!(dot, 0.1),
            other => panic!("expected NonOrthogonalFrame, got {other:?}"),
        }
    }

    #[test]
    fn test_short_parallel_axes_plan_nothing() {
        let spec = CoalSeamSpec {
            x_axis: Vec3::new(1e-3, 0.0, 0.0),
            y_axis: Vec3::new(1e-3, 0.0, 0.0),
            ..sample_spec()
        };
        assert!(matches!(plan_coal_seam(&spec), Err(SeamError::NonOrthogonalFrame(_))));
    }

    #[test]
    fn test_dense_grid_plans_nothing() {
        let spec = CoalSeamSpec {
            length: 1e9,
            grid_length: 1e-3,
            ..sample_spec()
        };
        match plan_coal_seam(&spec) {
            Err(SeamError::InvalidParameter { name, .. }) => assert_eq!(name, "grid_length"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_emit_box_and_lines() {
        let plan = plan_coal_seam(&sample_spec()).unwrap();
        let mut emitter = MemoryEmitter::new();
        let mut scope = Scope::begin(&mut emitter).unwrap();
        let entities = emit_coal_seam(&mut *scope, &plan).unwrap();
        scope.commit().unwrap();

        assert_eq!(entities.lines.len(), 18);
        match emitter.document().get(entities.solid) {
            Some(Entity::Solid(SolidShape::Box { corners, .. })) => {
                assert_relative_eq!(corners[0], Point3::new(-50.0, -30.0, 0.0), epsilon = 1e-12);
                assert_relative_eq!(corners[6], Point3::new(50.0, 30.0, 4.0), epsilon = 1e-12);
            }
            other => panic!("expected box, got {other:?}"),
        }
        assert_eq!(emitter.document().lines().count(), 18);
    }
}
