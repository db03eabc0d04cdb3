//! Placing a section on a path and sweeping it.

use serde::Serialize;
use tracing::{debug, info};
use tunnelcad_emit::{emit_profile, EmitError, EntityId, GeometryEmitter};
use tunnelcad_math::{Point3, Transform};
use tunnelcad_section::Profile;

use crate::frame::{end_frame, EndFrame};
use crate::path::PathPoints;
use crate::{Result, SweepError};

/// Options for [`place_and_sweep`].
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Move the section so its bounds' bottom midpoint is the local origin
    /// before placing it. Default: false
    pub auto_center: bool,
}

/// Entities and frame produced by a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweptTunnel {
    /// The path polyline.
    pub path: EntityId,
    /// The placed section region.
    pub region: EntityId,
    /// The swept solid.
    pub solid: EntityId,
    /// Where the section's local origin was placed.
    pub placement: Point3,
    /// Frame at the end of the path.
    pub end_frame: EndFrame,
}

/// Sweep `profile` along `path`.
///
/// Emits the path polyline, realizes the section region, moves it by
/// `path[0] − origin` and sweeps it. Runs inside the caller's transaction;
/// on error nothing must be committed.
///
/// The end frame is computed first, so a path without a usable end
/// direction fails before any geometry is created.
pub fn place_and_sweep<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    profile: &Profile,
    path: &PathPoints,
    options: &SweepOptions,
) -> Result<SweptTunnel> {
    let end_frame = end_frame(path)?;

    let path_id = emitter.create_path(path.points())?;
    debug!(path = %path_id, points = path.len(), "path polyline added");

    let section = if options.auto_center {
        profile.recentered()
    } else {
        profile.clone()
    };
    let region = emit_profile(emitter, &section)?;

    let placement = path.start();
    emitter.transform(region, &Transform::displacement(&placement.coords))?;
    info!(
        "section moved to path start ({:.4}, {:.4}, {:.4})",
        placement.x, placement.y, placement.z
    );

    let solid = emitter.sweep(region, path_id).map_err(|e| match e {
        EmitError::SweepFailed(msg) => SweepError::SweepFailed(msg),
        other => SweepError::Emit(other),
    })?;
    info!(solid = %solid, length = path.length(), "tunnel solid swept");

    Ok(SweptTunnel {
        path: path_id,
        region,
        solid,
        placement,
        end_frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::load_path;
    use approx::assert_relative_eq;
    use tunnelcad_emit::{Entity, MemoryEmitter, Operation, Scope, SolidShape};
    use tunnelcad_section::{build_profile, ParameterVector, TunnelType};

    fn trapezoid() -> Profile {
        let params = ParameterVector::new(&[3.0, 5.0, 4.0]).unwrap();
        build_profile(TunnelType::Trapezoid, &params).unwrap()
    }

    #[test]
    fn test_sweep_commits_solid() {
        let path = load_path("100 0 0\n110 0 0\n120 0 0\n").unwrap();
        let mut emitter = MemoryEmitter::new();
        let mut scope = Scope::begin(&mut emitter).unwrap();
        let swept = place_and_sweep(&mut *scope, &trapezoid(), &path, &SweepOptions::default())
            .unwrap();
        scope.commit().unwrap();

        assert_eq!(swept.placement, Point3::new(100.0, 0.0, 0.0));
        let doc = emitter.document();
        let (_, shape) = doc.solids().next().unwrap();
        match shape {
            SolidShape::Swept { rings, holes, .. } => {
                assert_eq!(rings.len(), 3);
                assert_eq!(*holes, 1);
                // Bottom-left corner of the section stays on the path.
                assert_relative_eq!(rings[2][0], Point3::new(120.0, 0.0, 0.0), epsilon = 1e-9);
            }
            other => panic!("expected swept solid, got {other:?}"),
        }
    }

    #[test]
    fn test_auto_center_puts_bottom_mid_on_path() {
        let path = load_path("0 0 0\n10 0 0\n").unwrap();
        let options = SweepOptions {
            auto_center: true,
        };
        let mut emitter = MemoryEmitter::new();
        emitter.begin().unwrap();
        let swept = place_and_sweep(&mut emitter, &trapezoid(), &path, &options).unwrap();
        emitter.commit().unwrap();
        match emitter.document().get(swept.region) {
            Some(Entity::Region { outline, .. }) => {
                // Bottom width 5 centered on the start point.
                assert_relative_eq!(outline[0], Point3::new(-2.5, 0.0, 0.0), epsilon = 1e-9);
                assert_relative_eq!(outline[1], Point3::new(2.5, 0.0, 0.0), epsilon = 1e-9);
            }
            other => panic!("expected region, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_end_fails_before_geometry() {
        let path = load_path("5 5 5\n5 5 5\n").unwrap();
        let mut emitter = MemoryEmitter::new();
        emitter.begin().unwrap();
        let err = place_and_sweep(&mut emitter, &trapezoid(), &path, &SweepOptions::default())
            .unwrap_err();
        assert!(matches!(err, SweepError::DegeneratePathSegment));
        assert_eq!(emitter.pending_len(), 0);
    }

    #[test]
    fn test_sweep_failure_rolls_back() {
        let path = load_path("0 0 0\n10 0 0\n").unwrap();
        let mut emitter = MemoryEmitter::failing_sweeps();
        {
            let mut scope = Scope::begin(&mut emitter).unwrap();
            let err = place_and_sweep(&mut *scope, &trapezoid(), &path, &SweepOptions::default())
                .unwrap_err();
            assert!(matches!(err, SweepError::SweepFailed(_)));
        }
        assert!(emitter.document().is_empty());
        assert_eq!(emitter.journal().last(), Some(&Operation::Abort));
    }

    #[test]
    fn test_zero_length_interior_segment_fails_sweep() {
        let path = load_path("0 0 0\n5 0 0\n5 0 0\n10 0 0\n").unwrap();
        let mut emitter = MemoryEmitter::new();
        emitter.begin().unwrap();
        let err = place_and_sweep(&mut emitter, &trapezoid(), &path, &SweepOptions::default())
            .unwrap_err();
        assert!(matches!(err, SweepError::SweepFailed(_)));
    }
}
