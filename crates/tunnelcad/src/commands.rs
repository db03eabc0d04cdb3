//! The tunnel and coal-seam commands.

use std::path::PathBuf;

use tracing::{info, warn};
use tunnelcad_emit::{GeometryEmitter, Scope};
use tunnelcad_seam::{emit_coal_seam, plan_coal_seam, write_grid_csv_file, CoalSeamSpec};
use tunnelcad_section::{
    build_custom_profile, build_profile, Boundary, ParameterVector, Profile, SectionError,
    TunnelType,
};
use tunnelcad_sweep::{place_and_sweep, PathPoints, SweepOptions};

use crate::report::{SeamReport, TunnelReport};
use crate::Result;

/// Validated input for [`build_tunnel`].
#[derive(Debug, Clone)]
pub struct TunnelRequest {
    /// Section family.
    pub tunnel_type: TunnelType,
    /// Section dimensions; ignored for custom sections.
    pub parameters: ParameterVector,
    /// Closed curve for custom sections.
    pub curve: Option<Boundary>,
    /// Tunnel path.
    pub path: PathPoints,
    /// Center the section on the path by its bottom midpoint.
    pub auto_center: bool,
}

impl TunnelRequest {
    fn profile(&self) -> Result<Profile> {
        let profile = match self.tunnel_type {
            TunnelType::Custom => {
                let curve = self.curve.as_ref().ok_or(SectionError::CurveRequired)?;
                build_custom_profile(curve)?
            }
            other => build_profile(other, &self.parameters)?,
        };
        Ok(profile)
    }
}

/// Validated input for [`build_coal_seam`].
#[derive(Debug, Clone)]
pub struct SeamRequest {
    /// Seam layout.
    pub spec: CoalSeamSpec,
    /// Where to write the grid crossings, if anywhere.
    pub export: Option<PathBuf>,
}

/// Build a tunnel: path polyline, hollow section and swept solid, all in
/// one transaction.
pub fn build_tunnel<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    request: &TunnelRequest,
) -> Result<TunnelReport> {
    run_tunnel(emitter, request).inspect_err(|e| warn!(error = %e, "tunnel command aborted"))
}

fn run_tunnel<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    request: &TunnelRequest,
) -> Result<TunnelReport> {
    let profile = request.profile()?;
    let options = SweepOptions {
        auto_center: request.auto_center,
    };

    let mut scope = Scope::begin(emitter)?;
    let swept = place_and_sweep(&mut *scope, &profile, &request.path, &options)?;
    scope.commit()?;

    info!(
        tunnel_type = %profile.tunnel_type,
        solid = %swept.solid,
        points = request.path.len(),
        "tunnel built"
    );
    Ok(TunnelReport {
        tunnel_type: profile.tunnel_type,
        wall: profile.wall,
        path_points: request.path.len(),
        path_length: request.path.length(),
        placement: swept.placement,
        path: swept.path,
        region: swept.region,
        solid: swept.solid,
        end_frame: swept.end_frame,
    })
}

/// Build a coal seam: tilted box and grid lines in one transaction, plus the
/// optional grid export.
///
/// Planning, including the frame orthogonality check, finishes before the
/// transaction opens. An export failure aborts the transaction.
pub fn build_coal_seam<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    request: &SeamRequest,
) -> Result<SeamReport> {
    run_seam(emitter, request).inspect_err(|e| warn!(error = %e, "coal seam command aborted"))
}

fn run_seam<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    request: &SeamRequest,
) -> Result<SeamReport> {
    let plan = plan_coal_seam(&request.spec)?;

    let mut scope = Scope::begin(emitter)?;
    let entities = emit_coal_seam(&mut *scope, &plan)?;
    if let Some(path) = &request.export {
        write_grid_csv_file(path, &plan.grid_points)?;
    }
    scope.commit()?;

    info!(
        solid = %entities.solid,
        lines = entities.lines.len(),
        points = plan.grid_points.len(),
        "coal seam built"
    );
    Ok(SeamReport {
        solid: entities.solid,
        grid_lines: entities.lines.len(),
        grid_points: plan.grid_points.len(),
        x_count: plan.x_count,
        y_count: plan.y_count,
        export: request.export.clone(),
    })
}
