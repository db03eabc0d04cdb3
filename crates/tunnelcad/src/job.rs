//! TOML job files.
//!
//! A job runs a tunnel, a coal seam or both, in that order:
//!
//! ```toml
//! [tunnel]
//! type = "trapezoid"
//! dimensions = [3.0, 5.0, 4.0]
//! path_file = "drift.txt"
//! auto_center = true
//!
//! [seam]
//! towards = 5.0
//! length = 100.0
//! width = 60.0
//! thickness = 3.5
//! angle_x = 12.0
//! grid_length = 10.0
//! grid_width = 10.0
//! export = "grid.csv"
//! ```
//!
//! A seam without `origin`, `x_axis` and `y_axis` takes them from the face of
//! the tunnel built earlier in the same job. Relative paths resolve against
//! the job file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use tunnelcad_emit::GeometryEmitter;
use tunnelcad_math::{LocalFrame, Point3, Vec3};
use tunnelcad_seam::CoalSeamSpec;
use tunnelcad_section::{Boundary, ParameterVector, TunnelType, Vertex};
use tunnelcad_sweep::read_path_file;

use crate::commands::{build_coal_seam, build_tunnel, SeamRequest, TunnelRequest};
use crate::handoff::FrameHandoff;
use crate::report::{SeamReport, TunnelReport};
use crate::{CommandError, Result};

/// A parsed job file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    /// Tunnel to build first.
    pub tunnel: Option<TunnelJob>,
    /// Coal seam to lay out afterwards.
    pub seam: Option<SeamJob>,
}

/// The `[tunnel]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TunnelJob {
    /// Section family.
    #[serde(rename = "type")]
    pub tunnel_type: TunnelType,
    /// Section dimensions in slot order.
    #[serde(default)]
    pub dimensions: Vec<f64>,
    /// Path point file.
    pub path_file: PathBuf,
    /// Center the section on the path.
    #[serde(default)]
    pub auto_center: bool,
    /// Closed section curve for `custom`, as `[x, y, bulge]` vertices.
    #[serde(default)]
    pub curve: Vec<[f64; 3]>,
}

/// The `[seam]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeamJob {
    /// Frame origin.
    pub origin: Option<[f64; 3]>,
    /// Frame X axis.
    pub x_axis: Option<[f64; 3]>,
    /// Frame Y axis.
    pub y_axis: Option<[f64; 3]>,
    /// Distance to the seam along local Z.
    pub towards: f64,
    /// Extent along local X.
    pub length: f64,
    /// Extent along local Y.
    pub width: f64,
    /// Extent along local Z.
    pub thickness: f64,
    /// Tilt about local X, degrees.
    #[serde(default)]
    pub angle_x: f64,
    /// Tilt about local Y, degrees.
    #[serde(default)]
    pub angle_y: f64,
    /// Grid spacing along X.
    pub grid_length: f64,
    /// Grid spacing along Y.
    pub grid_width: f64,
    /// Grid export file.
    pub export: Option<PathBuf>,
}

/// Reports from each section of a job that ran.
#[derive(Debug, Clone, Default)]
pub struct JobReport {
    /// The tunnel, if the job had one.
    pub tunnel: Option<TunnelReport>,
    /// The seam, if the job had one.
    pub seam: Option<SeamReport>,
}

impl JobFile {
    /// Parse a job from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a job file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CommandError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

impl TunnelJob {
    fn request(&self, base_dir: &Path) -> Result<TunnelRequest> {
        let parameters = ParameterVector::new(&self.dimensions)?;
        let curve = if self.curve.is_empty() {
            None
        } else {
            let vertices = self
                .curve
                .iter()
                .map(|&[x, y, bulge]| Vertex::with_bulge(x, y, bulge))
                .collect();
            Some(Boundary::closed(vertices))
        };
        let path = read_path_file(resolve(base_dir, &self.path_file))?;
        Ok(TunnelRequest {
            tunnel_type: self.tunnel_type,
            parameters,
            curve,
            path,
            auto_center: self.auto_center,
        })
    }
}

impl SeamJob {
    fn request(&self, base_dir: &Path, handoff: Option<&LocalFrame>) -> Result<SeamRequest> {
        let (origin, x_axis, y_axis) = match (self.origin, self.x_axis, self.y_axis, handoff) {
            (Some(o), Some(x), Some(y), _) => (Point3::from(o), Vec3::from(x), Vec3::from(y)),
            (o, x, y, Some(frame)) => (
                o.map_or(frame.origin, Point3::from),
                x.map_or(frame.x_axis.into_inner(), Vec3::from),
                y.map_or(frame.y_axis.into_inner(), Vec3::from),
            ),
            _ => return Err(CommandError::MissingFrame),
        };
        Ok(SeamRequest {
            spec: CoalSeamSpec {
                origin,
                x_axis,
                y_axis,
                towards: self.towards,
                length: self.length,
                width: self.width,
                thickness: self.thickness,
                angle_x: self.angle_x,
                angle_y: self.angle_y,
                grid_length: self.grid_length,
                grid_width: self.grid_width,
            },
            export: self.export.as_ref().map(|p| resolve(base_dir, p)),
        })
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Run every section of a job against one emitter.
///
/// Each section is its own transaction. A failing seam leaves the committed
/// tunnel in place.
pub fn run_job<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    job: &JobFile,
    base_dir: &Path,
) -> Result<JobReport> {
    let mut handoff = FrameHandoff::new();
    let mut report = JobReport::default();

    if let Some(tunnel) = &job.tunnel {
        let request = tunnel.request(base_dir)?;
        let built = build_tunnel(emitter, &request)?;
        handoff.record(&built);
        report.tunnel = Some(built);
    }

    if let Some(seam) = &job.seam {
        let request = seam.request(base_dir, handoff.frame())?;
        debug!(origin = ?request.spec.origin, "coal seam frame");
        report.seam = Some(build_coal_seam(emitter, &request)?);
    }

    Ok(report)
}
