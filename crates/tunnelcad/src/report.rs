//! Operator-facing command summaries.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tunnelcad_emit::EntityId;
use tunnelcad_math::Point3;
use tunnelcad_section::TunnelType;
use tunnelcad_sweep::EndFrame;

/// Result of [`build_tunnel`](crate::build_tunnel).
#[derive(Debug, Clone, Serialize)]
pub struct TunnelReport {
    /// Section family.
    pub tunnel_type: TunnelType,
    /// Derived wall thickness.
    pub wall: f64,
    /// Number of path points used.
    pub path_points: usize,
    /// Path length.
    pub path_length: f64,
    /// Where the section origin was placed.
    pub placement: Point3,
    /// Path polyline.
    pub path: EntityId,
    /// Section region.
    pub region: EntityId,
    /// Swept tunnel solid.
    pub solid: EntityId,
    /// Frame at the tunnel face.
    pub end_frame: EndFrame,
}

impl fmt::Display for TunnelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.placement;
        writeln!(f, "3D path added ({} points, length {:.4})", self.path_points, self.path_length)?;
        writeln!(f, "Section moved to path start: ({:.4}, {:.4}, {:.4})", p.x, p.y, p.z)?;
        writeln!(f, "Tunnel solid {} created ({}, wall {:.4})", self.solid, self.tunnel_type, self.wall)?;
        write!(f, "{}", self.end_frame)
    }
}

/// Result of [`build_coal_seam`](crate::build_coal_seam).
#[derive(Debug, Clone, Serialize)]
pub struct SeamReport {
    /// Seam box.
    pub solid: EntityId,
    /// Grid lines created.
    pub grid_lines: usize,
    /// Grid crossings computed.
    pub grid_points: usize,
    /// Lines on each side of the center along X.
    pub x_count: usize,
    /// Lines on each side of the center along Y.
    pub y_count: usize,
    /// Grid export file, if one was written.
    pub export: Option<PathBuf>,
}

impl fmt::Display for SeamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coal seam {} created with {} grid lines and {} grid points",
            self.solid, self.grid_lines, self.grid_points
        )?;
        if let Some(path) = &self.export {
            write!(f, "\nGrid points exported to {}", path.display())?;
        }
        Ok(())
    }
}
