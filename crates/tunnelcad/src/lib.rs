#![warn(missing_docs)]

//! Mine tunnel and coal seam layout.
//!
//! The two commands an operator runs:
//!
//! - [`build_tunnel`]: read a path file, build a hollow section, sweep it
//!   along the path and report the frame at the tunnel face.
//! - [`build_coal_seam`]: lay out a tilted seam box with a sampling grid in
//!   a local coordinate system, optionally exporting the grid crossings.
//!
//! Both run inside one transaction on a
//! [`GeometryEmitter`](tunnelcad_emit::GeometryEmitter) and leave nothing
//! behind on failure. Inputs come from dialog-style [`forms`] or from TOML
//! [`job`] files; the tunnel's end frame reaches the seam command through a
//! [`FrameHandoff`].
//!
//! # Example
//!
//! ```
//! use tunnelcad::{build_tunnel, MemoryEmitter, ParameterVector, TunnelRequest, TunnelType};
//! use tunnelcad::load_path;
//!
//! let request = TunnelRequest {
//!     tunnel_type: TunnelType::Trapezoid,
//!     parameters: ParameterVector::new(&[3.0, 5.0, 4.0]).unwrap(),
//!     curve: None,
//!     path: load_path("0 0 0\n50 0 0\n50 40 0\n").unwrap(),
//!     auto_center: true,
//! };
//! let mut emitter = MemoryEmitter::new();
//! let report = build_tunnel(&mut emitter, &request).unwrap();
//! assert_eq!(report.path_points, 3);
//! ```

mod commands;
pub mod forms;
mod handoff;
pub mod job;
mod report;

pub use commands::{build_coal_seam, build_tunnel, SeamRequest, TunnelRequest};
pub use forms::FieldError;
pub use handoff::FrameHandoff;
pub use job::{run_job, JobFile, JobReport};
pub use report::{SeamReport, TunnelReport};

pub use tunnelcad_emit::{Document, EmitError, GeometryEmitter, MemoryEmitter, Scope};
pub use tunnelcad_math::{LocalFrame, Point3, Transform, Vec3};
pub use tunnelcad_seam::{
    plan_coal_seam, read_grid_csv, write_grid_csv, CoalSeamPlan, CoalSeamSpec, GridPoint,
    SeamError,
};
pub use tunnelcad_section::{
    build_custom_profile, build_profile, Boundary, ParameterVector, Profile, SectionError,
    TunnelType, Vertex,
};
pub use tunnelcad_sweep::{load_path, read_path_file, EndFrame, PathPoints, SweepError};

use std::path::PathBuf;

use thiserror::Error;

/// Errors a command reports to the operator.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Section construction failed.
    #[error(transparent)]
    Section(#[from] SectionError),

    /// Path loading or sweeping failed.
    #[error(transparent)]
    Sweep(#[from] SweepError),

    /// Coal-seam planning or export failed.
    #[error(transparent)]
    Seam(#[from] SeamError),

    /// The host rejected an operation.
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// A form field did not validate.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A job file could not be parsed.
    #[error("invalid job file: {0}")]
    Job(#[from] toml::de::Error),

    /// A job file could not be read.
    #[error("cannot read job file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The seam has no coordinate system and no tunnel frame to reuse.
    #[error("coal seam needs origin, x_axis and y_axis, or a tunnel built first")]
    MissingFrame,
}

/// Result type for commands.
pub type Result<T> = std::result::Result<T, CommandError>;
