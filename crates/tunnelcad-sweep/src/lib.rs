#![warn(missing_docs)]

//! Tunnel paths and section sweeps.
//!
//! [`load_path`] reads the operator's point file into [`PathPoints`];
//! [`place_and_sweep`] moves a section profile onto the start of the path,
//! sweeps it through a [`GeometryEmitter`](tunnelcad_emit::GeometryEmitter)
//! and reports the frame at the far end of the tunnel.

mod frame;
mod path;
mod sweep;

pub use frame::{end_frame, EndFrame};
pub use path::{load_path, read_path_file, PathPoints};
pub use sweep::{place_and_sweep, SweepOptions, SweptTunnel};

use std::path::PathBuf;

use thiserror::Error;
use tunnelcad_emit::EmitError;

/// Errors from path loading and sweep planning.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Fewer than two usable points in the path source.
    #[error("path needs at least 2 points, found {0}")]
    InsufficientPathPoints(usize),

    /// The path has no direction at its end.
    #[error("path end has no direction: all trailing points coincide")]
    DegeneratePathSegment,

    /// The sweep operator rejected the section or the path.
    #[error("sweep failed: {0}")]
    SweepFailed(String),

    /// Any other emitter failure.
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// The path file could not be read.
    #[error("cannot read path file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
