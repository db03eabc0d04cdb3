#![warn(missing_docs)]

//! Coal-seam planning.
//!
//! A coal seam is a box laid out in an operator-defined coordinate system:
//! pushed `towards` along local Z, tilted about local X then local Y through
//! the center of its near face, and overlaid with a symmetric grid of
//! sampling lines whose crossings can be exported as CSV.

mod csv;
mod plan;
mod spec;

pub use csv::{read_grid_csv, write_grid_csv, write_grid_csv_file, CSV_HEADER};
pub use plan::{
    emit_coal_seam, plan_coal_seam, CoalSeamPlan, GridAxis, GridPoint, GridSegment, SeamEntities,
};
pub use spec::{CoalSeamSpec, MAX_GRID_POINTS};

use std::path::PathBuf;

use thiserror::Error;
use tunnelcad_emit::EmitError;

/// Errors from coal-seam planning and grid export.
#[derive(Debug, Error)]
pub enum SeamError {
    /// The frame's X and Y axes are not perpendicular.
    #[error("coordinate system X and Y axes are not orthogonal (X·Y = {0:.6})")]
    NonOrthogonalFrame(f64),

    /// A size, spacing or angle is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Emitter failure while realizing the seam.
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// Malformed grid CSV.
    #[error("grid csv line {line}: {message}")]
    Csv {
        /// One-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Reading or writing a grid file failed.
    #[error("grid file {}: {source}", path.display())]
    Io {
        /// File involved, empty for in-memory streams.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Result type for coal-seam operations.
pub type Result<T> = std::result::Result<T, SeamError>;
