#![warn(missing_docs)]

//! Tunnel cross-section profiles.
//!
//! Maps a tunnel type and a small positional parameter vector to a hollow
//! 2D section: a closed outer boundary, an inner boundary inset by a fixed
//! wall fraction, and (for half-circle sections) a floor strip united back
//! after the subtraction.
//!
//! # Example
//!
//! ```
//! use tunnelcad_section::{build_profile, ParameterVector, TunnelType};
//!
//! let params = ParameterVector::new(&[4.0, 5.0]).unwrap();
//! let profile = build_profile(TunnelType::ThreeStar, &params).unwrap();
//! assert!(profile.inner.area() < profile.outer.area());
//! ```

mod boundary;
mod custom;
mod params;
mod profile;

pub use boundary::{Boundary, Bounds2, Edge, Vertex};
pub use custom::{custom_wall, CUSTOM_WALL_LIMIT};
pub use params::{ParameterVector, TunnelType};
pub use profile::{
    build_custom_profile, build_profile, Profile, HALF_CIRCLE_WALL_RATIO,
    THREE_STAR_WALL_RATIO, TRAPEZOID_WALL_RATIO,
};

use thiserror::Error;

/// Errors from section construction.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SectionError {
    /// Fewer parameter slots than the tunnel type reads.
    #[error("{tunnel_type} needs {expected} parameters, got {given}")]
    InsufficientParameters {
        /// Requested family.
        tunnel_type: TunnelType,
        /// Slots the family reads.
        expected: usize,
        /// Slots supplied.
        given: usize,
    },

    /// More slots than a parameter vector holds.
    #[error("at most 4 parameters are accepted, got {0}")]
    TooManyParameters(usize),

    /// A populated slot is zero, negative or not finite.
    #[error("parameter {slot} must be positive, got {value}")]
    NonPositiveParameter {
        /// Zero-based slot.
        slot: usize,
        /// Offending value.
        value: f64,
    },

    /// A derived inner dimension is not positive.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The selected curve cannot bound a section.
    #[error("unsupported curve: {0}")]
    UnsupportedCurveType(String),

    /// Insetting the custom curve degenerated.
    #[error("offset failed: {0}")]
    OffsetFailed(String),

    /// A custom section was requested without a curve.
    #[error("custom sections are built from a selected closed curve")]
    CurveRequired,

    /// The tunnel type name is not recognized.
    #[error("unknown tunnel type '{0}'")]
    UnknownTunnelType(String),
}

/// Result type for section operations.
pub type Result<T> = std::result::Result<T, SectionError>;
