#![warn(missing_docs)]

//! Host geometry emission for tunnelcad.
//!
//! The planners never touch a CAD SDK directly. They drive a
//! [`GeometryEmitter`], the capability a host document offers: create
//! regions from closed curves, combine them, place and sweep them, build
//! boxes and lines, and commit or abort the whole batch. [`MemoryEmitter`]
//! implements it over an in-memory document so the pipelines run without a
//! host.
//!
//! All creation happens inside a transaction opened through [`Scope`]. A
//! scope that is dropped without [`Scope::commit`] aborts, so a failed
//! command never leaves partial geometry behind.

mod memory;
mod profile;

pub use memory::{Document, Entity, MemoryEmitter, Operation, SolidShape};
pub use profile::emit_profile;

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use tunnelcad_math::{Point3, Transform};
use tunnelcad_section::Boundary;

/// Handle to an entity created through an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a region stands for in a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRole {
    /// Outer boundary of a section.
    Outer,
    /// Inner boundary, subtracted from the outer.
    Inner,
    /// Strip united back after subtraction.
    Floor,
}

/// Errors raised by an emitter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmitError {
    /// The region operator produced nothing.
    #[error("region construction failed: {0}")]
    RegionConstructionFailed(String),

    /// The sweep operator rejected the section or the path.
    #[error("sweep failed: {0}")]
    SweepFailed(String),

    /// A handle that does not refer to a live entity.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// A handle of the wrong kind for the operation.
    #[error("entity {id} is not a {expected}")]
    WrongKind {
        /// Offending handle.
        id: EntityId,
        /// Kind the operation needs.
        expected: &'static str,
    },

    /// Input rejected before reaching the host.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An operation ran outside a transaction.
    #[error("no transaction is open")]
    NoTransaction,

    /// A transaction was opened while another is still open.
    #[error("a transaction is already open")]
    TransactionActive,
}

/// Result type for emitter operations.
pub type Result<T> = std::result::Result<T, EmitError>;

/// Geometry creation capability of a host document.
///
/// Implemented by a host adapter, and by [`MemoryEmitter`] for headless use.
pub trait GeometryEmitter {
    /// Open a transaction. Everything created afterwards is pending until
    /// [`commit`](Self::commit).
    fn begin(&mut self) -> Result<()>;

    /// Create a region from a closed boundary.
    fn create_region(&mut self, boundary: &Boundary, role: RegionRole) -> Result<EntityId>;

    /// Create the outer region of a section.
    fn create_outer(&mut self, boundary: &Boundary) -> Result<EntityId> {
        self.create_region(boundary, RegionRole::Outer)
    }

    /// Create the inner region of a section.
    fn create_inner(&mut self, boundary: &Boundary) -> Result<EntityId> {
        self.create_region(boundary, RegionRole::Inner)
    }

    /// Subtract `tool` from `target`. The tool region is consumed.
    fn boolean_subtract(&mut self, target: EntityId, tool: EntityId) -> Result<()>;

    /// Unite `tool` into `target`. The tool region is consumed.
    fn boolean_unite(&mut self, target: EntityId, tool: EntityId) -> Result<()>;

    /// Apply an affine transform to any entity.
    fn transform(&mut self, entity: EntityId, transform: &Transform) -> Result<()>;

    /// Create a 3D polyline through `points`.
    fn create_path(&mut self, points: &[Point3]) -> Result<EntityId>;

    /// Sweep a region along a path into a solid, keeping the section
    /// normal on the path tangent.
    fn sweep(&mut self, region: EntityId, path: EntityId) -> Result<EntityId>;

    /// Create a box of the given size centered on the origin.
    fn create_box(&mut self, length: f64, width: f64, height: f64) -> Result<EntityId>;

    /// Create a line segment.
    fn create_line(&mut self, start: &Point3, end: &Point3) -> Result<EntityId>;

    /// Make every pending change part of the document.
    fn commit(&mut self) -> Result<()>;

    /// Discard every pending change, leaving committed entities as they
    /// were before [`begin`](Self::begin).
    fn abort(&mut self);
}

/// An open transaction on an emitter.
///
/// Dereferences to the emitter. Dropping the scope without committing
/// aborts the transaction.
pub struct Scope<'a, E: GeometryEmitter + ?Sized> {
    emitter: &'a mut E,
    finished: bool,
}

impl<'a, E: GeometryEmitter + ?Sized> Scope<'a, E> {
    /// Open a transaction on `emitter`.
    pub fn begin(emitter: &'a mut E) -> Result<Self> {
        emitter.begin()?;
        Ok(Self {
            emitter,
            finished: false,
        })
    }

    /// Commit the transaction.
    pub fn commit(mut self) -> Result<()> {
        self.emitter.commit()?;
        self.finished = true;
        Ok(())
    }
}

impl<E: GeometryEmitter + ?Sized> Deref for Scope<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.emitter
    }
}

impl<E: GeometryEmitter + ?Sized> DerefMut for Scope<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.emitter
    }
}

impl<E: GeometryEmitter + ?Sized> Drop for Scope<'_, E> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("transaction dropped without commit, rolling back");
            self.emitter.abort();
        }
    }
}
