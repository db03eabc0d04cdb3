//! In-memory host document.
//!
//! Keeps the same transaction discipline a CAD host does: entities created
//! inside a transaction stay pending until commit and vanish on abort.
//! Committed entities touched inside a transaction are copied into the
//! pending set first, so an abort restores them.
//! Regions are stored as tessellated world-space loops; sweeps store one
//! ring of the outer loop per path vertex.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tunnelcad_math::{section_axes, Point3, Tolerance, Transform, Vec3};
use tunnelcad_section::Boundary;

use crate::{EmitError, EntityId, GeometryEmitter, RegionRole, Result};

/// Arc subdivision when a region is stored.
const ARC_SEGMENTS: usize = 32;

/// Smallest region area the emitter accepts.
const MIN_REGION_AREA: f64 = 1e-12;

/// A solid body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SolidShape {
    /// Section swept along a path.
    Swept {
        /// Path the section followed.
        path: EntityId,
        /// Outer loop of the section at each path vertex.
        rings: Vec<Vec<Point3>>,
        /// Number of holes in the swept section.
        holes: usize,
        /// Path length.
        length: f64,
    },
    /// Rectangular box.
    Box {
        /// Edge lengths along local X, Y and Z before any transform.
        size: [f64; 3],
        /// The eight corners, bottom face first.
        corners: Vec<Point3>,
    },
}

/// An entity stored in a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    /// Planar region bounded by closed loops.
    Region {
        /// Role the region was created for.
        role: RegionRole,
        /// Outer loop.
        outline: Vec<Point3>,
        /// Loops subtracted from the outline.
        holes: Vec<Vec<Point3>>,
        /// Loops united into the outline.
        additions: Vec<Vec<Point3>>,
    },
    /// Open 3D polyline.
    Path {
        /// Vertices in order.
        points: Vec<Point3>,
    },
    /// Solid body.
    Solid(SolidShape),
    /// Line segment.
    Line {
        /// Start point.
        start: Point3,
        /// End point.
        end: Point3,
    },
}

impl Entity {
    fn apply(&mut self, t: &Transform) {
        let map = |points: &mut Vec<Point3>| {
            for p in points.iter_mut() {
                *p = t.apply_point(p);
            }
        };
        match self {
            Entity::Region {
                outline,
                holes,
                additions,
                ..
            } => {
                map(outline);
                holes.iter_mut().for_each(map);
                additions.iter_mut().for_each(map);
            }
            Entity::Path { points } => map(points),
            Entity::Solid(SolidShape::Swept { rings, .. }) => rings.iter_mut().for_each(map),
            Entity::Solid(SolidShape::Box { corners, .. }) => map(corners),
            Entity::Line { start, end } => {
                *start = t.apply_point(start);
                *end = t.apply_point(end);
            }
        }
    }
}

/// Committed entities, keyed by handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Every committed entity.
    pub entities: BTreeMap<EntityId, Entity>,
}

impl Document {
    /// Number of committed entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up a committed entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Committed solids.
    pub fn solids(&self) -> impl Iterator<Item = (EntityId, &SolidShape)> + '_ {
        self.entities.iter().filter_map(|(id, e)| match e {
            Entity::Solid(shape) => Some((*id, shape)),
            _ => None,
        })
    }

    /// Committed line segments.
    pub fn lines(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        self.entities.values().filter_map(|e| match e {
            Entity::Line { start, end } => Some((*start, *end)),
            _ => None,
        })
    }

    /// Pretty JSON rendering of the document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Emitter call record, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Transaction opened.
    Begin,
    /// Region created.
    CreateRegion(RegionRole),
    /// Boolean subtraction.
    Subtract,
    /// Boolean union.
    Unite,
    /// Transform applied.
    Transform,
    /// Path created.
    CreatePath,
    /// Sweep performed.
    Sweep,
    /// Box created.
    CreateBox,
    /// Line created.
    CreateLine,
    /// Transaction committed.
    Commit,
    /// Transaction discarded.
    Abort,
}

/// [`GeometryEmitter`] over an in-memory [`Document`].
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    document: Document,
    pending: BTreeMap<EntityId, Entity>,
    /// Committed entities consumed in the open transaction.
    removed: BTreeSet<EntityId>,
    in_transaction: bool,
    next_id: u64,
    journal: Vec<Operation>,
    fail_sweeps: bool,
}

impl MemoryEmitter {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitter whose sweep operator always fails, for exercising rollback.
    pub fn failing_sweeps() -> Self {
        Self {
            fail_sweeps: true,
            ..Self::default()
        }
    }

    /// Committed entities.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the emitter, keeping the committed document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Entities created or modified in the open transaction.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Every call made so far.
    pub fn journal(&self) -> &[Operation] {
        &self.journal
    }

    fn require_transaction(&self) -> Result<()> {
        if self.in_transaction {
            Ok(())
        } else {
            Err(EmitError::NoTransaction)
        }
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.pending.insert(id, entity);
        id
    }

    fn committed(&self, id: EntityId) -> Option<&Entity> {
        if self.removed.contains(&id) {
            return None;
        }
        self.document.entities.get(&id)
    }

    fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.pending
            .get(&id)
            .or_else(|| self.committed(id))
            .ok_or(EmitError::UnknownEntity(id))
    }

    /// Mutable access through the pending set; committed entities are
    /// copied in first and only replace the document copy on commit.
    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        if !self.pending.contains_key(&id) {
            let copy = self.committed(id).cloned().ok_or(EmitError::UnknownEntity(id))?;
            self.pending.insert(id, copy);
        }
        self.pending.get_mut(&id).ok_or(EmitError::UnknownEntity(id))
    }

    /// Remove a region used as a boolean tool and return its outline.
    fn take_tool(&mut self, target: EntityId, tool: EntityId) -> Result<Vec<Point3>> {
        if target == tool {
            return Err(EmitError::InvalidGeometry(format!(
                "region {target} cannot be combined with itself"
            )));
        }
        if !matches!(self.entity(target)?, Entity::Region { .. }) {
            return Err(EmitError::WrongKind {
                id: target,
                expected: "region",
            });
        }
        match self.entity(tool)? {
            Entity::Region { .. } => {}
            _ => {
                return Err(EmitError::WrongKind {
                    id: tool,
                    expected: "region",
                })
            }
        }
        let taken = match self.pending.remove(&tool) {
            Some(entity) => Some(entity),
            None => self.committed(tool).cloned(),
        };
        if self.document.entities.contains_key(&tool) {
            self.removed.insert(tool);
        }
        match taken {
            Some(Entity::Region { outline, .. }) => Ok(outline),
            _ => Err(EmitError::UnknownEntity(tool)),
        }
    }
}

impl GeometryEmitter for MemoryEmitter {
    fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(EmitError::TransactionActive);
        }
        self.in_transaction = true;
        self.journal.push(Operation::Begin);
        Ok(())
    }

    fn create_region(&mut self, boundary: &Boundary, role: RegionRole) -> Result<EntityId> {
        self.require_transaction()?;
        if !boundary.closed {
            return Err(EmitError::RegionConstructionFailed(
                "boundary is not closed".into(),
            ));
        }
        if boundary.len() < 2 || boundary.area() < MIN_REGION_AREA {
            return Err(EmitError::RegionConstructionFailed(
                "boundary encloses no area".into(),
            ));
        }
        let outline = boundary
            .tessellate(ARC_SEGMENTS)
            .into_iter()
            .map(|p| Point3::new(p.x, p.y, 0.0))
            .collect();
        self.journal.push(Operation::CreateRegion(role));
        Ok(self.insert(Entity::Region {
            role,
            outline,
            holes: Vec::new(),
            additions: Vec::new(),
        }))
    }

    fn boolean_subtract(&mut self, target: EntityId, tool: EntityId) -> Result<()> {
        self.require_transaction()?;
        let hole = self.take_tool(target, tool)?;
        if let Entity::Region { outline, holes, .. } = self.entity_mut(target)? {
            if contains_box(&hole, outline) {
                return Err(EmitError::RegionConstructionFailed(format!(
                    "subtracting {tool} leaves {target} empty"
                )));
            }
            holes.push(hole);
        }
        self.journal.push(Operation::Subtract);
        Ok(())
    }

    fn boolean_unite(&mut self, target: EntityId, tool: EntityId) -> Result<()> {
        self.require_transaction()?;
        let addition = self.take_tool(target, tool)?;
        if let Entity::Region { additions, .. } = self.entity_mut(target)? {
            additions.push(addition);
        }
        self.journal.push(Operation::Unite);
        Ok(())
    }

    fn transform(&mut self, entity: EntityId, transform: &Transform) -> Result<()> {
        self.require_transaction()?;
        self.entity_mut(entity)?.apply(transform);
        self.journal.push(Operation::Transform);
        Ok(())
    }

    fn create_path(&mut self, points: &[Point3]) -> Result<EntityId> {
        self.require_transaction()?;
        if points.len() < 2 {
            return Err(EmitError::InvalidGeometry(format!(
                "a path needs at least 2 points, got {}",
                points.len()
            )));
        }
        self.journal.push(Operation::CreatePath);
        Ok(self.insert(Entity::Path {
            points: points.to_vec(),
        }))
    }

    fn sweep(&mut self, region: EntityId, path: EntityId) -> Result<EntityId> {
        self.require_transaction()?;
        let (outline, holes) = match self.entity(region)? {
            Entity::Region { outline, holes, .. } => (outline.clone(), holes.len()),
            _ => {
                return Err(EmitError::WrongKind {
                    id: region,
                    expected: "region",
                })
            }
        };
        let points = match self.entity(path)? {
            Entity::Path { points } => points.clone(),
            _ => {
                return Err(EmitError::WrongKind {
                    id: path,
                    expected: "path",
                })
            }
        };
        if self.fail_sweeps {
            return Err(EmitError::SweepFailed("sweep operator rejected the input".into()));
        }

        let rings = sweep_rings(&outline, &points)?;
        let length = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        debug!(%region, %path, rings = rings.len(), length, "swept region");
        self.journal.push(Operation::Sweep);
        Ok(self.insert(Entity::Solid(SolidShape::Swept {
            path,
            rings,
            holes,
            length,
        })))
    }

    fn create_box(&mut self, length: f64, width: f64, height: f64) -> Result<EntityId> {
        self.require_transaction()?;
        if !(length > 0.0 && width > 0.0 && height > 0.0) {
            return Err(EmitError::InvalidGeometry(format!(
                "box {length} x {width} x {height} has no volume"
            )));
        }
        let (hl, hw, hh) = (length / 2.0, width / 2.0, height / 2.0);
        let mut corners = Vec::with_capacity(8);
        for z in [-hh, hh] {
            for (x, y) in [(-hl, -hw), (hl, -hw), (hl, hw), (-hl, hw)] {
                corners.push(Point3::new(x, y, z));
            }
        }
        self.journal.push(Operation::CreateBox);
        Ok(self.insert(Entity::Solid(SolidShape::Box {
            size: [length, width, height],
            corners,
        })))
    }

    fn create_line(&mut self, start: &Point3, end: &Point3) -> Result<EntityId> {
        self.require_transaction()?;
        self.journal.push(Operation::CreateLine);
        Ok(self.insert(Entity::Line {
            start: *start,
            end: *end,
        }))
    }

    fn commit(&mut self) -> Result<()> {
        self.require_transaction()?;
        let changed = self.pending.len();
        let consumed = self.removed.len();
        for id in std::mem::take(&mut self.removed) {
            self.document.entities.remove(&id);
        }
        self.document.entities.append(&mut self.pending);
        self.in_transaction = false;
        self.journal.push(Operation::Commit);
        info!(changed, consumed, total = self.document.len(), "transaction committed");
        Ok(())
    }

    fn abort(&mut self) {
        if !self.in_transaction {
            return;
        }
        let discarded = self.pending.len();
        self.pending.clear();
        self.removed.clear();
        self.in_transaction = false;
        self.journal.push(Operation::Abort);
        info!(discarded, "transaction aborted");
    }
}

/// True when the bounding box of `outer` covers that of `inner`.
fn contains_box(outer: &[Point3], inner: &[Point3]) -> bool {
    let tol = Tolerance::DEFAULT.linear;
    let (omin, omax) = bounding_box(outer);
    let (imin, imax) = bounding_box(inner);
    (0..3).all(|i| omin[i] <= imin[i] + tol && omax[i] >= imax[i] - tol)
}

fn bounding_box(points: &[Point3]) -> (Vec3, Vec3) {
    let mut min = Vec3::repeat(f64::INFINITY);
    let mut max = Vec3::repeat(f64::NEG_INFINITY);
    for p in points {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    (min, max)
}

/// Copies of `outline` placed at every path vertex, each turned to face
/// along the path.
///
/// The outline is read in the plane through `path[0]`: its X and Y offsets
/// from the path start become section coordinates.
fn sweep_rings(outline: &[Point3], path: &[Point3]) -> Result<Vec<Vec<Point3>>> {
    let tol = Tolerance::DEFAULT;
    let anchor = path[0];
    let mut directions = Vec::with_capacity(path.len() - 1);
    for (i, w) in path.windows(2).enumerate() {
        let d = (w[1] - w[0])
            .try_normalize(tol.linear)
            .ok_or_else(|| EmitError::SweepFailed(format!("path segment {i} has zero length")))?;
        directions.push(d);
    }

    let mut rings = Vec::with_capacity(path.len());
    for (i, p) in path.iter().enumerate() {
        let tangent = if i == 0 {
            directions[0]
        } else if i == directions.len() {
            directions[i - 1]
        } else {
            directions[i - 1] + directions[i]
        };
        let (x, y) = section_axes(&tangent).ok_or_else(|| {
            EmitError::SweepFailed(format!("path folds back on itself at vertex {i}"))
        })?;
        let ring = outline
            .iter()
            .map(|q| {
                let d = q - anchor;
                p + x.as_ref() * d.x + y.as_ref() * d.y
            })
            .collect();
        rings.push(ring);
    }
    Ok(rings)
}
