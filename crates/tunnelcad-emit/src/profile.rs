//! Realizing a section profile as a host region.

use tracing::debug;
use tunnelcad_section::Profile;

use crate::{EntityId, GeometryEmitter, RegionRole, Result};

/// Create the hollow region of `profile`: outer minus inner, then united
/// with the floor strip when there is one.
///
/// Must run inside an open transaction. Returns the outer region, which
/// holds the result.
pub fn emit_profile<E: GeometryEmitter + ?Sized>(
    emitter: &mut E,
    profile: &Profile,
) -> Result<EntityId> {
    let outer = emitter.create_outer(&profile.outer)?;
    let inner = emitter.create_inner(&profile.inner)?;
    emitter.boolean_subtract(outer, inner)?;
    if let Some(floor) = &profile.floor {
        let strip = emitter.create_region(floor, RegionRole::Floor)?;
        emitter.boolean_unite(outer, strip)?;
    }
    debug!(region = %outer, tunnel_type = %profile.tunnel_type, "section region created");
    Ok(outer)
}
