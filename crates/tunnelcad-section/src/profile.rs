//! Hollow cross-section construction.
//!
//! Every section is an outer boundary with an inset inner boundary removed.
//! The wall thickness is a fixed fraction of a characteristic dimension and
//! is not configurable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boundary::{Boundary, Bounds2, Vertex};
use crate::custom;
use crate::params::{ParameterVector, TunnelType};
use crate::{Result, SectionError};

/// Wall fraction of the width for three-star sections.
pub const THREE_STAR_WALL_RATIO: f64 = 0.05;
/// Wall fraction of the radius for half-circle sections.
pub const HALF_CIRCLE_WALL_RATIO: f64 = 0.1;
/// Wall fraction of the top width for trapezoid sections.
pub const TRAPEZOID_WALL_RATIO: f64 = 0.05;

/// A hollow section in its own local frame, not yet placed on a path.
///
/// The realized region is `outer − inner`, then `∪ floor` when a floor strip
/// is present. Boolean order matters: subtract first, then unite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Family the section was built from.
    pub tunnel_type: TunnelType,
    /// Outer boundary.
    pub outer: Boundary,
    /// Inner boundary, strictly inside `outer`.
    pub inner: Boundary,
    /// Strip united back after the subtraction (half-circle floor).
    pub floor: Option<Boundary>,
    /// Derived wall thickness.
    pub wall: f64,
}

impl Profile {
    /// Bounds of the realized region.
    pub fn bounds(&self) -> Bounds2 {
        let outer = self.outer.bounds();
        match &self.floor {
            Some(floor) => outer.union(&floor.bounds()),
            None => outer,
        }
    }

    /// Copy of the profile moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            tunnel_type: self.tunnel_type,
            outer: self.outer.translated(dx, dy),
            inner: self.inner.translated(dx, dy),
            floor: self.floor.as_ref().map(|f| f.translated(dx, dy)),
            wall: self.wall,
        }
    }

    /// Copy moved so the bottom midpoint of its bounds sits at the origin.
    pub fn recentered(&self) -> Self {
        let anchor = self.bounds().bottom_mid();
        self.translated(-anchor.x, -anchor.y)
    }
}

/// Build the hollow section for a parametric tunnel type.
///
/// `Custom` sections need a curve and go through [`build_custom_profile`].
pub fn build_profile(tunnel_type: TunnelType, params: &ParameterVector) -> Result<Profile> {
    let profile = match tunnel_type {
        TunnelType::ThreeStar => {
            let [width, height] = params.leading(tunnel_type)?;
            three_star(width, height)?
        }
        TunnelType::HalfCircle => {
            let [radius] = params.leading(tunnel_type)?;
            half_circle(radius)
        }
        TunnelType::Trapezoid => {
            let [top, bottom, height] = params.leading(tunnel_type)?;
            trapezoid(top, bottom, height)?
        }
        TunnelType::Custom => return Err(SectionError::CurveRequired),
    };
    debug!(
        tunnel_type = %tunnel_type,
        wall = profile.wall,
        outer_area = profile.outer.area(),
        inner_area = profile.inner.area(),
        "built section profile"
    );
    Ok(profile)
}

/// Build the hollow section for a user-selected closed curve.
pub fn build_custom_profile(curve: &Boundary) -> Result<Profile> {
    let (inner, wall) = custom::inset(curve)?;
    debug!(wall, outer_area = curve.area(), inner_area = inner.area(), "built custom profile");
    Ok(Profile {
        tunnel_type: TunnelType::Custom,
        outer: curve.clone(),
        inner,
        floor: None,
        wall,
    })
}

/// Rectangle whose top edge carries a unit bulge.
///
/// Only the flag is emitted; the arch itself is whatever the host makes of
/// the bulged edge.
fn three_star(width: f64, height: f64) -> Result<Profile> {
    let wall = width * THREE_STAR_WALL_RATIO;
    let rect_height = height - width / 2.0;
    if rect_height < wall {
        return Err(SectionError::DegenerateGeometry(format!(
            "rectangle height {rect_height} is below wall thickness {wall}"
        )));
    }

    let inner_width = width - 2.0 * wall;
    let inner_height = rect_height - wall;
    if inner_width <= 0.0 || inner_height <= 0.0 {
        return Err(SectionError::DegenerateGeometry(format!(
            "inner opening {inner_width} x {inner_height} is empty"
        )));
    }

    let outer = Boundary::closed(vec![
        Vertex::new(0.0, 0.0),
        Vertex::new(width, 0.0),
        Vertex::with_bulge(width, rect_height, 1.0),
        Vertex::new(0.0, rect_height),
    ]);
    let inner = Boundary::closed(vec![
        Vertex::new(wall, wall),
        Vertex::new(width - wall, wall),
        Vertex::with_bulge(width - wall, inner_height, 1.0),
        Vertex::new(wall, inner_height),
    ]);

    Ok(Profile {
        tunnel_type: TunnelType::ThreeStar,
        outer,
        inner,
        floor: None,
        wall,
    })
}

/// Half-circle arch on the X axis, spanning `[0, 2r]`.
///
/// No lower bound on the radius.
fn half_circle(radius: f64) -> Profile {
    let wall = radius * HALF_CIRCLE_WALL_RATIO;
    let inner_radius = radius - wall;

    let outer = Boundary::closed(vec![
        Vertex::with_bulge(2.0 * radius, 0.0, 1.0),
        Vertex::new(0.0, 0.0),
    ]);
    let inner = Boundary::closed(vec![
        Vertex::with_bulge(radius + inner_radius, 0.0, 1.0),
        Vertex::new(radius - inner_radius, 0.0),
    ]);
    let floor = Boundary::rectangle(0.0, 0.0, 2.0 * radius, wall);

    Profile {
        tunnel_type: TunnelType::HalfCircle,
        outer,
        inner,
        floor: Some(floor),
        wall,
    }
}

fn trapezoid(top: f64, bottom: f64, height: f64) -> Result<Profile> {
    let wall = top * TRAPEZOID_WALL_RATIO;
    if top <= 2.0 * wall || bottom <= 2.0 * wall || height <= 2.0 * wall {
        return Err(SectionError::DegenerateGeometry(format!(
            "trapezoid {top}/{bottom}/{height} is too small for wall {wall}"
        )));
    }

    let inner_top = top - 2.0 * wall;
    let inner_bottom = bottom - 2.0 * wall;
    let inner_height = height - 2.0 * wall;
    if inner_top <= 0.0 || inner_bottom <= 0.0 || inner_height <= 0.0 {
        return Err(SectionError::DegenerateGeometry(format!(
            "inner trapezoid {inner_top}/{inner_bottom}/{inner_height} is empty"
        )));
    }

    let offset = (bottom - top) / 2.0;
    let inner_offset = (inner_bottom - inner_top) / 2.0;

    let outer = Boundary::polygon(&[
        (0.0, 0.0),
        (bottom, 0.0),
        (offset + top, height),
        (offset, height),
    ]);
    let inner = Boundary::polygon(&[
        (wall, wall),
        (wall + inner_bottom, wall),
        (wall + inner_offset + inner_top, wall + inner_height),
        (wall + inner_offset, wall + inner_height),
    ]);

    Ok(Profile {
        tunnel_type: TunnelType::Trapezoid,
        outer,
        inner,
        floor: None,
        wall,
    })
}
