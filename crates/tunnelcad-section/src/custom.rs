//! Inner boundary for user-selected section curves.

use tunnelcad_math::Point2;

use crate::boundary::{Boundary, Vertex};
use crate::{Result, SectionError};

/// Upper bound on the custom wall thickness, in drawing units.
pub const CUSTOM_WALL_LIMIT: f64 = 20000.0;

/// Shrink ratios at or below this are treated as collapsed.
const MIN_INSET_RATIO: f64 = 0.01;

/// Arc subdivision used before offsetting curved boundaries.
const ARC_SEGMENTS: usize = 16;

/// Wall thickness for a custom curve: half the smaller bounds extent,
/// capped at [`CUSTOM_WALL_LIMIT`].
pub fn custom_wall(curve: &Boundary) -> f64 {
    let b = curve.bounds();
    let half_min = 0.5 * b.width().min(b.height());
    CUSTOM_WALL_LIMIT.clamp(0.0, half_min.max(0.0))
}

/// Inset a closed curve by the custom wall thickness.
///
/// Straight-edged curves shrink by uniform scaling about their bounds
/// center with ratio `(perimeter − 2·wall) / perimeter`. Curved ones are
/// flattened and offset inward along vertex bisectors.
pub(crate) fn inset(curve: &Boundary) -> Result<(Boundary, f64)> {
    if !curve.closed {
        return Err(SectionError::UnsupportedCurveType(
            "selected curve is not closed".into(),
        ));
    }
    if curve.len() < 2 || curve.area() < 1e-12 {
        return Err(SectionError::UnsupportedCurveType(
            "selected curve encloses no area".into(),
        ));
    }

    let wall = custom_wall(curve);
    if curve.is_polygon() {
        let perimeter = curve.perimeter();
        let ratio = (perimeter - 2.0 * wall) / perimeter;
        if ratio <= MIN_INSET_RATIO {
            return Err(SectionError::OffsetFailed(format!(
                "scale ratio {ratio:.4} collapses the curve"
            )));
        }
        let center = curve.bounds().center();
        Ok((curve.scaled_about(center, ratio), wall))
    } else {
        let flat = curve.tessellate(ARC_SEGMENTS);
        let inner = offset_inward(&flat, wall).ok_or_else(|| {
            SectionError::OffsetFailed(format!("offset by {wall} collapses the curve"))
        })?;
        if inner.area() / curve.area() <= MIN_INSET_RATIO {
            return Err(SectionError::OffsetFailed(format!(
                "offset by {wall} leaves {:.4} of the area",
                inner.area() / curve.area()
            )));
        }
        Ok((inner, wall))
    }
}

/// Offset a closed polygon inward by `distance`.
///
/// Returns `None` when the result flips orientation or loses its area.
fn offset_inward(points: &[Point2], distance: f64) -> Option<Boundary> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let source = Boundary::closed(points.iter().map(|p| Vertex::new(p.x, p.y)).collect());
    let source_area = source.signed_area();
    // Inward is to the left of travel for counter-clockwise loops.
    let sign = if source_area > 0.0 { 1.0 } else { -1.0 };

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];

        let e1 = (p1 - p0).try_normalize(1e-12)?;
        let e2 = (p2 - p1).try_normalize(1e-12)?;
        let n1 = tunnelcad_math::Vec2::new(-e1.y * sign, e1.x * sign);
        let n2 = tunnelcad_math::Vec2::new(-e2.y * sign, e2.x * sign);

        let bisector = (n1 + n2).try_normalize(1e-12).unwrap_or(n1);
        let dot = n1.dot(&bisector);
        let along = if dot.abs() > 1e-3 { distance / dot } else { distance };
        let clamped = along.clamp(-2.0 * distance, 2.0 * distance);
        let q = p1 + bisector * clamped;
        out.push(Vertex::new(q.x, q.y));
    }

    let result = Boundary::closed(out);
    let area = result.signed_area();
    if area.abs() < 1e-10 || area.signum() != source_area.signum() {
        return None;
    }
    Some(result)
}
