//! Property tests for the parametric section families.

use proptest::prelude::*;

use tunnelcad_section::{
    build_profile, ParameterVector, SectionError, TunnelType, HALF_CIRCLE_WALL_RATIO,
    THREE_STAR_WALL_RATIO, TRAPEZOID_WALL_RATIO,
};

fn params(values: &[f64]) -> ParameterVector {
    ParameterVector::new(values).unwrap()
}

fn close(actual: f64, expected: f64, scale: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * scale
}

proptest! {
    #[test]
    fn half_circle_bounds_track_radius(
        mantissa in 1.0f64..10.0,
        exponent in -9i32..7,
    ) {
        let r = mantissa * 10f64.powi(exponent);
        let p = build_profile(TunnelType::HalfCircle, &params(&[r])).unwrap();
        let b = p.bounds();
        prop_assert!(close(b.min.x, 0.0, r) && close(b.min.y, 0.0, r), "r={} min={:?}", r, b.min);
        prop_assert!(close(b.max.x, 2.0 * r, r) && close(b.max.y, r, r), "r={} max={:?}", r, b.max);
        prop_assert!(close(p.wall, r * HALF_CIRCLE_WALL_RATIO, r));
        prop_assert!(p.inner.area() < p.outer.area());
    }
}

proptest! {
    #[test]
    fn three_star_inner_area_below_outer(
        width in 0.01f64..1000.0,
        slack in 0.01f64..100.0,
    ) {
        // Rectangle part is `slack` walls taller than the wall itself.
        let wall = width * THREE_STAR_WALL_RATIO;
        let height = width / 2.0 + wall * (1.0 + slack);
        let p = build_profile(TunnelType::ThreeStar, &params(&[width, height])).unwrap();
        prop_assert!(p.inner.area() < p.outer.area(), "w={} h={}", width, height);
        prop_assert!(close(p.wall, wall, width));
    }

    #[test]
    fn three_star_rejects_rectangle_below_wall(
        width in 0.01f64..1000.0,
        fraction in 0.0f64..0.99,
    ) {
        let wall = width * THREE_STAR_WALL_RATIO;
        let height = width / 2.0 + wall * fraction;
        let err = build_profile(TunnelType::ThreeStar, &params(&[width, height])).unwrap_err();
        prop_assert!(matches!(err, SectionError::DegenerateGeometry(_)));
    }
}

proptest! {
    #[test]
    fn trapezoid_needs_every_dimension_above_two_walls(
        top in 0.1f64..100.0,
        bottom in 0.001f64..20.0,
        height in 0.001f64..20.0,
    ) {
        let wall = top * TRAPEZOID_WALL_RATIO;
        let fits = bottom > 2.0 * wall && height > 2.0 * wall;
        match build_profile(TunnelType::Trapezoid, &params(&[top, bottom, height])) {
            Ok(p) => {
                prop_assert!(fits, "top={} bottom={} height={}", top, bottom, height);
                prop_assert!(p.inner.area() < p.outer.area());
            }
            Err(err) => {
                prop_assert!(!fits, "top={} bottom={} height={}", top, bottom, height);
                prop_assert!(matches!(err, SectionError::DegenerateGeometry(_)));
            }
        }
    }
}
