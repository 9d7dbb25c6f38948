use std::f64::consts::PI;

use super::Shape;

/// Outer surface area of a head of base radius `r` and depth `a`.
pub(super) fn surface_area(shape: Shape, r: f64, a: f64) -> f64 {
    let base = PI * r * r;
    if a == 0.0 {
        return base;
    }

    match shape {
        Shape::Flat => base,
        Shape::Conical => PI * r * (r * r + a * a).sqrt(),
        Shape::Spherical => PI * (a * a + r * r),
        Shape::Ellipsoidal => half_spheroid(r, a),
        Shape::Guppy => {
            let d = 2.0 * r;
            PI * d / 4.0 * (a * a + d * d).sqrt() + PI * d * a / 2.0
        }
        Shape::Torispherical(dished) => dished.surface_area(),
    }
}

/// Half the surface of a spheroid with equatorial radius `r` and polar
/// semi-axis `a`.
fn half_spheroid(r: f64, a: f64) -> f64 {
    if a == r {
        return 2.0 * PI * r * r;
    }
    if a < r {
        let e = (1.0 - a * a / (r * r)).sqrt();
        PI * r * r + PI * a * a / (2.0 * e) * ((1.0 + e) / (1.0 - e)).ln()
    } else {
        let e = (1.0 - r * r / (a * a)).sqrt();
        PI * r * r + PI * r * a * e.asin() / e
    }
}
