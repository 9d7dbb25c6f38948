//! Cap volumes with the vessel axis vertical.
//!
//! `x` is the height above the apex, `x ∈ [0, a]`, so a bottom head fills
//! from its tip toward its base plane.

use std::f64::consts::PI;

use super::{HeadError, Shape};

pub(super) fn cap_volume(shape: Shape, r: f64, a: f64, x: f64) -> Result<f64, HeadError> {
    if a == 0.0 || x <= 0.0 {
        return Ok(0.0);
    }

    Ok(match shape {
        Shape::Flat => 0.0,
        Shape::Conical => PI * r * r * x.powi(3) / (3.0 * a * a),
        Shape::Ellipsoidal => PI * r * r / (a * a) * x * x * (a - x / 3.0),
        Shape::Spherical => {
            let sphere = (a * a + r * r) / (2.0 * a);
            PI * x * x * (sphere - x / 3.0)
        }
        Shape::Guppy => return Err(HeadError::VerticalGuppy),
        Shape::Torispherical(dished) => dished.cap_volume(x),
    })
}
