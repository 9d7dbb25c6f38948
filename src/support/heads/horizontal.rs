//! Single-head liquid volumes with the vessel axis horizontal.
//!
//! Levels are measured from the bottom of the vessel, `h ∈ [0, 2R]`. Conical,
//! ellipsoidal and guppy heads (and hemispheres) have closed forms. Dished
//! spherical and torispherical heads are integrated slice by slice along the
//! axis: each slice is a disk whose wetted part is a circular segment.

use std::f64::consts::PI;

use crate::support::numeric::quadrature::{self, QuadratureError};

use super::{Shape, torispherical::Dished};

/// Area of a circular segment of radius `r` filled to level `h`.
pub(super) fn segment_area(r: f64, h: f64) -> f64 {
    let h = h.clamp(0.0, 2.0 * r);
    let offset = r - h;
    r * r * (offset / r).clamp(-1.0, 1.0).acos() - offset * (h * (2.0 * r - h)).max(0.0).sqrt()
}

/// Wetted area of a disk of radius `rho` whose centre is `y0` above the level.
///
/// Equivalently, the level lies `-y0` below the disk centre when `y0 < 0`.
fn chord_area(rho: f64, y0: f64) -> f64 {
    if y0 <= -rho {
        return 0.0;
    }
    if y0 >= rho {
        return PI * rho * rho;
    }
    rho * rho * (-y0 / rho).acos() + y0 * (rho * rho - y0 * y0).sqrt()
}

/// Liquid volume in one head of radius `r`, depth `a` at level `h`.
///
/// `full` is the head's total volume, used to reflect levels above the axis.
pub(super) fn volume(
    shape: Shape,
    r: f64,
    a: f64,
    h: f64,
    full: f64,
) -> Result<f64, QuadratureError> {
    if a == 0.0 || h <= 0.0 {
        return Ok(0.0);
    }

    Ok(match shape {
        Shape::Flat => 0.0,
        Shape::Conical => conical(r, a, h),
        Shape::Ellipsoidal => ellipsoidal(r, a, h),
        Shape::Guppy => guppy(r, a, h),
        Shape::Spherical if a == r => ellipsoidal(r, a, h),
        Shape::Spherical => sliced(&Cap::new(r, a), r, h, full)?,
        Shape::Torispherical(dished) => sliced(&dished, r, h, full)?,
    })
}

fn conical(r: f64, a: f64, h: f64) -> f64 {
    let scale = a * r * r / 3.0;
    if h == r {
        return scale * PI / 2.0;
    }
    let m = ((r - h) / r).abs();
    let k = m.acos() + m.powi(3) * (1.0 / m).acosh() - 2.0 * m * (1.0 - m * m).max(0.0).sqrt();
    if h < r { scale * k } else { scale * PI - scale * k }
}

fn ellipsoidal(r: f64, a: f64, h: f64) -> f64 {
    PI * a * h * h * (1.0 - h / (3.0 * r)) / 2.0
}

fn guppy(r: f64, a: f64, h: f64) -> f64 {
    let chord = (h * (2.0 * r - h)).max(0.0).sqrt();
    let arc = 2.0 * a * r * r / 3.0 * (1.0 - h / r).clamp(-1.0, 1.0).acos();
    (arc + 2.0 * a / (9.0 * r) * chord * (2.0 * h - 3.0 * r) * (h + r)) / 2.0
}

/// Axisymmetric head profile, with `z` measured from the base plane.
pub(super) trait Profile {
    fn depth(&self) -> f64;

    fn radius_at(&self, z: f64) -> f64;

    /// Axial position at which the profile radius equals `rho`.
    fn position_at(&self, rho: f64) -> f64;

    /// Axial position where the profile formula changes, if any.
    fn junction(&self) -> Option<f64> {
        None
    }
}

/// Spherical cap of base radius `R` and depth `a`.
pub(super) struct Cap {
    depth: f64,
    sphere: f64,
}

impl Cap {
    pub fn new(r: f64, a: f64) -> Self {
        Self {
            depth: a,
            sphere: (a * a + r * r) / (2.0 * a),
        }
    }
}

impl Profile for Cap {
    fn depth(&self) -> f64 {
        self.depth
    }

    fn radius_at(&self, z: f64) -> f64 {
        let dz = z + self.sphere - self.depth;
        (self.sphere * self.sphere - dz * dz).max(0.0).sqrt()
    }

    fn position_at(&self, rho: f64) -> f64 {
        (self.sphere * self.sphere - rho * rho).max(0.0).sqrt() - (self.sphere - self.depth)
    }
}

impl Profile for Dished {
    fn depth(&self) -> f64 {
        Dished::depth(self)
    }

    fn radius_at(&self, z: f64) -> f64 {
        Dished::radius_at(self, z)
    }

    fn position_at(&self, rho: f64) -> f64 {
        Dished::position_at(self, rho)
    }

    fn junction(&self) -> Option<f64> {
        Some(self.knuckle_depth)
    }
}

/// Integrates wetted slice areas of `profile` at level `h`.
fn sliced<P: Profile>(profile: &P, r: f64, h: f64, full: f64) -> Result<f64, QuadratureError> {
    if h > r {
        return Ok(full - below_axis(profile, r, 2.0 * r - h)?);
    }
    below_axis(profile, r, h)
}

fn below_axis<P: Profile>(profile: &P, r: f64, h: f64) -> Result<f64, QuadratureError> {
    if h <= 0.0 {
        return Ok(0.0);
    }

    let y0 = h - r;
    let end = if y0 < 0.0 {
        profile.position_at(-y0).clamp(0.0, profile.depth())
    } else {
        profile.depth()
    };

    let config = quadrature::Config::default();
    let slice = |z: f64| chord_area(profile.radius_at(z), y0);
    match profile.junction() {
        Some(z) if z > 0.0 && z < end => Ok(quadrature::integrate(&slice, 0.0, z, &config)?
            + quadrature::integrate(&slice, z, end, &config)?),
        _ => quadrature::integrate(&slice, 0.0, end, &config),
    }
}
