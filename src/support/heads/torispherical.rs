use uom::si::{f64::Length, length::meter};

use super::HeadError;

/// Derived dimensions of a torispherical head, in metres.
///
/// The head is a spherical crown of radius `fD` joined tangentially to a
/// toroidal knuckle of radius `kD`. Axial positions `z` are measured from the
/// base plane of the head toward the apex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Dished {
    pub f: f64,
    pub k: f64,
    pub diameter: f64,
    pub crown_radius: f64,
    pub knuckle_radius: f64,
    /// Half-angle subtended by the crown at its centre.
    pub alpha: f64,
    /// Axial height of the crown.
    pub crown_depth: f64,
    /// Axial height of the knuckle.
    pub knuckle_depth: f64,
}

impl Dished {
    /// Resolves the head geometry for diameter `d` and fractions `f`, `k`.
    pub fn new(d: f64, f: f64, k: f64) -> Result<Self, HeadError> {
        if !(k > 0.0 && k < 0.5) {
            return Err(HeadError::KnuckleFraction(k));
        }
        if !(f.is_finite() && f >= 0.5 && f > k) {
            return Err(HeadError::CrownFraction { f, k });
        }

        let alpha = ((1.0 - 2.0 * k) / (2.0 * (f - k))).asin();
        Ok(Self {
            f,
            k,
            diameter: d,
            crown_radius: f * d,
            knuckle_radius: k * d,
            alpha,
            crown_depth: f * d * (1.0 - alpha.cos()),
            knuckle_depth: k * d * alpha.cos(),
        })
    }

    pub fn depth(&self) -> f64 {
        self.crown_depth + self.knuckle_depth
    }

    /// Distance from the vessel axis to the centre of the knuckle torus.
    fn knuckle_offset(&self) -> f64 {
        0.5 * self.diameter - self.knuckle_radius
    }

    /// Radius of the head cross-section at axial position `z`.
    pub fn radius_at(&self, z: f64) -> f64 {
        if z <= self.knuckle_depth {
            let rk = self.knuckle_radius;
            self.knuckle_offset() + (rk * rk - z * z).max(0.0).sqrt()
        } else {
            let r = self.crown_radius;
            let dz = z - (self.depth() - r);
            (r * r - dz * dz).max(0.0).sqrt()
        }
    }

    /// Axial position at which the head cross-section has radius `rho`.
    pub fn position_at(&self, rho: f64) -> f64 {
        if rho >= self.crown_radius * self.alpha.sin() {
            let rk = self.knuckle_radius;
            let dr = rho - self.knuckle_offset();
            (rk * rk - dr * dr).max(0.0).sqrt()
        } else {
            let r = self.crown_radius;
            (r * r - rho * rho).sqrt() - (r - self.depth())
        }
    }

    /// Volume of the head between its apex and a plane `x` above it.
    pub fn cap_volume(&self, x: f64) -> f64 {
        use std::f64::consts::PI;

        let a1 = self.crown_depth;
        let d1 = 2.0 * self.crown_radius * self.alpha.sin();
        if x <= a1 {
            return PI * x * x / 4.0 * (2.0 * a1 + d1 * d1 / (2.0 * a1) - 4.0 * x / 3.0);
        }

        let d = self.diameter;
        let rk = self.knuckle_radius;
        let s = (rk * self.alpha.sin()).powi(2);
        let t = 2.0 * self.knuckle_depth;
        let u = x - a1;
        let crown = PI / 4.0 * (2.0 * a1.powi(3) / 3.0 + a1 * d1 * d1 / 2.0);
        let arc = ((t - 2.0 * u) / (2.0 * rk)).clamp(-1.0, 1.0).acos() - self.alpha;

        crown + PI * u * (self.knuckle_offset().powi(2) + s) + PI * t * u * u / 2.0
            - PI * u.powi(3) / 3.0
            + PI * d
                * (1.0 - 2.0 * rk / d)
                * ((2.0 * u - t) / 4.0 * (s + t * u - u * u).max(0.0).sqrt()
                    + t * s.sqrt() / 4.0
                    + rk * rk / 2.0 * arc)
    }

    /// Outer surface area of the crown plus the knuckle.
    pub fn surface_area(&self) -> f64 {
        use std::f64::consts::{FRAC_PI_2, PI};

        let rk = self.knuckle_radius;
        let crown = 2.0 * PI * self.crown_radius * self.crown_depth;
        let knuckle =
            2.0 * PI * rk * (self.knuckle_offset() * (FRAC_PI_2 - self.alpha) + self.knuckle_depth);
        crown + knuckle
    }
}

/// Returns the depth of a torispherical head.
///
/// The head has base diameter `diameter`, crown radius `f·D` and knuckle
/// radius `k·D`.
///
/// # Errors
///
/// Returns an error unless `0 < k < 0.5`, `f ≥ 0.5` and `f > k`.
pub fn torispherical_depth(diameter: Length, f: f64, k: f64) -> Result<Length, HeadError> {
    let dished = Dished::new(diameter.get::<meter>(), f, k)?;
    Ok(Length::new::<meter>(dished.depth()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::length::inch;

    use super::*;

    #[test]
    fn depth_matches_reference_values() {
        let a1 = torispherical_depth(Length::new::<inch>(96.0), 0.9, 0.2).unwrap();
        let a2 = torispherical_depth(Length::new::<inch>(108.0), 1.0, 0.06).unwrap();
        assert_relative_eq!(a1.get::<inch>(), 25.684_268_924_767_125, max_relative = 1e-12);
        assert_relative_eq!(a2.get::<inch>(), 18.288_462_280_484_797, max_relative = 1e-12);
    }

    #[test]
    fn profile_is_continuous_at_the_junction() {
        let head = Dished::new(2.0, 1.0, 0.06).unwrap();
        let z = head.knuckle_depth;
        let knuckle = head.radius_at(z);
        let crown = head.radius_at(z + 1e-12);
        assert_relative_eq!(knuckle, crown, epsilon = 1e-9);
        assert_relative_eq!(head.radius_at(0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(head.radius_at(head.depth()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn position_inverts_radius() {
        let head = Dished::new(2.0, 0.8, 0.1).unwrap();
        for i in 1..20 {
            let z = head.depth() * f64::from(i) / 20.0;
            assert_relative_eq!(head.position_at(head.radius_at(z)), z, epsilon = 1e-9);
        }
    }

    #[test]
    fn rejects_invalid_fractions() {
        assert!(matches!(
            Dished::new(1.0, 1.0, 0.0),
            Err(HeadError::KnuckleFraction(_))
        ));
        assert!(matches!(
            Dished::new(1.0, 1.0, 0.5),
            Err(HeadError::KnuckleFraction(_))
        ));
        assert!(matches!(
            Dished::new(1.0, 0.4, 0.06),
            Err(HeadError::CrownFraction { .. })
        ));
    }
}
