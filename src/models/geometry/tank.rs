//! Cylindrical tank models.
//!
//! [`Tank`] implements [`Model`] as fill height to liquid volume using the
//! exact formula. [`HeightFromVolume`] is the inverse adapter, carrying the
//! inversion [`Method`] to use.
//!
//! # Example
//!
//! ```
//! use twine_core::Model;
//! use twine_tanks::models::geometry::tank::{HeadKind, SideConfig, Tank, TankConfig};
//! use uom::si::{f64::Length, length::meter, volume::cubic_meter};
//!
//! let tank = Tank::new(&TankConfig {
//!     diameter: Some(Length::new::<meter>(2.0)),
//!     length: Some(Length::new::<meter>(5.0)),
//!     side_a: SideConfig::new(HeadKind::Ellipsoidal),
//!     side_b: SideConfig::new(HeadKind::Ellipsoidal),
//!     ..TankConfig::default()
//! })
//! .unwrap();
//!
//! let half = tank.call(&Length::new::<meter>(1.0)).unwrap();
//! assert!((half.get::<cubic_meter>() * 2.0 - tank.volume_total().get::<cubic_meter>()).abs() < 1e-9);
//! ```

pub(crate) mod core;

pub use self::core::{
    ChebyshevDegrees, ConfigError, DomainError, GeometryError, Interpolation, Method,
    Orientation, Side, SideConfig, SizingConfig, TableResolution, Tank, TankConfig, TankError,
    UnknownMethodError, volume_from_height,
};
pub use crate::support::heads::{Head, HeadKind};

use twine_core::Model;
use uom::si::f64::{Length, Volume};

impl Model for Tank {
    type Input = Length;
    type Output = Volume;
    type Error = TankError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.volume_from_height(*input, Method::Full)
    }
}

/// Model adapter mapping liquid volume to fill height.
#[derive(Debug, Clone, Copy)]
pub struct HeightFromVolume<'a> {
    tank: &'a Tank,
    method: Method,
}

impl<'a> HeightFromVolume<'a> {
    #[must_use]
    pub fn new(tank: &'a Tank, method: Method) -> Self {
        Self { tank, method }
    }
}

impl Model for HeightFromVolume<'_> {
    type Input = Volume;
    type Output = Length;
    type Error = TankError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.tank.height_from_volume(*input, self.method)
    }
}
