//! Liquid volume in cylindrical tanks as a function of fill height.
//!
//! A [`Tank`] is a cylindrical body of diameter `D` and length `L` closed by
//! a head at each end, lying horizontal or standing vertical. It evaluates
//! the exact volume `V(h)` for a fill height `h ∈ [0, h_max]` and inverts it
//! with any [`Method`]:
//!
//! - [`Method::Full`] and [`Method::Brent`] root-find `V(h) = V*` exactly
//! - [`Method::TableLinear`] and [`Method::Spline`] interpolate a sampled table
//! - [`Method::Chebyshev`] evaluates fitted polynomial series
//!
//! Tables and series are built on first use and cached. Changing their
//! parameters with [`Tank::set_table`] or [`Tank::set_chebyshev_approximators`]
//! rebuilds and replaces them.

mod config;
mod dimensions;
mod error;
mod geometry;
mod inverter;
mod method;

pub use config::{Orientation, SideConfig, TankConfig};
pub use dimensions::SizingConfig;
pub use error::{ConfigError, DomainError, GeometryError, Side, TankError, UnknownMethodError};
pub use method::{ChebyshevDegrees, Interpolation, Method, TableResolution};

use std::cell::OnceCell;

use uom::si::{
    area::square_meter,
    f64::{Area, Length, Volume},
    length::meter,
    volume::cubic_meter,
};

use crate::support::heads::Head;

use geometry::TankGeometry;
use inverter::{Chebyshev, Table, exact_height};

/// A resolved tank with lazily built inversion artifacts.
///
/// Interior caching uses [`OnceCell`], so a `Tank` can be moved between
/// threads but not shared across them.
#[derive(Debug, Clone)]
pub struct Tank {
    geometry: TankGeometry,
    table_resolution: TableResolution,
    linear: OnceCell<Table>,
    spline: OnceCell<Table>,
    chebyshev_degrees: ChebyshevDegrees,
    chebyshev: OnceCell<Chebyshev>,
}

impl Tank {
    /// Validates the configuration and resolves the tank dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::Config`] if the configuration is ambiguous or
    /// inconsistent, or [`TankError::Geometry`] if the heads cannot form a
    /// tank or the missing dimension cannot be solved for.
    pub fn new(config: &TankConfig) -> Result<Self, TankError> {
        let plan = config.validate()?;
        let geometry = dimensions::resolve(&plan, &config.sizing)?;
        plan.check_given_depths(&geometry)?;
        Ok(Self {
            geometry,
            table_resolution: TableResolution::default(),
            linear: OnceCell::new(),
            spline: OnceCell::new(),
            chebyshev_degrees: ChebyshevDegrees::default(),
            chebyshev: OnceCell::new(),
        })
    }

    /// Liquid volume at fill height `h`.
    ///
    /// [`Method::Full`] and [`Method::Brent`] evaluate the exact formula; the
    /// other methods evaluate their artifact, building it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::Domain`] if `h` lies outside `[0, h_max]`, or an
    /// error if the volume or a required artifact cannot be computed.
    pub fn volume_from_height(&self, h: Length, method: Method) -> Result<Volume, TankError> {
        let h = self.checked_height(h)?;
        let v = match method {
            Method::Full | Method::Brent => {
                self.geometry.volume_at(h).map_err(GeometryError::from)?
            }
            Method::TableLinear => self.table(Interpolation::Linear)?.volume(h),
            Method::Spline => self.table(Interpolation::Spline)?.volume(h),
            Method::Chebyshev => self.chebyshev()?.volume(h),
        };
        Ok(Volume::new::<cubic_meter>(v.clamp(0.0, self.geometry.v_total)))
    }

    /// Fill height holding volume `v`.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::Domain`] if `v` lies outside `[0, V_total]`, or an
    /// error if the inversion or a required artifact cannot be computed.
    pub fn height_from_volume(&self, v: Volume, method: Method) -> Result<Length, TankError> {
        let v = self.checked_volume(v)?;
        let h = match method {
            Method::Full | Method::Brent => exact_height(&self.geometry, v)?,
            Method::TableLinear => self.table(Interpolation::Linear)?.height(v),
            Method::Spline => self.table(Interpolation::Spline)?.height(v),
            Method::Chebyshev => self.chebyshev()?.height(v),
        };
        Ok(Length::new::<meter>(h.clamp(0.0, self.geometry.h_max)))
    }

    /// Same as [`Tank::volume_from_height`] with the method given by name.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::UnknownMethod`] if the name is not recognized.
    pub fn volume_from_height_named(&self, h: Length, method: &str) -> Result<Volume, TankError> {
        self.volume_from_height(h, method.parse()?)
    }

    /// Same as [`Tank::height_from_volume`] with the method given by name.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::UnknownMethod`] if the name is not recognized.
    pub fn height_from_volume_named(&self, v: Volume, method: &str) -> Result<Length, TankError> {
        self.height_from_volume(v, method.parse()?)
    }

    /// Builds the table for `interpolation` at the given resolution.
    ///
    /// A table already built with the same resolution is kept. A new
    /// resolution replaces the current one, discarding tables built with the
    /// old resolution.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::Config`] if the resolution is unusable, or an
    /// error if the tank cannot be sampled. The current tables are kept on
    /// error.
    pub fn set_table(
        &mut self,
        resolution: TableResolution,
        interpolation: Interpolation,
    ) -> Result<(), TankError> {
        if resolution == self.table_resolution && self.table_cell(interpolation).get().is_some() {
            return Ok(());
        }

        let table = Table::build(&self.geometry, resolution, interpolation)?;
        if resolution != self.table_resolution {
            self.linear = OnceCell::new();
            self.spline = OnceCell::new();
            self.table_resolution = resolution;
        }
        let cell = match interpolation {
            Interpolation::Linear => &mut self.linear,
            Interpolation::Spline => &mut self.spline,
        };
        *cell = OnceCell::from(table);
        Ok(())
    }

    /// Fits the Chebyshev approximators with the given degrees.
    ///
    /// Series already fitted with the same degrees are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TankError::Config`] if a degree is zero, or an error if the
    /// tank cannot be sampled. The current series are kept on error.
    pub fn set_chebyshev_approximators(
        &mut self,
        degrees: ChebyshevDegrees,
    ) -> Result<(), TankError> {
        if degrees == self.chebyshev_degrees && self.chebyshev.get().is_some() {
            return Ok(());
        }
        let chebyshev = Chebyshev::build(&self.geometry, degrees)?;
        self.chebyshev_degrees = degrees;
        self.chebyshev = OnceCell::from(chebyshev);
        Ok(())
    }

    fn table_cell(&self, interpolation: Interpolation) -> &OnceCell<Table> {
        match interpolation {
            Interpolation::Linear => &self.linear,
            Interpolation::Spline => &self.spline,
        }
    }

    fn table(&self, interpolation: Interpolation) -> Result<&Table, TankError> {
        let cell = self.table_cell(interpolation);
        if let Some(table) = cell.get() {
            return Ok(table);
        }
        let table = Table::build(&self.geometry, self.table_resolution, interpolation)?;
        Ok(cell.get_or_init(|| table))
    }

    fn chebyshev(&self) -> Result<&Chebyshev, TankError> {
        if let Some(chebyshev) = self.chebyshev.get() {
            return Ok(chebyshev);
        }
        let chebyshev = Chebyshev::build(&self.geometry, self.chebyshev_degrees)?;
        Ok(self.chebyshev.get_or_init(|| chebyshev))
    }

    fn checked_height(&self, h: Length) -> Result<f64, DomainError> {
        let value = h.get::<meter>();
        if (0.0..=self.geometry.h_max).contains(&value) {
            Ok(value)
        } else {
            Err(DomainError::Height {
                height: h,
                max: self.height_max(),
            })
        }
    }

    fn checked_volume(&self, v: Volume) -> Result<f64, DomainError> {
        let value = v.get::<cubic_meter>();
        if (0.0..=self.geometry.v_total).contains(&value) {
            Ok(value)
        } else {
            Err(DomainError::Volume {
                volume: v,
                max: self.volume_total(),
            })
        }
    }

    #[must_use]
    pub fn diameter(&self) -> Length {
        self.geometry.diameter()
    }

    /// Length of the cylindrical body, excluding heads.
    #[must_use]
    pub fn length(&self) -> Length {
        self.geometry.length()
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.geometry.orientation
    }

    /// Head at side A: the left end when horizontal, the bottom when vertical.
    #[must_use]
    pub fn side_a(&self) -> &Head {
        &self.geometry.side_a
    }

    /// Head at side B: the right end when horizontal, the top when vertical.
    #[must_use]
    pub fn side_b(&self) -> &Head {
        &self.geometry.side_b
    }

    /// Volume of the full tank, heads included.
    #[must_use]
    pub fn volume_total(&self) -> Volume {
        Volume::new::<cubic_meter>(self.geometry.v_total)
    }

    /// Fill height of the full tank.
    #[must_use]
    pub fn height_max(&self) -> Length {
        Length::new::<meter>(self.geometry.h_max)
    }

    /// Total outer surface area.
    #[must_use]
    pub fn area(&self) -> Area {
        Area::new::<square_meter>(self.geometry.areas.total())
    }

    #[must_use]
    pub fn area_side_a(&self) -> Area {
        Area::new::<square_meter>(self.geometry.areas.side_a)
    }

    #[must_use]
    pub fn area_side_b(&self) -> Area {
        Area::new::<square_meter>(self.geometry.areas.side_b)
    }

    /// Surface area of the cylindrical body.
    #[must_use]
    pub fn area_lateral(&self) -> Area {
        Area::new::<square_meter>(self.geometry.areas.lateral)
    }

    #[must_use]
    pub fn table_resolution(&self) -> TableResolution {
        self.table_resolution
    }

    #[must_use]
    pub fn chebyshev_degrees(&self) -> ChebyshevDegrees {
        self.chebyshev_degrees
    }
}

/// Exact liquid volume at fill height `h` for a tank configuration.
///
/// Equivalent to building a [`Tank`] and calling
/// [`Tank::volume_from_height`] with [`Method::Full`].
///
/// # Errors
///
/// Returns the same errors as [`Tank::new`] and [`Tank::volume_from_height`].
pub fn volume_from_height(config: &TankConfig, h: Length) -> Result<Volume, TankError> {
    Tank::new(config)?.volume_from_height(h, Method::Full)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::length::inch;

    use super::*;
    use crate::support::heads::HeadKind;

    fn m(value: f64) -> Length {
        Length::new::<meter>(value)
    }

    fn m3(value: f64) -> Volume {
        Volume::new::<cubic_meter>(value)
    }

    fn vertical_cylinder() -> Tank {
        Tank::new(&TankConfig {
            diameter: Some(m(1.2)),
            length: Some(m(4.0)),
            orientation: Orientation::Vertical,
            ..TankConfig::default()
        })
        .unwrap()
    }

    fn torispherical() -> Tank {
        Tank::new(&TankConfig {
            length: Some(m(1.2)),
            length_over_diameter: Some(3.5),
            side_a: SideConfig::new(HeadKind::Torispherical).with_fractions(1.0, 0.06),
            side_b: SideConfig::new(HeadKind::Torispherical).with_fractions(1.0, 0.06),
            ..TankConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn vertical_cylinder_round_trip() {
        let tank = vertical_cylinder();
        assert_relative_eq!(
            tank.volume_total().get::<cubic_meter>(),
            4.523_893_421_169_302,
            max_relative = 1e-14
        );
        let v = tank.volume_from_height(m(0.5), Method::Full).unwrap();
        assert_relative_eq!(v.get::<cubic_meter>(), 0.565_486_677_646_162_8, max_relative = 1e-14);
        let h = tank.height_from_volume(m3(0.5), Method::Full).unwrap();
        assert_relative_eq!(h.get::<meter>(), 0.442_097_064_144_153_73, max_relative = 1e-12);
    }

    #[test]
    fn boundaries_are_exact() {
        let tank = torispherical();
        assert_eq!(tank.volume_from_height(m(0.0), Method::Full).unwrap(), m3(0.0));
        assert_eq!(
            tank.volume_from_height(tank.height_max(), Method::Full).unwrap(),
            tank.volume_total()
        );
        assert_eq!(
            tank.height_from_volume(tank.volume_total(), Method::Brent).unwrap(),
            tank.height_max()
        );
        assert_eq!(tank.height_from_volume(m3(0.0), Method::Full).unwrap(), m(0.0));
    }

    #[test]
    fn chebyshev_builds_on_first_use() {
        let tank = Tank::new(&TankConfig {
            length: Some(m(1.2)),
            length_over_diameter: Some(3.5),
            ..TankConfig::default()
        })
        .unwrap();
        assert!(tank.chebyshev.get().is_none());
        let h = tank.height_from_volume(tank.volume_total(), Method::Chebyshev).unwrap();
        assert_relative_eq!(h.get::<meter>(), tank.height_max().get::<meter>(), max_relative = 1e-9);
        let v = tank.volume_from_height(tank.height_max(), Method::Chebyshev).unwrap();
        assert_relative_eq!(
            v.get::<cubic_meter>(),
            tank.volume_total().get::<cubic_meter>(),
            max_relative = 1e-9
        );
        assert!(tank.chebyshev.get().is_some());
    }

    #[test]
    fn default_chebyshev_tracks_exact_inverse() {
        let tank = torispherical();
        let v_total = tank.volume_total().get::<cubic_meter>();
        for i in 0..30 {
            let v = m3(v_total * f64::from(i) / 29.0);
            let exact = tank.height_from_volume(v, Method::Full).unwrap().get::<meter>();
            let cheb = tank.height_from_volume(v, Method::Chebyshev).unwrap().get::<meter>();
            assert!((cheb - exact).abs() < 1e-6, "v={v:?}: {cheb} vs {exact}");
        }
    }

    #[test]
    fn methods_agree_with_exact_inverse() {
        let mut tank = torispherical();
        tank.set_table(TableResolution::Points(150), Interpolation::Spline)
            .unwrap();
        let v_total = tank.volume_total().get::<cubic_meter>();
        for i in 0..30 {
            let v = m3(v_total * f64::from(i) / 29.0);
            let exact = tank.height_from_volume_named(v, "brenth").unwrap().get::<meter>();
            let spline = tank.height_from_volume_named(v, "spline").unwrap().get::<meter>();
            assert_relative_eq!(spline, exact, max_relative = 1e-5, epsilon = 1e-6);
        }

        let h_max = tank.height_max().get::<meter>();
        for i in 0..30 {
            let h = m(h_max * f64::from(i) / 29.0);
            let exact = tank.volume_from_height(h, Method::Full).unwrap().get::<cubic_meter>();
            let linear = tank
                .volume_from_height(h, Method::TableLinear)
                .unwrap()
                .get::<cubic_meter>();
            assert_relative_eq!(linear, exact, max_relative = 1e-2, epsilon = 1e-5);
        }
    }

    #[test]
    fn set_table_replaces_on_new_resolution() {
        let mut tank = torispherical();
        tank.set_table(TableResolution::Points(50), Interpolation::Linear)
            .unwrap();
        tank.set_table(TableResolution::Points(50), Interpolation::Spline)
            .unwrap();
        let linear: *const Table = tank.linear.get().unwrap();

        // Same parameters keep the built table.
        tank.set_table(TableResolution::Points(50), Interpolation::Linear)
            .unwrap();
        assert!(std::ptr::eq(linear, tank.linear.get().unwrap()));

        // A new resolution rebuilds the requested table and drops the other.
        tank.set_table(TableResolution::Step(m(0.001)), Interpolation::Linear)
            .unwrap();
        assert_eq!(tank.table_resolution(), TableResolution::Step(m(0.001)));
        assert_eq!(
            tank.linear.get().unwrap().resolution(),
            TableResolution::Step(m(0.001))
        );
        assert!(tank.spline.get().is_none());

        // Bad resolutions leave the current table in place.
        let result = tank.set_table(TableResolution::Points(2), Interpolation::Spline);
        assert!(matches!(
            result,
            Err(TankError::Config(ConfigError::TableResolution { .. }))
        ));
        assert_eq!(tank.table_resolution(), TableResolution::Step(m(0.001)));
        assert!(tank.linear.get().is_some());
    }

    #[test]
    fn set_chebyshev_replaces_on_new_degrees() {
        let mut tank = vertical_cylinder();
        let degrees = ChebyshevDegrees {
            forward: 10,
            backward: 20,
        };
        tank.set_chebyshev_approximators(degrees).unwrap();
        assert_eq!(tank.chebyshev_degrees(), degrees);
        assert_eq!(tank.chebyshev.get().unwrap().degrees(), degrees);

        // A linear profile is reproduced by any degree.
        let h = tank.height_from_volume(m3(0.5), Method::Chebyshev).unwrap();
        assert_relative_eq!(h.get::<meter>(), 0.442_097_064_144_153_73, max_relative = 1e-9);

        let result = tank.set_chebyshev_approximators(ChebyshevDegrees {
            forward: 0,
            backward: 20,
        });
        assert!(result.is_err());
        assert_eq!(tank.chebyshev_degrees(), degrees);
    }

    #[test]
    fn derived_areas() {
        let mut tank = Tank::new(&TankConfig {
            volume: Some(m3(10.0)),
            length_over_diameter: Some(0.7),
            side_b: SideConfig::new(HeadKind::Conical).with_depth(m(0.5)),
            ..TankConfig::default()
        })
        .unwrap();
        tank.set_table(TableResolution::Step(m(0.001)), Interpolation::Linear)
            .unwrap();
        assert_relative_eq!(tank.area().get::<square_meter>(), 24.947_759_076_571_48, max_relative = 1e-9);
        assert_relative_eq!(
            tank.area_side_a().get::<square_meter>(),
            5.118_555_935_958_284,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            tank.area_side_b().get::<square_meter>(),
            5.497_246_519_930_003,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            tank.area_lateral().get::<square_meter>(),
            14.331_956_620_683_194,
            max_relative = 1e-9
        );
    }

    #[test]
    fn domain_errors() {
        let tank = Tank::new(&TankConfig {
            diameter: Some(m(1.5)),
            length: Some(m(5.0)),
            orientation: Orientation::Vertical,
            ..TankConfig::default()
        })
        .unwrap();
        assert!(matches!(
            tank.volume_from_height(m(7.0), Method::Full),
            Err(TankError::Domain(DomainError::Height { .. }))
        ));
        assert!(matches!(
            tank.volume_from_height(m(-1e-9), Method::Full),
            Err(TankError::Domain(DomainError::Height { .. }))
        ));
        assert!(matches!(
            tank.height_from_volume(m3(100.0), Method::Spline),
            Err(TankError::Domain(DomainError::Volume { .. }))
        ));
        assert!(matches!(
            tank.height_from_volume(m3(f64::NAN), Method::Full),
            Err(TankError::Domain(DomainError::Volume { .. }))
        ));
    }

    #[test]
    fn unknown_method_names() {
        let tank = vertical_cylinder();
        assert!(matches!(
            tank.height_from_volume_named(m3(1e-5), "NOTAMETHOD"),
            Err(TankError::UnknownMethod(_))
        ));
        assert!(matches!(
            tank.volume_from_height_named(m(1e-5), "NOTAMETHOD"),
            Err(TankError::UnknownMethod(_))
        ));
    }

    #[test]
    fn unknown_head_names() {
        let side = |name: &str| -> Result<SideConfig, TankError> { Ok(SideConfig::named(name)?) };
        assert!(matches!(
            side("BADHEAD"),
            Err(TankError::Config(ConfigError::UnknownHeadKind(_)))
        ));
        let kind = |name: &str| -> Result<HeadKind, TankError> { Ok(name.parse::<HeadKind>()?) };
        assert!(matches!(
            kind("BADHEAD"),
            Err(TankError::Config(ConfigError::UnknownHeadKind(_)))
        ));

        let config = TankConfig {
            diameter: Some(m(10.0)),
            length: Some(m(25.0)),
            side_a: SideConfig::named("torispherical").unwrap(),
            side_b: SideConfig::named("guppy").unwrap().with_depth(m(2.0)),
            ..TankConfig::default()
        };
        assert!(Tank::new(&config).is_ok());
    }

    #[test]
    fn given_torispherical_depth() {
        let config = |depth: f64| TankConfig {
            diameter: Some(m(8.0)),
            length: Some(m(10.0)),
            orientation: Orientation::Vertical,
            side_a: SideConfig::new(HeadKind::Torispherical).with_depth(m(depth)),
            side_b: SideConfig::new(HeadKind::Torispherical).with_depth(m(depth)),
            ..TankConfig::default()
        };
        let tank = Tank::new(&config(1.3547)).unwrap();
        let v = tank.volume_from_height(m(1.3), Method::Full).unwrap();
        assert_relative_eq!(v.get::<cubic_meter>(), 38.723_353_379_954_276, max_relative = 1e-6);

        assert!(matches!(
            Tank::new(&config(1.2)),
            Err(TankError::Config(ConfigError::ConflictingDepth { side: Side::A, .. }))
        ));
    }

    #[test]
    fn configuration_errors() {
        let over = TankConfig {
            diameter: Some(m(10.0)),
            length: Some(m(10.0)),
            volume: Some(m3(10.0)),
            ..TankConfig::default()
        };
        assert!(matches!(
            Tank::new(&over),
            Err(TankError::Config(ConfigError::Overspecified { given: 3 }))
        ));

        let orphan = TankConfig {
            length: Some(m(10.0)),
            volume: Some(m3(10.0)),
            side_a: SideConfig::new(HeadKind::Conical),
            side_b: SideConfig {
                depth: Some(m(0.5)),
                ..SideConfig::default()
            },
            ..TankConfig::default()
        };
        assert!(matches!(
            Tank::new(&orphan),
            Err(TankError::Config(ConfigError::OrphanParameter { .. }))
        ));

        let missing = TankConfig {
            length: Some(m(10.0)),
            volume: Some(m3(10.0)),
            side_a: SideConfig::new(HeadKind::Conical).with_depth_ratio(None),
            ..TankConfig::default()
        };
        assert!(matches!(
            Tank::new(&missing),
            Err(TankError::Config(ConfigError::MissingDepth { .. }))
        ));
    }

    #[test]
    fn free_function_matches_tank() {
        let d = Length::new::<inch>(108.0);
        let config = TankConfig {
            diameter: Some(d),
            length: Some(Length::new::<inch>(156.0)),
            side_a: SideConfig::new(HeadKind::Conical).with_depth(Length::new::<inch>(42.0)),
            side_b: SideConfig::new(HeadKind::Conical).with_depth(Length::new::<inch>(42.0)),
            ..TankConfig::default()
        };
        let v = volume_from_height(&config, Length::new::<inch>(36.0)).unwrap();
        assert_relative_eq!(
            v.get::<uom::si::volume::cubic_inch>() / 231.0,
            2_041.192_358_127_344_3,
            max_relative = 1e-9
        );
        assert!(matches!(
            volume_from_height(&config, d * 1.01),
            Err(TankError::Domain(_))
        ));
    }
}
