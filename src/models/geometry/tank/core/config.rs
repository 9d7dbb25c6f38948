use uom::si::f64::{Length, Volume};

use crate::support::{
    constraint::{Constrained, Constraint, NonNegative, StrictlyPositive},
    heads::{Head, HeadKind},
};

use super::{ConfigError, GeometryError, Side, SizingConfig, geometry::TankGeometry};

const DEFAULT_DEPTH_RATIO: f64 = 0.25;
const DEFAULT_CROWN_FRACTION: f64 = 1.0;
const DEFAULT_KNUCKLE_FRACTION: f64 = 0.06;

/// Relative mismatch allowed between a given torispherical depth and the one
/// derived from `f`, `k` and `D`.
const TORISPHERICAL_DEPTH_RTOL: f64 = 1e-4;

/// Direction of the tank axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Head configuration for one end of a tank.
///
/// With `kind` left as `None` the end is flat, and no other parameter may be
/// set. A head of given kind takes its depth from `depth` if set, otherwise
/// from `depth_ratio · D`. Torispherical heads take their depth from the
/// crown and knuckle fractions `f` and `k` instead (defaults 1.0 and 0.06);
/// a `depth` given for one must agree with the derived depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideConfig {
    pub kind: Option<HeadKind>,
    pub depth: Option<Length>,
    pub depth_ratio: Option<f64>,
    pub f: Option<f64>,
    pub k: Option<f64>,
    pub concave: bool,
}

impl Default for SideConfig {
    fn default() -> Self {
        Self {
            kind: None,
            depth: None,
            depth_ratio: Some(DEFAULT_DEPTH_RATIO),
            f: None,
            k: None,
            concave: false,
        }
    }
}

impl SideConfig {
    /// A head of the given kind with default parameters.
    #[must_use]
    pub fn new(kind: HeadKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// A head named by kind, ignoring case. `"none"` and `"flat"` both give a
    /// flat end.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownHeadKind`] if the name is not a head kind.
    pub fn named(name: &str) -> Result<Self, ConfigError> {
        match name.parse::<HeadKind>()? {
            HeadKind::Flat => Ok(Self::default()),
            kind => Ok(Self::new(kind)),
        }
    }

    #[must_use]
    pub fn with_depth(self, depth: Length) -> Self {
        Self {
            depth: Some(depth),
            ..self
        }
    }

    #[must_use]
    pub fn with_depth_ratio(self, ratio: Option<f64>) -> Self {
        Self {
            depth_ratio: ratio,
            ..self
        }
    }

    #[must_use]
    pub fn with_fractions(self, f: f64, k: f64) -> Self {
        Self {
            f: Some(f),
            k: Some(k),
            ..self
        }
    }

    #[must_use]
    pub fn concave(self) -> Self {
        Self {
            concave: true,
            ..self
        }
    }

    fn validate(&self, side: Side, orientation: Orientation) -> Result<HeadSpec, ConfigError> {
        let Some(kind) = self.kind else {
            let orphan = [
                ("depth", self.depth.is_some()),
                ("f", self.f.is_some()),
                ("k", self.k.is_some()),
            ]
            .into_iter()
            .find_map(|(name, given)| given.then_some(name));
            if let Some(parameter) = orphan {
                return Err(ConfigError::OrphanParameter { side, parameter });
            }
            return Ok(HeadSpec::Flat);
        };

        let concave = self.concave;
        if kind == HeadKind::Guppy {
            if concave {
                return Err(ConfigError::ConcaveGuppy { side });
            }
            if orientation == Orientation::Vertical {
                return Err(ConfigError::VerticalGuppy { side });
            }
        }

        if kind == HeadKind::Torispherical {
            return Ok(HeadSpec::Torispherical {
                f: self.f.unwrap_or(DEFAULT_CROWN_FRACTION),
                k: self.k.unwrap_or(DEFAULT_KNUCKLE_FRACTION),
                depth: self.depth.map(|d| checked("head depth", d)).transpose()?,
                concave,
            });
        }

        if self.f.is_some() || self.k.is_some() {
            return Err(ConfigError::UnexpectedFractions { side, kind });
        }
        if kind == HeadKind::Flat {
            return Ok(HeadSpec::Flat);
        }

        let depth = match (self.depth, self.depth_ratio) {
            (Some(depth), _) => Depth::Fixed(checked("head depth", depth)?),
            (None, Some(ratio)) => Depth::Ratio(checked("head depth ratio", ratio)?),
            (None, None) => return Err(ConfigError::MissingDepth { side, kind }),
        };

        Ok(HeadSpec::Sized {
            kind,
            depth,
            concave,
        })
    }
}

/// Configuration of a cylindrical tank.
///
/// Exactly two of `diameter`, `length`, `length_over_diameter` and `volume`
/// must be given. When `volume` is one of them, the missing dimension is
/// solved for so that the total tank volume matches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TankConfig {
    pub diameter: Option<Length>,

    /// Length of the cylindrical body, excluding heads.
    pub length: Option<Length>,

    pub length_over_diameter: Option<f64>,

    /// Total volume including heads.
    pub volume: Option<Volume>,

    pub orientation: Orientation,
    pub side_a: SideConfig,
    pub side_b: SideConfig,

    /// Solver settings used when the volume is given.
    pub sizing: SizingConfig,
}

impl TankConfig {
    /// Checks the configuration without building any geometry.
    pub(super) fn validate(&self) -> Result<Validated, ConfigError> {
        let given = [
            self.diameter.is_some(),
            self.length.is_some(),
            self.length_over_diameter.is_some(),
            self.volume.is_some(),
        ]
        .into_iter()
        .filter(|&g| g)
        .count();
        if given > 2 {
            return Err(ConfigError::Overspecified { given });
        }
        if given < 2 {
            return Err(ConfigError::Underspecified { given });
        }

        let diameter = self.diameter.map(|d| checked::<_, StrictlyPositive>("diameter", d)).transpose()?;
        let length = self.length.map(|l| checked::<_, NonNegative>("length", l)).transpose()?;
        let ratio = self
            .length_over_diameter
            .map(|r| checked::<_, StrictlyPositive>("length over diameter", r))
            .transpose()?;
        let volume = self.volume.map(|v| checked::<_, StrictlyPositive>("volume", v)).transpose()?;

        let size = match (diameter, length, ratio, volume) {
            (Some(diameter), Some(length), None, None) => Size::Known { diameter, length },
            (Some(diameter), None, Some(ratio), None) => Size::Known {
                diameter,
                length: checked("length", diameter.into_inner() * ratio.into_inner())?,
            },
            (None, Some(length), Some(ratio), None) => Size::Known {
                diameter: checked("diameter", length.into_inner() / ratio.into_inner())?,
                length,
            },
            (Some(diameter), None, None, Some(volume)) => Size::FindLength { diameter, volume },
            (None, Some(length), None, Some(volume)) => Size::FindDiameter { length, volume },
            (None, None, Some(ratio), Some(volume)) => Size::FindDiameterFromRatio { ratio, volume },
            _ => unreachable!("exactly two size parameters are present"),
        };

        Ok(Validated {
            size,
            orientation: self.orientation,
            side_a: self.side_a.validate(Side::A, self.orientation)?,
            side_b: self.side_b.validate(Side::B, self.orientation)?,
        })
    }
}

fn checked<T, C: Constraint<T>>(
    name: &'static str,
    value: T,
) -> Result<Constrained<T, C>, ConfigError> {
    Constrained::new(value).map_err(|source| ConfigError::InvalidValue { name, source })
}

/// A configuration that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Validated {
    pub size: Size,
    pub orientation: Orientation,
    pub side_a: HeadSpec,
    pub side_b: HeadSpec,
}

impl Validated {
    /// Checks given torispherical depths against the resolved heads.
    pub fn check_given_depths(&self, geometry: &TankGeometry) -> Result<(), ConfigError> {
        for (side, spec, head) in [
            (Side::A, &self.side_a, &geometry.side_a),
            (Side::B, &self.side_b, &geometry.side_b),
        ] {
            let HeadSpec::Torispherical {
                depth: Some(given), ..
            } = *spec
            else {
                continue;
            };
            let given = given.into_inner();
            let derived = head.depth();
            if (given - derived).abs() > derived * TORISPHERICAL_DEPTH_RTOL {
                return Err(ConfigError::ConflictingDepth {
                    side,
                    given,
                    derived,
                });
            }
        }
        Ok(())
    }
}

/// Which dimensions are known and which one must be solved for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Size {
    Known {
        diameter: Constrained<Length, StrictlyPositive>,
        length: Constrained<Length, NonNegative>,
    },
    FindLength {
        diameter: Constrained<Length, StrictlyPositive>,
        volume: Constrained<Volume, StrictlyPositive>,
    },
    FindDiameter {
        length: Constrained<Length, NonNegative>,
        volume: Constrained<Volume, StrictlyPositive>,
    },
    FindDiameterFromRatio {
        ratio: Constrained<f64, StrictlyPositive>,
        volume: Constrained<Volume, StrictlyPositive>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Depth {
    Fixed(Constrained<Length, NonNegative>),
    Ratio(Constrained<f64, NonNegative>),
}

/// A validated head, not yet tied to a diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum HeadSpec {
    Flat,
    Sized {
        kind: HeadKind,
        depth: Depth,
        concave: bool,
    },
    Torispherical {
        f: f64,
        k: f64,
        depth: Option<Constrained<Length, NonNegative>>,
        concave: bool,
    },
}

impl HeadSpec {
    /// Builds the head for a body of the given diameter.
    pub fn head(&self, diameter: Length) -> Result<Head, GeometryError> {
        let (head, concave) = match *self {
            HeadSpec::Flat => return Ok(Head::flat(diameter)?),
            HeadSpec::Torispherical { f, k, concave, .. } => {
                (Head::torispherical(diameter, f, k)?, concave)
            }
            HeadSpec::Sized {
                kind,
                depth,
                concave,
            } => {
                let depth = match depth {
                    Depth::Fixed(depth) => depth.into_inner(),
                    Depth::Ratio(ratio) => diameter * ratio.into_inner(),
                };
                let head = match kind {
                    HeadKind::Conical => Head::conical(diameter, depth)?,
                    HeadKind::Ellipsoidal => Head::ellipsoidal(diameter, depth)?,
                    HeadKind::Spherical => Head::spherical(diameter, depth)?,
                    HeadKind::Guppy => Head::guppy(diameter, depth)?,
                    HeadKind::Flat | HeadKind::Torispherical => Head::flat(diameter)?,
                };
                (head, concave)
            }
        };
        Ok(if concave { head.into_concave()? } else { head })
    }

    /// Fixed depth of a head that displaces body volume, if known without a diameter.
    pub fn fixed_concave_depth(&self) -> Option<Length> {
        match *self {
            HeadSpec::Sized {
                depth: Depth::Fixed(depth),
                concave: true,
                ..
            } => Some(depth.into_inner()),
            _ => None,
        }
    }
}
