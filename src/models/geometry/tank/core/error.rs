use std::fmt;

use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::{Length, Volume};

use crate::support::{
    constraint::ConstraintError,
    heads::{HeadError, HeadKind, ParseHeadKindError},
    numeric::{brent, chebyshev::FitError, interpolate::InterpolateError},
};

/// Errors returned by [`Tank`](super::Tank) operations.
#[derive(Debug, Error)]
pub enum TankError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethodError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<ParseHeadKindError> for TankError {
    fn from(error: ParseHeadKindError) -> Self {
        Self::Config(error.into())
    }
}

/// One end of a tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("side A"),
            Self::B => f.write_str("side B"),
        }
    }
}

/// A tank configuration that is ambiguous, incomplete or inconsistent.
///
/// These errors are detected before any geometry is built or solved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// More than two of diameter, length, `L/D` and volume were given.
    #[error("tank size is over-specified: {given} of diameter, length, L/D and volume given")]
    Overspecified { given: usize },

    /// Fewer than two of diameter, length, `L/D` and volume were given.
    #[error("tank size is under-specified: {given} of diameter, length, L/D and volume given")]
    Underspecified { given: usize },

    /// A size or head parameter is not an acceptable number.
    #[error("invalid {name}: {source}")]
    InvalidValue {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error(transparent)]
    UnknownHeadKind(#[from] ParseHeadKindError),

    /// A head parameter was given for a flat end.
    #[error("{side}: `{parameter}` given without a head kind")]
    OrphanParameter {
        side: Side,
        parameter: &'static str,
    },

    /// Neither a depth nor a depth ratio was given for a head that needs one.
    #[error("{side}: {kind} head needs a depth or a depth ratio")]
    MissingDepth { side: Side, kind: HeadKind },

    /// A torispherical head depth disagrees with the one derived from `f`, `k` and `D`.
    #[error("{side}: torispherical head depth {given:?} disagrees with {derived:?} from f and k")]
    ConflictingDepth {
        side: Side,
        given: Length,
        derived: Length,
    },

    /// Crown or knuckle fractions were given for a head that is not torispherical.
    #[error("{side}: f and k only apply to torispherical heads, not {kind}")]
    UnexpectedFractions { side: Side, kind: HeadKind },

    #[error("{side}: guppy heads cannot be concave")]
    ConcaveGuppy { side: Side },

    #[error("{side}: guppy heads are only defined for horizontal tanks")]
    VerticalGuppy { side: Side },

    /// A table needs at least two points, four for a spline, and a positive step.
    #[error("invalid table resolution: {reason}")]
    TableResolution { reason: &'static str },

    #[error("chebyshev degrees must be at least 1, got forward={forward}, backward={backward}")]
    ChebyshevDegree { forward: usize, backward: usize },
}

/// A height or volume outside the tank's range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("height {height:?} is outside [0, {max:?}]")]
    Height { height: Length, max: Length },

    #[error("volume {volume:?} is outside [0, {max:?}]")]
    Volume { volume: Volume, max: Volume },
}

/// An inversion method name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown method `{name}`, expected one of: full, brent, table_linear, spline, chebyshev")]
pub struct UnknownMethodError {
    pub name: String,
}

/// Head parameters that are valid on their own but cannot form a tank, or a
/// numerical failure while evaluating one.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid head: {0}")]
    Head(#[from] HeadError),

    /// Concave heads reach past each other inside the body.
    #[error("concave heads overlap: combined depth {depth:?} exceeds body length {length:?}")]
    OverlappingHeads { depth: Length, length: Length },

    /// No valid tank of the requested shape holds the target volume.
    #[error("target volume {target:?} cannot be reached, closest is {closest:?}")]
    UnreachableVolume { target: Volume, closest: Volume },

    #[error("dimension solver error")]
    Sizing(#[from] bisection::Error),

    #[error("dimension solver hit iteration limit: relative residual={residual}")]
    SizingMaxIters { residual: f64, iters: usize },

    #[error("height inversion failed")]
    Inversion(#[source] Box<brent::Error<GeometryError>>),

    #[error("height inversion did not converge for volume {volume:?}")]
    InversionMaxIters { volume: Volume },

    #[error("chebyshev fit failed")]
    Approximation(#[source] Box<FitError<GeometryError>>),

    #[error("table interpolation failed")]
    Table(#[from] InterpolateError),
}
