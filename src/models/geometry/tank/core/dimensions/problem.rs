//! Problem formulation for sizing a tank to a target volume.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{
    f64::{Length, Volume},
    length::meter,
    volume::cubic_meter,
};

use crate::models::geometry::tank::core::{GeometryError, config::Validated, geometry::TankGeometry};

/// The dimension being solved for, with whatever fixes the other one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Unknown {
    Length { diameter: Length },
    Diameter { length: Length },
    DiameterFromRatio { ratio: f64 },
}

impl Unknown {
    /// Diameter and body length for a candidate value of the unknown.
    fn dimensions(self, x: Length) -> (Length, Length) {
        match self {
            Unknown::Length { diameter } => (diameter, x),
            Unknown::Diameter { length } => (x, length),
            Unknown::DiameterFromRatio { ratio } => (x, x * ratio),
        }
    }
}

/// Model adapter that builds a tank for a candidate dimension.
pub(super) struct SizingModel<'a> {
    plan: &'a Validated,
    unknown: Unknown,
}

impl<'a> SizingModel<'a> {
    pub(super) fn new(plan: &'a Validated, unknown: Unknown) -> Self {
        Self { plan, unknown }
    }
}

impl Model for SizingModel<'_> {
    type Input = Length;
    type Output = TankGeometry;
    type Error = GeometryError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let (diameter, length) = self.unknown.dimensions(*input);
        super::assemble(self.plan, diameter, length)
    }
}

/// Equation problem definition for volume matching.
///
/// Computes the residual as `(V_total - target) / target`.
pub(super) struct SizingProblem {
    target: Volume,
}

impl SizingProblem {
    pub(super) fn new(target: Volume) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for SizingProblem {
    type Input = Length;
    type Output = TankGeometry;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(Length::new::<meter>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        let target = self.target.get::<cubic_meter>();
        Ok([(output.v_total - target) / target])
    }
}
