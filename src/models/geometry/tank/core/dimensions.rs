//! Resolution of tank dimensions.
//!
//! When two of diameter, length and `L/D` are known the tank is assembled
//! directly. When the total volume is one of the two given sizes, the missing
//! dimension is found by bisection on the relative volume residual. A volume
//! the heads cannot reach at any valid size is reported as
//! [`GeometryError::UnreachableVolume`] rather than returned approximately.

mod config;
mod problem;

pub use config::SizingConfig;

use std::f64::consts::PI;

use twine_core::Model;
use twine_solvers::equation::bisection;
use uom::si::{
    f64::{Length, Volume},
    length::meter,
    volume::cubic_meter,
};

use super::{
    GeometryError,
    config::{Size, Validated},
    geometry::TankGeometry,
};

use problem::{SizingModel, SizingProblem, Unknown};

/// Builds the tank geometry described by a validated configuration.
///
/// # Errors
///
/// Returns [`GeometryError`] if the heads are invalid at the resolved
/// diameter, concave heads overlap, the target volume cannot be reached, or
/// the dimension solver fails.
pub(super) fn resolve(plan: &Validated, config: &SizingConfig) -> Result<TankGeometry, GeometryError> {
    let (unknown, target) = match plan.size {
        Size::Known { diameter, length } => {
            return assemble(plan, diameter.into_inner(), length.into_inner());
        }
        Size::FindLength { diameter, volume } => (
            Unknown::Length {
                diameter: diameter.into_inner(),
            },
            volume,
        ),
        Size::FindDiameter { length, volume } => (
            Unknown::Diameter {
                length: length.into_inner(),
            },
            volume,
        ),
        Size::FindDiameterFromRatio { ratio, volume } => (
            Unknown::DiameterFromRatio {
                ratio: ratio.into_inner(),
            },
            volume,
        ),
    };
    solve(plan, unknown, target.into_inner(), config)
}

/// Builds the heads for `diameter` and assembles the tank.
pub(super) fn assemble(
    plan: &Validated,
    diameter: Length,
    length: Length,
) -> Result<TankGeometry, GeometryError> {
    let side_a = plan.side_a.head(diameter)?;
    let side_b = plan.side_b.head(diameter)?;
    TankGeometry::new(diameter, length, plan.orientation, side_a, side_b)
}

fn solve(
    plan: &Validated,
    unknown: Unknown,
    target: Volume,
    config: &SizingConfig,
) -> Result<TankGeometry, GeometryError> {
    let v = target.get::<cubic_meter>();

    let (lo, hi, nominal) = match unknown {
        Unknown::Length { diameter } => {
            let r = 0.5 * diameter.get::<meter>();
            let nominal = v.cbrt().max(v / (PI * r * r));

            // Concave heads set the shortest body that can hold them.
            let side_a = plan.side_a.head(diameter)?;
            let side_b = plan.side_b.head(diameter)?;
            let shortest = [side_a, side_b]
                .iter()
                .filter(|head| head.is_concave())
                .map(|head| head.depth().get::<meter>())
                .sum::<f64>();
            (shortest, shortest + config.upper_factor * nominal, nominal)
        }
        Unknown::Diameter { length } => {
            let fixed = [plan.side_a, plan.side_b]
                .iter()
                .filter_map(|spec| spec.fixed_concave_depth())
                .map(|depth| depth.get::<meter>())
                .sum::<f64>();
            if fixed > length.get::<meter>() {
                return Err(GeometryError::OverlappingHeads {
                    depth: Length::new::<meter>(fixed),
                    length,
                });
            }
            let nominal = v.cbrt();
            (config.lower_factor * nominal, config.upper_factor * nominal, nominal)
        }
        Unknown::DiameterFromRatio { .. } => {
            let nominal = v.cbrt();
            (config.lower_factor * nominal, config.upper_factor * nominal, nominal)
        }
    };

    let model = SizingModel::new(plan, unknown);
    let problem = SizingProblem::new(target);

    // Invalid bracket ends are skipped; the solve steers away from them.
    let lowest = model.call(&Length::new::<meter>(lo)).ok().filter(|t| t.v_total > v);
    let highest = model.call(&Length::new::<meter>(hi)).ok().filter(|t| t.v_total < v);
    if let Some(closest) = lowest.or(highest) {
        return Err(GeometryError::UnreachableVolume {
            target,
            closest: Volume::new::<cubic_meter>(closest.v_total),
        });
    }

    let solution = bisection::solve(
        &model,
        &problem,
        [lo, hi],
        &config.bisection(nominal),
        |event: &bisection::Event<'_, _, _>| {
            // Heads that do not fit the candidate body (a spherical cap deeper
            // than the radius, concave heads overlapping) mean the candidate
            // is too small.
            if event.result().is_err() {
                return Some(bisection::Action::assume_negative());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(GeometryError::SizingMaxIters {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    let geometry = solution.snapshot.output;
    if solution.residual.abs() > config.volume_rel_tol {
        return Err(GeometryError::UnreachableVolume {
            target,
            closest: Volume::new::<cubic_meter>(geometry.v_total),
        });
    }

    tracing::debug!(
        diameter = geometry.diameter,
        length = geometry.length,
        volume = geometry.v_total,
        iters = solution.iters,
        "resolved tank dimensions"
    );
    Ok(geometry)
}
