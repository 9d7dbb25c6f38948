//! Inversion artifacts for `h(V)`.
//!
//! Exact inversion runs Brent's method on `V(h) - V*` each call. Tables and
//! Chebyshev series are built once from the exact curve and then evaluated
//! cheaply in either direction.

use uom::si::{f64::Volume, length::meter, volume::cubic_meter};

use crate::support::numeric::{
    brent,
    chebyshev::ChebyshevSeries,
    interpolate::{CubicSpline, Linear},
};

use super::{
    ChebyshevDegrees, ConfigError, GeometryError, Interpolation, TableResolution, TankError,
    geometry::TankGeometry,
};

/// Upper bound on the number of table samples.
const MAX_TABLE_POINTS: u32 = 1_000_000;

/// Finds the fill height holding volume `v` with Brent's method.
pub(super) fn exact_height(geometry: &TankGeometry, v: f64) -> Result<f64, GeometryError> {
    let solution = brent::solve(
        |h| {
            geometry
                .volume_at(h)
                .map(|volume| volume - v)
                .map_err(GeometryError::from)
        },
        [0.0, geometry.h_max],
        &brent::Config::default(),
    )
    .map_err(|error| GeometryError::Inversion(Box::new(error)))?;

    if solution.status != brent::Status::Converged {
        return Err(GeometryError::InversionMaxIters {
            volume: Volume::new::<cubic_meter>(v),
        });
    }

    tracing::trace!(volume = v, height = solution.x, iters = solution.iters, "inverted");
    Ok(solution.x)
}

#[derive(Debug, Clone, PartialEq)]
enum Curve {
    Linear(Linear),
    Spline(CubicSpline),
}

impl Curve {
    fn new(
        interpolation: Interpolation,
        xs: Vec<f64>,
        ys: Vec<f64>,
    ) -> Result<Self, GeometryError> {
        Ok(match interpolation {
            Interpolation::Linear => Self::Linear(Linear::new(xs, ys)?),
            Interpolation::Spline => Self::Spline(CubicSpline::new(xs, ys)?),
        })
    }

    fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Linear(curve) => curve.eval(x),
            Self::Spline(curve) => curve.eval(x),
        }
    }
}

/// Sampled `(h, V)` pairs interpolated in both directions.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Table {
    resolution: TableResolution,
    forward: Curve,
    backward: Curve,
}

impl Table {
    /// Samples the tank and fits interpolants in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TableResolution`] if the resolution gives too few
    /// or too many points, or an error if the samples cannot be interpolated.
    pub fn build(
        geometry: &TankGeometry,
        resolution: TableResolution,
        interpolation: Interpolation,
    ) -> Result<Self, TankError> {
        let heights = sample_heights(geometry.h_max, resolution, interpolation)?;
        let volumes = heights
            .iter()
            .map(|&h| geometry.volume_at(h))
            .collect::<Result<Vec<_>, _>>()
            .map_err(GeometryError::from)?;

        tracing::debug!(
            points = heights.len(),
            ?interpolation,
            "built volume table"
        );

        Ok(Self {
            resolution,
            forward: Curve::new(interpolation, heights.clone(), volumes.clone())?,
            backward: Curve::new(interpolation, volumes, heights)?,
        })
    }

    pub fn resolution(&self) -> TableResolution {
        self.resolution
    }

    pub fn volume(&self, h: f64) -> f64 {
        self.forward.eval(h)
    }

    pub fn height(&self, v: f64) -> f64 {
        self.backward.eval(v)
    }
}

/// Heights from empty to full, always ending exactly at `h_max`.
fn sample_heights(
    h_max: f64,
    resolution: TableResolution,
    interpolation: Interpolation,
) -> Result<Vec<f64>, ConfigError> {
    let too_few = match interpolation {
        Interpolation::Linear => ConfigError::TableResolution {
            reason: "a linear table needs at least 2 points",
        },
        Interpolation::Spline => ConfigError::TableResolution {
            reason: "a spline table needs at least 4 points",
        },
    };
    let min_points = match interpolation {
        Interpolation::Linear => 2,
        Interpolation::Spline => 4,
    };

    let mut heights = match resolution {
        TableResolution::Points(n) => {
            let n = u32::try_from(n)
                .ok()
                .filter(|&n| n <= MAX_TABLE_POINTS)
                .ok_or(ConfigError::TableResolution {
                    reason: "too many table points",
                })?;
            if n < min_points {
                return Err(too_few);
            }
            let last = f64::from(n - 1);
            (0..n).map(|i| h_max * f64::from(i) / last).collect::<Vec<_>>()
        }
        TableResolution::Step(dx) => {
            let dx = dx.get::<meter>();
            if !(dx.is_finite() && dx > 0.0) {
                return Err(ConfigError::TableResolution {
                    reason: "table step must be finite and positive",
                });
            }
            if h_max / dx >= f64::from(MAX_TABLE_POINTS) {
                return Err(ConfigError::TableResolution {
                    reason: "table step is too small for the tank height",
                });
            }
            // Interior points this close to the top would make a degenerate last interval.
            let top = h_max * (1.0 - 1e-9);
            let mut heights: Vec<f64> = (0..MAX_TABLE_POINTS)
                .map(|i| dx * f64::from(i))
                .take_while(|&h| h < top)
                .collect();
            heights.push(h_max);
            heights
        }
    };

    if let Some(last) = heights.last_mut() {
        *last = h_max;
    }
    if heights.len() < min_points as usize {
        return Err(too_few);
    }
    Ok(heights)
}

/// Chebyshev series for `V(h)` and `h(V)`.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Chebyshev {
    degrees: ChebyshevDegrees,
    forward: ChebyshevSeries,
    backward: ChebyshevSeries,
}

impl Chebyshev {
    /// Fits both series, sampling the inverse through [`exact_height`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChebyshevDegree`] if either degree is zero, or an
    /// error if the tank cannot be sampled.
    pub fn build(geometry: &TankGeometry, degrees: ChebyshevDegrees) -> Result<Self, TankError> {
        let ChebyshevDegrees { forward, backward } = degrees;
        if forward == 0 || backward == 0 {
            return Err(ConfigError::ChebyshevDegree { forward, backward }.into());
        }

        let fit_error = |error| GeometryError::Approximation(Box::new(error));
        let forward = ChebyshevSeries::fit(
            |h| geometry.volume_at(h).map_err(GeometryError::from),
            [0.0, geometry.h_max],
            forward,
        )
        .map_err(fit_error)?;
        let backward = ChebyshevSeries::fit(
            |v| exact_height(geometry, v),
            [0.0, geometry.v_total],
            backward,
        )
        .map_err(fit_error)?;

        tracing::debug!(
            forward = degrees.forward,
            backward = degrees.backward,
            "fitted chebyshev approximators"
        );

        Ok(Self {
            degrees,
            forward,
            backward,
        })
    }

    pub fn degrees(&self) -> ChebyshevDegrees {
        self.degrees
    }

    pub fn volume(&self, h: f64) -> f64 {
        self.forward.eval(h)
    }

    pub fn height(&self, v: f64) -> f64 {
        self.backward.eval(v)
    }
}
