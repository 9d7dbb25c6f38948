//! Adaptive Gauss–Kronrod quadrature.
//!
//! Each panel is integrated with the 15-point Kronrod rule; the embedded
//! 7-point Gauss rule supplies the error estimate. Panels whose estimate
//! exceeds the tolerance are bisected until the tolerance is met or the
//! depth limit is reached. The relative tolerance is measured against the
//! integral of `|f|` over the whole interval, so panels near a zero of the
//! integrand are not driven to needless depth.
//!
//! The integrands this crate feeds in are smooth in the interior of each
//! panel but may have square-root behaviour at an end point (for example a
//! circular segment whose chord shrinks to zero). Kronrod nodes never touch
//! the end points, so such integrands are handled without special casing.

use thiserror::Error;

/// Kronrod abscissae on `[0, 1]`, descending; the last entry is the centre.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

/// Kronrod weights matching [`XGK`].
const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_18,
    0.140_653_259_715_525_92,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_83,
];

/// Gauss weights for the odd-indexed Kronrod abscissae plus the centre.
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

/// Tolerances for adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Absolute error allowed on each accepted panel.
    pub abs_tol: f64,

    /// Error allowed on each accepted panel, relative to the integral of
    /// `|f|` over the whole interval.
    pub rel_tol: f64,

    /// Maximum number of bisections of any panel.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abs_tol: 0.0,
            rel_tol: 1e-12,
            max_depth: 40,
        }
    }
}

/// Errors that can occur during adaptive integration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadratureError {
    /// A panel reached the depth limit with its error estimate above tolerance.
    #[error("quadrature did not converge on [{lo}, {hi}]: estimated error {error:e}")]
    NotConverged { lo: f64, hi: f64, error: f64 },

    /// The integrand returned a non-finite value.
    #[error("integrand is not finite near x={x}")]
    NonFinite { x: f64 },
}

/// Integrates `f` over `[lo, hi]`.
///
/// Returns zero for empty or reversed intervals.
///
/// # Errors
///
/// Returns an error if a panel cannot meet the tolerance within
/// `config.max_depth` bisections, or if the integrand is not finite.
pub fn integrate(
    f: impl Fn(f64) -> f64,
    lo: f64,
    hi: f64,
    config: &Config,
) -> Result<f64, QuadratureError> {
    if hi <= lo {
        return Ok(0.0);
    }

    let first = kronrod(&f, lo, hi)?;
    let tol = config.abs_tol.max(config.rel_tol * first.magnitude);

    let mut total = 0.0;
    let mut stack = vec![(lo, hi, first, 0)];

    while let Some((a, b, Panel { value, error, .. }, depth)) = stack.pop() {
        if error <= tol {
            total += value;
            continue;
        }
        if depth >= config.max_depth {
            return Err(QuadratureError::NotConverged {
                lo: a,
                hi: b,
                error,
            });
        }
        let mid = 0.5 * (a + b);
        stack.push((a, mid, kronrod(&f, a, mid)?, depth + 1));
        stack.push((mid, b, kronrod(&f, mid, b)?, depth + 1));
    }

    Ok(total)
}

/// A single panel estimate.
#[derive(Debug, Clone, Copy)]
struct Panel {
    value: f64,
    error: f64,
    magnitude: f64,
}

/// Applies the 15-point Kronrod rule to one panel.
fn kronrod(f: &impl Fn(f64) -> f64, a: f64, b: f64) -> Result<Panel, QuadratureError> {
    let centre = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let eval = |x: f64| {
        let y = f(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(QuadratureError::NonFinite { x })
        }
    };

    let fc = eval(centre)?;
    let mut kronrod = fc * WGK[7];
    let mut gauss = fc * WG[3];
    let mut magnitude = fc.abs() * WGK[7];

    for (j, (&x, &w)) in XGK.iter().zip(&WGK).take(7).enumerate() {
        let dx = half * x;
        let (left, right) = (eval(centre - dx)?, eval(centre + dx)?);
        let pair = left + right;
        kronrod += w * pair;
        magnitude += w * (left.abs() + right.abs());
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok(Panel {
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
        magnitude: magnitude * half,
    })
}
