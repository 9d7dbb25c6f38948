//! Brent–Dekker root finding on a bracketed interval.
//!
//! # Algorithm
//!
//! Brent's method keeps a bracket `[b, c]` with a sign change and, on each
//! iteration, tries an inverse quadratic (or secant) step from the last
//! three evaluations. The step is accepted only if it stays well inside the
//! bracket and shrinks fast enough; otherwise the method falls back to
//! bisection. Convergence is therefore superlinear on smooth functions and
//! never worse than bisection.
//!
//! # When to Use
//!
//! Use this solver for monotonic scalar functions that are cheap to bracket,
//! such as the volume–height relationship of a tank.

use thiserror::Error;

/// Configuration for the Brent solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum number of iterations after the initial bracket evaluation.
    pub max_iters: usize,

    /// Absolute tolerance on `x`.
    pub x_abs_tol: f64,

    /// Relative tolerance on `x`.
    pub x_rel_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 200,
            x_abs_tol: 1e-14,
            x_rel_tol: 4.0 * f64::EPSILON,
        }
    }
}

/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The bracket shrank below the configured tolerance, or an exact root
    /// was evaluated.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,
}

/// The result of a Brent solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best estimate of the root.
    pub x: f64,

    /// Function value at `x`.
    pub residual: f64,

    /// Iteration count when the solver finished.
    pub iters: usize,
}

/// Errors that can occur during a Brent solve.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The function has the same sign at both ends of the bracket.
    #[error("bracket does not contain a sign change: f({lo})={f_lo}, f({hi})={f_hi}")]
    InvalidBracket {
        lo: f64,
        hi: f64,
        f_lo: f64,
        f_hi: f64,
    },

    /// The function returned a non-finite value.
    #[error("function returned a non-finite value at x={x}")]
    NonFinite { x: f64 },

    /// The function itself failed.
    #[error("function evaluation failed")]
    Function(#[source] E),
}

/// Finds a root of `f` within `bracket`.
///
/// An end point with an exactly zero function value is returned as-is, so
/// targets at the very bottom or top of a monotonic function resolve to the
/// bracket ends without iteration.
///
/// # Errors
///
/// Returns an error if the bracket has no sign change, `f` fails, or `f`
/// returns a non-finite value.
pub fn solve<F, E>(mut f: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut eval = |x: f64| -> Result<f64, Error<E>> {
        let y = f(x).map_err(Error::Function)?;
        if y.is_finite() {
            Ok(y)
        } else {
            Err(Error::NonFinite { x })
        }
    };

    let [mut a, mut b] = bracket;
    let mut fa = eval(a)?;
    let mut fb = eval(b)?;

    if fa == 0.0 {
        return Ok(converged(a, fa, 0));
    }
    if fb == 0.0 {
        return Ok(converged(b, fb, 0));
    }
    if fa.signum() == fb.signum() {
        return Err(Error::InvalidBracket {
            lo: bracket[0],
            hi: bracket[1],
            f_lo: fa,
            f_hi: fb,
        });
    }

    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    for iter in 1..=config.max_iters {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * config.x_rel_tol * b.abs() + 0.5 * config.x_abs_tol;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(converged(b, fb, iter));
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant step.
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation.
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = eval(b)?;

        tracing::trace!(iter, x = b, residual = fb, "brent step");
    }

    Ok(Solution {
        status: Status::MaxIters,
        x: b,
        residual: fb,
        iters: config.max_iters,
    })
}

fn converged(x: f64, residual: f64, iters: usize) -> Solution {
    Solution {
        status: Status::Converged,
        x,
        residual,
        iters,
    }
}
