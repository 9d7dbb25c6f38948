//! Chebyshev series approximation on a closed interval.
//!
//! A function is sampled at the Chebyshev–Lobatto points
//! `x_j = cos(πj/n)`, `j = 0..=n`, mapped onto `[lo, hi]`. Because the end
//! points are among the samples, the fitted series reproduces `f(lo)` and
//! `f(hi)` to rounding. Evaluation uses the Clenshaw recurrence.

use std::f64::consts::PI;

use thiserror::Error;

/// A truncated Chebyshev series `Σ c_k T_k(t)` over `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevSeries {
    coefficients: Vec<f64>,
    lo: f64,
    hi: f64,
}

/// Errors that can occur while fitting a series.
#[derive(Debug, Error)]
pub enum FitError<E> {
    /// The series degree must be at least one.
    #[error("chebyshev degree must be at least 1")]
    Degree,

    /// The domain must be finite with `lo < hi`.
    #[error("invalid chebyshev domain [{lo}, {hi}]")]
    Domain { lo: f64, hi: f64 },

    /// The sampled function returned a non-finite value.
    #[error("sampled value is not finite at x={x}")]
    NonFinite { x: f64 },

    /// The sampled function failed.
    #[error("sampled function failed")]
    Function(#[source] E),
}

impl ChebyshevSeries {
    /// Fits a series of the given degree to `f` over `domain`.
    ///
    /// `f` is evaluated `degree + 1` times.
    ///
    /// # Errors
    ///
    /// Returns an error if the degree or domain is invalid, or if `f` fails
    /// or returns a non-finite value at any sample.
    pub fn fit<F, E>(mut f: F, domain: [f64; 2], degree: usize) -> Result<Self, FitError<E>>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let [lo, hi] = domain;
        if degree == 0 {
            return Err(FitError::Degree);
        }
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(FitError::Domain { lo, hi });
        }

        let n = degree;
        let samples = (0..=n)
            .map(|j| {
                let t = (PI * j as f64 / n as f64).cos();
                let x = if j == 0 {
                    hi
                } else if j == n {
                    lo
                } else {
                    0.5 * (lo + hi) + 0.5 * (hi - lo) * t
                };
                let y = f(x).map_err(FitError::Function)?;
                if y.is_finite() {
                    Ok(y)
                } else {
                    Err(FitError::NonFinite { x })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Reduce `j * k` modulo the period of cos(πm/n) to keep the angle small.
        let period = 2 * n;
        let mut coefficients: Vec<f64> = (0..=n)
            .map(|k| {
                let sum: f64 = samples
                    .iter()
                    .enumerate()
                    .map(|(j, &y)| {
                        let weight = if j == 0 || j == n { 0.5 } else { 1.0 };
                        let m = (j * k) % period;
                        weight * y * (PI * m as f64 / n as f64).cos()
                    })
                    .sum();
                2.0 * sum / n as f64
            })
            .collect();
        coefficients[0] *= 0.5;
        coefficients[n] *= 0.5;

        Ok(Self {
            coefficients,
            lo,
            hi,
        })
    }

    /// Evaluates the series at `x`, clamped to the fitted domain.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(self.lo, self.hi);
        let t = (2.0 * x - self.lo - self.hi) / (self.hi - self.lo);

        let (mut b1, mut b2) = (0.0, 0.0);
        for &c in self.coefficients[1..].iter().rev() {
            let b0 = c + 2.0 * t * b1 - b2;
            b2 = b1;
            b1 = b0;
        }
        self.coefficients[0] + t * b1 - b2
    }

    /// Returns the series degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Returns the fitted domain as `[lo, hi]`.
    #[must_use]
    pub fn domain(&self) -> [f64; 2] {
        [self.lo, self.hi]
    }

    /// Returns the series coefficients, lowest order first.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}
