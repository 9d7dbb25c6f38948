//! One-dimensional interpolation over tabulated data.
//!
//! Both interpolants require strictly increasing, finite abscissae and clamp
//! queries to the tabulated range.

use thiserror::Error;

/// Errors that can occur while building an interpolant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolateError {
    /// Not enough points for the interpolant.
    #[error("need at least {needed} points, got {found}")]
    TooFewPoints { needed: usize, found: usize },

    /// The abscissa and ordinate slices differ in length.
    #[error("length mismatch: {xs} abscissae, {ys} ordinates")]
    LengthMismatch { xs: usize, ys: usize },

    /// The abscissae are not strictly increasing at `index`.
    #[error("abscissae are not strictly increasing at index {index}")]
    NotIncreasing { index: usize },

    /// A point is not finite.
    #[error("point {index} is not finite")]
    NonFinite { index: usize },
}

/// Checks the preconditions shared by both interpolants.
fn validate(xs: &[f64], ys: &[f64], needed: usize) -> Result<(), InterpolateError> {
    if xs.len() != ys.len() {
        return Err(InterpolateError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < needed {
        return Err(InterpolateError::TooFewPoints {
            needed,
            found: xs.len(),
        });
    }
    if let Some(index) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| !(x.is_finite() && y.is_finite()))
    {
        return Err(InterpolateError::NonFinite { index });
    }
    if let Some(index) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(InterpolateError::NotIncreasing { index: index + 1 });
    }
    Ok(())
}

/// Index of the interval `[xs[i], xs[i + 1]]` that contains `x`.
fn interval(xs: &[f64], x: f64) -> usize {
    xs.partition_point(|&xi| xi <= x)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

/// Piecewise-linear interpolant.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Linear {
    /// Builds a linear interpolant through at least two points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are too few, mismatched, non-finite,
    /// or not strictly increasing in `x`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolateError> {
        validate(&xs, &ys, 2)?;
        Ok(Self { xs, ys })
    }

    /// Evaluates the interpolant at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(self.xs[0], self.xs[self.xs.len() - 1]);
        let i = interval(&self.xs, x);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + t * (self.ys[i + 1] - self.ys[i])
    }

    /// Returns the tabulated abscissae.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the tabulated ordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }
}

/// Cubic spline with not-a-knot end conditions.
///
/// The third derivative is continuous across the second and the
/// second-to-last knots, so the spline reproduces cubics exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second: Vec<f64>,
}

impl CubicSpline {
    /// Builds a not-a-knot spline through at least four points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are too few, mismatched, non-finite,
    /// or not strictly increasing in `x`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, InterpolateError> {
        validate(&xs, &ys, 4)?;

        let n = xs.len() - 1;
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = ys
            .windows(2)
            .zip(&h)
            .map(|(w, hi)| (w[1] - w[0]) / hi)
            .collect();

        // Tridiagonal system for the interior second derivatives M[1..n].
        let m = n - 1;
        let mut lower = vec![0.0; m];
        let mut diag = vec![0.0; m];
        let mut upper = vec![0.0; m];
        let mut rhs = vec![0.0; m];
        for j in 0..m {
            lower[j] = h[j];
            diag[j] = 2.0 * (h[j] + h[j + 1]);
            upper[j] = h[j + 1];
            rhs[j] = 6.0 * (slope[j + 1] - slope[j]);
        }

        // Eliminate M[0] and M[n] using the not-a-knot conditions.
        let (h0, h1) = (h[0], h[1]);
        diag[0] = 3.0 * h0 + 2.0 * h1 + h0 * h0 / h1;
        upper[0] = h1 - h0 * h0 / h1;
        lower[0] = 0.0;
        let (hn, hm) = (h[n - 1], h[n - 2]);
        diag[m - 1] = 3.0 * hn + 2.0 * hm + hn * hn / hm;
        lower[m - 1] = hm - hn * hn / hm;
        upper[m - 1] = 0.0;

        for j in 1..m {
            let w = lower[j] / diag[j - 1];
            diag[j] -= w * upper[j - 1];
            rhs[j] -= w * rhs[j - 1];
        }

        let mut second = vec![0.0; n + 1];
        second[m] = rhs[m - 1] / diag[m - 1];
        for j in (0..m - 1).rev() {
            second[j + 1] = (rhs[j] - upper[j] * second[j + 2]) / diag[j];
        }
        second[0] = second[1] - h0 * (second[2] - second[1]) / h1;
        second[n] = second[n - 1] + hn * (second[n - 1] - second[n - 2]) / hm;

        Ok(Self { xs, ys, second })
    }

    /// Evaluates the spline at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(self.xs[0], self.xs[self.xs.len() - 1]);
        let i = interval(&self.xs, x);

        let h = self.xs[i + 1] - self.xs[i];
        let a = self.xs[i + 1] - x;
        let b = x - self.xs[i];
        let (m0, m1) = (self.second[i], self.second[i + 1]);

        m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (self.ys[i] / h - m0 * h / 6.0) * a
            + (self.ys[i + 1] / h - m1 * h / 6.0) * b
    }

    /// Returns the tabulated abscissae.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the tabulated ordinates.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }
}
