//! Numerical building blocks for tank geometry.
//!
//! These are small, dependency-free kernels tuned for smooth scalar
//! functions on a closed interval:
//!
//! - [`brent`]: bracketed root finding with superlinear convergence
//! - [`quadrature`]: adaptive Gauss–Kronrod integration
//! - [`chebyshev`]: Chebyshev series fitting and evaluation
//! - [`interpolate`]: piecewise-linear and not-a-knot cubic spline tables

pub mod brent;
pub mod chebyshev;
pub mod interpolate;
pub mod quadrature;
