use twine_solvers::equation::bisection;

/// Solver configuration for resolving a missing tank dimension.
///
/// The search bracket is scaled by a nominal size, `∛V` or the length of a
/// bare cylinder holding `V`, whichever is larger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Lower bracket end for a diameter, as a multiple of the nominal size.
    pub lower_factor: f64,

    /// Upper bracket end, as a multiple of the nominal size.
    pub upper_factor: f64,

    /// Relative tolerance on the solved dimension.
    pub x_rel_tol: f64,

    /// Tolerance on the relative volume residual `(V_total - V) / V`.
    pub residual_tol: f64,

    /// Largest relative residual accepted once the bracket has closed.
    ///
    /// A bracket that closes on the edge of the valid sizes leaves a large
    /// residual; the volume is then reported as unreachable.
    pub volume_rel_tol: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            lower_factor: 1e-6,
            upper_factor: 1e5,
            x_rel_tol: 4.0 * f64::EPSILON,
            residual_tol: 1e-14,
            volume_rel_tol: 1e-9,
        }
    }
}

impl SizingConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self, nominal: f64) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: 1e-15 * nominal,
            x_rel_tol: self.x_rel_tol,
            residual_tol: self.residual_tol,
        }
    }
}
