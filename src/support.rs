//! Supporting utilities used by models.
//!
//! - [`constraint`]: type-level numeric invariants for dimensions
//! - [`heads`]: head shapes and their partial volumes and areas
//! - [`numeric`]: root finding, quadrature and approximation kernels

pub mod constraint;
pub mod heads;
pub mod numeric;
