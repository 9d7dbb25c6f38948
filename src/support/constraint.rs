//! Type-level numeric constraints for tank dimensions.
//!
//! Tank sizes and head parameters arrive as loose numbers (or [`uom`]
//! quantities) and are checked once, when a configuration is validated.
//! The validated plan holds them as [`Constrained`] values, so dimension
//! resolution never has to re-check that a diameter is positive or a body
//! length is not negative. Head constructors check their own arguments with
//! [`Constraint::check`].
//!
//! # Provided constraints
//!
//! - [`StrictlyPositive`]: greater than zero (diameters, target volumes, `L/D`)
//! - [`NonNegative`]: zero or greater (body lengths, head depths)
//!
//! Each marker is used with the generic [`Constrained<T, C>`] wrapper and
//! provides an associated `new()` constructor for convenience.

mod non_negative;
mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;

/// A numeric invariant checked at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is not finite")]
    Infinite,
}

/// A value that is known to satisfy the constraint `C`.
///
/// # Example
///
/// ```
/// use twine_tanks::support::constraint::{Constrained, StrictlyPositive};
///
/// let diameter = Constrained::<f64, StrictlyPositive>::new(1.2).unwrap();
/// assert_eq!(diameter.into_inner(), 1.2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Rejects infinities for types that can represent them.
///
/// Tank dimensions are always finite, so both constraints in this module
/// run this check after their sign check.
fn check_finite<T: Finite>(value: &T) -> Result<(), ConstraintError> {
    if value.is_finite_value() {
        Ok(())
    } else {
        Err(ConstraintError::Infinite)
    }
}

/// Values that can report whether they are finite.
pub trait Finite {
    /// Returns `true` unless the value is infinite or NaN.
    fn is_finite_value(&self) -> bool;
}

impl Finite for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl<D, U> Finite for uom::si::Quantity<D, U, f64>
where
    D: uom::si::Dimension + ?Sized,
    U: uom::si::Units<f64> + ?Sized,
{
    fn is_finite_value(&self) -> bool {
        self.value.is_finite()
    }
}
