use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError, Finite, check_finite};

/// Marker type enforcing that a value is finite and strictly positive.
///
/// Used for tank diameters, target volumes and length-to-diameter ratios.
///
/// # Examples
///
/// ```
/// use twine_tanks::support::constraint::StrictlyPositive;
/// use uom::si::{f64::Length, length::meter};
///
/// let d = StrictlyPositive::new(Length::new::<meter>(1.2)).unwrap();
/// assert_eq!(d.into_inner().get::<meter>(), 1.2);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(f64::INFINITY).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is
    /// finite and greater than zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, infinite or `NaN`.
    pub fn new<T: PartialOrd + Zero + Finite>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero + Finite> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => check_finite(value),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Volume, volume::cubic_meter};

    #[test]
    fn floats() {
        assert!(Constrained::<f64, StrictlyPositive>::new(1.0).is_ok());
        assert!(StrictlyPositive::new(1e-12).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-5.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
        assert_eq!(
            StrictlyPositive::new(f64::INFINITY),
            Err(ConstraintError::Infinite)
        );
    }

    #[test]
    fn volumes() {
        let v = Volume::new::<cubic_meter>(500.0);
        assert!(StrictlyPositive::new(v).is_ok());

        let v = Volume::new::<cubic_meter>(0.0);
        assert!(StrictlyPositive::new(v).is_err());
    }
}
