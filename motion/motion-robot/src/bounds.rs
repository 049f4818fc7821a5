//! Joint bounds validation for measured configurations.
//!
//! Encoders report values marginally past a limit when a joint rests on it.
//! Those readings are clamped back into range. A reading further out than the
//! tolerance is rejected, since kinematics are undefined outside the limits.

use tracing::debug;

use motion_types::{
    DofSpace, InternalVector, JointLayout, MotionError, Result, DEFAULT_BOUNDS_TOLERANCE,
};

use crate::model::PositionLimits;

/// Clamps configurations to joint limits within a tolerance.
///
/// # Example
///
/// ```
/// use motion_robot::{BoundsValidator, PositionLimits};
/// use motion_types::{InternalVector, JointLayout};
///
/// let layout = JointLayout::revolute(&["lift"])?;
/// let validator = BoundsValidator::new(&layout, PositionLimits::new(vec![0.0], vec![1.0])?)?;
///
/// let q = validator.validate(&InternalVector::new(vec![1.0005]))?;
/// assert_eq!(q.as_slice(), &[1.0]);
///
/// assert!(validator.validate(&InternalVector::new(vec![1.1])).is_err());
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsValidator {
    limits: PositionLimits,
    owners: Vec<String>,
    tolerance: f64,
}

impl BoundsValidator {
    /// Creates a validator with the default tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if `limits` does not cover every
    /// configuration scalar of `layout`.
    pub fn new(layout: &JointLayout, limits: PositionLimits) -> Result<Self> {
        let dim = layout.config_dim();
        if limits.len() != dim {
            return Err(MotionError::shape(dim, limits.len()));
        }
        let owners = (0..dim)
            .map(|index| {
                layout
                    .owner_of(index, DofSpace::Configuration)
                    .map_or_else(String::new, |joint| joint.name().to_string())
            })
            .collect();
        Ok(Self {
            limits,
            owners,
            tolerance: DEFAULT_BOUNDS_TOLERANCE,
        })
    }

    /// Sets the largest correction applied silently.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns the tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the limits.
    #[must_use]
    pub const fn limits(&self) -> &PositionLimits {
        &self.limits
    }

    /// Clamps `q` into the limits.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if `q` has the wrong length and
    /// [`MotionError::OutOfBounds`] for the first scalar whose clamp moves it
    /// by more than the tolerance (or that is not a number).
    pub fn validate(&self, q: &InternalVector) -> Result<InternalVector> {
        if q.len() != self.limits.len() {
            return Err(MotionError::shape(self.limits.len(), q.len()));
        }

        let mut clamped = Vec::with_capacity(q.len());
        for (index, ((&value, &lower), &upper)) in q
            .iter()
            .zip(self.limits.lower())
            .zip(self.limits.upper())
            .enumerate()
        {
            let bounded = value.clamp(lower, upper);
            let correction = (bounded - value).abs();
            if correction.is_nan() || correction > self.tolerance {
                return Err(MotionError::OutOfBounds {
                    index,
                    joint: self.owners[index].clone(),
                    value,
                    lower,
                    upper,
                });
            }
            if correction > 0.0 {
                debug!(
                    index,
                    joint = %self.owners[index],
                    value,
                    bounded,
                    "Clamped joint reading into limits"
                );
            }
            clamped.push(bounded);
        }

        Ok(InternalVector::new(clamped))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use motion_types::{JointKind, JointSpec};

    fn validator() -> BoundsValidator {
        let layout = JointLayout::new(vec![
            JointSpec::revolute("shoulder"),
            JointSpec::from_kind("wrist", JointKind::Continuous),
        ])
        .unwrap();
        let limits = PositionLimits::new(vec![0.0, -1.0, -1.0], vec![1.0, 1.0, 1.0]).unwrap();
        BoundsValidator::new(&layout, limits).unwrap()
    }

    #[test]
    fn test_within_tolerance_is_clamped() {
        let q = validator()
            .validate(&InternalVector::new(vec![1.0005, 0.0, -1.0009]))
            .unwrap();
        assert_eq!(q.as_slice(), &[1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_inside_limits_untouched() {
        let raw = InternalVector::new(vec![0.3, 0.6, -0.8]);
        assert_eq!(validator().validate(&raw).unwrap(), raw);
    }

    #[test]
    fn test_way_out_names_owner() {
        let error = validator()
            .validate(&InternalVector::new(vec![0.5, 0.0, 1.1]))
            .unwrap_err();
        match error {
            MotionError::OutOfBounds {
                index, joint, upper, ..
            } => {
                assert_eq!(index, 2);
                assert_eq!(joint, "wrist");
                assert_eq!(upper, 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_is_rejected() {
        let error = validator()
            .validate(&InternalVector::new(vec![f64::NAN, 0.0, 0.0]))
            .unwrap_err();
        assert!(error.is_out_of_bounds());
    }

    #[test]
    fn test_custom_tolerance() {
        let v = validator().with_tolerance(0.2);
        assert_eq!(
            v.validate(&InternalVector::new(vec![1.1, 0.0, 0.0]))
                .unwrap()
                .as_slice(),
            &[1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_wrong_length() {
        let error = validator()
            .validate(&InternalVector::new(vec![0.0]))
            .unwrap_err();
        assert_eq!(error, MotionError::shape(3, 1));
    }
}
