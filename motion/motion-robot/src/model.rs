//! Kinematic model collaborator.
//!
//! Forward kinematics and joint limits come from an external model library.
//! [`ModelEvaluator`] is the seam: implement it for your model wrapper to bind
//! it to a telemetry feed.

use std::cmp::Ordering;

use nalgebra::Isometry3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use motion_types::{InternalVector, JointLayout, MotionError, Result};

/// Per-scalar position limits in model order.
///
/// # Example
///
/// ```
/// use motion_robot::PositionLimits;
///
/// let limits = PositionLimits::new(vec![-1.0, 0.0], vec![1.0, 0.04])?;
/// assert!(limits.contains(&[0.5, 0.02]));
/// assert!(!limits.contains(&[0.5, 0.05]));
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionLimits {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl PositionLimits {
    /// Creates limits from lower and upper bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if the two vectors differ in
    /// length and [`MotionError::InvalidConfig`] if a lower bound exceeds its
    /// upper bound.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(MotionError::shape(lower.len(), upper.len()));
        }
        let ordered = |(lo, hi): (&f64, &f64)| {
            matches!(lo.partial_cmp(hi), Some(Ordering::Less | Ordering::Equal))
        };
        if let Some(index) = lower.iter().zip(&upper).position(|pair| !ordered(pair)) {
            return Err(MotionError::invalid_config(format!(
                "limit {index}: lower {} exceeds upper {}",
                lower[index], upper[index]
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Creates unbounded limits for `dim` scalars.
    #[must_use]
    pub fn unlimited(dim: usize) -> Self {
        Self {
            lower: vec![f64::NEG_INFINITY; dim],
            upper: vec![f64::INFINITY; dim],
        }
    }

    /// Returns the lower bounds.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Returns the upper bounds.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Returns the number of scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Returns `true` if no scalar is limited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Returns the bounds of scalar `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.lower.get(index)?, *self.upper.get(index)?))
    }

    /// Returns `true` if every value lies within its bounds.
    ///
    /// Returns `false` on a length mismatch.
    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.len()
            && values
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }
}

/// A kinematic model of the robot.
pub trait ModelEvaluator {
    /// Returns the joints in model order with their scalar counts.
    fn joint_layout(&self) -> &JointLayout;

    /// Returns the configuration-space position limits in model order.
    fn joint_limits(&self) -> &PositionLimits;

    /// Computes the world placement of a joint frame at configuration `q`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownJoint`] if the model has no joint named
    /// `joint`, or [`MotionError::ShapeMismatch`] if `q` has the wrong length.
    fn frame_pose(&self, q: &InternalVector, joint: &str) -> Result<Isometry3<f64>>;
}
