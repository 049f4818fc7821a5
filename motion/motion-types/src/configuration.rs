//! Planning configurations: robot scalars plus the virtual target pose.
//!
//! Planners work on the robot configuration extended with the pose of the
//! manipulated target. [`PlanningConfiguration`] keeps the two halves as named
//! fields and converts to and from the flat vector a planner exchanges.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::ordering::InternalVector;
use crate::pose::TargetPose;
use crate::Result;

/// A full-system configuration in model order.
///
/// # Example
///
/// ```
/// use motion_types::{InternalVector, PlanningConfiguration, TargetPose};
/// use nalgebra::Point3;
///
/// let q = PlanningConfiguration::new(
///     InternalVector::new(vec![0.1, 0.2]),
///     TargetPose::from_position(Point3::new(1.0, 1.0, 1.0)),
/// );
///
/// let flat = q.to_flat();
/// assert_eq!(flat.len(), 2 + 7);
/// assert_eq!(PlanningConfiguration::from_flat(&flat, 2)?, q);
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanningConfiguration {
    robot: InternalVector,
    target: TargetPose,
}

impl PlanningConfiguration {
    /// Creates a configuration from its two halves.
    #[must_use]
    pub const fn new(robot: InternalVector, target: TargetPose) -> Self {
        Self { robot, target }
    }

    /// Splits a flat planner vector into robot scalars and target pose.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] unless `values` holds exactly
    /// `robot_dim + 7` scalars.
    pub fn from_flat(values: &[f64], robot_dim: usize) -> Result<Self> {
        let expected = robot_dim + TargetPose::SCALARS;
        if values.len() != expected {
            return Err(MotionError::shape(expected, values.len()));
        }
        let (robot, target) = values.split_at(robot_dim);
        Ok(Self::new(
            InternalVector::new(robot.to_vec()),
            TargetPose::from_scalars(target)?,
        ))
    }

    /// Returns the flat planner vector: robot scalars then target scalars.
    #[must_use]
    pub fn to_flat(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.len());
        flat.extend_from_slice(self.robot.as_slice());
        flat.extend_from_slice(&self.target.to_scalars());
        flat
    }

    /// Returns the robot half.
    #[must_use]
    pub const fn robot(&self) -> &InternalVector {
        &self.robot
    }

    /// Returns the target half.
    #[must_use]
    pub const fn target(&self) -> &TargetPose {
        &self.target
    }

    /// Returns the number of robot scalars.
    #[must_use]
    pub fn robot_dim(&self) -> usize {
        self.robot.len()
    }

    /// Returns the total number of scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.robot.len() + TargetPose::SCALARS
    }

    /// Always `false`: the target half is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns a copy with the target replaced.
    #[must_use]
    pub fn with_target(&self, target: TargetPose) -> Self {
        Self::new(self.robot.clone(), target)
    }

    /// Splits into robot scalars and target pose.
    #[must_use]
    pub fn into_parts(self) -> (InternalVector, TargetPose) {
        (self.robot, self.target)
    }
}
