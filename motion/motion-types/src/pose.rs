//! Target poses carried alongside the robot configuration during planning.
//!
//! Manipulation problems append a virtual free-floating target to the robot
//! configuration: three position scalars followed by a quaternion
//! `(qx, qy, qz, qw)`. [`TargetPose`] is that 7-scalar record.

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::Result;

/// Pose of a planning target: position plus orientation quaternion.
///
/// The quaternion is stored exactly as given (not renormalized) so that
/// scalars read back from a planner compare against the reference values
/// without rounding drift. Use [`TargetPose::rotation`] for a normalized
/// rotation.
///
/// # Example
///
/// ```
/// use motion_types::TargetPose;
/// use nalgebra::Point3;
///
/// let pose = TargetPose::from_position(Point3::new(0.4, 0.0, 0.2));
/// assert_eq!(pose.to_scalars(), [0.4, 0.0, 0.2, 0.0, 0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetPose {
    /// Position in world coordinates.
    pub position: Point3<f64>,
    /// Orientation quaternion.
    pub orientation: Quaternion<f64>,
}

impl TargetPose {
    /// Number of scalars in the flat representation.
    pub const SCALARS: usize = 7;

    /// Creates a pose from a position and an orientation quaternion.
    #[must_use]
    pub const fn new(position: Point3<f64>, orientation: Quaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a pose at `position` with identity orientation.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self::new(position, Quaternion::identity())
    }

    /// Creates a pose from a position and roll-pitch-yaw angles (radians).
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::TargetPose;
    /// use nalgebra::Point3;
    /// use std::f64::consts::PI;
    ///
    /// let pose = TargetPose::from_rpy(Point3::origin(), PI, 0.0, 0.0);
    /// let s = pose.to_scalars();
    /// assert!((s[3].abs() - 1.0).abs() < 1e-12);
    /// assert!(s[6].abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_rpy(position: Point3<f64>, roll: f64, pitch: f64, yaw: f64) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(roll, pitch, yaw);
        Self::new(position, rotation.into_inner())
    }

    /// Creates a pose from a position and an orientation given either as a
    /// quaternion `(qx, qy, qz, qw)` or as roll-pitch-yaw angles.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidPose`] if `orientation` has neither 3 nor
    /// 4 scalars.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::TargetPose;
    ///
    /// let from_quat = TargetPose::from_slices([0.1, 0.2, 0.3], &[0.0, 0.0, 0.0, 1.0])?;
    /// let from_rpy = TargetPose::from_slices([0.1, 0.2, 0.3], &[0.0, 0.0, 0.0])?;
    /// assert_eq!(from_quat, from_rpy);
    /// # Ok::<(), motion_types::MotionError>(())
    /// ```
    pub fn from_slices(position: [f64; 3], orientation: &[f64]) -> Result<Self> {
        let position = Point3::from(position);
        match *orientation {
            [roll, pitch, yaw] => Ok(Self::from_rpy(position, roll, pitch, yaw)),
            [x, y, z, w] => Ok(Self::new(position, Quaternion::new(w, x, y, z))),
            _ => Err(MotionError::invalid_pose(format!(
                "orientation needs 3 (roll, pitch, yaw) or 4 (quaternion) scalars, got {}",
                orientation.len()
            ))),
        }
    }

    /// Creates a pose from its 7 flat scalars.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if `scalars` does not hold
    /// exactly 7 values.
    pub fn from_scalars(scalars: &[f64]) -> Result<Self> {
        match *scalars {
            [px, py, pz, qx, qy, qz, qw] => Ok(Self::new(
                Point3::new(px, py, pz),
                Quaternion::from(Vector4::new(qx, qy, qz, qw)),
            )),
            _ => Err(MotionError::shape(Self::SCALARS, scalars.len())),
        }
    }

    /// Returns the flat scalars `(x, y, z, qx, qy, qz, qw)`.
    #[must_use]
    pub fn to_scalars(&self) -> [f64; 7] {
        let q = &self.orientation.coords;
        [
            self.position.x,
            self.position.y,
            self.position.z,
            q.x,
            q.y,
            q.z,
            q.w,
        ]
    }

    /// Returns the normalized rotation.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_quaternion(self.orientation)
    }
}

impl Default for TargetPose {
    fn default() -> Self {
        Self::from_position(Point3::origin())
    }
}
