//! Joint groups of dual-arm robots and joint subset lookup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use motion_types::{MotionError, Result};

/// Gripper, left-arm and right-arm joints of a robot.
///
/// Groups are derived from joint names: any joint whose lowercase name
/// contains `gripper` is a gripper joint; the others go to the left or right
/// arm when their name contains `left` or `right`.
///
/// # Example
///
/// ```
/// use motion_robot::JointGroups;
///
/// let groups = JointGroups::from_names(&[
///     "left_shoulder", "left_gripper_finger", "right_elbow", "torso",
/// ]);
/// assert_eq!(groups.gripper(), &["left_gripper_finger"]);
/// assert_eq!(groups.left_arm(), &["left_shoulder"]);
/// assert_eq!(groups.right_arm(), &["right_elbow"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointGroups {
    gripper: Vec<String>,
    left_arm: Vec<String>,
    right_arm: Vec<String>,
}

impl JointGroups {
    /// Partitions `names` by name pattern, keeping their order.
    #[must_use]
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut groups = Self::default();
        for name in names.iter().map(AsRef::as_ref) {
            let lower = name.to_lowercase();
            if lower.contains("gripper") {
                groups.gripper.push(name.to_string());
            } else if lower.contains("left") {
                groups.left_arm.push(name.to_string());
            } else if lower.contains("right") {
                groups.right_arm.push(name.to_string());
            }
        }
        groups
    }

    /// Returns the gripper joints.
    #[must_use]
    pub fn gripper(&self) -> &[String] {
        &self.gripper
    }

    /// Returns the left-arm joints.
    #[must_use]
    pub fn left_arm(&self) -> &[String] {
        &self.left_arm
    }

    /// Returns the right-arm joints.
    #[must_use]
    pub fn right_arm(&self) -> &[String] {
        &self.right_arm
    }
}

/// Finds the position of every name of `subset` in `set`.
///
/// Names of `subset` absent from `set` are skipped when `strict` is `false`.
///
/// # Errors
///
/// Returns [`MotionError::UnknownJoint`] for the first missing name when
/// `strict` is `true`.
///
/// # Example
///
/// ```
/// use motion_robot::subset_indexes;
///
/// let set = ["a", "b", "c"];
/// assert_eq!(subset_indexes(&["c", "a"], &set, true)?, vec![2, 0]);
/// assert_eq!(subset_indexes(&["c", "x"], &set, false)?, vec![2]);
/// assert!(subset_indexes(&["x"], &set, true).is_err());
/// # Ok::<(), motion_types::MotionError>(())
/// ```
pub fn subset_indexes<A, B>(subset: &[A], set: &[B], strict: bool) -> Result<Vec<usize>>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut indexes = Vec::with_capacity(subset.len());
    for name in subset.iter().map(AsRef::as_ref) {
        match set.iter().position(|candidate| candidate.as_ref() == name) {
            Some(index) => indexes.push(index),
            None if strict => return Err(MotionError::UnknownJoint(name.to_string())),
            None => {}
        }
    }
    Ok(indexes)
}
