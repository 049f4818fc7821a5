//! Index bijections between the external and internal scalar orderings.
//!
//! The transport feed and the kinematic model list the same joints in
//! different orders, and a joint may span several scalars. A bijection maps
//! every scalar position of one ordering to its position in the other.
//!
//! # Conventions
//!
//! - `forward[p]` is the internal index of the scalar at external position `p`.
//! - `inverse[i]` is the external position of internal scalar `i`.
//! - [`reorder`] gathers: `out[k] = values[table[k]]`. Going from external to
//!   internal order therefore gathers through `inverse`, and going from internal
//!   to external order gathers through `forward`.
//!
//! # Example
//!
//! ```
//! use motion_types::{JointLayout, JointSpec, LayoutBijection};
//!
//! let internal = JointLayout::new(vec![JointSpec::new("a", 1, 1), JointSpec::new("b", 2, 2)])?;
//! let external = JointLayout::new(vec![JointSpec::new("b", 2, 2), JointSpec::new("a", 1, 1)])?;
//!
//! let bijection = LayoutBijection::build(&internal, &external)?;
//! assert_eq!(bijection.configuration().forward(), &[1, 2, 0]);
//!
//! let external_q = bijection.configuration().to_external(&[10.0, 20.0, 30.0])?;
//! assert_eq!(external_q, vec![20.0, 30.0, 10.0]);
//! # Ok::<(), motion_types::MotionError>(())
//! ```

use std::collections::HashMap;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::layout::{DofSpace, JointLayout};
use crate::Result;

/// Reorders `values` through an index table: `out[k] = values[table[k]]`.
///
/// # Errors
///
/// Returns [`MotionError::ShapeMismatch`] if `values` and `table` differ in
/// length, which indicates a stale or mismatched table, and
/// [`MotionError::InvalidPermutation`] if the table points past the end.
///
/// # Example
///
/// ```
/// use motion_types::reorder;
///
/// let reordered = reorder(&[10.0, 20.0, 30.0], &[1, 2, 0])?;
/// assert_eq!(reordered, vec![20.0, 30.0, 10.0]);
/// # Ok::<(), motion_types::MotionError>(())
/// ```
pub fn reorder(values: &[f64], table: &[usize]) -> Result<Vec<f64>> {
    if values.len() != table.len() {
        return Err(MotionError::shape(table.len(), values.len()));
    }
    table
        .iter()
        .map(|&index| {
            values.get(index).copied().ok_or_else(|| {
                MotionError::InvalidPermutation(format!(
                    "index {index} out of range for {} scalars",
                    values.len()
                ))
            })
        })
        .collect()
}

/// A permutation of `0..len` together with its inverse.
///
/// Immutable once built; `inverse[forward[p]] == p` for every `p`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexBijection {
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl IndexBijection {
    /// Creates a bijection from its external-to-internal table.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidPermutation`] if `forward` is not a
    /// permutation of `0..forward.len()`.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::IndexBijection;
    ///
    /// let bijection = IndexBijection::from_forward(vec![2, 0, 1])?;
    /// assert_eq!(bijection.inverse(), &[1, 2, 0]);
    ///
    /// assert!(IndexBijection::from_forward(vec![0, 0]).is_err());
    /// # Ok::<(), motion_types::MotionError>(())
    /// ```
    pub fn from_forward(forward: Vec<usize>) -> Result<Self> {
        let len = forward.len();
        let mut inverse = vec![usize::MAX; len];
        for (position, &index) in forward.iter().enumerate() {
            if index >= len {
                return Err(MotionError::InvalidPermutation(format!(
                    "index {index} out of range for {len} scalars"
                )));
            }
            if inverse[index] != usize::MAX {
                return Err(MotionError::InvalidPermutation(format!(
                    "index {index} appears more than once"
                )));
            }
            inverse[index] = position;
        }
        Ok(Self { forward, inverse })
    }

    /// Creates the identity bijection on `0..len`.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        let forward: Vec<usize> = (0..len).collect();
        Self {
            inverse: forward.clone(),
            forward,
        }
    }

    /// Returns the number of scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if the bijection covers no scalars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Returns the external-to-internal table.
    #[must_use]
    pub fn forward(&self) -> &[usize] {
        &self.forward
    }

    /// Returns the internal-to-external table.
    #[must_use]
    pub fn inverse(&self) -> &[usize] {
        &self.inverse
    }

    /// Returns `true` if both orderings agree.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.forward.iter().enumerate().all(|(p, &i)| p == i)
    }

    /// Returns the bijection with its two directions swapped.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }

    /// Reorders a vector from external into internal order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn to_internal(&self, external: &[f64]) -> Result<Vec<f64>> {
        reorder(external, &self.inverse)
    }

    /// Reorders a vector from internal into external order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn to_external(&self, internal: &[f64]) -> Result<Vec<f64>> {
        reorder(internal, &self.forward)
    }
}

/// The configuration-space and velocity-space bijections of a robot binding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutBijection {
    configuration: IndexBijection,
    velocity: IndexBijection,
}

impl LayoutBijection {
    /// Builds both bijections from the internal and external layouts.
    ///
    /// The internal layout assigns every joint a contiguous block of scalar
    /// indices. Walking the external layout in its own order and concatenating
    /// the internal block of each joint yields the external-to-internal table;
    /// the internal-to-external table is its inverse. This is done separately
    /// for configuration and velocity scalars.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MissingJoint`] if a joint of one layout is absent
    /// from the other, and [`MotionError::ScalarCountMismatch`] if a joint's
    /// scalar counts disagree between the layouts.
    pub fn build(internal: &JointLayout, external: &JointLayout) -> Result<Self> {
        check_same_joints(internal, external)?;
        Ok(Self {
            configuration: build_space(internal, external, DofSpace::Configuration)?,
            velocity: build_space(internal, external, DofSpace::Velocity)?,
        })
    }

    /// Creates identity bijections for a layout that both sides share.
    #[must_use]
    pub fn identity(layout: &JointLayout) -> Self {
        Self {
            configuration: IndexBijection::identity(layout.config_dim()),
            velocity: IndexBijection::identity(layout.velocity_dim()),
        }
    }

    /// Returns the configuration-space bijection.
    #[must_use]
    pub const fn configuration(&self) -> &IndexBijection {
        &self.configuration
    }

    /// Returns the velocity-space bijection (also used for efforts).
    #[must_use]
    pub const fn velocity(&self) -> &IndexBijection {
        &self.velocity
    }

    /// Returns the bijection of `space`.
    #[must_use]
    pub const fn space(&self, space: DofSpace) -> &IndexBijection {
        match space {
            DofSpace::Configuration => &self.configuration,
            DofSpace::Velocity => &self.velocity,
        }
    }
}

fn check_same_joints(internal: &JointLayout, external: &JointLayout) -> Result<()> {
    for joint in external.joints() {
        let counterpart = internal
            .get(joint.name())
            .ok_or_else(|| MotionError::missing_joint(joint.name(), "internal"))?;
        for space in [DofSpace::Configuration, DofSpace::Velocity] {
            if counterpart.scalars(space) != joint.scalars(space) {
                return Err(MotionError::ScalarCountMismatch {
                    name: joint.name().to_string(),
                    space,
                    internal: counterpart.scalars(space),
                    external: joint.scalars(space),
                });
            }
        }
    }
    for name in internal.names() {
        if external.get(name).is_none() {
            return Err(MotionError::missing_joint(name, "external"));
        }
    }
    Ok(())
}

fn build_space(
    internal: &JointLayout,
    external: &JointLayout,
    space: DofSpace,
) -> Result<IndexBijection> {
    let internal_blocks: HashMap<&str, Range<usize>> = internal
        .names()
        .zip(internal.blocks(space))
        .collect();

    let mut forward = Vec::with_capacity(external.dim(space));
    for name in external.names() {
        let block = internal_blocks
            .get(name)
            .ok_or_else(|| MotionError::missing_joint(name, "internal"))?;
        forward.extend(block.clone());
    }

    IndexBijection::from_forward(forward)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::layout::{JointKind, JointSpec};

    fn layout(joints: &[(&str, usize, usize)]) -> JointLayout {
        JointLayout::new(
            joints
                .iter()
                .map(|&(name, nq, nv)| JointSpec::new(name, nq, nv))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_swapped_joints() {
        let internal = layout(&[("A", 1, 1), ("B", 2, 2)]);
        let external = layout(&[("B", 2, 2), ("A", 1, 1)]);
        let bijection = LayoutBijection::build(&internal, &external).unwrap();

        assert_eq!(bijection.configuration().forward(), &[1, 2, 0]);
        assert_eq!(bijection.configuration().inverse(), &[2, 0, 1]);

        let external_q = bijection
            .configuration()
            .to_external(&[10.0, 20.0, 30.0])
            .unwrap();
        assert_eq!(external_q, vec![20.0, 30.0, 10.0]);

        let internal_q = bijection.configuration().to_internal(&external_q).unwrap();
        assert_eq!(internal_q, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_spaces_differ_per_joint() {
        let internal = JointLayout::new(vec![
            JointSpec::revolute("base"),
            JointSpec::from_kind("ball", JointKind::Spherical),
            JointSpec::revolute("tip"),
        ])
        .unwrap();
        let external = internal.reordered(&["tip", "ball", "base"]).unwrap();
        let bijection = LayoutBijection::build(&internal, &external).unwrap();

        assert_eq!(bijection.configuration().forward(), &[5, 1, 2, 3, 4, 0]);
        assert_eq!(bijection.velocity().forward(), &[4, 1, 2, 3, 0]);
        assert_eq!(bijection.space(DofSpace::Velocity).len(), 5);
    }

    #[test]
    fn test_identity_layout() {
        let internal = layout(&[("A", 1, 1), ("B", 4, 3)]);
        let bijection = LayoutBijection::build(&internal, &internal.clone()).unwrap();
        assert!(bijection.configuration().is_identity());
        assert!(bijection.velocity().is_identity());
        assert_eq!(bijection, LayoutBijection::identity(&internal));

        let q = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(bijection.configuration().to_internal(&q).unwrap(), q.to_vec());
    }

    #[test]
    fn test_missing_joint_in_external() {
        let internal = layout(&[("A", 1, 1), ("B", 1, 1)]);
        let external = layout(&[("A", 1, 1)]);
        let error = LayoutBijection::build(&internal, &external).unwrap_err();
        assert_eq!(error, MotionError::missing_joint("B", "external"));
    }

    #[test]
    fn test_missing_joint_in_internal() {
        let internal = layout(&[("A", 1, 1)]);
        let external = layout(&[("A", 1, 1), ("C", 1, 1)]);
        let error = LayoutBijection::build(&internal, &external).unwrap_err();
        assert_eq!(error, MotionError::missing_joint("C", "internal"));
    }

    #[test]
    fn test_scalar_count_mismatch() {
        let internal = layout(&[("A", 1, 1), ("B", 4, 3)]);
        let external = layout(&[("B", 4, 4), ("A", 1, 1)]);
        let error = LayoutBijection::build(&internal, &external).unwrap_err();
        assert!(matches!(
            error,
            MotionError::ScalarCountMismatch {
                space: DofSpace::Velocity,
                internal: 3,
                external: 4,
                ..
            }
        ));
        assert!(error.is_configuration_mismatch());
    }

    #[test]
    fn test_reorder_length_mismatch() {
        let error = reorder(&[1.0, 2.0], &[0, 1, 2]).unwrap_err();
        assert_eq!(error, MotionError::shape(3, 2));
    }

    #[test]
    fn test_from_forward_rejects_out_of_range() {
        assert!(matches!(
            IndexBijection::from_forward(vec![0, 3, 1]),
            Err(MotionError::InvalidPermutation(_))
        ));
    }

    #[test]
    fn test_inverted_swaps_directions() {
        let bijection = IndexBijection::from_forward(vec![1, 2, 0]).unwrap();
        let inverted = bijection.inverted();
        assert_eq!(inverted.forward(), bijection.inverse());
        assert_eq!(inverted.inverse(), bijection.forward());
    }

    #[test]
    fn test_empty_layouts() {
        let empty = layout(&[]);
        let bijection = LayoutBijection::build(&empty, &empty).unwrap();
        assert!(bijection.configuration().is_empty());
        assert!(bijection.velocity().to_internal(&[]).unwrap().is_empty());
    }
}
