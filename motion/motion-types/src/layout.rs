//! Joint layouts: ordered joints with per-joint scalar counts.
//!
//! A robot has two layouts. The internal one follows the kinematic model, the
//! external one follows the transport feed. Both contain the same joints; only
//! their order may differ. Each joint contributes a contiguous block of
//! configuration scalars and a (possibly smaller) block of velocity scalars.

use std::collections::HashSet;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::Result;

/// The scalar space an index refers to.
///
/// Configuration and velocity spaces differ in size whenever a joint is
/// parametrized redundantly (a spherical joint stores a quaternion, 4
/// scalars, but moves with an angular velocity, 3 scalars). Efforts live in
/// the velocity space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DofSpace {
    /// Joint positions.
    Configuration,
    /// Joint velocities (and efforts).
    Velocity,
}

impl std::fmt::Display for DofSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Velocity => write!(f, "velocity"),
        }
    }
}

/// Kind of a model joint, determining its scalar counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Rotation around a single bounded axis.
    Revolute,
    /// Translation along a single axis.
    Prismatic,
    /// Unbounded rotation, stored as (cos, sin).
    Continuous,
    /// Ball joint, stored as a unit quaternion.
    Spherical,
    /// Planar motion, stored as (x, y, cos, sin).
    Planar,
    /// Floating base, stored as position plus unit quaternion.
    FreeFlyer,
}

impl JointKind {
    /// Number of configuration scalars this joint contributes.
    #[must_use]
    pub const fn config_scalars(self) -> usize {
        match self {
            Self::Revolute | Self::Prismatic => 1,
            Self::Continuous => 2,
            Self::Spherical | Self::Planar => 4,
            Self::FreeFlyer => 7,
        }
    }

    /// Number of velocity scalars this joint contributes.
    #[must_use]
    pub const fn velocity_scalars(self) -> usize {
        match self {
            Self::Revolute | Self::Prismatic | Self::Continuous => 1,
            Self::Spherical | Self::Planar => 3,
            Self::FreeFlyer => 6,
        }
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revolute => write!(f, "revolute"),
            Self::Prismatic => write!(f, "prismatic"),
            Self::Continuous => write!(f, "continuous"),
            Self::Spherical => write!(f, "spherical"),
            Self::Planar => write!(f, "planar"),
            Self::FreeFlyer => write!(f, "free-flyer"),
        }
    }
}

/// One joint of a layout.
///
/// # Example
///
/// ```
/// use motion_types::{DofSpace, JointKind, JointSpec};
///
/// let joint = JointSpec::from_kind("wrist", JointKind::Spherical);
/// assert_eq!(joint.scalars(DofSpace::Configuration), 4);
/// assert_eq!(joint.scalars(DofSpace::Velocity), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointSpec {
    name: String,
    config_scalars: usize,
    velocity_scalars: usize,
}

impl JointSpec {
    /// Creates a joint with explicit scalar counts.
    #[must_use]
    pub fn new(name: impl Into<String>, config_scalars: usize, velocity_scalars: usize) -> Self {
        Self {
            name: name.into(),
            config_scalars,
            velocity_scalars,
        }
    }

    /// Creates a joint whose scalar counts follow from its kind.
    #[must_use]
    pub fn from_kind(name: impl Into<String>, kind: JointKind) -> Self {
        Self::new(name, kind.config_scalars(), kind.velocity_scalars())
    }

    /// Creates a single-scalar revolute joint.
    #[must_use]
    pub fn revolute(name: impl Into<String>) -> Self {
        Self::from_kind(name, JointKind::Revolute)
    }

    /// Returns the joint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of scalars the joint contributes to `space`.
    #[must_use]
    pub const fn scalars(&self, space: DofSpace) -> usize {
        match space {
            DofSpace::Configuration => self.config_scalars,
            DofSpace::Velocity => self.velocity_scalars,
        }
    }
}

/// An ordered list of joints.
///
/// Joint names are unique within a layout.
///
/// # Example
///
/// ```
/// use motion_types::{DofSpace, JointLayout, JointSpec};
///
/// let layout = JointLayout::new(vec![
///     JointSpec::revolute("shoulder"),
///     JointSpec::new("wrist", 4, 3),
/// ])?;
///
/// assert_eq!(layout.config_dim(), 5);
/// assert_eq!(layout.velocity_dim(), 4);
/// assert_eq!(layout.block(1, DofSpace::Configuration), Some(1..5));
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLayout {
    joints: Vec<JointSpec>,
}

impl JointLayout {
    /// Creates a layout from joints in order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::DuplicateJoint`] if a name appears twice.
    pub fn new(joints: Vec<JointSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for joint in &joints {
            if !seen.insert(joint.name.as_str()) {
                return Err(MotionError::DuplicateJoint(joint.name.clone()));
            }
        }
        Ok(Self { joints })
    }

    /// Creates a layout of single-scalar joints, one per name.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::DuplicateJoint`] if a name appears twice.
    pub fn revolute<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::new(
            names
                .iter()
                .map(|name| JointSpec::revolute(name.as_ref()))
                .collect(),
        )
    }

    /// Returns the number of joints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Returns `true` if the layout has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Returns the joints in order.
    #[must_use]
    pub fn joints(&self) -> &[JointSpec] {
        &self.joints
    }

    /// Returns the joint names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(JointSpec::name)
    }

    /// Returns the position of the named joint.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// Returns the named joint.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&JointSpec> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Returns the total scalar count of `space`.
    #[must_use]
    pub fn dim(&self, space: DofSpace) -> usize {
        self.joints.iter().map(|j| j.scalars(space)).sum()
    }

    /// Returns the total number of configuration scalars.
    #[must_use]
    pub fn config_dim(&self) -> usize {
        self.dim(DofSpace::Configuration)
    }

    /// Returns the total number of velocity scalars.
    #[must_use]
    pub fn velocity_dim(&self) -> usize {
        self.dim(DofSpace::Velocity)
    }

    /// Returns the scalar block of the joint at `index` in `space`.
    #[must_use]
    pub fn block(&self, index: usize, space: DofSpace) -> Option<Range<usize>> {
        let joint = self.joints.get(index)?;
        let start: usize = self.joints[..index].iter().map(|j| j.scalars(space)).sum();
        Some(start..start + joint.scalars(space))
    }

    /// Returns the scalar blocks of every joint in `space`, in layout order.
    #[must_use]
    pub fn blocks(&self, space: DofSpace) -> Vec<Range<usize>> {
        let mut start = 0;
        self.joints
            .iter()
            .map(|joint| {
                let block = start..start + joint.scalars(space);
                start = block.end;
                block
            })
            .collect()
    }

    /// Returns the joint owning scalar `index` of `space`.
    #[must_use]
    pub fn owner_of(&self, index: usize, space: DofSpace) -> Option<&JointSpec> {
        self.blocks(space)
            .into_iter()
            .position(|block| block.contains(&index))
            .map(|position| &self.joints[position])
    }

    /// Derives a layout listing these joints in the given name order.
    ///
    /// Transport feeds report only joint names; the scalar counts are taken
    /// from this layout.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownJoint`] if a name is not part of this
    /// layout, or [`MotionError::DuplicateJoint`] if a name is repeated.
    pub fn reordered<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let joints = names
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .cloned()
                    .ok_or_else(|| MotionError::UnknownJoint(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(joints)
    }
}
