//! Path representations for planning.
//!
//! # Path Types
//!
//! - [`RawPath`]: an ordered sequence of waypoints read back from a solved path
//! - [`PathHandle`]: opaque identifier of a path owned by the planner
//! - [`PlannedPath`]: the user-facing result of a planning call
//! - [`GoalCandidate`]: a pre-grasp/grasp pair accepted by the goal sampler
//!
//! # Example
//!
//! ```
//! use motion_types::{InternalVector, PlanningConfiguration, RawPath, TargetPose};
//!
//! let waypoint = |x: f64| {
//!     PlanningConfiguration::new(InternalVector::new(vec![x]), TargetPose::default())
//! };
//! let path = RawPath::new(vec![waypoint(0.0), waypoint(0.5), waypoint(1.0)]);
//!
//! let tail = path.slice(1..=2).expect("in range");
//! assert_eq!(tail.len(), 2);
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use crate::configuration::PlanningConfiguration;
use crate::Result;

/// Opaque identifier of a path stored by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathHandle(pub u64);

impl PathHandle {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PathHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

/// Ordered waypoints of a solved path.
///
/// Every waypoint is a full planning configuration, robot scalars plus target
/// pose, in model order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPath {
    waypoints: Vec<PlanningConfiguration>,
}

impl RawPath {
    /// Creates a path from waypoints.
    #[must_use]
    pub const fn new(waypoints: Vec<PlanningConfiguration>) -> Self {
        Self { waypoints }
    }

    /// Creates a path from flat planner vectors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MotionError::ShapeMismatch`] if any row does not hold
    /// `robot_dim + 7` scalars.
    pub fn from_flat<V: AsRef<[f64]>>(rows: &[V], robot_dim: usize) -> Result<Self> {
        rows.iter()
            .map(|row| PlanningConfiguration::from_flat(row.as_ref(), robot_dim))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Returns the number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Returns the waypoints.
    #[must_use]
    pub fn waypoints(&self) -> &[PlanningConfiguration] {
        &self.waypoints
    }

    /// Returns the first waypoint.
    #[must_use]
    pub fn first(&self) -> Option<&PlanningConfiguration> {
        self.waypoints.first()
    }

    /// Returns the last waypoint.
    #[must_use]
    pub fn last(&self) -> Option<&PlanningConfiguration> {
        self.waypoints.last()
    }

    /// Returns the waypoint at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlanningConfiguration> {
        self.waypoints.get(index)
    }

    /// Returns an iterator over the waypoints.
    pub fn iter(&self) -> impl Iterator<Item = &PlanningConfiguration> {
        self.waypoints.iter()
    }

    /// Returns consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&PlanningConfiguration, &PlanningConfiguration)> {
        self.waypoints.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Copies the waypoints in `range` into a new path.
    ///
    /// Returns `None` if the range is empty or reaches past the last waypoint.
    #[must_use]
    pub fn slice(&self, range: RangeInclusive<usize>) -> Option<Self> {
        if range.is_empty() {
            return None;
        }
        self.waypoints.get(range).map(|w| Self::new(w.to_vec()))
    }

    /// Unwraps the waypoints.
    #[must_use]
    pub fn into_waypoints(self) -> Vec<PlanningConfiguration> {
        self.waypoints
    }
}

impl FromIterator<PlanningConfiguration> for RawPath {
    fn from_iter<I: IntoIterator<Item = PlanningConfiguration>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RawPath {
    type Item = &'a PlanningConfiguration;
    type IntoIter = std::slice::Iter<'a, PlanningConfiguration>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

/// Result of a planning call.
///
/// The trajectory itself stays with the planner; this record names it and
/// remembers the joint ordering it is expressed in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedPath {
    handle: PathHandle,
    joint_names: Vec<String>,
    target_frames: Vec<String>,
}

impl PlannedPath {
    /// Creates a planned path with no target frames.
    #[must_use]
    pub const fn new(handle: PathHandle, joint_names: Vec<String>) -> Self {
        Self {
            handle,
            joint_names,
            target_frames: Vec::new(),
        }
    }

    /// Adds a target frame the path was planned for.
    #[must_use]
    pub fn with_target_frame(mut self, frame: impl Into<String>) -> Self {
        self.target_frames.push(frame.into());
        self
    }

    /// Returns the planner handle.
    #[must_use]
    pub const fn handle(&self) -> PathHandle {
        self.handle
    }

    /// Returns the joint names in path order.
    #[must_use]
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    /// Returns the target frames.
    #[must_use]
    pub fn target_frames(&self) -> &[String] {
        &self.target_frames
    }
}

/// A pre-grasp configuration and the grasp configuration reached from it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalCandidate {
    /// Configuration just before the grasp.
    pub pre_grasp: PlanningConfiguration,
    /// Configuration at the grasp.
    pub grasp: PlanningConfiguration,
}

impl GoalCandidate {
    /// Creates a candidate.
    #[must_use]
    pub const fn new(pre_grasp: PlanningConfiguration, grasp: PlanningConfiguration) -> Self {
        Self { pre_grasp, grasp }
    }
}
