//! Joint-state telemetry.
//!
//! The transport feed publishes joint samples in its own joint order. Only the
//! latest sample matters; there is no history.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One joint-state message in transport order.
///
/// Feeds commonly omit velocities or efforts; an empty vector means "not
/// reported".
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointSample {
    /// Joint names in transport order.
    pub names: Vec<String>,
    /// Position scalars in transport order.
    pub positions: Vec<f64>,
    /// Velocity scalars in transport order, or empty.
    pub velocities: Vec<f64>,
    /// Effort scalars in transport order, or empty.
    pub efforts: Vec<f64>,
}

impl JointSample {
    /// Creates a sample carrying positions only.
    #[must_use]
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, positions: Vec<f64>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            positions,
            velocities: Vec::new(),
            efforts: Vec::new(),
        }
    }

    /// Sets the velocities.
    #[must_use]
    pub fn with_velocities(mut self, velocities: Vec<f64>) -> Self {
        self.velocities = velocities;
        self
    }

    /// Sets the efforts.
    #[must_use]
    pub fn with_efforts(mut self, efforts: Vec<f64>) -> Self {
        self.efforts = efforts;
        self
    }
}

/// A source of joint-state samples.
///
/// Implement this for your transport subscriber. Reads are non-blocking and
/// last-value-wins.
pub trait JointStateSource {
    /// Returns the most recent sample, or `None` before the first one arrives.
    fn latest_joint_sample(&self) -> Option<JointSample>;
}

/// In-memory source holding the last published sample.
///
/// # Example
///
/// ```
/// use motion_robot::{JointSample, JointStateSource, LatchedJointState};
///
/// let mut feed = LatchedJointState::new();
/// assert!(feed.latest_joint_sample().is_none());
///
/// feed.publish(JointSample::new(["a"], vec![0.1]));
/// feed.publish(JointSample::new(["a"], vec![0.2]));
/// assert_eq!(feed.latest_joint_sample().map(|s| s.positions), Some(vec![0.2]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LatchedJointState {
    latest: Option<JointSample>,
}

impl LatchedJointState {
    /// Creates an empty source.
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: None }
    }

    /// Creates a source that already holds `sample`.
    #[must_use]
    pub const fn with_sample(sample: JointSample) -> Self {
        Self {
            latest: Some(sample),
        }
    }

    /// Replaces the held sample.
    pub fn publish(&mut self, sample: JointSample) {
        self.latest = Some(sample);
    }

    /// Drops the held sample.
    pub fn clear(&mut self) {
        self.latest = None;
    }
}

impl JointStateSource for LatchedJointState {
    fn latest_joint_sample(&self) -> Option<JointSample> {
        self.latest.clone()
    }
}

impl<T: JointStateSource + ?Sized> JointStateSource for &T {
    fn latest_joint_sample(&self) -> Option<JointSample> {
        (**self).latest_joint_sample()
    }
}
