//! Planner collaborators.
//!
//! The constraint-graph planner, its configuration shooter and the time
//! parametrization service live outside this crate. The traits here are the
//! seams: implement them for your planner client.
//!
//! The planner keeps a single active problem. [`PlannerSession::begin_session`]
//! resets it explicitly before every independent planning call.

use std::fmt;
use std::time::Duration;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use motion_robot::PositionLimits;
use motion_types::{
    InternalVector, MotionError, PathHandle, PlannerConfig, PlanningConfiguration, RawPath,
    Result, TargetBounds, TargetPose, TimeScaling,
};
use nalgebra::{Point3, Quaternion, UnitQuaternion};

/// Outcome of a planner request that may legitimately find nothing.
///
/// A failed projection, a colliding connection or an exhausted solve are
/// ordinary outcomes, not errors.
///
/// # Example
///
/// ```
/// use motion_plan::PlanOutcome;
///
/// let outcome: PlanOutcome<u32> = PlanOutcome::failure("timeout");
/// assert!(!outcome.is_success());
/// assert!(outcome.into_result().unwrap_err().is_no_solution());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlanOutcome<T> {
    /// The request succeeded.
    Success(T),
    /// The request found nothing.
    Failure {
        /// Reason reported by the planner.
        reason: String,
    },
}

impl<T> PlanOutcome<T> {
    /// Creates a failure outcome.
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns `true` on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the payload, discarding the failure reason.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Maps the payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PlanOutcome<U> {
        match self {
            Self::Success(value) => PlanOutcome::Success(f(value)),
            Self::Failure { reason } => PlanOutcome::Failure { reason },
        }
    }

    /// Converts into a `Result`, mapping failure to
    /// [`MotionError::NoSolutionFound`].
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::NoSolutionFound`] on failure.
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure { reason } => Err(MotionError::no_solution(reason)),
        }
    }
}

/// Symbolic states of the manipulation constraint graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolicState {
    /// Gripper away from the target.
    Free,
    /// Gripper at the approach distance from the target handle.
    PreGrasp,
    /// Gripper holding the target handle.
    Grasp,
    /// Target carried by the gripper.
    Transit,
}

impl SymbolicState {
    /// Returns the node name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::PreGrasp => "pregrasp",
            Self::Grasp => "grasp",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for SymbolicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A joint held at fixed values during planning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LockedJoint {
    /// Joint name.
    pub name: String,
    /// Configuration scalars of the joint.
    pub value: Vec<f64>,
}

impl LockedJoint {
    /// Creates a locked joint.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Name of the planner constraint holding this joint.
    #[must_use]
    pub fn constraint_name(&self) -> String {
        format!("locked_{}", self.name)
    }
}

/// Everything the planner needs to set up a fresh problem.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProblemSetup {
    gripper: String,
    approach_distance: f64,
    target_bounds: TargetBounds,
    locked_joints: Vec<LockedJoint>,
    error_threshold: f64,
    max_projection_iterations: usize,
    timeout: Duration,
}

impl ProblemSetup {
    /// Creates a setup for `gripper` from the planner configuration.
    #[must_use]
    pub fn new(gripper: impl Into<String>, config: &PlannerConfig) -> Self {
        Self {
            gripper: gripper.into(),
            approach_distance: config.approach_distance(),
            target_bounds: *config.target_bounds(),
            locked_joints: Vec::new(),
            error_threshold: config.error_threshold(),
            max_projection_iterations: config.max_projection_iterations(),
            timeout: config.timeout(),
        }
    }

    /// Sets the approach distance.
    #[must_use]
    pub const fn with_approach_distance(mut self, distance: f64) -> Self {
        self.approach_distance = distance;
        self
    }

    /// Sets the locked joints.
    #[must_use]
    pub fn with_locked_joints(mut self, locked: Vec<LockedJoint>) -> Self {
        self.locked_joints = locked;
        self
    }

    /// Returns the gripper name.
    #[must_use]
    pub fn gripper(&self) -> &str {
        &self.gripper
    }

    /// Returns the approach distance.
    #[must_use]
    pub const fn approach_distance(&self) -> f64 {
        self.approach_distance
    }

    /// Returns the target sampling bounds.
    #[must_use]
    pub const fn target_bounds(&self) -> &TargetBounds {
        &self.target_bounds
    }

    /// Returns the locked joints.
    #[must_use]
    pub fn locked_joints(&self) -> &[LockedJoint] {
        &self.locked_joints
    }

    /// Returns the projection error threshold.
    #[must_use]
    pub const fn error_threshold(&self) -> f64 {
        self.error_threshold
    }

    /// Returns the projection iteration budget.
    #[must_use]
    pub const fn max_projection_iterations(&self) -> usize {
        self.max_projection_iterations
    }

    /// Returns the solve timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A session with the external constraint-graph planner.
///
/// Calls block until the planner answers. A solve that exceeds its timeout
/// reports [`PlanOutcome::Failure`].
pub trait PlannerSession {
    /// Discards the previous problem and sets up a new one.
    ///
    /// # Errors
    ///
    /// Fails if the planner rejects the setup.
    fn begin_session(&mut self, setup: &ProblemSetup) -> Result<()>;

    /// Projects `candidate` onto `state`, anchored at `reference`.
    fn project_onto_node(
        &mut self,
        state: SymbolicState,
        reference: &PlanningConfiguration,
        candidate: &PlanningConfiguration,
    ) -> PlanOutcome<PlanningConfiguration>;

    /// Checks that the straight-line connection from `from` to `to` is
    /// collision-free, returning the connecting path.
    fn check_direct_connection(
        &mut self,
        from: &PlanningConfiguration,
        to: &PlanningConfiguration,
    ) -> PlanOutcome<PathHandle>;

    /// Solves from `start` to any of `goals`.
    fn solve(
        &mut self,
        start: &PlanningConfiguration,
        goals: &[PlanningConfiguration],
    ) -> PlanOutcome<PathHandle>;

    /// Shortens a solved path, returning the optimized path.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownPath`] for a stale handle.
    fn optimize(&mut self, path: PathHandle) -> Result<PathHandle>;

    /// Returns the waypoints of a path.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownPath`] for a stale handle.
    fn waypoints(&self, path: PathHandle) -> Result<RawPath>;

    /// Returns the last configuration of a path.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownPath`] for a stale handle.
    fn end_configuration(&self, path: PathHandle) -> Result<PlanningConfiguration>;

    /// Creates a straight-line path without validating it.
    ///
    /// # Errors
    ///
    /// Fails if the planner cannot build the path.
    fn create_path(
        &mut self,
        from: &PlanningConfiguration,
        to: &PlanningConfiguration,
    ) -> Result<PathHandle>;

    /// Extends a path with a straight line to `to`, without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownPath`] for a stale handle.
    fn append_direct_path(&mut self, path: PathHandle, to: &PlanningConfiguration) -> Result<()>;

    /// Releases a path the caller no longer needs.
    fn release_path(&mut self, path: PathHandle);
}

/// Time parametrization service.
pub trait TimeParametrizer {
    /// Assigns a time schedule to a geometric path, returning the timed path.
    ///
    /// Velocities are bounded by `scaling.velocity` times the model maxima.
    /// `max_acceleration` is the acceleration bound with
    /// `scaling.acceleration` already applied; implementations use it as is.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownPath`] for a stale handle.
    fn parametrize(
        &mut self,
        path: PathHandle,
        scaling: TimeScaling,
        max_acceleration: f64,
    ) -> Result<PathHandle>;
}

/// Draws random full-system configurations.
pub trait ConfigurationSampler {
    /// Returns one random configuration.
    fn sample(&mut self) -> PlanningConfiguration;
}

/// Uniform sampler inside the joint limits and the target bounds.
///
/// Unbounded joints are sampled in `[-π, π]`. The target quaternion is
/// normalized after sampling.
///
/// # Example
///
/// ```
/// use motion_plan::{ConfigurationSampler, UniformSampler};
/// use motion_robot::PositionLimits;
/// use motion_types::TargetBounds;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let limits = PositionLimits::new(vec![0.0, -1.0], vec![1.0, 1.0])?;
/// let mut sampler = UniformSampler::new(StdRng::seed_from_u64(42), &limits, TargetBounds::default());
///
/// let q = sampler.sample();
/// assert!(limits.contains(q.robot().as_slice()));
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UniformSampler<R> {
    rng: R,
    lower: Vec<f64>,
    upper: Vec<f64>,
    target_bounds: TargetBounds,
}

impl<R: Rng> UniformSampler<R> {
    /// Creates a sampler over `limits` and `target_bounds`.
    #[must_use]
    pub fn new(rng: R, limits: &PositionLimits, target_bounds: TargetBounds) -> Self {
        let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
        Self {
            rng,
            lower: limits
                .lower()
                .iter()
                .map(|&lo| finite_or(lo, -std::f64::consts::PI))
                .collect(),
            upper: limits
                .upper()
                .iter()
                .map(|&hi| finite_or(hi, std::f64::consts::PI))
                .collect(),
            target_bounds,
        }
    }

    fn draw(&mut self, lower: f64, upper: f64) -> f64 {
        if lower < upper {
            self.rng.gen_range(lower..=upper)
        } else {
            lower
        }
    }
}

impl<R: Rng> ConfigurationSampler for UniformSampler<R> {
    fn sample(&mut self) -> PlanningConfiguration {
        let bounds: Vec<(f64, f64)> = self.lower.iter().copied().zip(self.upper.iter().copied()).collect();
        let robot: Vec<f64> = bounds.into_iter().map(|(lo, hi)| self.draw(lo, hi)).collect();

        let target_bounds: Vec<(f64, f64)> = self.target_bounds.pairs().collect();
        let t: Vec<f64> = target_bounds.into_iter().map(|(lo, hi)| self.draw(lo, hi)).collect();

        let raw = Quaternion::new(t[6], t[3], t[4], t[5]);
        let orientation = UnitQuaternion::try_new(raw, f64::EPSILON)
            .map_or_else(Quaternion::identity, UnitQuaternion::into_inner);

        PlanningConfiguration::new(
            InternalVector::new(robot),
            TargetPose::new(Point3::new(t[0], t[1], t[2]), orientation),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_outcome_map_and_ok() {
        let outcome = PlanOutcome::Success(2).map(|v| v * 3);
        assert_eq!(outcome, PlanOutcome::Success(6));
        assert_eq!(outcome.ok(), Some(6));

        let failed: PlanOutcome<i32> = PlanOutcome::failure("collision");
        assert_eq!(failed.clone().map(|v| v + 1), PlanOutcome::failure("collision"));
        assert_eq!(failed.ok(), None);
    }

    #[test]
    fn test_setup_from_config() {
        let config = PlannerConfig::new().with_timeout(Duration::from_secs(3));
        let setup = ProblemSetup::new("l_gripper", &config)
            .with_approach_distance(0.2)
            .with_locked_joints(vec![LockedJoint::new("finger", vec![0.01])]);
        assert_eq!(setup.gripper(), "l_gripper");
        assert_eq!(setup.approach_distance(), 0.2);
        assert_eq!(setup.timeout(), Duration::from_secs(3));
        assert_eq!(setup.max_projection_iterations(), 40);
        assert_eq!(setup.locked_joints()[0].constraint_name(), "locked_finger");
    }

    #[test]
    fn test_uniform_sampler_respects_bounds() {
        let limits = PositionLimits::new(
            vec![-1.0, 0.5, f64::NEG_INFINITY],
            vec![1.0, 0.5, f64::INFINITY],
        )
        .unwrap();
        let mut sampler =
            UniformSampler::new(StdRng::seed_from_u64(7), &limits, TargetBounds::symmetric(0.5));

        for _ in 0..200 {
            let q = sampler.sample();
            let r = q.robot();
            assert!((-1.0..=1.0).contains(&r[0]));
            assert_eq!(r[1], 0.5);
            assert!(r[2].abs() <= std::f64::consts::PI);

            let s = q.target().to_scalars();
            assert!(s[..3].iter().all(|x| x.abs() <= 0.5));
            assert_relative_eq!(q.target().orientation.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_uniform_sampler_is_reproducible() {
        let limits = PositionLimits::new(vec![-1.0; 4], vec![1.0; 4]).unwrap();
        let mut a = UniformSampler::new(StdRng::seed_from_u64(3), &limits, TargetBounds::default());
        let mut b = UniformSampler::new(StdRng::seed_from_u64(3), &limits, TargetBounds::default());
        assert_eq!(a.sample(), b.sample());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SymbolicState::PreGrasp.to_string(), "pregrasp");
        assert_eq!(SymbolicState::Free.name(), "free");
    }
}
