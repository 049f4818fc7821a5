//! Manipulation task planning.
//!
//! [`TaskPlanner`] drives the external planner through the two supported
//! tasks:
//!
//! - **gripper approach**: move a gripper from the current configuration to a
//!   grasp of the target,
//! - **pick and place**: grasp the target at one pose, carry it to another and
//!   go back.
//!
//! Every task starts a fresh planner session. "No path found" is reported as
//! a [`PlanOutcome::Failure`]; errors are reserved for invalid inputs and
//! inconsistent planner answers.

use std::time::Duration;

use tracing::{debug, info, warn};

use motion_types::{
    DofSpace, GoalCandidate, InternalVector, JointLayout, MotionError, PathHandle, PlannedPath,
    PlannerConfig, PlanningConfiguration, RawPath, Result, TargetPose,
};

use crate::matcher::ConfigurationMatcher;
use crate::planner::{
    ConfigurationSampler, LockedJoint, PlanOutcome, PlannerSession, ProblemSetup, SymbolicState,
    TimeParametrizer,
};
use crate::sampler::GoalSampler;
use crate::segment::PathSegmenter;

/// Request for [`TaskPlanner::plan_gripper_approach`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachRequest {
    gripper: String,
    target: TargetPose,
    start: InternalVector,
    approach_distance: Option<f64>,
    target_frame: Option<String>,
}

impl ApproachRequest {
    /// Approach `target` with `gripper`, starting from `start`.
    #[must_use]
    pub fn new(gripper: impl Into<String>, target: TargetPose, start: InternalVector) -> Self {
        Self {
            gripper: gripper.into(),
            target,
            start,
            approach_distance: None,
            target_frame: None,
        }
    }

    /// Overrides the approach distance of the planner configuration.
    #[must_use]
    pub const fn with_approach_distance(mut self, distance: f64) -> Self {
        self.approach_distance = Some(distance);
        self
    }

    /// Sets the frame the resulting path is expressed for.
    ///
    /// Defaults to the gripper name.
    #[must_use]
    pub fn with_target_frame(mut self, frame: impl Into<String>) -> Self {
        self.target_frame = Some(frame.into());
        self
    }

    /// Returns the gripper.
    #[must_use]
    pub fn gripper(&self) -> &str {
        &self.gripper
    }

    /// Returns the target pose.
    #[must_use]
    pub const fn target(&self) -> &TargetPose {
        &self.target
    }
}

/// Request for [`TaskPlanner::plan_pick_and_place`].
#[derive(Debug, Clone, PartialEq)]
pub struct PickAndPlaceRequest {
    gripper: String,
    pick: TargetPose,
    place: TargetPose,
    start: InternalVector,
    end: Option<InternalVector>,
    approach_distance: Option<f64>,
    target_frame: Option<String>,
}

impl PickAndPlaceRequest {
    /// Carry the target from `pick` to `place` with `gripper`, starting from
    /// `start`.
    ///
    /// The robot returns to `start` unless [`PickAndPlaceRequest::with_end`]
    /// says otherwise.
    #[must_use]
    pub fn new(
        gripper: impl Into<String>,
        pick: TargetPose,
        place: TargetPose,
        start: InternalVector,
    ) -> Self {
        Self {
            gripper: gripper.into(),
            pick,
            place,
            start,
            end: None,
            approach_distance: None,
            target_frame: None,
        }
    }

    /// Sets the final robot configuration.
    #[must_use]
    pub fn with_end(mut self, end: InternalVector) -> Self {
        self.end = Some(end);
        self
    }

    /// Overrides the approach distance of the planner configuration.
    #[must_use]
    pub const fn with_approach_distance(mut self, distance: f64) -> Self {
        self.approach_distance = Some(distance);
        self
    }

    /// Sets the frame the resulting paths are expressed for.
    ///
    /// Defaults to the gripper name.
    #[must_use]
    pub fn with_target_frame(mut self, frame: impl Into<String>) -> Self {
        self.target_frame = Some(frame.into());
        self
    }
}

/// The three timed paths of a pick-and-place task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickAndPlacePaths {
    /// Approach and grasp.
    pub pick: PlannedPath,
    /// Transport.
    pub place: PlannedPath,
    /// Return motion, absent when the solve ends at the place pose.
    pub home: Option<PlannedPath>,
}

/// Plans manipulation tasks with an external planner.
///
/// # Example
///
/// ```ignore
/// let mut planner = TaskPlanner::new(session, parametrizer, shooter, layout, PlannerConfig::new());
/// planner.set_velocity_limit(0.5)?;
///
/// let request = ApproachRequest::new("l_gripper", target, robot.measured_configuration(false)?);
/// match planner.plan_gripper_approach(&request)? {
///     PlanOutcome::Success(path) => execute(path),
///     PlanOutcome::Failure { reason } => eprintln!("no approach: {reason}"),
/// }
/// ```
#[derive(Debug)]
pub struct TaskPlanner<P, T, C> {
    session: P,
    parametrizer: T,
    shooter: C,
    layout: JointLayout,
    config: PlannerConfig,
    locked: Vec<LockedJoint>,
}

impl<P, T, C> TaskPlanner<P, T, C>
where
    P: PlannerSession,
    T: TimeParametrizer,
    C: ConfigurationSampler,
{
    /// Creates a task planner for a robot with the given joint layout.
    pub const fn new(
        session: P,
        parametrizer: T,
        shooter: C,
        layout: JointLayout,
        config: PlannerConfig,
    ) -> Self {
        Self {
            session,
            parametrizer,
            shooter,
            layout,
            config,
            locked: Vec::new(),
        }
    }

    /// Returns the planner session.
    pub const fn session(&self) -> &P {
        &self.session
    }

    /// Returns the planner session mutably.
    pub fn session_mut(&mut self) -> &mut P {
        &mut self.session
    }

    /// Returns the time parametrizer.
    pub const fn parametrizer(&self) -> &T {
        &self.parametrizer
    }

    /// Returns the time parametrizer mutably.
    pub fn parametrizer_mut(&mut self) -> &mut T {
        &mut self.parametrizer
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Returns the locked joints.
    pub fn locked_joints(&self) -> &[LockedJoint] {
        &self.locked
    }

    /// Returns the joint names in model order.
    pub fn joint_names(&self) -> Vec<String> {
        self.layout.names().map(str::to_string).collect()
    }

    /// Locks `names` at their value in `current` for subsequent plans.
    ///
    /// Locking a joint again replaces its value. Returns the locked joints.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownJoint`] for a joint missing from the
    /// layout and [`MotionError::ShapeMismatch`] if `current` does not fit the
    /// layout.
    pub fn lock_joints<S: AsRef<str>>(
        &mut self,
        names: &[S],
        current: &InternalVector,
    ) -> Result<&[LockedJoint]> {
        if current.len() != self.layout.config_dim() {
            return Err(MotionError::shape(self.layout.config_dim(), current.len()));
        }
        let mut values = Vec::with_capacity(names.len());
        for name in names.iter().map(AsRef::as_ref) {
            let index = self
                .layout
                .position(name)
                .ok_or_else(|| MotionError::UnknownJoint(name.to_string()))?;
            let block = self
                .layout
                .block(index, DofSpace::Configuration)
                .ok_or_else(|| MotionError::UnknownJoint(name.to_string()))?;
            values.push(current.as_slice()[block].to_vec());
        }
        self.lock_joints_at(names, values)
    }

    /// Locks `names` at explicit `values`, one scalar block per joint.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnknownJoint`] for a joint missing from the
    /// layout and [`MotionError::ShapeMismatch`] if the values do not fit.
    pub fn lock_joints_at<S: AsRef<str>>(
        &mut self,
        names: &[S],
        values: Vec<Vec<f64>>,
    ) -> Result<&[LockedJoint]> {
        if names.len() != values.len() {
            return Err(MotionError::shape(names.len(), values.len()));
        }
        let mut locked = Vec::with_capacity(names.len());
        for (name, value) in names.iter().map(AsRef::as_ref).zip(values) {
            let spec = self
                .layout
                .get(name)
                .ok_or_else(|| MotionError::UnknownJoint(name.to_string()))?;
            let expected = spec.scalars(DofSpace::Configuration);
            if expected != value.len() {
                return Err(MotionError::shape(expected, value.len()));
            }
            locked.push(LockedJoint::new(name, value));
        }

        for joint in locked {
            debug!(joint = %joint.name, value = ?joint.value, "Locked joint");
            match self.locked.iter_mut().find(|l| l.name == joint.name) {
                Some(existing) => *existing = joint,
                None => self.locked.push(joint),
            }
        }
        Ok(&self.locked)
    }

    /// Releases every locked joint.
    pub fn unlock_all(&mut self) {
        self.locked.clear();
    }

    /// Sets the velocity scale used by time parametrization.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidConfig`] unless `scale` is in `(0, 1]`.
    pub fn set_velocity_limit(&mut self, scale: f64) -> Result<()> {
        check_scale("velocity", scale)?;
        self.config.scaling_mut().velocity = scale;
        Ok(())
    }

    /// Sets the acceleration scale used by time parametrization.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidConfig`] unless `scale` is in `(0, 1]`.
    pub fn set_acceleration_limit(&mut self, scale: f64) -> Result<()> {
        check_scale("acceleration", scale)?;
        self.config.scaling_mut().acceleration = scale;
        Ok(())
    }

    /// Sets the wall-clock budget of each solve.
    pub fn set_planning_timeout(&mut self, timeout: Duration) {
        self.config = self.config.clone().with_timeout(timeout);
    }

    /// Plans a motion bringing the gripper of `request` to a grasp of its
    /// target.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ProjectionFailed`] if the start configuration is
    /// not valid, [`MotionError::SegmentationInconsistency`] if the solved
    /// path ends at no sampled pre-grasp configuration, and any error of the
    /// planner collaborators.
    pub fn plan_gripper_approach(
        &mut self,
        request: &ApproachRequest,
    ) -> Result<PlanOutcome<PlannedPath>> {
        self.check_robot_dim(&request.start)?;
        let mut setup = ProblemSetup::new(&request.gripper, &self.config)
            .with_locked_joints(self.locked.clone());
        if let Some(distance) = request.approach_distance {
            setup = setup.with_approach_distance(distance);
        }
        self.session.begin_session(&setup)?;

        let start = PlanningConfiguration::new(request.start.clone(), request.target);
        let initial = self.project_free(&start, "initial")?;

        let sampler = GoalSampler::new(self.config.sampler());
        let candidates = sampler.sample(&mut self.session, &mut self.shooter, &initial);
        if candidates.is_empty() {
            warn!(gripper = %request.gripper, "No goal candidate found");
            return Ok(PlanOutcome::failure("no valid pre-grasp configuration found"));
        }

        let goals: Vec<PlanningConfiguration> =
            candidates.iter().map(|c| c.pre_grasp.clone()).collect();
        let path = match self.session.solve(&initial, &goals) {
            PlanOutcome::Success(path) => path,
            PlanOutcome::Failure { reason } => {
                info!(gripper = %request.gripper, %reason, "Approach planning failed");
                return Ok(PlanOutcome::Failure { reason });
            }
        };

        let timed = self.close_approach(path, &candidates);
        self.session.release_path(path);
        let timed = timed?;

        let frame = request.target_frame.as_deref().unwrap_or(&request.gripper);
        info!(gripper = %request.gripper, path = %timed, "Planned gripper approach");
        Ok(PlanOutcome::Success(
            PlannedPath::new(timed, self.joint_names()).with_target_frame(frame),
        ))
    }

    /// Plans a pick-and-place task as three timed paths.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ProjectionFailed`] if the start or end
    /// configuration is not valid,
    /// [`MotionError::SegmentationInconsistency`] if the solved path does not
    /// visit both poses, and any error of the planner collaborators.
    pub fn plan_pick_and_place(
        &mut self,
        request: &PickAndPlaceRequest,
    ) -> Result<PlanOutcome<PickAndPlacePaths>> {
        self.check_robot_dim(&request.start)?;
        let end_robot = request.end.clone().unwrap_or_else(|| request.start.clone());
        self.check_robot_dim(&end_robot)?;

        let mut setup = ProblemSetup::new(&request.gripper, &self.config)
            .with_locked_joints(self.locked.clone());
        if let Some(distance) = request.approach_distance {
            setup = setup.with_approach_distance(distance);
        }
        self.session.begin_session(&setup)?;

        let start = PlanningConfiguration::new(request.start.clone(), request.pick);
        let end = PlanningConfiguration::new(end_robot, request.place);
        let initial = self.project_free(&start, "initial")?;
        let goal = self.project_free(&end, "end")?;

        let solved = match self.session.solve(&initial, std::slice::from_ref(&goal)) {
            PlanOutcome::Success(path) => path,
            PlanOutcome::Failure { reason } => {
                info!(gripper = %request.gripper, %reason, "Pick-and-place planning failed");
                return Ok(PlanOutcome::Failure { reason });
            }
        };
        let optimized = self.session.optimize(solved);
        if !matches!(&optimized, Ok(handle) if *handle == solved) {
            self.session.release_path(solved);
        }
        let optimized = optimized?;
        let waypoints = self.session.waypoints(optimized);
        self.session.release_path(optimized);
        let waypoints = waypoints?;

        let segmenter = PathSegmenter::with_tolerance(self.config.match_tolerance());
        let parts = segmenter
            .segment(&waypoints, &request.pick, &request.place)?
            .split(&waypoints)?;

        let frame = request.target_frame.as_deref().unwrap_or(&request.gripper);
        let pick = self.timed_part(&parts.pick, frame)?;
        let place = self.timed_part(&parts.place, frame)?;
        let home = parts
            .home
            .as_ref()
            .map(|part| self.timed_part(part, frame))
            .transpose()?;

        info!(
            gripper = %request.gripper,
            waypoints = waypoints.len(),
            has_home = home.is_some(),
            "Planned pick and place"
        );
        Ok(PlanOutcome::Success(PickAndPlacePaths { pick, place, home }))
    }

    fn check_robot_dim(&self, q: &InternalVector) -> Result<()> {
        if q.len() == self.layout.config_dim() {
            Ok(())
        } else {
            Err(MotionError::shape(self.layout.config_dim(), q.len()))
        }
    }

    fn project_free(
        &mut self,
        q: &PlanningConfiguration,
        what: &'static str,
    ) -> Result<PlanningConfiguration> {
        match self.session.project_onto_node(SymbolicState::Free, q, q) {
            PlanOutcome::Success(projected) => Ok(projected),
            PlanOutcome::Failure { reason } => Err(MotionError::ProjectionFailed { what, reason }),
        }
    }

    fn terminating_grasp(
        &self,
        path: PathHandle,
        candidates: &[GoalCandidate],
    ) -> Result<PlanningConfiguration> {
        let end = self.session.end_configuration(path)?;
        let matcher = ConfigurationMatcher::new(self.config.match_tolerance());
        matcher
            .find_terminating(&end, candidates)?
            .map(|candidate| candidate.grasp.clone())
            .ok_or_else(|| {
                MotionError::segmentation("approach path ends at no sampled pre-grasp configuration")
            })
    }

    /// Appends the grasp the approach path ends at and times the result.
    fn close_approach(
        &mut self,
        path: PathHandle,
        candidates: &[GoalCandidate],
    ) -> Result<PathHandle> {
        let grasp = self.terminating_grasp(path, candidates)?;
        self.session.append_direct_path(path, &grasp)?;
        self.time_parametrize(path)
    }

    /// The acceleration bound handed to the parametrizer is already scaled.
    fn time_parametrize(&mut self, path: PathHandle) -> Result<PathHandle> {
        self.parametrizer.parametrize(
            path,
            self.config.scaling(),
            self.config.max_joint_acceleration() * self.config.scaling().acceleration,
        )
    }

    /// Builds the waypoints of `part` into a planner path and times it.
    fn timed_part(&mut self, part: &RawPath, frame: &str) -> Result<PlannedPath> {
        let (first, rest) = part
            .waypoints()
            .split_first()
            .ok_or_else(|| MotionError::segmentation("empty path segment"))?;
        let (second, rest) = rest.split_first().map_or((first, rest), |(s, r)| (s, r));

        let path = self.session.create_path(first, second)?;
        let timed = rest
            .iter()
            .try_for_each(|waypoint| self.session.append_direct_path(path, waypoint))
            .and_then(|()| self.time_parametrize(path));
        self.session.release_path(path);
        let timed = timed?;

        debug!(waypoints = part.len(), path = %timed, "Timed path segment");
        Ok(PlannedPath::new(timed, self.joint_names()).with_target_frame(frame))
    }
}

fn check_scale(what: &str, scale: f64) -> Result<()> {
    if scale > 0.0 && scale <= 1.0 {
        Ok(())
    } else {
        Err(MotionError::invalid_config(format!(
            "{what} scale must be in (0, 1], got {scale}"
        )))
    }
}
