//! Sampling of timed paths into joint commands.
//!
//! A time-parametrized path is sampled every control period and restricted
//! to the joints being commanded, producing a [`JointTrajectory`] ready to be
//! sent to a joint trajectory controller.

use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use motion_robot::{subset_indexes, JointStateSource, ModelEvaluator, RobotBinding};
use motion_types::{
    InternalVector, MotionError, RawPath, Result, DEFAULT_AT_CONFIG_THRESHOLD,
    DEFAULT_CONTROL_PERIOD,
};

/// A path with a time schedule.
///
/// Positions and velocities are indexed like the joint list of the path.
pub trait TimedPath {
    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Configuration at time `t`.
    fn position(&self, t: f64) -> Vec<f64>;

    /// Velocity at time `t`.
    fn velocity(&self, t: f64) -> Vec<f64>;
}

/// Most commands sampled from a single path.
pub const MAX_COMMAND_POINTS: u32 = 1_000_000;

/// Straight-line segments between waypoints, each traversed at constant speed.
///
/// # Example
///
/// ```
/// use motion_plan::{PiecewiseLinearPath, TimedPath};
///
/// let path = PiecewiseLinearPath::constant_speed(vec![vec![0.0, 0.0], vec![1.0, 0.5]], 0.5)?;
/// assert_eq!(path.duration(), 2.0);
/// assert_eq!(path.position(1.0), vec![0.5, 0.25]);
/// assert_eq!(path.velocity(1.0), vec![0.5, 0.25]);
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PiecewiseLinearPath {
    waypoints: Vec<Vec<f64>>,
    times: Vec<f64>,
}

impl PiecewiseLinearPath {
    /// Creates a path reaching `waypoints[k]` at `times[k]`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if the rows differ in length or
    /// there is not one time per waypoint, and [`MotionError::InvalidConfig`]
    /// if there are no waypoints or the times do not start at zero and never
    /// decrease.
    pub fn with_times(waypoints: Vec<Vec<f64>>, times: Vec<f64>) -> Result<Self> {
        let Some(first) = waypoints.first() else {
            return Err(MotionError::invalid_config("path needs at least one waypoint"));
        };
        let dim = first.len();
        if let Some(row) = waypoints.iter().find(|row| row.len() != dim) {
            return Err(MotionError::shape(dim, row.len()));
        }
        if times.len() != waypoints.len() {
            return Err(MotionError::shape(waypoints.len(), times.len()));
        }
        if times[0] != 0.0 || times.windows(2).any(|w| !w[1].is_finite() || w[1] < w[0]) {
            return Err(MotionError::invalid_config(
                "waypoint times must be finite, start at 0 and never decrease",
            ));
        }
        Ok(Self { waypoints, times })
    }

    /// Creates a path where the fastest joint of every segment moves at
    /// `max_velocity`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidConfig`] unless `max_velocity` is positive
    /// and finite, and the errors of [`PiecewiseLinearPath::with_times`].
    pub fn constant_speed(waypoints: Vec<Vec<f64>>, max_velocity: f64) -> Result<Self> {
        if !(max_velocity.is_finite() && max_velocity > 0.0) {
            return Err(MotionError::invalid_config(format!(
                "max velocity must be positive, got {max_velocity}"
            )));
        }
        let mut times = Vec::with_capacity(waypoints.len());
        let mut elapsed = 0.0;
        for (k, row) in waypoints.iter().enumerate() {
            if let Some(previous) = k.checked_sub(1).and_then(|p| waypoints.get(p)) {
                let span = previous
                    .iter()
                    .zip(row)
                    .map(|(a, b)| (b - a).abs())
                    .fold(0.0, f64::max);
                elapsed += span / max_velocity;
            }
            times.push(elapsed);
        }
        Self::with_times(waypoints, times)
    }

    /// Creates a constant-speed path through the robot part of `path`.
    ///
    /// # Errors
    ///
    /// See [`PiecewiseLinearPath::constant_speed`].
    pub fn from_raw_path(path: &RawPath, max_velocity: f64) -> Result<Self> {
        let rows = path.iter().map(|q| q.robot().as_slice().to_vec()).collect();
        Self::constant_speed(rows, max_velocity)
    }

    /// Returns the waypoints.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec<f64>] {
        &self.waypoints
    }

    /// Returns the waypoint times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    fn dim(&self) -> usize {
        self.waypoints.first().map_or(0, Vec::len)
    }

    /// Index of the segment containing `t`, for paths of two or more waypoints.
    fn segment_at(&self, t: f64) -> usize {
        let upper = self.times.partition_point(|&s| s <= t);
        upper.saturating_sub(1).min(self.times.len().saturating_sub(2))
    }
}

impl TimedPath for PiecewiseLinearPath {
    fn duration(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    fn position(&self, t: f64) -> Vec<f64> {
        if self.waypoints.len() < 2 {
            return self.waypoints.first().cloned().unwrap_or_default();
        }
        let t = t.clamp(0.0, self.duration());
        let k = self.segment_at(t);
        let (t0, t1) = (self.times[k], self.times[k + 1]);
        let alpha = if t1 > t0 { (t - t0) / (t1 - t0) } else { 1.0 };
        self.waypoints[k]
            .iter()
            .zip(&self.waypoints[k + 1])
            .map(|(a, b)| a + alpha * (b - a))
            .collect()
    }

    fn velocity(&self, t: f64) -> Vec<f64> {
        if self.waypoints.len() < 2 || t < 0.0 || t >= self.duration() {
            return vec![0.0; self.dim()];
        }
        let k = self.segment_at(t);
        let dt = self.times[k + 1] - self.times[k];
        if dt <= 0.0 {
            return vec![0.0; self.dim()];
        }
        self.waypoints[k]
            .iter()
            .zip(&self.waypoints[k + 1])
            .map(|(a, b)| (b - a) / dt)
            .collect()
    }
}

/// One sampled command.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectoryPoint {
    /// Positions of the commanded joints.
    pub positions: Vec<f64>,
    /// Velocities of the commanded joints.
    pub velocities: Vec<f64>,
    /// Time from the start of the trajectory, in seconds.
    pub time_from_start: f64,
}

/// Commands for a set of joints, sampled at a fixed period.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointTrajectory {
    /// Commanded joints, in command order.
    pub joint_names: Vec<String>,
    /// Sampled points.
    pub points: Vec<TrajectoryPoint>,
}

impl JointTrajectory {
    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Samples timed paths into joint trajectories.
///
/// # Example
///
/// ```
/// use motion_plan::{PiecewiseLinearPath, TrajectorySampler};
///
/// let path = PiecewiseLinearPath::constant_speed(vec![vec![0.0, 0.0], vec![0.1, 0.2]], 1.0)?;
/// let sampler = TrajectorySampler::new(["elbow"]).with_period(0.05);
///
/// let trajectory = sampler.sample(&path, &["shoulder", "elbow"])?;
/// assert_eq!(trajectory.joint_names, vec!["elbow"]);
/// assert_eq!(trajectory.len(), 4);
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrajectorySampler {
    commanded: Vec<String>,
    period: f64,
    start_threshold: f64,
}

impl TrajectorySampler {
    /// Creates a sampler commanding `joints`.
    ///
    /// Defaults to a [`DEFAULT_CONTROL_PERIOD`] period and a
    /// [`DEFAULT_AT_CONFIG_THRESHOLD`] start check.
    #[must_use]
    pub fn new<I, S>(joints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commanded: joints.into_iter().map(Into::into).collect(),
            period: DEFAULT_CONTROL_PERIOD,
            start_threshold: DEFAULT_AT_CONFIG_THRESHOLD,
        }
    }

    /// Sets the sampling period in seconds.
    #[must_use]
    pub const fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    /// Sets the per-joint tolerance of the start check.
    #[must_use]
    pub const fn with_start_threshold(mut self, threshold: f64) -> Self {
        self.start_threshold = threshold;
        self
    }

    /// Returns the commanded joints.
    #[must_use]
    pub fn commanded(&self) -> &[String] {
        &self.commanded
    }

    /// Returns the sampling period.
    #[must_use]
    pub const fn period(&self) -> f64 {
        self.period
    }

    /// Samples `path` at `0, period, 2 period, ...` while strictly before its
    /// end.
    ///
    /// `path_joints` names the joints of the path, in path order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidConfig`] for a non-positive period,
    /// [`MotionError::UnknownJoint`] if a commanded joint is not part of the
    /// path, and [`MotionError::ShapeMismatch`] if the path yields fewer
    /// scalars than it has joints.
    pub fn sample<P, S>(&self, path: &P, path_joints: &[S]) -> Result<JointTrajectory>
    where
        P: TimedPath + ?Sized,
        S: AsRef<str>,
    {
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(MotionError::invalid_config(format!(
                "control period must be positive, got {}",
                self.period
            )));
        }
        let indexes = subset_indexes(&self.commanded, path_joints, true)?;
        let duration = path.duration();
        if !duration.is_finite() || duration / self.period > f64::from(MAX_COMMAND_POINTS) {
            return Err(MotionError::invalid_config(format!(
                "path of duration {duration} s exceeds {MAX_COMMAND_POINTS} commands at period {} s",
                self.period
            )));
        }

        let mut points = Vec::new();
        let mut step: u32 = 0;
        loop {
            let t = f64::from(step) * self.period;
            if t >= duration {
                break;
            }
            points.push(TrajectoryPoint {
                positions: select(&path.position(t), &indexes)?,
                velocities: select(&path.velocity(t), &indexes)?,
                time_from_start: t,
            });
            step += 1;
        }

        debug!(
            joints = indexes.len(),
            points = points.len(),
            duration,
            "Sampled timed path"
        );
        Ok(JointTrajectory {
            joint_names: self.commanded.clone(),
            points,
        })
    }

    /// Checks that `robot` stands at the start of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::StartMismatch`] if any joint is further than the
    /// start threshold from the first configuration of the path,
    /// [`MotionError::UnknownJoint`] if a robot joint is not part of the path,
    /// and the errors of [`RobotBinding::is_at_config`].
    pub fn check_start<P, S, M, F>(
        &self,
        path: &P,
        path_joints: &[S],
        robot: &RobotBinding<M, F>,
    ) -> Result<()>
    where
        P: TimedPath + ?Sized,
        S: AsRef<str>,
        M: ModelEvaluator,
        F: JointStateSource,
    {
        let indexes = subset_indexes(&robot.joint_names(), path_joints, true)?;
        let start = InternalVector::new(select(&path.position(0.0), &indexes)?);
        if robot.is_at_config(&start, self.start_threshold)? {
            Ok(())
        } else {
            Err(MotionError::StartMismatch {
                threshold: self.start_threshold,
            })
        }
    }

    /// Checks the start of `path` against `robot`, then samples it.
    ///
    /// # Errors
    ///
    /// See [`TrajectorySampler::check_start`] and [`TrajectorySampler::sample`].
    pub fn commands<P, S, M, F>(
        &self,
        path: &P,
        path_joints: &[S],
        robot: &RobotBinding<M, F>,
    ) -> Result<JointTrajectory>
    where
        P: TimedPath + ?Sized,
        S: AsRef<str>,
        M: ModelEvaluator,
        F: JointStateSource,
    {
        self.check_start(path, path_joints, robot)?;
        let trajectory = self.sample(path, path_joints)?;
        info!(
            joints = trajectory.joint_names.len(),
            points = trajectory.len(),
            "Prepared joint trajectory"
        );
        Ok(trajectory)
    }
}

fn select(values: &[f64], indexes: &[usize]) -> Result<Vec<f64>> {
    indexes
        .iter()
        .map(|&i| {
            values
                .get(i)
                .copied()
                .ok_or_else(|| MotionError::shape(i + 1, values.len()))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> PiecewiseLinearPath {
        PiecewiseLinearPath::with_times(
            vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![1.0, 0.0]],
            vec![0.0, 1.0, 3.0],
        )
        .unwrap()
    }

    #[test]
    fn test_position_and_velocity() {
        let path = ramp();
        assert_eq!(path.duration(), 3.0);
        assert_eq!(path.position(0.5), vec![0.5, 1.0]);
        assert_eq!(path.velocity(0.5), vec![1.0, 2.0]);
        assert_eq!(path.position(2.0), vec![1.0, 1.0]);
        assert_eq!(path.velocity(2.0), vec![0.0, -1.0]);
        assert_eq!(path.position(1.0), vec![1.0, 2.0]);
        assert_eq!(path.position(10.0), vec![1.0, 0.0]);
        assert_eq!(path.velocity(3.0), vec![0.0, 0.0]);
    }

    #[test]
    fn test_rejects_bad_times() {
        let rows = vec![vec![0.0], vec![1.0]];
        assert!(PiecewiseLinearPath::with_times(rows.clone(), vec![0.0, -1.0]).is_err());
        assert!(PiecewiseLinearPath::with_times(rows.clone(), vec![0.5, 1.0]).is_err());
        assert!(PiecewiseLinearPath::with_times(rows.clone(), vec![0.0, f64::INFINITY]).is_err());
        assert!(PiecewiseLinearPath::with_times(rows.clone(), vec![0.0, f64::NAN]).is_err());
        assert!(PiecewiseLinearPath::with_times(rows, vec![0.0]).unwrap_err().is_shape_error());
        assert!(PiecewiseLinearPath::with_times(vec![], vec![]).is_err());
        assert!(PiecewiseLinearPath::with_times(vec![vec![0.0], vec![0.0, 1.0]], vec![0.0, 1.0])
            .unwrap_err()
            .is_shape_error());
    }

    #[test]
    fn test_constant_speed_uses_fastest_joint() {
        let path =
            PiecewiseLinearPath::constant_speed(vec![vec![0.0, 0.0], vec![0.2, -1.0], vec![0.2, -1.0]], 2.0)
                .unwrap();
        assert_eq!(path.times(), &[0.0, 0.5, 0.5]);
        assert!(PiecewiseLinearPath::constant_speed(vec![vec![0.0]], 0.0).is_err());
    }

    #[test]
    fn test_single_waypoint_path() {
        let path = PiecewiseLinearPath::constant_speed(vec![vec![0.3, 0.4]], 1.0).unwrap();
        assert_eq!(path.duration(), 0.0);
        assert_eq!(path.position(1.0), vec![0.3, 0.4]);
        assert_eq!(path.velocity(0.0), vec![0.0, 0.0]);

        let trajectory = TrajectorySampler::new(["a"]).sample(&path, &["a", "b"]).unwrap();
        assert!(trajectory.is_empty());
    }

    #[test]
    fn test_samples_strictly_before_end() {
        let sampler = TrajectorySampler::new(["b"]).with_period(0.5);
        let trajectory = sampler.sample(&ramp(), &["a", "b"]).unwrap();
        let times: Vec<f64> = trajectory.points.iter().map(|p| p.time_from_start).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5]);
        assert_eq!(trajectory.points[1].positions, vec![1.0]);
        assert_eq!(trajectory.points[1].velocities, vec![2.0]);
    }

    #[test]
    fn test_default_period() {
        let trajectory = TrajectorySampler::new(["a"]).sample(&ramp(), &["a", "b"]).unwrap();
        assert_eq!(trajectory.len(), 375);
        assert_relative_eq!(trajectory.points[1].time_from_start, 0.008, epsilon = 1e-12);
    }

    #[test]
    fn test_commanded_joint_order() {
        let trajectory = TrajectorySampler::new(["b", "a"])
            .with_period(1.0)
            .sample(&ramp(), &["a", "b"])
            .unwrap();
        assert_eq!(trajectory.points[0].positions, vec![0.0, 0.0]);
        assert_eq!(trajectory.points[2].positions, vec![1.0, 1.0]);
        assert_eq!(trajectory.points[1].positions, vec![2.0, 1.0]);
    }

    #[test]
    fn test_unknown_commanded_joint() {
        let error = TrajectorySampler::new(["z"]).sample(&ramp(), &["a", "b"]).unwrap_err();
        assert_eq!(error, MotionError::UnknownJoint("z".to_string()));
    }

    #[test]
    fn test_invalid_period() {
        let error = TrajectorySampler::new(["a"])
            .with_period(0.0)
            .sample(&ramp(), &["a", "b"])
            .unwrap_err();
        assert!(matches!(error, MotionError::InvalidConfig(_)));
    }

    /// Still path with a fixed reported duration.
    struct Endless(f64);

    impl TimedPath for Endless {
        fn duration(&self) -> f64 {
            self.0
        }

        fn position(&self, _t: f64) -> Vec<f64> {
            vec![0.0]
        }

        fn velocity(&self, _t: f64) -> Vec<f64> {
            vec![0.0]
        }
    }

    #[test]
    fn test_unbounded_duration() {
        let sampler = TrajectorySampler::new(["a"]);
        for duration in [f64::INFINITY, f64::NAN, 1.0e5] {
            let error = sampler.sample(&Endless(duration), &["a"]).unwrap_err();
            assert!(matches!(error, MotionError::InvalidConfig(_)));
        }
        assert_eq!(sampler.sample(&Endless(0.04), &["a"]).unwrap().len(), 5);
    }

    #[test]
    fn test_short_path_rows() {
        let path = PiecewiseLinearPath::constant_speed(vec![vec![0.0], vec![1.0]], 1.0).unwrap();
        let error = TrajectorySampler::new(["b"]).sample(&path, &["a", "b"]).unwrap_err();
        assert!(error.is_shape_error());
    }
}
