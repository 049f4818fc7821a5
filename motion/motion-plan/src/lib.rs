//! Manipulation planning on top of an external constraint-graph planner.
//!
//! The search itself is done by an external planner. This crate samples goal
//! candidates for it, matches and splits the paths it returns, and turns timed
//! paths into joint commands.
//!
//! # Overview
//!
//! - [`PlannerSession`], [`TimeParametrizer`], [`ConfigurationSampler`]: the
//!   collaborator seams, with [`UniformSampler`] as the default sampler
//! - [`PlanOutcome`]: "no path found" as a value rather than an error
//! - [`GoalSampler`]: rejection sampling of pre-grasp/grasp pairs
//! - [`ConfigurationMatcher`] and [`PathSegmenter`]: tolerance-based matching
//!   and pick/place/home splitting
//! - [`TaskPlanner`]: gripper approach and pick-and-place tasks
//! - [`TrajectorySampler`]: fixed-period joint commands from a [`TimedPath`]
//!
//! # Example
//!
//! ```
//! use motion_plan::{PathSegmenter, PiecewiseLinearPath, TimedPath};
//! use motion_types::{InternalVector, PlanningConfiguration, RawPath, TargetPose};
//! use nalgebra::Point3;
//!
//! let at = |x: f64| TargetPose::from_position(Point3::new(x, 0.0, 0.5));
//! let path: RawPath = [(0.0, 0.2), (0.3, 0.2), (0.6, 0.4), (0.0, 0.6)]
//!     .into_iter()
//!     .map(|(q, x)| PlanningConfiguration::new(InternalVector::new(vec![q]), at(x)))
//!     .collect();
//!
//! let parts = PathSegmenter::default()
//!     .segment(&path, &at(0.2), &at(0.6))?
//!     .split(&path)?;
//! let home = parts.home.as_ref().map(|p| p.len());
//! assert_eq!((parts.pick.len(), parts.place.len(), home), (2, 2, Some(2)));
//!
//! let timed = PiecewiseLinearPath::from_raw_path(&parts.place, 1.0)?;
//! assert!((timed.duration() - 0.3).abs() < 1e-12);
//! # Ok::<(), motion_types::MotionError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for data types

#![doc(html_root_url = "https://docs.rs/motion-plan/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod matcher;
pub mod planner;
pub mod sampler;
pub mod segment;
pub mod task;
pub mod trajectory;

// Re-export main types at crate root for convenience
pub use matcher::{configurations_match, ConfigurationMatcher};
pub use planner::{
    ConfigurationSampler, LockedJoint, PlanOutcome, PlannerSession, ProblemSetup, SymbolicState,
    TimeParametrizer, UniformSampler,
};
pub use sampler::{GoalSampler, SamplingStats};
pub use segment::{PathSegmenter, SegmentedPath, Segmentation};
pub use task::{ApproachRequest, PickAndPlacePaths, PickAndPlaceRequest, TaskPlanner};
pub use trajectory::{
    JointTrajectory, PiecewiseLinearPath, TimedPath, TrajectoryPoint, TrajectorySampler,
    MAX_COMMAND_POINTS,
};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod integration_tests {
    use super::*;
    use motion_types::{InternalVector, PlanningConfiguration, RawPath, TargetPose};
    use nalgebra::Point3;

    /// Segment a solved path, time each part and sample the place motion.
    #[test]
    fn test_segment_time_and_sample() {
        let at = |x: f64| TargetPose::from_position(Point3::new(x, 0.0, 0.0));
        let rows = [
            ([0.0, 0.0], 0.5),
            ([0.4, 0.0], 0.5),
            ([0.4, 0.4], 0.8),
            ([0.4, 0.8], 1.0),
            ([0.0, 0.0], 1.0),
        ];
        let path: RawPath = rows
            .iter()
            .map(|(q, x)| PlanningConfiguration::new(InternalVector::new(q.to_vec()), at(*x)))
            .collect();

        let segmentation = PathSegmenter::default()
            .segment(&path, &at(0.5), &at(1.0))
            .unwrap();
        assert_eq!(segmentation.pick, 0..=1);
        assert_eq!(segmentation.place, 1..=2);
        assert_eq!(segmentation.home, Some(2..=4));

        let parts = segmentation.split(&path).unwrap();
        let place = PiecewiseLinearPath::from_raw_path(&parts.place, 0.8).unwrap();
        assert!((place.duration() - 0.5).abs() < 1e-12);

        let trajectory = TrajectorySampler::new(["lift"])
            .with_period(0.1)
            .sample(&place, &["reach", "lift"])
            .unwrap();
        assert_eq!(trajectory.len(), 5);
        for point in &trajectory.points {
            assert!((point.velocities[0] - 0.8).abs() < 1e-12);
        }
    }
}
