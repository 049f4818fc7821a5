//! Integration tests for the robot binding.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use approx::assert_relative_eq;
use motion_robot::{
    JointSample, LatchedJointState, ModelEvaluator, PositionLimits, RobotBinding,
};
use motion_types::{InternalVector, JointKind, JointLayout, JointSpec, MotionError, Result};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

/// Planar two-link arm with a prismatic finger, links of length 1 along x.
#[derive(Debug)]
struct PlanarArm {
    layout: JointLayout,
    limits: PositionLimits,
}

impl PlanarArm {
    fn new() -> Self {
        let layout = JointLayout::new(vec![
            JointSpec::revolute("left_shoulder"),
            JointSpec::revolute("left_elbow"),
            JointSpec::from_kind("left_gripper", JointKind::Prismatic),
        ])
        .unwrap();
        let limits = PositionLimits::new(vec![-3.0, -3.0, 0.0], vec![3.0, 3.0, 0.04]).unwrap();
        Self { layout, limits }
    }
}

impl ModelEvaluator for PlanarArm {
    fn joint_layout(&self) -> &JointLayout {
        &self.layout
    }

    fn joint_limits(&self) -> &PositionLimits {
        &self.limits
    }

    fn frame_pose(&self, q: &InternalVector, joint: &str) -> Result<Isometry3<f64>> {
        if q.len() != 3 {
            return Err(MotionError::shape(3, q.len()));
        }
        let links = match joint {
            "left_shoulder" => 0,
            "left_elbow" => 1,
            "left_gripper" => 2,
            other => return Err(MotionError::UnknownJoint(other.to_string())),
        };
        let mut pose = Isometry3::identity();
        for i in 0..links {
            let step = Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), q[i]),
            ) * Translation3::new(1.0, 0.0, 0.0);
            pose *= step;
        }
        Ok(pose)
    }
}

/// Feed order: gripper first, then elbow, then shoulder.
fn feed(positions: Vec<f64>) -> JointSample {
    JointSample::new(["left_gripper", "left_elbow", "left_shoulder"], positions)
}

fn binding() -> RobotBinding<PlanarArm, LatchedJointState> {
    let source = LatchedJointState::with_sample(feed(vec![0.02, 0.0, FRAC_PI_2]));
    RobotBinding::new(PlanarArm::new(), source).unwrap()
}

#[test]
fn test_requires_first_sample() {
    let error = RobotBinding::new(PlanarArm::new(), LatchedJointState::new()).unwrap_err();
    assert_eq!(error, MotionError::TelemetryUnavailable);
}

#[test]
fn test_feed_with_unknown_joint() {
    let source = LatchedJointState::with_sample(JointSample::new(
        ["left_gripper", "left_elbow", "torso"],
        vec![0.0; 3],
    ));
    let error = RobotBinding::new(PlanarArm::new(), source).unwrap_err();
    assert!(error.is_configuration_mismatch());
}

#[test]
fn test_measured_configuration_in_model_order() {
    let robot = binding();
    assert_eq!(
        robot.joint_names(),
        vec!["left_shoulder", "left_elbow", "left_gripper"]
    );
    let q = robot.measured_configuration(false).unwrap();
    assert_eq!(q.as_slice(), &[FRAC_PI_2, 0.0, 0.02]);
}

#[test]
fn test_measured_state_reorders_velocity_and_effort() {
    let mut robot = binding();
    robot.source_mut().publish(
        feed(vec![0.0, 0.1, 0.2])
            .with_velocities(vec![3.0, 2.0, 1.0])
            .with_efforts(vec![30.0, 20.0, 10.0]),
    );
    let state = robot.measured_state(false).unwrap();
    assert_eq!(state.position.as_slice(), &[0.2, 0.1, 0.0]);
    assert_eq!(state.velocity.as_slice(), &[1.0, 2.0, 3.0]);
    assert_eq!(state.effort.as_slice(), &[10.0, 20.0, 30.0]);
}

#[test]
fn test_bounds_applied_unless_raw() {
    let mut robot = binding();
    robot.source_mut().publish(feed(vec![0.0405, 0.0, 0.0]));
    assert_eq!(
        robot.measured_configuration(false).unwrap().as_slice(),
        &[0.0, 0.0, 0.04]
    );
    assert_eq!(
        robot.measured_configuration(true).unwrap().as_slice(),
        &[0.0, 0.0, 0.0405]
    );

    robot.source_mut().publish(feed(vec![0.5, 0.0, 0.0]));
    let error = robot.measured_configuration(false).unwrap_err();
    assert!(matches!(error, MotionError::OutOfBounds { ref joint, .. } if joint == "left_gripper"));
    assert!(robot.measured_configuration(true).is_ok());
}

#[test]
fn test_reordered_feed_is_rejected() {
    let mut robot = binding();
    robot.source_mut().publish(JointSample::new(
        ["left_shoulder", "left_elbow", "left_gripper"],
        vec![0.0; 3],
    ));
    assert!(matches!(
        robot.measured_configuration(false),
        Err(MotionError::FeedOrderChanged { position: 0, .. })
    ));
}

#[test]
fn test_measured_pose() {
    let robot = binding();
    let tip = robot.measured_pose("left_gripper", None).unwrap();
    assert_relative_eq!(tip.translation.vector.x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(tip.translation.vector.y, 2.0, epsilon = 1e-12);

    let q = InternalVector::new(vec![0.0, 0.0, 0.0]);
    let elbow = robot.measured_pose("left_elbow", Some(&q)).unwrap();
    assert_relative_eq!(elbow.translation.vector.x, 1.0, epsilon = 1e-12);

    assert!(robot.measured_pose("head", None).is_err());
}

#[test]
fn test_is_at_config() {
    let robot = binding();
    let near = InternalVector::new(vec![FRAC_PI_2 + 0.05, -0.05, 0.02]);
    let far = InternalVector::new(vec![FRAC_PI_2 + 0.2, 0.0, 0.02]);
    assert!(robot.is_at(&near).unwrap());
    assert!(!robot.is_at(&far).unwrap());
    assert!(robot.is_at_config(&far, 0.25).unwrap());
    assert!(robot
        .is_at_config(&InternalVector::zeros(2), 0.1)
        .unwrap_err()
        .is_shape_error());
}

#[test]
fn test_groups_and_feed_order() {
    let robot = binding();
    assert_eq!(robot.groups().gripper(), &["left_gripper"]);
    assert_eq!(robot.groups().left_arm(), &["left_shoulder", "left_elbow"]);
    assert!(robot.groups().right_arm().is_empty());

    let q = InternalVector::new(vec![1.0, 2.0, 3.0]);
    assert_eq!(robot.to_feed_order(&q).unwrap().as_slice(), &[3.0, 2.0, 1.0]);
}
