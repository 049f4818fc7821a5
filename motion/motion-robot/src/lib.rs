//! Robot binding: telemetry reprojection and joint bounds validation.
//!
//! This crate ties a kinematic model to the joint-state feed of a real robot.
//! The feed and the model list the same joints in different orders; the
//! binding reorders every sample into model order, clamps sensor noise at the
//! joint limits and rejects illegal readings.
//!
//! # Overview
//!
//! - [`ModelEvaluator`]: the kinematic model collaborator (layout, limits,
//!   forward kinematics)
//! - [`JointStateSource`]: the telemetry collaborator, with the in-memory
//!   [`LatchedJointState`]
//! - [`StateReprojector`]: reorders positions, velocities and efforts
//! - [`BoundsValidator`]: clamps within tolerance, fails beyond it
//! - [`RobotBinding`]: all of the above behind one handle
//! - [`JointGroups`] and [`subset_indexes`]: joint subsets for commanding
//!
//! # Example
//!
//! ```
//! use motion_robot::{JointSample, StateReprojector};
//! use motion_types::JointLayout;
//!
//! let model = JointLayout::revolute(&["shoulder", "elbow", "wrist"])?;
//! let sample = JointSample::new(["wrist", "shoulder", "elbow"], vec![0.3, 0.1, 0.2]);
//!
//! let feed = model.reordered(&sample.names)?;
//! let reprojector = StateReprojector::from_layouts(&model, &feed)?;
//! let state = reprojector.sample_to_internal(&sample)?;
//!
//! assert_eq!(state.position.as_slice(), &[0.1, 0.2, 0.3]);
//! assert_eq!(state.velocity.as_slice(), &[0.0, 0.0, 0.0]);
//! # Ok::<(), motion_types::MotionError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for data types

#![doc(html_root_url = "https://docs.rs/motion-robot/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod bounds;
pub mod groups;
pub mod model;
pub mod reproject;
pub mod robot;
pub mod telemetry;

pub use bounds::BoundsValidator;
pub use groups::{subset_indexes, JointGroups};
pub use model::{ModelEvaluator, PositionLimits};
pub use reproject::{MeasuredState, StateReprojector};
pub use robot::RobotBinding;
pub use telemetry::{JointSample, JointStateSource, LatchedJointState};
