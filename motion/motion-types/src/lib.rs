//! Core types for robot motion: joint layouts, index bijections and planning data.
//!
//! This crate provides the foundational types shared by the robot binding and
//! the manipulation planner. It has no I/O and talks to no external service.
//!
//! # Overview
//!
//! - **Layouts**: ordered joints with per-space scalar counts ([`JointLayout`],
//!   [`JointSpec`], [`JointKind`], [`DofSpace`])
//! - **Bijections**: permutation tables between the transport ordering and the
//!   model ordering ([`LayoutBijection`], [`IndexBijection`], [`reorder`])
//! - **Orderings**: scalar vectors tagged with the ordering they are expressed
//!   in ([`JointVector`], [`External`], [`Internal`])
//! - **Planning data**: target poses, robot-plus-target configurations, paths
//!   and goal candidates ([`TargetPose`], [`PlanningConfiguration`],
//!   [`RawPath`], [`PlannedPath`], [`GoalCandidate`])
//! - **Configuration**: planner, sampler and time-scaling settings
//!   ([`PlannerConfig`], [`SamplerConfig`], [`TimeScaling`])
//!
//! # Example
//!
//! ```
//! use motion_types::{JointKind, JointLayout, JointSpec, LayoutBijection};
//!
//! // Model order: base ball joint first, then the elbow.
//! let internal = JointLayout::new(vec![
//!     JointSpec::from_kind("ball", JointKind::Spherical),
//!     JointSpec::from_kind("elbow", JointKind::Revolute),
//! ])?;
//!
//! // The transport feed lists the elbow first.
//! let external = internal.reordered(&["elbow", "ball"])?;
//!
//! let bijection = LayoutBijection::build(&internal, &external)?;
//! assert_eq!(bijection.configuration().len(), 5);
//! assert_eq!(bijection.velocity().len(), 4);
//! # Ok::<(), motion_types::MotionError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![doc(html_root_url = "https://docs.rs/motion-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod bijection;
pub mod config;
pub mod configuration;
pub mod error;
pub mod layout;
pub mod ordering;
pub mod path;
pub mod pose;

// Re-export main types at crate root for convenience
pub use bijection::{reorder, IndexBijection, LayoutBijection};
pub use config::{
    PlannerConfig, SamplerConfig, TargetBounds, TimeScaling, DEFAULT_AT_CONFIG_THRESHOLD,
    DEFAULT_BOUNDS_TOLERANCE, DEFAULT_CONTROL_PERIOD, DEFAULT_MATCH_TOLERANCE,
};
pub use configuration::PlanningConfiguration;
pub use error::MotionError;
pub use layout::{DofSpace, JointKind, JointLayout, JointSpec};
pub use ordering::{External, ExternalVector, Internal, InternalVector, JointVector, Order};
pub use path::{GoalCandidate, PathHandle, PlannedPath, RawPath};
pub use pose::TargetPose;

/// Result type for motion operations.
pub type Result<T> = std::result::Result<T, MotionError>;
