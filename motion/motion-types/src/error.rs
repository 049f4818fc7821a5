//! Error types for motion operations.
//!
//! This module defines the [`MotionError`] enum which covers every failure the
//! motion crates can report, from layout disagreements at binding time to
//! inconsistent planner output during path segmentation.
//!
//! Only [`MotionError::NoSolutionFound`] is retryable. Everything else points
//! at a stale binding, an illegal reading or a logic bug upstream and must be
//! surfaced to the caller as-is.

use crate::layout::DofSpace;

/// Errors that can occur while binding, reprojecting or planning.
///
/// # Example
///
/// ```
/// use motion_types::MotionError;
///
/// let error = MotionError::ShapeMismatch { expected: 6, actual: 7 };
/// assert!(error.is_shape_error());
/// assert!(!error.is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum MotionError {
    /// A joint of one layout has no counterpart in the other.
    #[error("joint '{name}' is missing from the {layout} layout")]
    MissingJoint {
        /// Name of the joint that could not be found.
        name: String,
        /// Which layout lacks the joint ("internal" or "external").
        layout: &'static str,
    },

    /// A joint name appears twice in one layout.
    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// The two layouts disagree on how many scalars a joint contributes.
    #[error("joint '{name}' has {internal} {space} scalars internally but {external} externally")]
    ScalarCountMismatch {
        /// Name of the joint.
        name: String,
        /// The scalar space the counts refer to.
        space: DofSpace,
        /// Scalar count in the internal layout.
        internal: usize,
        /// Scalar count in the external layout.
        external: usize,
    },

    /// A joint name is unknown to the model.
    #[error("unknown joint: {0}")]
    UnknownJoint(String),

    /// The telemetry feed reports its joints in another order than at binding time.
    #[error("feed joint order changed: expected '{expected}' at position {position}, got '{reported}'")]
    FeedOrderChanged {
        /// Position in the sample where the names first differ.
        position: usize,
        /// Joint expected at that position.
        expected: String,
        /// Joint the feed reported there.
        reported: String,
    },

    /// An index table is not a permutation of `0..len`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// A vector has the wrong number of scalars.
    #[error("shape mismatch: expected {expected} scalars, got {actual}")]
    ShapeMismatch {
        /// Expected scalar count.
        expected: usize,
        /// Actual scalar count.
        actual: usize,
    },

    /// A reading lies further outside the joint limits than the clamp tolerance.
    #[error("joint {index} ({joint}) way out of bounds: {value} not in [{lower}, {upper}]")]
    OutOfBounds {
        /// Scalar index of the offending value (internal ordering).
        index: usize,
        /// Name of the joint that owns the scalar.
        joint: String,
        /// The offending value.
        value: f64,
        /// Lower limit.
        lower: f64,
        /// Upper limit.
        upper: f64,
    },

    /// The planner found no solution within its budget.
    #[error("no solution found: {0}")]
    NoSolutionFound(String),

    /// A solved path does not pass through a pose it is required to visit.
    #[error("segmentation inconsistency: {0}")]
    SegmentationInconsistency(String),

    /// A configuration could not be projected onto a required planner state.
    #[error("{what} configuration is not valid: {reason}")]
    ProjectionFailed {
        /// Which configuration failed ("initial", "end", ...).
        what: &'static str,
        /// Reason reported by the planner.
        reason: String,
    },

    /// The robot is not at the first configuration of a path it should execute.
    #[error("robot configuration differs from the path start by more than {threshold}")]
    StartMismatch {
        /// Per-joint tolerance that was exceeded.
        threshold: f64,
    },

    /// A path handle does not refer to a path known to the planner.
    #[error("unknown path handle: {0}")]
    UnknownPath(u64),

    /// No telemetry sample has been received yet.
    #[error("no joint state received on the telemetry feed")]
    TelemetryUnavailable,

    /// A pose could not be built from the given scalars.
    #[error("invalid pose: {0}")]
    InvalidPose(String),

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MotionError {
    /// Creates a missing joint error.
    #[must_use]
    pub fn missing_joint(name: impl Into<String>, layout: &'static str) -> Self {
        Self::MissingJoint {
            name: name.into(),
            layout,
        }
    }

    /// Creates a shape mismatch error.
    #[must_use]
    pub const fn shape(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }

    /// Creates a "no solution found" error with the given reason.
    #[must_use]
    pub fn no_solution(reason: impl Into<String>) -> Self {
        Self::NoSolutionFound(reason.into())
    }

    /// Creates a segmentation inconsistency error.
    #[must_use]
    pub fn segmentation(message: impl Into<String>) -> Self {
        Self::SegmentationInconsistency(message.into())
    }

    /// Creates an invalid configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::MotionError;
    ///
    /// let error = MotionError::invalid_config("velocity scale must be in (0, 1]");
    /// assert!(error.to_string().contains("velocity scale"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates an invalid pose error.
    #[must_use]
    pub fn invalid_pose(message: impl Into<String>) -> Self {
        Self::InvalidPose(message.into())
    }

    /// Returns `true` if the two joint layouts of a binding disagree.
    #[must_use]
    pub const fn is_configuration_mismatch(&self) -> bool {
        matches!(
            self,
            Self::MissingJoint { .. }
                | Self::DuplicateJoint(_)
                | Self::ScalarCountMismatch { .. }
                | Self::UnknownJoint(_)
                | Self::FeedOrderChanged { .. }
        )
    }

    /// Returns `true` if a vector had the wrong length.
    #[must_use]
    pub const fn is_shape_error(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    /// Returns `true` if a reading was rejected by the bounds validator.
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is a "no solution found" error.
    #[must_use]
    pub const fn is_no_solution(&self) -> bool {
        matches!(self, Self::NoSolutionFound(_))
    }

    /// Returns `true` if a caller may reasonably retry the operation.
    ///
    /// Only planner exhaustion is retryable (different start, looser
    /// tolerance, longer timeout).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.is_no_solution()
    }
}
