//! State reprojection between transport order and model order.
//!
//! Positions use the configuration-space table; velocities and efforts share
//! the velocity-space table.

use motion_types::{
    ExternalVector, InternalVector, JointLayout, LayoutBijection, MotionError, Result,
};

use crate::telemetry::JointSample;

/// Position, velocity and effort of the robot in model order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasuredState {
    /// Joint positions.
    pub position: InternalVector,
    /// Joint velocities.
    pub velocity: InternalVector,
    /// Joint efforts.
    pub effort: InternalVector,
}

/// Applies a [`LayoutBijection`] to joint vectors.
///
/// # Example
///
/// ```
/// use motion_robot::StateReprojector;
/// use motion_types::{ExternalVector, JointLayout};
///
/// let model = JointLayout::revolute(&["a", "b", "c"])?;
/// let feed = model.reordered(&["c", "a", "b"])?;
/// let reprojector = StateReprojector::from_layouts(&model, &feed)?;
///
/// let q = reprojector.configuration_to_internal(&ExternalVector::new(vec![3.0, 1.0, 2.0]))?;
/// assert_eq!(q.as_slice(), &[1.0, 2.0, 3.0]);
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StateReprojector {
    bijection: LayoutBijection,
}

impl StateReprojector {
    /// Wraps a prebuilt bijection.
    #[must_use]
    pub const fn new(bijection: LayoutBijection) -> Self {
        Self { bijection }
    }

    /// Builds the bijection between a model layout and a feed layout.
    ///
    /// # Errors
    ///
    /// Fails if the layouts do not list the same joints with the same scalar
    /// counts.
    pub fn from_layouts(internal: &JointLayout, external: &JointLayout) -> Result<Self> {
        LayoutBijection::build(internal, external).map(Self::new)
    }

    /// Returns the underlying bijection.
    #[must_use]
    pub const fn bijection(&self) -> &LayoutBijection {
        &self.bijection
    }

    /// Reorders a configuration from transport order to model order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn configuration_to_internal(&self, q: &ExternalVector) -> Result<InternalVector> {
        self.bijection
            .configuration()
            .to_internal(q.as_slice())
            .map(InternalVector::new)
    }

    /// Reorders a configuration from model order to transport order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn configuration_to_external(&self, q: &InternalVector) -> Result<ExternalVector> {
        self.bijection
            .configuration()
            .to_external(q.as_slice())
            .map(ExternalVector::new)
    }

    /// Reorders a velocity from transport order to model order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn velocity_to_internal(&self, v: &ExternalVector) -> Result<InternalVector> {
        self.bijection
            .velocity()
            .to_internal(v.as_slice())
            .map(InternalVector::new)
    }

    /// Reorders a velocity from model order to transport order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn velocity_to_external(&self, v: &InternalVector) -> Result<ExternalVector> {
        self.bijection
            .velocity()
            .to_external(v.as_slice())
            .map(ExternalVector::new)
    }

    /// Reorders an effort from transport order to model order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn effort_to_internal(&self, tau: &ExternalVector) -> Result<InternalVector> {
        self.velocity_to_internal(tau)
    }

    /// Reorders an effort from model order to transport order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn effort_to_external(&self, tau: &InternalVector) -> Result<ExternalVector> {
        self.velocity_to_external(tau)
    }

    /// Reorders a whole telemetry sample into model order.
    ///
    /// Missing velocities or efforts are read as zeros.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if a reported vector has the
    /// wrong length.
    pub fn sample_to_internal(&self, sample: &JointSample) -> Result<MeasuredState> {
        let velocity_dim = self.bijection.velocity().len();
        let or_zeros = |values: &[f64]| {
            if values.is_empty() {
                ExternalVector::zeros(velocity_dim)
            } else {
                ExternalVector::new(values.to_vec())
            }
        };

        Ok(MeasuredState {
            position: self
                .configuration_to_internal(&ExternalVector::new(sample.positions.clone()))?,
            velocity: self.velocity_to_internal(&or_zeros(&sample.velocities))?,
            effort: self.effort_to_internal(&or_zeros(&sample.efforts))?,
        })
    }
}

/// Checks that a sample reports its joints in the order the reprojector expects.
pub(crate) fn check_sample_names(sample: &JointSample, external: &JointLayout) -> Result<()> {
    if sample.names.len() != external.len() {
        return Err(MotionError::shape(external.len(), sample.names.len()));
    }
    match sample
        .names
        .iter()
        .zip(external.names())
        .enumerate()
        .find(|(_, (reported, expected))| reported.as_str() != *expected)
    {
        Some((position, (reported, expected))) => Err(MotionError::FeedOrderChanged {
            position,
            expected: expected.to_string(),
            reported: reported.clone(),
        }),
        None => Ok(()),
    }
}
