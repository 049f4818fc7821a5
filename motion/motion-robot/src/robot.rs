//! Robot binding: a kinematic model tied to a telemetry feed.

use nalgebra::Isometry3;
use tracing::{debug, info};

use motion_types::{
    ExternalVector, InternalVector, JointLayout, MotionError, Result,
    DEFAULT_AT_CONFIG_THRESHOLD,
};

use crate::bounds::BoundsValidator;
use crate::groups::JointGroups;
use crate::model::ModelEvaluator;
use crate::reproject::{check_sample_names, MeasuredState, StateReprojector};
use crate::telemetry::{JointSample, JointStateSource};

/// A kinematic model bound to the joint-state feed of the real robot.
///
/// Everything the binding returns is in model order. The bijection between
/// the feed order and the model order is built once, from the first sample,
/// and never changes afterwards.
///
/// # Example
///
/// ```ignore
/// let binding = RobotBinding::new(model, feed)?;
/// let q = binding.measured_configuration(false)?;
/// assert!(binding.is_at_config(&q, 0.1)?);
/// ```
#[derive(Debug)]
pub struct RobotBinding<M, S> {
    model: M,
    source: S,
    external: JointLayout,
    reprojector: StateReprojector,
    bounds: BoundsValidator,
    groups: JointGroups,
}

impl<M: ModelEvaluator, S: JointStateSource> RobotBinding<M, S> {
    /// Binds `model` to `source`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::TelemetryUnavailable`] if the feed has not
    /// published yet, and a configuration-mismatch error if the feed and the
    /// model disagree on the joints.
    pub fn new(model: M, source: S) -> Result<Self> {
        let sample = source
            .latest_joint_sample()
            .ok_or(MotionError::TelemetryUnavailable)?;

        let internal = model.joint_layout();
        let external = internal.reordered(&sample.names)?;
        let reprojector = StateReprojector::from_layouts(internal, &external)?;
        let bounds = BoundsValidator::new(internal, model.joint_limits().clone())?;
        let names: Vec<&str> = internal.names().collect();
        let groups = JointGroups::from_names(&names);

        info!(
            joints = internal.len(),
            nq = internal.config_dim(),
            nv = internal.velocity_dim(),
            reordered = !reprojector.bijection().configuration().is_identity(),
            "Bound robot model to joint-state feed"
        );

        Ok(Self {
            model,
            source,
            external,
            reprojector,
            bounds,
            groups,
        })
    }

    /// Returns the model.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Returns the telemetry source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the telemetry source mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Returns the reprojector.
    pub const fn reprojector(&self) -> &StateReprojector {
        &self.reprojector
    }

    /// Returns the bounds validator.
    pub const fn bounds(&self) -> &BoundsValidator {
        &self.bounds
    }

    /// Returns the joint groups.
    pub const fn groups(&self) -> &JointGroups {
        &self.groups
    }

    /// Returns the feed layout.
    pub const fn external_layout(&self) -> &JointLayout {
        &self.external
    }

    /// Returns the joint names in model order.
    pub fn joint_names(&self) -> Vec<String> {
        self.model.joint_layout().names().map(str::to_string).collect()
    }

    /// Reads position, velocity and effort, in model order.
    ///
    /// Unless `raw` is set, the position is validated against the joint limits.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::TelemetryUnavailable`] if the feed is empty,
    /// [`MotionError::FeedOrderChanged`] if the feed changed its joint order, a
    /// shape error on malformed samples and [`MotionError::OutOfBounds`] for an
    /// illegal reading.
    pub fn measured_state(&self, raw: bool) -> Result<MeasuredState> {
        let sample = self.latest_sample()?;
        let mut state = self.reprojector.sample_to_internal(&sample)?;
        if !raw {
            state.position = self.bounds.validate(&state.position)?;
        }
        Ok(state)
    }

    /// Reads the configuration in model order.
    ///
    /// # Errors
    ///
    /// See [`RobotBinding::measured_state`].
    pub fn measured_configuration(&self, raw: bool) -> Result<InternalVector> {
        self.measured_state(raw).map(|state| state.position)
    }

    /// Computes the world placement of `joint`.
    ///
    /// Uses `q` when given, otherwise the measured configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration cannot be read or the model does not know
    /// `joint`.
    pub fn measured_pose(&self, joint: &str, q: Option<&InternalVector>) -> Result<Isometry3<f64>> {
        match q {
            Some(q) => self.model.frame_pose(q, joint),
            None => self.model.frame_pose(&self.measured_configuration(false)?, joint),
        }
    }

    /// Returns `true` if every joint is within `threshold` of `q`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if `q` has the wrong length, or
    /// any error of [`RobotBinding::measured_configuration`].
    pub fn is_at_config(&self, q: &InternalVector, threshold: f64) -> Result<bool> {
        let current = self.measured_configuration(false)?;
        if q.len() != current.len() {
            return Err(MotionError::shape(current.len(), q.len()));
        }
        let at_config = q
            .iter()
            .zip(current.iter())
            .all(|(target, measured)| (target - measured).abs() <= threshold);
        debug!(at_config, threshold, "Compared robot to configuration");
        Ok(at_config)
    }

    /// [`RobotBinding::is_at_config`] with the default threshold.
    ///
    /// # Errors
    ///
    /// See [`RobotBinding::is_at_config`].
    pub fn is_at(&self, q: &InternalVector) -> Result<bool> {
        self.is_at_config(q, DEFAULT_AT_CONFIG_THRESHOLD)
    }

    /// Converts a model-order configuration into feed order, for commanding.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] on a length mismatch.
    pub fn to_feed_order(&self, q: &InternalVector) -> Result<ExternalVector> {
        self.reprojector.configuration_to_external(q)
    }

    fn latest_sample(&self) -> Result<JointSample> {
        let sample = self
            .source
            .latest_joint_sample()
            .ok_or(MotionError::TelemetryUnavailable)?;
        check_sample_names(&sample, &self.external)?;
        Ok(sample)
    }
}
