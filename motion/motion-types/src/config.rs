//! Configuration types for binding, sampling and planning.
//!
//! # Example
//!
//! ```
//! use motion_types::{PlannerConfig, SamplerConfig, TimeScaling};
//! use std::time::Duration;
//!
//! let config = PlannerConfig::default()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_scaling(TimeScaling::new(0.5, 0.25))
//!     .with_sampler(SamplerConfig::default().with_max_attempts(20));
//!
//! assert!(config.validate().is_empty());
//! ```

use std::time::Duration;

use crate::pose::TargetPose;

/// Per-scalar tolerance used when comparing planner configurations.
///
/// Coarser than projection noise, finer than the distance between a pick and
/// a place pose.
pub const DEFAULT_MATCH_TOLERANCE: f64 = 0.01;

/// Largest correction the bounds validator applies silently.
pub const DEFAULT_BOUNDS_TOLERANCE: f64 = 1e-3;

/// Per-joint tolerance for deciding whether the robot is at a configuration.
pub const DEFAULT_AT_CONFIG_THRESHOLD: f64 = 0.1;

/// Period of the command stream in seconds (125 Hz).
pub const DEFAULT_CONTROL_PERIOD: f64 = 1.0 / 125.0;

/// Velocity and acceleration scale factors applied during time parametrization.
///
/// Both factors are relative to the maxima declared by the model and must lie
/// in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeScaling {
    /// Fraction of the maximum joint velocity.
    pub velocity: f64,
    /// Fraction of the maximum joint acceleration.
    pub acceleration: f64,
}

impl TimeScaling {
    /// Full speed.
    pub const FULL: Self = Self::new(1.0, 1.0);

    /// Creates a scaling from velocity and acceleration factors.
    #[must_use]
    pub const fn new(velocity: f64, acceleration: f64) -> Self {
        Self {
            velocity,
            acceleration,
        }
    }

    /// Sets the velocity factor.
    #[must_use]
    pub const fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the acceleration factor.
    #[must_use]
    pub const fn with_acceleration(mut self, acceleration: f64) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Returns `true` if both factors lie in `(0, 1]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        in_unit_interval(self.velocity) && in_unit_interval(self.acceleration)
    }

    /// Validates the scaling and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !in_unit_interval(self.velocity) {
            issues.push(format!(
                "velocity scale {} must be in (0, 1]",
                self.velocity
            ));
        }
        if !in_unit_interval(self.acceleration) {
            issues.push(format!(
                "acceleration scale {} must be in (0, 1]",
                self.acceleration
            ));
        }
        issues
    }
}

impl Default for TimeScaling {
    fn default() -> Self {
        Self::FULL
    }
}

fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

/// Budget of the goal candidate sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    max_attempts: usize,
    accept_target: usize,
}

impl SamplerConfig {
    /// Creates a sampler configuration with default settings.
    ///
    /// Defaults: 100 attempts, stop after 100 accepted candidates.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: 100,
            accept_target: 100,
        }
    }

    /// Sets the number of random draws before giving up.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the number of accepted candidates after which sampling stops.
    #[must_use]
    pub const fn with_accept_target(mut self, target: usize) -> Self {
        self.accept_target = target;
        self
    }

    /// Returns the attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns the accept target.
    #[must_use]
    pub const fn accept_target(&self) -> usize {
        self.accept_target
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.accept_target == 0 {
            issues.push("accept target of 0 never yields a candidate".to_string());
        }
        issues
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sampling bounds for the seven target scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetBounds {
    /// Lower bounds `(x, y, z, qx, qy, qz, qw)`.
    pub lower: [f64; TargetPose::SCALARS],
    /// Upper bounds `(x, y, z, qx, qy, qz, qw)`.
    pub upper: [f64; TargetPose::SCALARS],
}

impl TargetBounds {
    /// Creates bounds with a symmetric position extent and the unit quaternion box.
    #[must_use]
    pub const fn symmetric(extent: f64) -> Self {
        Self {
            lower: [-extent, -extent, -extent, -1.0, -1.0, -1.0, -1.0],
            upper: [extent, extent, extent, 1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Returns the bounds as `(lower, upper)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }

    /// Returns `true` if every lower bound is at most its upper bound.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pairs().all(|(lo, hi)| lo <= hi)
    }
}

impl Default for TargetBounds {
    fn default() -> Self {
        Self::symmetric(2.0)
    }
}

/// Settings handed to the planner at the start of each session.
///
/// # Example
///
/// ```
/// use motion_types::PlannerConfig;
/// use std::time::Duration;
///
/// let config = PlannerConfig::new();
/// assert_eq!(config.max_projection_iterations(), 40);
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    error_threshold: f64,
    max_projection_iterations: usize,
    timeout: Duration,
    approach_distance: f64,
    target_bounds: TargetBounds,
    max_joint_acceleration: f64,
    scaling: TimeScaling,
    sampler: SamplerConfig,
    match_tolerance: f64,
}

impl PlannerConfig {
    /// Creates a planner configuration with default settings.
    ///
    /// Defaults:
    /// - Projection error threshold: 1e-3
    /// - Projection iterations: 40
    /// - Timeout: 10 s
    /// - Approach distance: 0.1
    /// - Target bounds: position in `[-2, 2]`, quaternion in `[-1, 1]`
    /// - Max joint acceleration: π rad/s²
    /// - Full-speed time scaling
    /// - Match tolerance: [`DEFAULT_MATCH_TOLERANCE`]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            error_threshold: 1e-3,
            max_projection_iterations: 40,
            timeout: Duration::from_secs(10),
            approach_distance: 0.1,
            target_bounds: TargetBounds::symmetric(2.0),
            max_joint_acceleration: std::f64::consts::PI,
            scaling: TimeScaling::FULL,
            sampler: SamplerConfig::new(),
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
        }
    }

    /// Sets the projection error threshold.
    #[must_use]
    pub const fn with_error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Sets the maximum number of projection iterations.
    #[must_use]
    pub const fn with_max_projection_iterations(mut self, iterations: usize) -> Self {
        self.max_projection_iterations = iterations;
        self
    }

    /// Sets the wall-clock budget of a single solve.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the distance between pre-grasp and grasp.
    #[must_use]
    pub const fn with_approach_distance(mut self, distance: f64) -> Self {
        self.approach_distance = distance;
        self
    }

    /// Sets the sampling bounds of the target scalars.
    #[must_use]
    pub const fn with_target_bounds(mut self, bounds: TargetBounds) -> Self {
        self.target_bounds = bounds;
        self
    }

    /// Sets the joint acceleration ceiling used by time parametrization.
    #[must_use]
    pub const fn with_max_joint_acceleration(mut self, acceleration: f64) -> Self {
        self.max_joint_acceleration = acceleration;
        self
    }

    /// Sets the time scaling.
    #[must_use]
    pub const fn with_scaling(mut self, scaling: TimeScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Sets the goal sampler budget.
    #[must_use]
    pub const fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets the configuration match tolerance.
    #[must_use]
    pub const fn with_match_tolerance(mut self, tolerance: f64) -> Self {
        self.match_tolerance = tolerance;
        self
    }

    /// Returns the projection error threshold.
    #[must_use]
    pub const fn error_threshold(&self) -> f64 {
        self.error_threshold
    }

    /// Returns the maximum number of projection iterations.
    #[must_use]
    pub const fn max_projection_iterations(&self) -> usize {
        self.max_projection_iterations
    }

    /// Returns the solve timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
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

    /// Returns the joint acceleration ceiling.
    #[must_use]
    pub const fn max_joint_acceleration(&self) -> f64 {
        self.max_joint_acceleration
    }

    /// Returns the time scaling.
    #[must_use]
    pub const fn scaling(&self) -> TimeScaling {
        self.scaling
    }

    /// Returns a mutable reference to the time scaling.
    pub fn scaling_mut(&mut self) -> &mut TimeScaling {
        &mut self.scaling
    }

    /// Returns the sampler budget.
    #[must_use]
    pub const fn sampler(&self) -> SamplerConfig {
        self.sampler
    }

    /// Returns the match tolerance.
    #[must_use]
    pub const fn match_tolerance(&self) -> f64 {
        self.match_tolerance
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.scaling.validate();
        issues.extend(self.sampler.validate());

        if self.error_threshold <= 0.0 {
            issues.push(format!(
                "error threshold {} must be positive",
                self.error_threshold
            ));
        }
        if self.max_projection_iterations == 0 {
            issues.push("projection needs at least one iteration".to_string());
        }
        if self.timeout.is_zero() {
            issues.push("timeout must be non-zero".to_string());
        }
        if self.approach_distance < 0.0 {
            issues.push(format!(
                "approach distance {} must not be negative",
                self.approach_distance
            ));
        }
        if !self.target_bounds.is_valid() {
            issues.push("target bounds have lower > upper".to_string());
        }
        if self.max_joint_acceleration <= 0.0 {
            issues.push(format!(
                "max joint acceleration {} must be positive",
                self.max_joint_acceleration
            ));
        }
        if self.match_tolerance < 0.0 {
            issues.push(format!(
                "match tolerance {} must not be negative",
                self.match_tolerance
            ));
        }

        issues
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
