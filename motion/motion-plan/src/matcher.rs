//! Configuration matching.

use motion_types::{
    GoalCandidate, MotionError, PlanningConfiguration, Result, TargetPose, DEFAULT_MATCH_TOLERANCE,
};

/// Returns `true` if `a` and `b` agree within `tolerance`, element-wise.
///
/// The comparison is inclusive. It is symmetric, and reflexive for every
/// non-negative tolerance.
///
/// # Errors
///
/// Returns [`MotionError::ShapeMismatch`] if the lengths differ.
///
/// # Example
///
/// ```
/// use motion_plan::configurations_match;
///
/// assert!(configurations_match(&[1.0, 2.0], &[1.005, 2.0], 0.01)?);
/// assert!(!configurations_match(&[1.0, 2.0], &[1.02, 2.0], 0.01)?);
/// assert!(configurations_match(&[1.0], &[1.0, 2.0], 0.01).is_err());
/// # Ok::<(), motion_types::MotionError>(())
/// ```
pub fn configurations_match(a: &[f64], b: &[f64], tolerance: f64) -> Result<bool> {
    if a.len() != b.len() {
        return Err(MotionError::shape(a.len(), b.len()));
    }
    Ok(a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance))
}

/// Configuration matcher with a fixed tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigurationMatcher {
    tolerance: f64,
}

impl Default for ConfigurationMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_TOLERANCE)
    }
}

impl ConfigurationMatcher {
    /// Creates a matcher.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Returns the tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Compares two scalar sequences.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if the lengths differ.
    pub fn matches(&self, a: &[f64], b: &[f64]) -> Result<bool> {
        configurations_match(a, b, self.tolerance)
    }

    /// Compares two full-system configurations.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if the robot parts differ in length.
    pub fn configurations(
        &self,
        a: &PlanningConfiguration,
        b: &PlanningConfiguration,
    ) -> Result<bool> {
        self.matches(&a.to_flat(), &b.to_flat())
    }

    /// Compares the target part of `waypoint` with `pose`.
    #[must_use]
    pub fn target_matches(&self, waypoint: &PlanningConfiguration, pose: &TargetPose) -> bool {
        let a = waypoint.target().to_scalars();
        let b = pose.to_scalars();
        a.iter().zip(&b).all(|(x, y)| (x - y).abs() <= self.tolerance)
    }

    /// Returns the first candidate whose pre-grasp configuration matches `end`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::ShapeMismatch`] if a candidate has a different
    /// robot dimension than `end`.
    pub fn find_terminating<'a>(
        &self,
        end: &PlanningConfiguration,
        candidates: &'a [GoalCandidate],
    ) -> Result<Option<&'a GoalCandidate>> {
        for candidate in candidates {
            if self.configurations(end, &candidate.pre_grasp)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use motion_types::InternalVector;
    use nalgebra::Point3;

    fn config(robot: &[f64], x: f64) -> PlanningConfiguration {
        PlanningConfiguration::new(
            InternalVector::new(robot.to_vec()),
            TargetPose::from_position(Point3::new(x, 0.0, 0.0)),
        )
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        assert!(configurations_match(&[0.0], &[0.5], 0.5).unwrap());
        assert!(!configurations_match(&[0.0], &[0.51], 0.5).unwrap());
    }

    #[test]
    fn test_empty_sequences_match() {
        assert!(configurations_match(&[], &[], 0.0).unwrap());
    }

    #[test]
    fn test_nan_never_matches() {
        assert!(!configurations_match(&[f64::NAN], &[f64::NAN], 1.0).unwrap());
    }

    #[test]
    fn test_target_matches_ignores_robot_part() {
        let matcher = ConfigurationMatcher::default();
        let waypoint = config(&[1.0, 2.0], 0.3);
        assert!(matcher.target_matches(&waypoint, &TargetPose::from_position(Point3::new(0.305, 0.0, 0.0))));
        assert!(!matcher.target_matches(&waypoint, &TargetPose::from_position(Point3::new(0.4, 0.0, 0.0))));
    }

    #[test]
    fn test_find_terminating_picks_first_match() {
        let matcher = ConfigurationMatcher::default();
        let candidates = vec![
            GoalCandidate::new(config(&[0.0, 0.0], 0.1), config(&[0.1, 0.0], 0.1)),
            GoalCandidate::new(config(&[1.0, 1.0], 0.1), config(&[1.1, 1.0], 0.1)),
            GoalCandidate::new(config(&[1.0, 1.005], 0.1), config(&[1.2, 1.0], 0.1)),
        ];
        let end = config(&[1.0, 1.0], 0.1);
        let found = matcher.find_terminating(&end, &candidates).unwrap().unwrap();
        assert_eq!(found.grasp, candidates[1].grasp);

        let nowhere = config(&[5.0, 5.0], 0.1);
        assert!(matcher.find_terminating(&nowhere, &candidates).unwrap().is_none());

        let wrong_dim = config(&[1.0], 0.1);
        assert!(matcher
            .find_terminating(&wrong_dim, &candidates)
            .unwrap_err()
            .is_shape_error());
    }
}
