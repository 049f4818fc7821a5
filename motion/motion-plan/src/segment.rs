//! Splitting of a solved pick-and-place path into pick, place and home parts.
//!
//! A pick-and-place solve returns one path that approaches the target, carries
//! it and returns. The target part of each waypoint tells which phase the
//! waypoint belongs to:
//!
//! - the pick part ends at the last waypoint whose target is still at the
//!   pick pose,
//! - the place part ends at the last waypoint whose target is not yet at the
//!   place pose,
//! - the home part runs from there to the end.
//!
//! Consecutive parts share their boundary waypoint, so each part starts where
//! the previous one stopped.

use std::ops::RangeInclusive;

use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use motion_types::{MotionError, RawPath, Result, TargetPose};

use crate::matcher::ConfigurationMatcher;

/// Inclusive waypoint index ranges of the three parts of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segmentation {
    /// Approach to the pick pose and grasp.
    pub pick: RangeInclusive<usize>,
    /// Transport of the target to the place pose.
    pub place: RangeInclusive<usize>,
    /// Return motion, absent when the path ends at the place boundary.
    pub home: Option<RangeInclusive<usize>>,
}

impl Segmentation {
    /// Copies each part of `path` into its own path.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::SegmentationInconsistency`] if a range does not
    /// fit `path`.
    pub fn split(&self, path: &RawPath) -> Result<SegmentedPath> {
        let part = |range: &RangeInclusive<usize>, name: &str| {
            path.slice(range.clone()).ok_or_else(|| {
                MotionError::segmentation(format!(
                    "{name} range {range:?} does not fit a path of {} waypoints",
                    path.len()
                ))
            })
        };
        Ok(SegmentedPath {
            pick: part(&self.pick, "pick")?,
            place: part(&self.place, "place")?,
            home: self.home.as_ref().map(|r| part(r, "home")).transpose()?,
        })
    }
}

/// A path split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedPath {
    /// Pick part.
    pub pick: RawPath,
    /// Place part.
    pub place: RawPath,
    /// Home part, if any.
    pub home: Option<RawPath>,
}

/// Finds the pick, place and home parts of a path.
///
/// # Example
///
/// ```
/// use motion_plan::PathSegmenter;
/// use motion_types::{RawPath, TargetPose};
/// use nalgebra::Point3;
///
/// let pick = TargetPose::from_position(Point3::new(1.0, 1.0, 1.0));
/// let place = TargetPose::from_position(Point3::new(2.0, 2.0, 2.0));
/// let row = |x: f64| {
///     let mut r = vec![0.0];
///     r.extend(TargetPose::from_position(Point3::new(x, x, x)).to_scalars());
///     r
/// };
/// let path = RawPath::from_flat(&[row(1.0), row(1.0), row(1.5), row(1.8), row(2.0)], 1)?;
///
/// let parts = PathSegmenter::default().segment(&path, &pick, &place)?;
/// assert_eq!(parts.pick, 0..=1);
/// assert_eq!(parts.place, 1..=3);
/// assert_eq!(parts.home, Some(3..=4));
/// # Ok::<(), motion_types::MotionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathSegmenter {
    matcher: ConfigurationMatcher,
}

impl PathSegmenter {
    /// Creates a segmenter comparing target poses with `matcher`.
    #[must_use]
    pub const fn new(matcher: ConfigurationMatcher) -> Self {
        Self { matcher }
    }

    /// Creates a segmenter with the given tolerance.
    #[must_use]
    pub const fn with_tolerance(tolerance: f64) -> Self {
        Self::new(ConfigurationMatcher::new(tolerance))
    }

    /// Returns the matcher.
    #[must_use]
    pub const fn matcher(&self) -> &ConfigurationMatcher {
        &self.matcher
    }

    /// Computes the ranges of the three parts of `path`.
    ///
    /// The place part ends *at* the last waypoint whose target does not match
    /// `place`, not one past it, but never before the pick boundary. The home
    /// part starts at that same waypoint, so its first step still carries the
    /// target onto the place pose. When no such waypoint remains before the
    /// end of the path, the place part runs to the end and there is no home
    /// part.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::SegmentationInconsistency`] if no waypoint
    /// matches `pick` or none matches `place`.
    pub fn segment(
        &self,
        path: &RawPath,
        pick: &TargetPose,
        place: &TargetPose,
    ) -> Result<Segmentation> {
        let mut pick_end = None;
        let mut in_transit = None;
        let mut place_seen = false;

        for (index, waypoint) in path.iter().enumerate() {
            if self.matcher.target_matches(waypoint, pick) {
                pick_end = Some(index);
            }
            if self.matcher.target_matches(waypoint, place) {
                place_seen = true;
            } else {
                in_transit = Some(index);
            }
        }

        let pick_end = pick_end.ok_or_else(|| {
            MotionError::segmentation(format!(
                "none of {} waypoints reaches the pick pose",
                path.len()
            ))
        })?;
        if !place_seen {
            return Err(MotionError::segmentation(format!(
                "none of {} waypoints reaches the place pose",
                path.len()
            )));
        }

        let last = path.len() - 1;
        let segmentation = match in_transit.map(|i| i.max(pick_end)) {
            Some(place_end) if place_end < last => Segmentation {
                pick: 0..=pick_end,
                place: pick_end..=place_end,
                home: Some(place_end..=last),
            },
            boundary => {
                if boundary == Some(last) {
                    warn!(last, "Path does not end at the place pose");
                }
                Segmentation {
                    pick: 0..=pick_end,
                    place: pick_end..=last,
                    home: None,
                }
            }
        };

        debug!(
            waypoints = path.len(),
            pick_end,
            place_end = *segmentation.place.end(),
            has_home = segmentation.home.is_some(),
            "Segmented path"
        );
        Ok(segmentation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use motion_types::{InternalVector, PlanningConfiguration};
    use nalgebra::Point3;

    fn pose(v: f64) -> TargetPose {
        TargetPose::from_position(Point3::new(v, v, v))
    }

    fn path(targets: &[f64]) -> RawPath {
        targets
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                #[allow(clippy::cast_precision_loss)]
                let robot = InternalVector::new(vec![i as f64]);
                PlanningConfiguration::new(robot, pose(t))
            })
            .collect()
    }

    #[test]
    fn test_pick_transit_place_home() {
        let seg = PathSegmenter::default()
            .segment(&path(&[1.0, 1.0, 1.5, 1.8, 2.0]), &pose(1.0), &pose(2.0))
            .unwrap();
        assert_eq!(seg.pick, 0..=1);
        assert_eq!(seg.place, 1..=3);
        assert_eq!(seg.home, Some(3..=4));
    }

    #[test]
    fn test_home_continues_at_place_pose() {
        // The robot lets go and returns; the target stays at the place pose.
        let seg = PathSegmenter::default()
            .segment(&path(&[1.0, 1.5, 2.0, 2.0, 2.0]), &pose(1.0), &pose(2.0))
            .unwrap();
        assert_eq!(seg.pick, 0..=0);
        assert_eq!(seg.place, 0..=1);
        assert_eq!(seg.home, Some(1..=4));
    }

    #[test]
    fn test_every_waypoint_at_place() {
        // Pick and place coincide: no transport and no separate home motion.
        let seg = PathSegmenter::default()
            .segment(&path(&[2.0, 2.0, 2.0]), &pose(2.0), &pose(2.0))
            .unwrap();
        assert_eq!(seg.pick, 0..=2);
        assert_eq!(seg.place, 2..=2);
        assert_eq!(seg.home, None);
    }

    #[test]
    fn test_path_ending_in_transit_has_no_home() {
        let seg = PathSegmenter::default()
            .segment(&path(&[1.0, 2.0, 1.5]), &pose(1.0), &pose(2.0))
            .unwrap();
        assert_eq!(seg.place, 0..=2);
        assert_eq!(seg.home, None);
    }

    #[test]
    fn test_missing_pick_pose() {
        let error = PathSegmenter::default()
            .segment(&path(&[1.5, 2.0]), &pose(1.0), &pose(2.0))
            .unwrap_err();
        assert!(matches!(error, MotionError::SegmentationInconsistency(_)));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_missing_place_pose() {
        let error = PathSegmenter::default()
            .segment(&path(&[1.0, 1.5]), &pose(1.0), &pose(2.0))
            .unwrap_err();
        assert!(matches!(error, MotionError::SegmentationInconsistency(_)));
    }

    #[test]
    fn test_empty_path() {
        assert!(PathSegmenter::default()
            .segment(&RawPath::default(), &pose(1.0), &pose(2.0))
            .is_err());
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let waypoints = path(&[1.0, 1.05, 2.0]);
        let coarse = PathSegmenter::with_tolerance(0.1)
            .segment(&waypoints, &pose(1.0), &pose(2.0))
            .unwrap();
        assert_eq!(coarse.pick, 0..=1);

        let fine = PathSegmenter::default()
            .segment(&waypoints, &pose(1.0), &pose(2.0))
            .unwrap();
        assert_eq!(fine.pick, 0..=0);
    }

    #[test]
    fn test_split_shares_boundaries() {
        let waypoints = path(&[1.0, 1.0, 1.5, 1.8, 2.0]);
        let seg = PathSegmenter::default()
            .segment(&waypoints, &pose(1.0), &pose(2.0))
            .unwrap();
        let parts = seg.split(&waypoints).unwrap();
        assert_eq!(parts.pick.len(), 2);
        assert_eq!(parts.place.len(), 3);
        assert_eq!(parts.pick.last(), parts.place.first());
        let home = parts.home.unwrap();
        assert_eq!(parts.place.last(), home.first());
        assert_eq!(home.last(), waypoints.last());
    }

    #[test]
    fn test_split_rejects_foreign_ranges() {
        let seg = Segmentation {
            pick: 0..=1,
            place: 1..=9,
            home: None,
        };
        assert!(seg.split(&path(&[1.0, 2.0])).is_err());
    }
}
