//! Property-based tests for configuration matching and path segmentation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use motion_plan::{configurations_match, PathSegmenter};
use motion_types::{InternalVector, PlanningConfiguration, RawPath, TargetPose};
use nalgebra::Point3;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..12).prop_flat_map(|n| {
        (
            prop::collection::vec(-10.0f64..10.0, n),
            prop::collection::vec(-10.0f64..10.0, n),
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pick,
    Transit,
    Place,
}

const PICK_X: f64 = 1.0;
const PLACE_X: f64 = 2.0;

fn pose(x: f64) -> TargetPose {
    TargetPose::from_position(Point3::new(x, x, x))
}

fn path_from(phases: &[Phase]) -> RawPath {
    phases
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            let x = match phase {
                Phase::Pick => PICK_X,
                Phase::Transit => 1.5,
                Phase::Place => PLACE_X,
            };
            #[allow(clippy::cast_precision_loss)]
            let robot = InternalVector::new(vec![i as f64]);
            PlanningConfiguration::new(robot, pose(x))
        })
        .collect()
}

/// Ordered pick, transit and place phases.
fn arb_ordered() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..6, 0usize..6, 1usize..6)
}

/// Any phase sequence visiting both poses.
fn arb_phases() -> impl Strategy<Value = Vec<Phase>> {
    prop::collection::vec(
        prop_oneof![Just(Phase::Pick), Just(Phase::Transit), Just(Phase::Place)],
        2..20,
    )
    .prop_filter("visits both poses", |phases| {
        phases.contains(&Phase::Pick) && phases.contains(&Phase::Place)
    })
}

// =============================================================================
// Matching
// =============================================================================

proptest! {
    #[test]
    fn matching_is_symmetric((a, b) in arb_pair(), tolerance in 0.0f64..5.0) {
        prop_assert_eq!(
            configurations_match(&a, &b, tolerance).unwrap(),
            configurations_match(&b, &a, tolerance).unwrap()
        );
    }

    #[test]
    fn matching_is_reflexive((a, _) in arb_pair(), tolerance in 0.0f64..5.0) {
        prop_assert!(configurations_match(&a, &a, tolerance).unwrap());
    }

    #[test]
    fn larger_tolerance_keeps_matches((a, b) in arb_pair(), tolerance in 0.0f64..5.0) {
        if configurations_match(&a, &b, tolerance).unwrap() {
            prop_assert!(configurations_match(&a, &b, tolerance + 1.0).unwrap());
        }
    }

    #[test]
    fn length_mismatch_is_a_shape_error((a, _) in arb_pair()) {
        let longer: Vec<f64> = a.iter().copied().chain([0.0]).collect();
        prop_assert!(configurations_match(&a, &longer, 1.0).unwrap_err().is_shape_error());
    }
}

// =============================================================================
// Segmentation
// =============================================================================

proptest! {
    #[test]
    fn ordered_phases_split_at_boundaries((picks, transits, places) in arb_ordered()) {
        let mut phases = vec![Phase::Pick; picks];
        phases.extend(vec![Phase::Transit; transits]);
        phases.extend(vec![Phase::Place; places]);
        let path = path_from(&phases);
        let last = phases.len() - 1;

        let seg = PathSegmenter::default()
            .segment(&path, &pose(PICK_X), &pose(PLACE_X))
            .unwrap();

        prop_assert_eq!(seg.pick.clone(), 0..=picks - 1);
        let place_end = (picks + transits - 1).max(picks - 1);
        if place_end < last {
            prop_assert_eq!(seg.place.clone(), picks - 1..=place_end);
            prop_assert_eq!(seg.home.clone(), Some(place_end..=last));
        } else {
            prop_assert_eq!(seg.place.clone(), picks - 1..=last);
            prop_assert_eq!(seg.home.clone(), None);
        }
    }

    #[test]
    fn segmentation_covers_path(phases in arb_phases()) {
        let path = path_from(&phases);
        let last = phases.len() - 1;
        let seg = PathSegmenter::default()
            .segment(&path, &pose(PICK_X), &pose(PLACE_X))
            .unwrap();

        prop_assert_eq!(*seg.pick.start(), 0);
        prop_assert_eq!(seg.pick.end(), seg.place.start());
        prop_assert!(seg.place.start() <= seg.place.end());
        match &seg.home {
            Some(home) => {
                prop_assert_eq!(seg.place.end(), home.start());
                prop_assert!(home.start() < home.end());
                prop_assert_eq!(*home.end(), last);
            }
            None => prop_assert_eq!(*seg.place.end(), last),
        }

        let parts = seg.split(&path).unwrap();
        prop_assert_eq!(parts.pick.first(), path.first());
        let tail = parts.home.as_ref().unwrap_or(&parts.place);
        prop_assert_eq!(tail.last(), path.last());
    }

    #[test]
    fn path_without_pick_is_inconsistent(places in 1usize..8, transits in 0usize..4) {
        let mut phases = vec![Phase::Transit; transits];
        phases.extend(vec![Phase::Place; places]);
        let result = PathSegmenter::default().segment(&path_from(&phases), &pose(PICK_X), &pose(PLACE_X));
        prop_assert!(result.is_err());
    }
}
