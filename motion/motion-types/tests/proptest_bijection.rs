//! Property-based tests for layout bijections.
//!
//! Run with: cargo test -p motion-types -- proptest

use motion_types::{reorder, DofSpace, JointKind, JointLayout, JointSpec, LayoutBijection};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_kind() -> impl Strategy<Value = JointKind> {
    prop_oneof![
        Just(JointKind::Revolute),
        Just(JointKind::Prismatic),
        Just(JointKind::Continuous),
        Just(JointKind::Spherical),
        Just(JointKind::Planar),
        Just(JointKind::FreeFlyer),
    ]
}

/// An internal layout and a shuffled external layout over the same joints.
fn arb_layouts() -> impl Strategy<Value = (JointLayout, JointLayout)> {
    prop::collection::vec(arb_kind(), 1..12)
        .prop_flat_map(|kinds| {
            let specs: Vec<JointSpec> = kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| JointSpec::from_kind(format!("joint_{i}"), *kind))
                .collect();
            let names: Vec<String> = specs.iter().map(|s| s.name().to_string()).collect();
            (Just(specs), Just(names).prop_shuffle())
        })
        .prop_map(|(specs, names)| {
            let internal = JointLayout::new(specs).expect("generated names are unique");
            let external = internal
                .reordered(&names)
                .expect("shuffle keeps the same joints");
            (internal, external)
        })
}

/// Layouts plus one configuration-space and one velocity-space vector in
/// internal order.
fn arb_layouts_with_vectors(
) -> impl Strategy<Value = (JointLayout, JointLayout, Vec<f64>, Vec<f64>)> {
    arb_layouts().prop_flat_map(|(internal, external)| {
        let config = prop::collection::vec(-10.0..10.0f64, internal.config_dim());
        let velocity = prop::collection::vec(-10.0..10.0f64, internal.velocity_dim());
        (Just(internal), Just(external), config, velocity)
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// forward and inverse undo each other in both spaces.
    #[test]
    fn tables_are_mutual_inverses((internal, external) in arb_layouts()) {
        let bijection = LayoutBijection::build(&internal, &external).unwrap();
        for space in [DofSpace::Configuration, DofSpace::Velocity] {
            let table = bijection.space(space);
            prop_assert_eq!(table.len(), internal.dim(space));
            for (p, &i) in table.forward().iter().enumerate() {
                prop_assert_eq!(table.inverse()[i], p);
            }
        }
    }

    /// Internal to external and back is the identity, independently per space.
    #[test]
    fn roundtrip_is_identity(
        (internal, external, q, v) in arb_layouts_with_vectors()
    ) {
        let bijection = LayoutBijection::build(&internal, &external).unwrap();

        let config = bijection.configuration();
        let q_ext = config.to_external(&q).unwrap();
        prop_assert_eq!(config.to_internal(&q_ext).unwrap(), q.clone());

        let velocity = bijection.velocity();
        let v_ext = velocity.to_external(&v).unwrap();
        prop_assert_eq!(velocity.to_internal(&v_ext).unwrap(), v);
    }

    /// Every joint keeps its own scalars, in order, after reprojection.
    #[test]
    fn joint_blocks_move_intact(
        (internal, external, q, _v) in arb_layouts_with_vectors()
    ) {
        let bijection = LayoutBijection::build(&internal, &external).unwrap();
        let q_ext = bijection.configuration().to_external(&q).unwrap();

        for (e, spec) in external.joints().iter().enumerate() {
            let i = internal.position(spec.name()).unwrap();
            let int_block = internal.block(i, DofSpace::Configuration).unwrap();
            let ext_block = external.block(e, DofSpace::Configuration).unwrap();
            prop_assert_eq!(&q[int_block], &q_ext[ext_block]);
        }
    }

    /// Identical layouts give identity tables and reorder is a no-op.
    #[test]
    fn identical_layouts_reorder_nothing(
        (internal, _external, q, _v) in arb_layouts_with_vectors()
    ) {
        let bijection = LayoutBijection::build(&internal, &internal).unwrap();
        prop_assert!(bijection.configuration().is_identity());
        prop_assert!(bijection.velocity().is_identity());
        prop_assert_eq!(reorder(&q, bijection.configuration().forward()).unwrap(), q);
    }

    /// A table of the wrong length is always a shape error.
    #[test]
    fn stale_table_is_shape_error(
        (internal, external, q, _v) in arb_layouts_with_vectors()
    ) {
        let bijection = LayoutBijection::build(&internal, &external).unwrap();
        let error = reorder(&q, bijection.velocity().forward());
        if internal.config_dim() == internal.velocity_dim() {
            prop_assert!(error.is_ok());
        } else {
            prop_assert!(error.unwrap_err().is_shape_error());
        }
    }
}
