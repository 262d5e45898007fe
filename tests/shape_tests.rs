//! Black-box tests for shape specialization (C3), through the public
//! `cook` module.

use einops_core::cook::reconstruct_from_shape;
use einops_core::recipe::{prepare_transformation_recipe, Operation, ReduceOp};
use einops_core::EinopsError;

#[test]
fn identity_pattern_produces_no_steps_at_all() {
    let recipe = prepare_transformation_recipe("a b c -> a b c", Operation::Rearrange, &[], 3).unwrap();
    let cooked = reconstruct_from_shape(&recipe, &[2, 3, 4], &[]).unwrap();
    assert!(cooked.init_shape.is_none());
    assert!(cooked.permutation.is_none());
    assert!(cooked.reduced_axes.is_empty());
    assert!(cooked.added_axes_with_lengths.is_empty());
    assert!(cooked.final_shape.is_none());
}

#[test]
fn ellipsis_specializes_against_the_concrete_rank() {
    let recipe = prepare_transformation_recipe("... h w -> ... w h", Operation::Rearrange, &[], 4).unwrap();
    let cooked = reconstruct_from_shape(&recipe, &[2, 3, 5, 7], &[]).unwrap();
    // two batch dims pass through untouched, h/w swap.
    assert_eq!(cooked.permutation, Some(vec![0, 1, 3, 2]));
}

#[test]
fn merge_and_split_round_trip_through_the_same_recipe_shapes() {
    let merge = prepare_transformation_recipe("a b -> (a b)", Operation::Rearrange, &[], 2).unwrap();
    let cooked = reconstruct_from_shape(&merge, &[4, 5], &[]).unwrap();
    assert_eq!(cooked.final_shape, Some(vec![20]));

    let split = prepare_transformation_recipe("(a b) -> a b", Operation::Rearrange, &[("a", 4)], 1).unwrap();
    let cooked = reconstruct_from_shape(&split, &[20], &[("a", 4)]).unwrap();
    assert_eq!(cooked.init_shape, Some(vec![4, 5]));
}

#[test]
fn rank_mismatch_is_reported_with_both_sizes() {
    let recipe = prepare_transformation_recipe("a b -> b a", Operation::Rearrange, &[], 2).unwrap();
    let err = reconstruct_from_shape(&recipe, &[3, 4, 5], &[]).unwrap_err();
    assert!(matches!(err, EinopsError::RankMismatch { expected: 2, got: 3 }));
}

#[test]
fn underdetermined_dimension_is_rejected_at_plan_time() {
    // two unknowns packed into the same input dimension can never be
    // resolved from a single runtime size.
    let err = prepare_transformation_recipe("(a b) -> a b", Operation::Rearrange, &[], 1).unwrap_err();
    assert!(matches!(err, EinopsError::Underdetermined { .. }));
}

#[test]
fn reduce_over_a_named_axis_drops_it_from_the_final_shape() {
    let recipe = prepare_transformation_recipe("b (h h2) w -> b h w", Operation::Reduce(ReduceOp::Max), &[("h2", 2)], 3).unwrap();
    let cooked = reconstruct_from_shape(&recipe, &[1, 10, 7], &[("h2", 2)]).unwrap();
    assert_eq!(cooked.init_shape, Some(vec![1, 5, 2, 7]));
    assert_eq!(cooked.reduced_axes, vec![3]);
}
