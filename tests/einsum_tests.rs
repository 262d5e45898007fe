//! Black-box tests for the named-axis -> compact-letter einsum rewriter (C5),
//! through the public `einsum` module.

use einops_core::einsum::compactify_pattern_for_einsum;
use einops_core::EinopsError;

#[test]
fn attention_scores_pattern() {
    let compact = compactify_pattern_for_einsum("b h i d, b h j d -> b h i j").unwrap();
    assert_eq!(compact, "abcd,abed->abce");
}

#[test]
fn three_tensors_share_one_letter_pool() {
    let compact = compactify_pattern_for_einsum("a b, b c, c d -> a d").unwrap();
    assert_eq!(compact, "ab,bc,cd->ad");
}

#[test]
fn output_only_axis_is_rejected() {
    let err = compactify_pattern_for_einsum("i j -> i j k").unwrap_err();
    assert!(matches!(err, EinopsError::EinsumUnknownRightAxis { .. }));
}

#[test]
fn bare_underscore_is_a_valid_axis_name_in_einsum() {
    let compact = compactify_pattern_for_einsum("_ j -> j").unwrap();
    assert_eq!(compact, "ab->b");
}
