//! C3: specializes a [`TransformRecipe`] against a concrete input shape.
//!
//! Grounded on `_reconstruct_from_shape_uncached` in the reference
//! implementation.

use crate::error::EinopsError;
use crate::recipe::TransformRecipe;

use super::types::CookedRecipe;

/// Runs steps 1-8 of the shape specializer, producing a [`CookedRecipe`].
pub fn reconstruct_from_shape(
    recipe: &TransformRecipe,
    shape: &[i64],
    axis_lengths: &[(&str, i64)],
) -> Result<CookedRecipe, EinopsError> {
    if shape.len() != recipe.input_composition.len() {
        return Err(EinopsError::RankMismatch {
            expected: recipe.input_composition.len(),
            got: shape.len(),
        });
    }

    // --- Step 1: seed per-elementary-axis lengths ---
    let mut lengths: Vec<Option<i64>> = recipe
        .elementary_axes_lengths
        .iter()
        .map(|l| match l {
            crate::recipe::AxisLength::Known(v) => Some(*v),
            crate::recipe::AxisLength::Unknown | crate::recipe::AxisLength::Expected => None,
        })
        .collect();
    for (name, value) in axis_lengths {
        if let Some(&pos) = recipe.axis_name_to_elementary_axis.get(*name) {
            lengths[pos] = Some(*value);
        }
    }

    // --- Step 2: resolve each input dimension against the runtime shape ---
    let mut need_init_reshape = false;
    for (dim, composite) in recipe.input_composition.iter().enumerate() {
        let runtime_len = shape[dim];
        if composite.known.is_empty() && composite.unknown.len() == 1 {
            lengths[composite.unknown[0]] = Some(runtime_len);
        } else {
            let known_product: i64 = composite
                .known
                .iter()
                .map(|&pos| lengths[pos].expect("known elementary axis resolved in step 1"))
                .product();
            match composite.unknown.first() {
                None => {
                    if runtime_len != known_product {
                        return Err(EinopsError::ShapeMismatchExact {
                            dim,
                            expected: known_product,
                            got: runtime_len,
                        });
                    }
                }
                Some(&unknown_pos) => {
                    if known_product == 0 || runtime_len % known_product != 0 {
                        return Err(EinopsError::ShapeMismatchDivisibility {
                            dim,
                            divisor: known_product,
                            got: runtime_len,
                        });
                    }
                    lengths[unknown_pos] = Some(runtime_len / known_product);
                }
            }
        }
        if composite.known.len() + composite.unknown.len() != 1 {
            // Either this dimension decomposes into more than one
            // elementary axis, or it's a unit group contributing none —
            // either way the tensor's physical rank changes and a reshape
            // is required before permuting.
            need_init_reshape = true;
        }
    }

    let lengths: Vec<i64> = lengths
        .into_iter()
        .map(|l| l.expect("every elementary axis resolved by shape or axis_lengths"))
        .collect();

    // --- Step 3: initial reshape target ---
    let n_permuted = recipe.axes_permutation.len();
    let init_shape = if need_init_reshape {
        Some(lengths[..n_permuted].to_vec())
    } else {
        None
    };

    // --- Step 4: permutation, omitted if identity ---
    let is_identity = recipe.axes_permutation.iter().enumerate().all(|(i, &p)| i == p);
    let permutation = if is_identity {
        None
    } else {
        Some(recipe.axes_permutation.clone())
    };

    // --- Step 5: reduced axis positions in the permuted layout ---
    let reduced_axes: Vec<usize> = (recipe.first_reduced_axis..n_permuted).collect();

    // --- Step 6: output shape, flagging the need for a final reshape ---
    let mut need_final_reshape = false;
    let final_values: Vec<i64> = recipe
        .output_composite_axes
        .iter()
        .map(|group| {
            // A group of anything other than exactly one axis changes the
            // tensor's physical rank at this dimension: more than one axis
            // merges dimensions, and zero axes (`()` or a literal `1` on
            // the right) introduces a unit dimension with no elementary
            // axis backing it — neither survives the permute/reduce/expand
            // steps on its own, so both force an explicit final reshape.
            if group.len() != 1 {
                need_final_reshape = true;
            }
            group.iter().map(|&pos| lengths[pos]).product()
        })
        .collect();
    let final_shape = if need_final_reshape { Some(final_values) } else { None };

    // --- Step 7: added axes with resolved lengths ---
    let added_axes_with_lengths: Vec<(usize, i64)> = recipe
        .added_axes
        .iter()
        .map(|&(out_pos, slot)| (out_pos, lengths[slot]))
        .collect();

    // --- Step 8: axis count once added_axes are inserted, i.e. after
    // reduction has already dropped `reduced_axes` in the execution order
    // reshape -> permute -> reduce -> expand -> reshape.
    let n_axes_after_adding = recipe.first_reduced_axis + added_axes_with_lengths.len();

    Ok(CookedRecipe {
        init_shape,
        permutation,
        reduced_axes,
        added_axes_with_lengths,
        final_shape,
        n_axes_after_adding,
    })
}
