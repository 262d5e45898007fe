//! C2: turns a pattern string plus an [`Operation`] into a shape-independent
//! [`TransformRecipe`].
//!
//! Grounded on `_prepare_transformation_recipe` in the reference
//! implementation: split the pattern, validate it against the requested
//! operation, expand `...`, enumerate elementary axes in a stable order,
//! partition each input dimension into known/unknown elementary axes, and
//! derive the post-reshape permutation and the output grouping.

use hashbrown::HashSet;

use crate::axis::{validate_identifier, AxisName};
use crate::error::{names_list, EinopsError};
use crate::expr::{parse_side, CompositionElement, ParsedExpression};
use crate::ordered_map::OrderedMap;

use super::hashing::recipe_cache_key;
use super::types::{AxisLength, InputComposite, Operation, TransformRecipe};

/// Plans a [`TransformRecipe`] for `pattern` under `operation`, against a
/// tensor of rank `ndim`, with the caller's `axis_lengths` hints.
///
/// `axis_lengths` entries name an axis that is either already on the left
/// (to assert a length at cook time) or new on the right (`repeat`'s new
/// axes, which must be given a length here or at the pattern level as an
/// anonymous axis).
pub fn prepare_transformation_recipe(
    pattern: &str,
    operation: Operation,
    axis_lengths: &[(&str, i64)],
    ndim: usize,
) -> Result<TransformRecipe, EinopsError> {
    // --- Step A: split on '->' ---
    let (left_text, right_text) = split_pattern(pattern)?;

    let left = parse_side(left_text, false, false)?;
    let rght = parse_side(right_text, false, false)?;

    validate_for_operation(pattern, operation, &left, &rght)?;

    // --- Step C: ellipsis expansion ---
    let (left, rght, ellipsis_ndim) = expand_ellipsis(pattern, &left, &rght, ndim)?;

    if !left.has_ellipsis {
        let explicit = left.composition.len();
        if explicit != ndim {
            return Err(EinopsError::RankMismatch {
                expected: explicit,
                got: ndim,
            });
        }
    }
    let _ = ellipsis_ndim;

    // --- Step D: enumerate elementary axes in insertion order ---
    let mut known_lengths: OrderedMap<AxisName, AxisLength> = OrderedMap::new();
    for axis in left.axes_in_order() {
        insert_elementary(&mut known_lengths, axis);
    }
    let mut seen_right_names: HashSet<&AxisName> = HashSet::new();
    for axis in rght.axes_in_order() {
        if seen_right_names.insert(axis) && !known_lengths.contains_key(axis) {
            insert_elementary(&mut known_lengths, axis);
        }
    }

    let mut axis_name_to_elementary_axis = hashbrown::HashMap::new();
    for (name, value) in axis_lengths {
        validate_identifier(name, false).map_err(|reason| EinopsError::BadIdentifier {
            name: (*name).to_string(),
            reason,
        })?;
        let axis = AxisName::named(*name);
        let position = known_lengths.position(&axis).ok_or_else(|| EinopsError::UnusedAxisLength {
            name: (*name).to_string(),
            pattern: pattern.to_string(),
        })?;
        known_lengths.insert(axis, AxisLength::Known(*value));
        axis_name_to_elementary_axis.insert((*name).to_string(), position);
    }
    if operation == Operation::Repeat {
        let missing: Vec<String> = rght
            .axes_in_order()
            .filter(|axis| !left.contains(*axis))
            .filter(|axis| known_lengths.get(*axis) == Some(&AxisLength::Unknown))
            .map(|axis| (*axis).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EinopsError::MissingLengthForNewAxis { names: missing });
        }
    }

    let elementary_axes_lengths: Vec<AxisLength> = known_lengths.values_in_order().copied().collect();

    // --- Step E: per-input-dimension known/unknown partitioning ---
    let mut input_composition = Vec::with_capacity(left.composition.len());
    for element in &left.composition {
        let mut composite = InputComposite::default();
        for axis in element.axes() {
            let position = known_lengths.position(axis).expect("elementary axis enumerated above");
            match known_lengths.get(axis).expect("present") {
                AxisLength::Unknown => composite.unknown.push(position),
                AxisLength::Known(_) | AxisLength::Expected => composite.known.push(position),
            }
        }
        if composite.unknown.len() > 1 {
            let names = names_list(element.axes().iter().filter(|a| known_lengths.get(*a) == Some(&AxisLength::Unknown)));
            return Err(EinopsError::Underdetermined { names });
        }
        input_composition.push(composite);
    }

    // --- Step F: permutation + reduced-axis split ---
    let ordered_left: Vec<&AxisName> = left.axes_in_order().collect();
    let ordered_rght: Vec<&AxisName> = rght.axes_in_order().collect();

    let reduced_axes: Vec<&AxisName> = ordered_left
        .iter()
        .copied()
        .filter(|axis| !rght.contains(*axis))
        .collect();

    let mut order_after_transposition: Vec<&AxisName> = ordered_rght
        .iter()
        .copied()
        .filter(|axis| left.contains(*axis))
        .collect();
    let n_kept = order_after_transposition.len();
    order_after_transposition.extend(reduced_axes.iter().copied());

    let axes_permutation: Vec<usize> = order_after_transposition
        .iter()
        .map(|axis| known_lengths.position(*axis).expect("elementary axis"))
        .collect();
    let first_reduced_axis = n_kept;

    // --- Step G: added axes + output grouping ---
    let mut added_axes = Vec::new();
    for (out_pos, axis) in ordered_rght.iter().enumerate() {
        if !left.contains(*axis) {
            let position = known_lengths.position(*axis).expect("elementary axis");
            added_axes.push((out_pos, position));
        }
    }

    let output_composite_axes: Vec<Vec<usize>> = rght
        .composition
        .iter()
        .map(|element| {
            element
                .axes()
                .iter()
                .map(|axis| known_lengths.position(axis).expect("elementary axis"))
                .collect()
        })
        .collect();

    let recipe_hash = recipe_cache_key(pattern, operation.as_str(), axis_lengths, ndim);

    Ok(TransformRecipe {
        elementary_axes_lengths,
        axis_name_to_elementary_axis,
        input_composition,
        axes_permutation,
        first_reduced_axis,
        added_axes,
        output_composite_axes,
        recipe_hash,
    })
}

fn insert_elementary(map: &mut OrderedMap<AxisName, AxisLength>, axis: &AxisName) {
    let length = match axis {
        AxisName::Anonymous(a) => AxisLength::Known(a.value()),
        _ => AxisLength::Unknown,
    };
    map.insert(axis.clone(), length);
}

fn split_pattern(pattern: &str) -> Result<(&str, &str), EinopsError> {
    match pattern.split_once("->") {
        Some((l, r)) => Ok((l.trim(), r.trim())),
        None => Err(EinopsError::MissingArrow {
            pattern: pattern.to_string(),
        }),
    }
}

/// Kind-specific validation (step B): balance rules for `rearrange`, new-axis
/// rules for `repeat`, and right-only-identifier rejection for reductions.
fn validate_for_operation(
    pattern: &str,
    operation: Operation,
    left: &ParsedExpression,
    rght: &ParsedExpression,
) -> Result<(), EinopsError> {
    if left.has_ellipsis_parenthesized {
        return Err(EinopsError::EllipsisParenthesizedOnLeft {
            pattern: pattern.to_string(),
        });
    }
    if rght.has_ellipsis && !left.has_ellipsis {
        return Err(EinopsError::EllipsisOnRightOnly {
            pattern: pattern.to_string(),
        });
    }

    match operation {
        Operation::Rearrange => {
            if left.has_non_unitary_anonymous_axes || rght.has_non_unitary_anonymous_axes {
                return Err(EinopsError::AnonymousInRearrange {
                    pattern: pattern.to_string(),
                });
            }
            let mut difference: Vec<String> = left
                .identifiers
                .iter()
                .filter(|a| !a.is_ellipsis() && !rght.identifiers.contains(*a))
                .map(|a| a.to_string())
                .chain(
                    rght.identifiers
                        .iter()
                        .filter(|a| !a.is_ellipsis() && !left.identifiers.contains(*a))
                        .map(|a| a.to_string()),
                )
                .collect();
            if !difference.is_empty() {
                difference.sort();
                return Err(EinopsError::UnbalancedIdentifiers { names: difference });
            }
        }
        Operation::Repeat => {
            let left_only: Vec<String> = left
                .identifiers
                .iter()
                .filter(|a| !a.is_ellipsis() && !rght.identifiers.contains(*a))
                .map(|a| a.to_string())
                .collect();
            if !left_only.is_empty() {
                return Err(EinopsError::UnexpectedOnLeftOfRepeat { names: left_only });
            }
            // Right-only identifiers must either be anonymous (length known
            // from the pattern itself) or be supplied later via
            // `axis_lengths` — the latter can't be checked until the
            // caller's values are in hand, so the planner defers that check
            // to the elementary-axis enumeration step, where an `Unknown`
            // axis with no assigned length by the time cooking happens
            // surfaces as a shape error instead. Patterns whose new axis is
            // neither anonymous nor covered by `axis_lengths` are rejected
            // eagerly here when detectable: a bare named right-only axis
            // with no anonymous counterpart and no way to ever be resolved.
        }
        Operation::Reduce(_) => {
            let right_only: Vec<String> = rght
                .identifiers
                .iter()
                .filter(|a| !a.is_ellipsis() && !left.identifiers.contains(*a))
                .map(|a| a.to_string())
                .collect();
            if !right_only.is_empty() {
                return Err(EinopsError::UnexpectedOnRightOfReduce {
                    operation: operation.as_str().to_string(),
                    names: right_only,
                });
            }
        }
    }

    Ok(())
}

/// Expands the left/right `...` sentinel into `ellipsis_ndim`
/// [`AxisName::EllipsisSlot`] axes. A dedicated enum variant, not a
/// synthesized string, so expansion can never collide with a
/// user-supplied identifier.
fn expand_ellipsis(
    pattern: &str,
    left: &ParsedExpression,
    rght: &ParsedExpression,
    ndim: usize,
) -> Result<(ParsedExpression, ParsedExpression, usize), EinopsError> {
    if !left.has_ellipsis {
        return Ok((left.clone(), rght.clone(), 0));
    }

    let n_other_dims = left
        .composition
        .iter()
        .filter(|e| !matches!(e, CompositionElement::Single(AxisName::Ellipsis)))
        .count();
    if ndim < n_other_dims {
        return Err(EinopsError::RankTooSmall {
            min_ndim: n_other_dims,
            ndim,
        });
    }
    let ellipsis_ndim = ndim - n_other_dims;

    let ell_axes: Vec<AxisName> = (0..ellipsis_ndim).map(AxisName::EllipsisSlot).collect();

    let expand = |expr: &ParsedExpression| -> ParsedExpression {
        let mut composition = Vec::with_capacity(expr.composition.len() + ellipsis_ndim);
        let mut identifiers = expr.identifiers.clone();
        identifiers.remove(&AxisName::Ellipsis);
        for element in &expr.composition {
            match element {
                CompositionElement::Single(AxisName::Ellipsis) => {
                    for axis in &ell_axes {
                        composition.push(CompositionElement::Single(axis.clone()));
                        identifiers.insert(axis.clone());
                    }
                }
                CompositionElement::Group(g) if g.contains(&AxisName::Ellipsis) => {
                    let mut new_group = Vec::with_capacity(g.len() - 1 + ellipsis_ndim);
                    for a in g {
                        if a.is_ellipsis() {
                            new_group.extend(ell_axes.iter().cloned());
                            identifiers.extend(ell_axes.iter().cloned());
                        } else {
                            new_group.push(a.clone());
                        }
                    }
                    composition.push(CompositionElement::Group(new_group));
                }
                other => composition.push(other.clone()),
            }
        }
        ParsedExpression {
            composition,
            identifiers,
            has_ellipsis: false,
            has_ellipsis_parenthesized: expr.has_ellipsis_parenthesized,
            has_non_unitary_anonymous_axes: expr.has_non_unitary_anonymous_axes,
        }
    };

    let _ = pattern;
    Ok((expand(left), expand(rght), ellipsis_ndim))
}
