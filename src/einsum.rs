//! C5: rewrites a named-axis einsum pattern into the compact single-letter
//! form a backend's `einsum` primitive expects.
//!
//! Grounded on `_compactify_pattern_for_einsum` in the reference
//! implementation; the 52-letter pool order (`a-z` then `A-Z`) is taken
//! verbatim from `ascii_letters` in the same source.

use hashbrown::HashMap;

use crate::axis::AxisName;
use crate::error::EinopsError;
use crate::expr::{parse_side, CompositionElement};

const LETTER_POOL: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Rewrites `pattern` (a named-axis einsum pattern, e.g. `"b h i d, b h j d -> b h i j"`)
/// into the compact letter form, e.g. `"bhid,bhjd->bhij"`.
pub fn compactify_pattern_for_einsum(pattern: &str) -> Result<String, EinopsError> {
    let (left_text, right_text) = pattern.split_once("->").ok_or_else(|| EinopsError::EinsumMissingArrow {
        pattern: pattern.to_string(),
    })?;

    let mut letters: HashMap<AxisName, char> = HashMap::new();
    let mut next_letter = LETTER_POOL.chars();

    let mut compact_inputs = Vec::new();
    for side in left_text.split(',') {
        let expr = parse_side(side.trim(), true, true)?;
        let mut compact = String::new();
        for element in &expr.composition {
            match element {
                CompositionElement::Single(AxisName::Ellipsis) => compact.push_str("..."),
                CompositionElement::Single(axis) => {
                    compact.push(letter_for(axis, &mut letters, &mut next_letter, pattern)?);
                }
                CompositionElement::Group(g) if g.is_empty() => {
                    return Err(EinopsError::EinsumSingletonGroup {
                        pattern: pattern.to_string(),
                    })
                }
                CompositionElement::Group(g) if g.len() > 1 => {
                    return Err(EinopsError::EinsumShapeRearrangement {
                        pattern: pattern.to_string(),
                    })
                }
                CompositionElement::Group(g) => {
                    compact.push(letter_for(&g[0], &mut letters, &mut next_letter, pattern)?);
                }
            }
        }
        compact_inputs.push(compact);
    }

    let mut compact_output = String::new();
    let right_expr = parse_side(right_text.trim(), true, true)?;
    for element in &right_expr.composition {
        match element {
            CompositionElement::Single(AxisName::Ellipsis) => compact_output.push_str("..."),
            CompositionElement::Single(axis) => {
                compact_output.push(lookup_right(axis, &letters, pattern)?);
            }
            CompositionElement::Group(g) if g.is_empty() => {
                return Err(EinopsError::EinsumSingletonGroup {
                    pattern: pattern.to_string(),
                })
            }
            CompositionElement::Group(g) if g.len() > 1 => {
                return Err(EinopsError::EinsumShapeRearrangement {
                    pattern: pattern.to_string(),
                })
            }
            CompositionElement::Group(g) => {
                compact_output.push(lookup_right(&g[0], &letters, pattern)?);
            }
        }
    }

    Ok(format!("{}->{}", compact_inputs.join(","), compact_output))
}

fn letter_for(
    axis: &AxisName,
    letters: &mut HashMap<AxisName, char>,
    next_letter: &mut std::str::Chars<'static>,
    pattern: &str,
) -> Result<char, EinopsError> {
    if let Some(name) = axis.as_name() {
        if name.is_empty() {
            return Err(EinopsError::EinsumEmptyAxis {
                pattern: pattern.to_string(),
            });
        }
    }
    if let Some(&c) = letters.get(axis) {
        return Ok(c);
    }
    let c = next_letter.next().ok_or_else(|| EinopsError::EinsumTooManyAxes {
        pattern: pattern.to_string(),
    })?;
    letters.insert(axis.clone(), c);
    Ok(c)
}

fn lookup_right(axis: &AxisName, letters: &HashMap<AxisName, char>, pattern: &str) -> Result<char, EinopsError> {
    letters.get(axis).copied().ok_or_else(|| EinopsError::EinsumUnknownRightAxis {
        pattern: pattern.to_string(),
        name: axis.to_string(),
    })
}
