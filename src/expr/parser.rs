//! Tokenizer for one side of a pattern string.
//!
//! # Grammar
//!
//! ```text
//! side      := token ( WS+ token )*
//! token     := IDENT | INT | "..." | "(" inner ")"
//! inner     := ε | token ( WS+ token )*
//! IDENT     := [A-Za-z_] [A-Za-z0-9_]*
//! INT       := [0-9]+        (value == 1 allowed only as a unit group)
//! ```

use hashbrown::HashSet;

use crate::axis::{validate_identifier, AnonymousAxis, AxisName};
use crate::error::EinopsError;

use super::composition::{CompositionElement, ParsedExpression};

/// Parses one side of a pattern (the text before or after `->`).
///
/// `allow_underscore` permits the bare `_` axis name (einsum contexts).
/// `allow_duplicates` permits the same named identifier to appear more
/// than once (also an einsum concern — einsum subscripts like `ii->i`
/// repeat an index on purpose).
pub fn parse_side(
    side: &str,
    allow_underscore: bool,
    allow_duplicates: bool,
) -> Result<ParsedExpression, EinopsError> {
    let chars: Vec<char> = side.chars().collect();

    let mut composition: Vec<CompositionElement> = Vec::new();
    let mut identifiers: HashSet<AxisName> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut has_ellipsis = false;
    let mut has_ellipsis_parenthesized = false;
    let mut has_non_unitary_anonymous_axes = false;

    let mut bracket: Option<Vec<AxisName>> = None;
    let mut current = String::new();

    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];

        if c == '.' {
            if chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
                if !current.is_empty() {
                    commit_identifier(
                        &current,
                        allow_underscore,
                        allow_duplicates,
                        &mut bracket,
                        &mut composition,
                        &mut identifiers,
                        &mut seen_names,
                        &mut has_non_unitary_anonymous_axes,
                    )?;
                    current.clear();
                }
                if has_ellipsis {
                    return Err(EinopsError::MalformedEllipsis {
                        pattern: side.to_string(),
                    });
                }
                has_ellipsis = true;
                identifiers.insert(AxisName::Ellipsis);
                match &mut bracket {
                    Some(group) => {
                        group.push(AxisName::Ellipsis);
                        has_ellipsis_parenthesized = true;
                    }
                    None => composition.push(CompositionElement::Single(AxisName::Ellipsis)),
                }
                i += 3;
                continue;
            } else {
                return Err(EinopsError::MalformedEllipsis {
                    pattern: side.to_string(),
                });
            }
        }

        if c == '(' || c == ')' || c.is_whitespace() {
            if !current.is_empty() {
                commit_identifier(
                    &current,
                    allow_underscore,
                    allow_duplicates,
                    &mut bracket,
                    &mut composition,
                    &mut identifiers,
                    &mut seen_names,
                    &mut has_non_unitary_anonymous_axes,
                )?;
                current.clear();
            }
            if c == '(' {
                if bracket.is_some() {
                    return Err(EinopsError::NestedBrackets {
                        pattern: side.to_string(),
                    });
                }
                bracket = Some(Vec::new());
            } else if c == ')' {
                match bracket.take() {
                    None => {
                        return Err(EinopsError::UnbalancedBrackets {
                            pattern: side.to_string(),
                        })
                    }
                    Some(group) => composition.push(CompositionElement::Group(group)),
                }
            }
            i += 1;
            continue;
        }

        if c.is_ascii_alphanumeric() || c == '_' {
            current.push(c);
            i += 1;
            continue;
        }

        return Err(EinopsError::UnknownCharacter { character: c });
    }

    if bracket.is_some() {
        return Err(EinopsError::UnbalancedBrackets {
            pattern: side.to_string(),
        });
    }
    if !current.is_empty() {
        commit_identifier(
            &current,
            allow_underscore,
            allow_duplicates,
            &mut bracket,
            &mut composition,
            &mut identifiers,
            &mut seen_names,
            &mut has_non_unitary_anonymous_axes,
        )?;
    }

    Ok(ParsedExpression {
        composition,
        identifiers,
        has_ellipsis,
        has_ellipsis_parenthesized,
        has_non_unitary_anonymous_axes,
    })
}

/// Commits one accumulated token: a pure integer (unit group or anonymous
/// axis) or a named identifier.
#[allow(clippy::too_many_arguments)]
fn commit_identifier(
    token: &str,
    allow_underscore: bool,
    allow_duplicates: bool,
    bracket: &mut Option<Vec<AxisName>>,
    composition: &mut Vec<CompositionElement>,
    identifiers: &mut HashSet<AxisName>,
    seen_names: &mut HashSet<String>,
    has_non_unitary_anonymous_axes: &mut bool,
) -> Result<(), EinopsError> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        let value: i64 = token.parse().map_err(|_| EinopsError::BadIdentifier {
            name: token.to_string(),
            reason: "numeric axis literal out of range",
        })?;

        if value == 1 {
            // A literal `1` contributes no axis. Standalone, it denotes an
            // explicit unit dimension (empty group); inside a group it is
            // simply dropped.
            if bracket.is_none() {
                composition.push(CompositionElement::Group(Vec::new()));
            }
            return Ok(());
        }

        if value < 1 {
            return Err(EinopsError::BadIdentifier {
                name: token.to_string(),
                reason: "anonymous axis must have positive length",
            });
        }

        let axis = AxisName::Anonymous(AnonymousAxis::new(value));
        *has_non_unitary_anonymous_axes = true;
        identifiers.insert(axis.clone());
        match bracket {
            Some(group) => group.push(axis),
            None => composition.push(CompositionElement::Single(axis)),
        }
        return Ok(());
    }

    validate_identifier(token, allow_underscore).map_err(|reason| EinopsError::BadIdentifier {
        name: token.to_string(),
        reason,
    })?;

    if seen_names.contains(token) && !allow_duplicates {
        return Err(EinopsError::DuplicateIdentifier {
            name: token.to_string(),
        });
    }
    seen_names.insert(token.to_string());

    let axis = AxisName::named(token);
    identifiers.insert(axis.clone());
    match bracket {
        Some(group) => group.push(axis),
        None => composition.push(CompositionElement::Single(axis)),
    }
    Ok(())
}
