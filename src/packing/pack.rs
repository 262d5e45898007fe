//! C4 `pack`: analyze a `*`-pattern and plan each input tensor's reshape.
//!
//! Grounded on `analyze_pattern`/`pack` in `include/packing.hpp` of the
//! reference implementation.

use crate::axis::validate_identifier;
use crate::error::EinopsError;

/// The parsed shape of a pack/unpack pattern: token counts on either side
/// of the single `*`.
#[derive(Debug, Clone, Copy)]
pub struct PackPattern {
    pub n_before: usize,
    pub n_after: usize,
}

/// Parses a pack/unpack pattern: whitespace-separated tokens, exactly one
/// of which is `*`; the rest are distinct valid axis names.
pub fn analyze_pattern(pattern: &str) -> Result<PackPattern, EinopsError> {
    let tokens: Vec<&str> = pattern.split_whitespace().collect();

    let star_positions: Vec<usize> = tokens.iter().enumerate().filter(|(_, t)| **t == "*").map(|(i, _)| i).collect();
    if star_positions.len() != 1 {
        return Err(EinopsError::BadIdentifier {
            name: pattern.to_string(),
            reason: "pack/unpack pattern must contain exactly one '*'",
        });
    }
    let star = star_positions[0];

    let mut seen = hashbrown::HashSet::new();
    for (i, token) in tokens.iter().enumerate() {
        if i == star {
            continue;
        }
        validate_identifier(token, false).map_err(|reason| EinopsError::BadIdentifier {
            name: token.to_string(),
            reason,
        })?;
        if !seen.insert(*token) {
            return Err(EinopsError::DuplicateIdentifier {
                name: token.to_string(),
            });
        }
    }

    Ok(PackPattern {
        n_before: star,
        n_after: tokens.len() - star - 1,
    })
}

/// One input tensor's pack plan: the reshape target collapsing its packed
/// block into a single `-1` axis, and the packed block's own shape
/// (recorded so `unpack` can later restore it).
#[derive(Debug, Clone)]
pub struct PackPlan {
    pub reshape_to: Vec<i64>,
    pub packed_shape: Vec<i64>,
}

/// Plans the reshape for one tensor of shape `shape`, given `pattern`'s
/// `n_before`/`n_after` split. The caller concatenates the reshaped
/// tensors along axis `n_before` to get the packed tensor.
pub fn plan_pack_one(pattern: PackPattern, shape: &[i64], index: usize, original_pattern: &str) -> Result<PackPlan, EinopsError> {
    if shape.len() < pattern.n_before + pattern.n_after {
        return Err(EinopsError::PackRankTooSmall {
            index,
            shape: shape.to_vec(),
            pattern: original_pattern.to_string(),
            min_axes: pattern.n_before + pattern.n_after,
        });
    }
    let split_end = shape.len() - pattern.n_after;
    let packed_shape = shape[pattern.n_before..split_end].to_vec();

    let mut reshape_to = shape[..pattern.n_before].to_vec();
    reshape_to.push(-1);
    reshape_to.extend_from_slice(&shape[split_end..]);

    Ok(PackPlan { reshape_to, packed_shape })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzes_simple_pattern() {
        let p = analyze_pattern("h w *").unwrap();
        assert_eq!(p.n_before, 2);
        assert_eq!(p.n_after, 0);
    }

    #[test]
    fn analyzes_pattern_with_trailing_axes() {
        let p = analyze_pattern("* c").unwrap();
        assert_eq!(p.n_before, 0);
        assert_eq!(p.n_after, 1);
    }

    #[test]
    fn rejects_missing_star() {
        assert!(analyze_pattern("h w").is_err());
    }

    #[test]
    fn rejects_multiple_stars() {
        assert!(analyze_pattern("h * w *").is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        assert!(analyze_pattern("h h *").is_err());
    }

    #[test]
    fn plans_pack_for_matching_shape() {
        let p = analyze_pattern("h w *").unwrap();
        let plan = plan_pack_one(p, &[13, 17], 0, "h w *").unwrap();
        assert_eq!(plan.reshape_to, vec![13, 17, -1]);
        assert!(plan.packed_shape.is_empty());
    }

    #[test]
    fn rejects_rank_too_small() {
        let p = analyze_pattern("h w *").unwrap();
        assert!(plan_pack_one(p, &[13], 0, "h w *").is_err());
    }
}
