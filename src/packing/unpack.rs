//! C4 `unpack`: given a packed tensor and the per-tensor block shapes
//! recorded by `pack`, plan the slice + reshape producing each original
//! tensor back.
//!
//! Grounded on `unpack` in `include/packing.hpp` of the reference
//! implementation.

use crate::error::EinopsError;

use super::pack::PackPattern;

/// One output tensor's unpack plan: the half-open slice range along axis
/// `n_before`, and the reshape target to restore after slicing.
#[derive(Debug, Clone)]
pub struct UnpackPlan {
    pub slice_start: i64,
    pub slice_end: i64,
    pub reshape_to: Vec<i64>,
}

/// Plans the slice+reshape sequence for every tensor packed under
/// `pattern`, given the merged tensor's `input_shape` and the
/// `packed_shapes` recorded at pack time (or supplied by the caller, with
/// at most one entry containing a `-1` placeholder).
pub fn plan_unpack(
    pattern: PackPattern,
    input_shape: &[i64],
    packed_shapes: &[Vec<i64>],
    original_pattern: &str,
) -> Result<Vec<UnpackPlan>, EinopsError> {
    if input_shape.len() != pattern.n_before + 1 + pattern.n_after {
        return Err(EinopsError::UnpackShapeMismatch {
            pattern: original_pattern.to_string(),
            shape: input_shape.to_vec(),
        });
    }

    let raw_lens: Vec<Option<i64>> = packed_shapes
        .iter()
        .map(|s| if s.contains(&-1) { None } else { Some(s.iter().product()) })
        .collect();

    let unknown_count = raw_lens.iter().filter(|l| l.is_none()).count();
    if unknown_count > 1 {
        return Err(EinopsError::MultipleUnknowns {
            pattern: original_pattern.to_string(),
        });
    }

    let axis_size = input_shape[pattern.n_before];
    let known_sum: i64 = raw_lens.iter().filter_map(|l| *l).sum();

    let resolved_lens: Vec<i64> = if unknown_count == 1 {
        let inferred = axis_size - known_sum;
        if inferred < 0 {
            return Err(EinopsError::UnpackMismatch {
                pattern: original_pattern.to_string(),
                axis_size,
            });
        }
        raw_lens.iter().map(|l| l.unwrap_or(inferred)).collect()
    } else {
        if known_sum != axis_size {
            return Err(EinopsError::UnpackMismatch {
                pattern: original_pattern.to_string(),
                axis_size,
            });
        }
        raw_lens.iter().map(|l| l.expect("resolved above")).collect()
    };

    let mut positions = Vec::with_capacity(resolved_lens.len() + 1);
    positions.push(0i64);
    for &len in &resolved_lens {
        positions.push(positions.last().unwrap() + len);
    }

    let mut plans = Vec::with_capacity(packed_shapes.len());
    for (i, shape) in packed_shapes.iter().enumerate() {
        let mut reshape_to = input_shape[..pattern.n_before].to_vec();
        reshape_to.extend_from_slice(shape);
        reshape_to.extend_from_slice(&input_shape[pattern.n_before + 1..]);
        plans.push(UnpackPlan {
            slice_start: positions[i],
            slice_end: positions[i + 1],
            reshape_to,
        });
    }

    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packing::analyze_pattern;

    #[test]
    fn plans_simple_unpack() {
        let pattern = analyze_pattern("h w *").unwrap();
        let plans = plan_unpack(pattern, &[13, 17, 3], &[vec![], vec![], vec![]], "h w *").unwrap();
        assert_eq!(plans.len(), 3);
        assert_eq!((plans[0].slice_start, plans[0].slice_end), (0, 1));
        assert_eq!((plans[2].slice_start, plans[2].slice_end), (2, 3));
        assert_eq!(plans[0].reshape_to, vec![13, 17]);
    }

    #[test]
    fn resolves_single_unknown() {
        let pattern = analyze_pattern("h w *").unwrap();
        let plans = plan_unpack(pattern, &[13, 17, 5], &[vec![2], vec![-1]], "h w *").unwrap();
        assert_eq!((plans[0].slice_start, plans[0].slice_end), (0, 2));
        assert_eq!((plans[1].slice_start, plans[1].slice_end), (2, 5));
    }

    #[test]
    fn rejects_multiple_unknowns() {
        let pattern = analyze_pattern("h w *").unwrap();
        let err = plan_unpack(pattern, &[13, 17, 5], &[vec![-1], vec![-1]], "h w *").unwrap_err();
        assert!(matches!(err, EinopsError::MultipleUnknowns { .. }));
    }

    #[test]
    fn rejects_rank_mismatch() {
        let pattern = analyze_pattern("h w *").unwrap();
        assert!(plan_unpack(pattern, &[13, 17], &[vec![]], "h w *").is_err());
    }
}
