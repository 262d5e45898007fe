//! The shape-specialized `CookedRecipe`.

/// An ordered primitive call sequence, specialized against one concrete
/// input shape. Optional steps are `None` when they'd be a no-op (identity
/// reshape, identity permutation, no final reshape) — [`crate::backend`]
/// skips absent steps entirely rather than issuing an identity call.
#[derive(Debug, Clone)]
pub struct CookedRecipe {
    /// Reshape target before permuting, splitting each input dimension
    /// into its elementary axes. Absent when every input dimension is
    /// already a single elementary axis.
    pub init_shape: Option<Vec<i64>>,
    /// Permutation to apply after `init_shape`. Absent when it's the
    /// identity permutation.
    pub permutation: Option<Vec<usize>>,
    /// Positions (in the permuted layout) to reduce, in permutation order.
    /// Empty when the operation introduces no reduction.
    pub reduced_axes: Vec<usize>,
    /// `(output_position, length)` pairs for axes present on the right but
    /// not the left, applied via `expand_with_axes`.
    pub added_axes_with_lengths: Vec<(usize, i64)>,
    /// Reshape target for the final output. Absent when every output
    /// dimension is already a single axis after reduction/expansion.
    pub final_shape: Option<Vec<i64>>,
    /// Total axis count after `added_axes_with_lengths` is applied.
    pub n_axes_after_adding: usize,
}
