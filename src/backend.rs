//! The tensor backend contract the core consumes.
//!
//! Grounded on `AbstractBackend` in `include/backends/abstract_backend.hpp`
//! of the reference implementation: a small set of pure operations over an
//! opaque tensor type, with no storage or numeric kernels owned by this
//! crate (spec.md §1 places the backend itself out of scope).

use crate::recipe::ReduceOp;

/// The tensor operations the core drives. Implement this once per tensor
/// library (ndarray, a GPU runtime, a custom array type) to use
/// [`crate::ops`]'s `rearrange`/`repeat`/`reduce`/`einsum`/`pack`/`unpack`.
pub trait TensorBackend {
    /// The backend's tensor type.
    type Tensor;

    /// Current shape, outermost axis first.
    fn shape(&self, tensor: &Self::Tensor) -> Vec<i64>;

    /// True iff the element type is a floating format (required by `mean`).
    fn is_float(&self, tensor: &Self::Tensor) -> bool;

    /// Size-preserving reshape. A single `-1` entry may stand in for an
    /// axis inferred from the total element count.
    fn reshape(&self, tensor: Self::Tensor, shape: &[i64]) -> Self::Tensor;

    /// Applies a permutation; every axis appears in `perm` exactly once.
    fn permute(&self, tensor: Self::Tensor, perm: &[usize]) -> Self::Tensor;

    /// Reduces the listed axes with `op`.
    fn reduce(&self, tensor: Self::Tensor, op: ReduceOp, axes: &[usize]) -> Self::Tensor;

    /// Inserts unit axes at the given positions, then broadcasts the
    /// result to `n_total` axes using the supplied lengths.
    fn expand_with_axes(&self, tensor: Self::Tensor, n_total: usize, added: &[(usize, i64)]) -> Self::Tensor;

    /// Axis-aligned concatenation.
    fn concat(&self, tensors: Vec<Self::Tensor>, axis: usize) -> Self::Tensor;

    /// Stacks tensors along a new leading axis.
    fn stack(&self, tensors: Vec<Self::Tensor>) -> Self::Tensor;

    /// Slices `[start, end)` along `axis`.
    fn slice(&self, tensor: &Self::Tensor, axis: usize, start: i64, end: i64) -> Self::Tensor;

    /// Runs a compact-form einsum pattern (e.g. `"ij,jk->ik"`).
    fn einsum(&self, pattern: &str, tensors: Vec<Self::Tensor>) -> Self::Tensor;

    /// A 64-bit integer range tensor, `[start, stop)`.
    fn arange(&self, start: i64, stop: i64) -> Self::Tensor;
}
