//! The shape-independent `TransformRecipe` and the operation vocabulary.

use std::fmt;

/// A reduction kind a backend's `reduce` primitive must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    Min,
    Max,
    Sum,
    Mean,
    Prod,
    Any,
    All,
}

impl ReduceOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ReduceOp::Min => "min",
            ReduceOp::Max => "max",
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Prod => "prod",
            ReduceOp::Any => "any",
            ReduceOp::All => "all",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "min" => ReduceOp::Min,
            "max" => ReduceOp::Max,
            "sum" => ReduceOp::Sum,
            "mean" => ReduceOp::Mean,
            "prod" => ReduceOp::Prod,
            "any" => ReduceOp::Any,
            "all" => ReduceOp::All,
            _ => return None,
        })
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operation a pattern call requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Rearrange,
    Repeat,
    Reduce(ReduceOp),
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Rearrange => "rearrange",
            Operation::Repeat => "repeat",
            Operation::Reduce(op) => op.as_str(),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rearrange" => Some(Operation::Rearrange),
            "repeat" => Some(Operation::Repeat),
            other => ReduceOp::from_str(other).map(Operation::Reduce),
        }
    }

    #[inline]
    pub fn is_reduction(self) -> bool {
        matches!(self, Operation::Reduce(_))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single elementary axis's length, as known at recipe-planning time.
///
/// Stands in for the C++ reference's `-999999`/`-99999` magic-number
/// sentinels with a proper sum type; `Expected` and `Known` both count as
/// "known" for the purposes of per-dimension known/unknown partitioning
/// (step E) — only `Unknown` triggers shape inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLength {
    /// A concrete length, fixed at plan time (anonymous axes).
    Known(i64),
    /// Not knowable until a concrete shape is supplied (named axes, absent
    /// from the caller's `axis_lengths`).
    Unknown,
    /// The caller promised a value via `axis_lengths`; the integer itself
    /// arrives at shape-specialization time, sharing the same map.
    Expected,
}

impl AxisLength {
    #[inline]
    pub fn is_unknown(self) -> bool {
        matches!(self, AxisLength::Unknown)
    }
}

/// For one input dimension: which elementary axes (by position) have a
/// known length at plan time, and which (at most one) must be inferred
/// from the runtime dimension size.
#[derive(Debug, Clone, Default)]
pub struct InputComposite {
    pub known: Vec<usize>,
    pub unknown: Vec<usize>,
}

/// The shape-independent plan produced by the recipe planner (C2).
///
/// Combines a parsed left+right expression pair, an [`Operation`], and a
/// tensor rank into an axis-level plan that doesn't depend on concrete
/// dimension sizes. See [`crate::cook`] for the shape-specialization step
/// that turns this into an ordered primitive call sequence.
#[derive(Debug, Clone)]
pub struct TransformRecipe {
    /// Per-elementary-axis length, indexed by elementary-axis position.
    pub elementary_axes_lengths: Vec<AxisLength>,
    /// Caller-facing axis name -> elementary-axis position, for names that
    /// appear in the caller's `axis_lengths`.
    pub axis_name_to_elementary_axis: hashbrown::HashMap<String, usize>,
    /// Per-input-dimension (known, unknown) elementary-axis positions.
    pub input_composition: Vec<InputComposite>,
    /// Permutation applied after the initial reshape: kept axes in output
    /// order, followed by reduced axes in left order.
    pub axes_permutation: Vec<usize>,
    /// Index in `axes_permutation` at which reduced axes begin.
    pub first_reduced_axis: usize,
    /// Output position -> elementary-axis slot, for axes on the right that
    /// don't appear on the left (repeat's new axes).
    pub added_axes: Vec<(usize, usize)>,
    /// Per-output-dimension elementary-axis positions that multiply
    /// together to give that dimension's length.
    pub output_composite_axes: Vec<Vec<usize>>,
    /// Stable digest of the planning inputs; the recipe cache key.
    pub recipe_hash: u64,
}
