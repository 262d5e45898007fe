//! Error types for pattern parsing, planning, and execution.

use std::fmt;

/// Errors that can occur while parsing a pattern, planning a recipe, or
/// specializing one against a concrete shape.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EinopsError {
    /// `...` found in a position other than a single unbroken ellipsis.
    #[error("pattern may contain dots only inside a single ellipsis (...): {pattern}")]
    MalformedEllipsis { pattern: String },

    /// Nested parentheses, e.g. `(a (b c))`.
    #[error("axis composition is one level deep only, brackets inside brackets are not allowed: {pattern}")]
    NestedBrackets { pattern: String },

    /// Unmatched `)` or an open `(` still pending at end of input.
    #[error("unbalanced parentheses in pattern: {pattern}")]
    UnbalancedBrackets { pattern: String },

    /// Not a valid identifier, per the naming rules in the pattern grammar.
    #[error("invalid axis identifier '{name}': {reason}")]
    BadIdentifier { name: String, reason: &'static str },

    /// Same named identifier appears twice in a side that disallows it.
    #[error("duplicate axis name '{name}' in pattern")]
    DuplicateIdentifier { name: String },

    /// A character outside `[A-Za-z0-9_. ()]`.
    #[error("unknown character '{character}' in pattern")]
    UnknownCharacter { character: char },

    /// Ellipsis on the right side without a matching one on the left.
    #[error("ellipsis found on right side but not on left side of pattern: {pattern}")]
    EllipsisOnRightOnly { pattern: String },

    /// `(... a)` — ellipsis appearing inside a group on the left side.
    #[error("ellipsis inside parentheses on the left side is not allowed: {pattern}")]
    EllipsisParenthesizedOnLeft { pattern: String },

    /// A non-unitary anonymous axis (e.g. `2`) used with `rearrange`.
    #[error("non-unitary anonymous axes are not supported in rearrange (exception is length 1): {pattern}")]
    AnonymousInRearrange { pattern: String },

    /// `rearrange` identifiers differ between the two sides.
    #[error("identifiers only on one side of rearrange pattern (should be on both): {names:?}")]
    UnbalancedIdentifiers { names: Vec<String> },

    /// `repeat` identifier present on the left but dropped on the right.
    #[error("unexpected identifiers on the left side of repeat: {names:?}")]
    UnexpectedOnLeftOfRepeat { names: Vec<String> },

    /// `repeat` introduces a new axis with no length supplied.
    #[error("specify sizes for new axes in repeat: {names:?}")]
    MissingLengthForNewAxis { names: Vec<String> },

    /// Reduction introduces an axis on the right not present on the left.
    #[error("unexpected identifiers on the right side of {operation} reduction: {names:?}")]
    UnexpectedOnRightOfReduce { operation: String, names: Vec<String> },

    /// `operation` string isn't one of the recognized kinds.
    #[error("unknown operation '{operation}', expected one of rearrange, repeat, min, max, sum, mean, prod, any, all")]
    UnknownReduction { operation: String },

    /// Pattern has no `->` separator.
    #[error("pattern must contain '->': {pattern}")]
    MissingArrow { pattern: String },

    /// Caller supplied `axis_lengths` for a name the pattern doesn't use.
    #[error("axis '{name}' is not used in pattern '{pattern}'")]
    UnusedAxisLength { name: String, pattern: String },

    /// Ellipsis present but the tensor rank is smaller than the explicit axes.
    #[error("wrong shape: expected at least {min_ndim} dims, tensor has {ndim}")]
    RankTooSmall { min_ndim: usize, ndim: usize },

    /// No ellipsis on the left, but rank doesn't match the composition length.
    #[error("wrong shape: expected {expected} dims, tensor has {got}")]
    RankMismatch { expected: usize, got: usize },

    /// More than one axis in a single input dimension has unknown length.
    #[error("could not infer size for axes {names:?}: at most one axis per dimension may be underdetermined")]
    Underdetermined { names: Vec<String> },

    /// Input dimension's size doesn't match the product of its known axes.
    #[error("shape mismatch: dimension {dim} has size {got}, pattern requires exactly {expected}")]
    ShapeMismatchExact {
        dim: usize,
        expected: i64,
        got: i64,
    },

    /// Input dimension's size isn't divisible by the product of its known axes.
    #[error("shape mismatch: dimension {dim} has size {got}, not divisible by {divisor}")]
    ShapeMismatchDivisibility {
        dim: usize,
        divisor: i64,
        got: i64,
    },

    /// `mean` requested on a non-floating tensor.
    #[error("reduce_mean is not available for non-floating tensors")]
    MeanOnIntegerTensor,

    /// A tensor passed to `pack` doesn't have enough dimensions for the pattern.
    #[error("packed tensor #{index} has shape {shape:?}, while pattern '{pattern}' assumes at least {min_axes} axes")]
    PackRankTooSmall {
        index: usize,
        shape: Vec<i64>,
        pattern: String,
        min_axes: usize,
    },

    /// `unpack` input's rank doesn't match `n_before + 1 + n_after`.
    #[error("unpack(..., '{pattern}') received input of wrong rank with shape {shape:?}")]
    UnpackShapeMismatch { pattern: String, shape: Vec<i64> },

    /// More than one packed shape contains an unresolved `-1`.
    #[error("unpack(..., '{pattern}') received more than one unknown (-1) packed shape and can't infer dimensions")]
    MultipleUnknowns { pattern: String },

    /// A packed shape couldn't be sliced out of the combined tensor.
    #[error("error during unpack(..., '{pattern}'): could not split axis of size {axis_size} into the requested shapes")]
    UnpackMismatch { pattern: String, axis_size: i64 },

    /// einsum pattern string has no `->`.
    #[error("einsum pattern must contain '->': {pattern}")]
    EinsumMissingArrow { pattern: String },

    /// `()` used as one tensor's axis group in einsum notation.
    #[error("singleton () axes are not supported in einsum: {pattern}")]
    EinsumSingletonGroup { pattern: String },

    /// `(a b)` used as one tensor's axis group in einsum notation.
    #[error("shape rearrangement is not supported in einsum: {pattern}")]
    EinsumShapeRearrangement { pattern: String },

    /// An axis name resolved to the empty string.
    #[error("encountered empty axis name in einsum pattern: {pattern}")]
    EinsumEmptyAxis { pattern: String },

    /// More distinct axis names than the 52-letter pool can hold.
    #[error("too many distinct axes in einsum pattern (limit is 52): {pattern}")]
    EinsumTooManyAxes { pattern: String },

    /// Right-hand side references a name never seen on the left.
    #[error("unknown axis '{name}' on right side of einsum pattern: {pattern}")]
    EinsumUnknownRightAxis { pattern: String, name: String },

    /// Wraps an inner error with call-site context: pattern, operation, shape.
    #[error("{context}\n{source}")]
    Context {
        context: String,
        #[source]
        source: Box<EinopsError>,
    },
}

impl EinopsError {
    /// Wraps `self` with diagnostic context (pattern text, operation kind,
    /// and the observed input shape), as required by the error surface
    /// contract: messages must carry the pattern and any relevant shapes.
    pub fn with_context(self, operation: &str, pattern: &str, shape: &[i64]) -> Self {
        let context = format!(
            "error while processing '{operation}' pattern \"{pattern}\". input tensor shape: {shape:?}.",
        );
        EinopsError::Context {
            context,
            source: Box::new(self),
        }
    }
}

/// A formatted list, used when embedding name vectors in messages.
pub(crate) fn names_list(names: impl IntoIterator<Item = impl fmt::Display>) -> Vec<String> {
    names.into_iter().map(|n| n.to_string()).collect()
}

/// Result type for einops-core operations.
pub type EinopsResult<T> = Result<T, EinopsError>;
