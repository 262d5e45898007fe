//! Axis names: the atoms a pattern is built from.
//!
//! An axis is either a named identifier (`a`, `height`, `_`), an anonymous
//! numeric axis (`2`, `3`, ...) carrying a unique identity distinct from
//! every other anonymous axis of the same value, or the ellipsis sentinel
//! `...`. A literal `1` never becomes an axis at all — it is handled one
//! level up, as an empty group (see `expr::composition`).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An anonymous numeric axis, e.g. the `2` in `"(h 2) w -> h 2 w"`.
///
/// Two anonymous axes built from the same integer are distinct: each
/// carries a fresh identity assigned at construction time, and equality
/// is by that identity, not by value.
#[derive(Debug, Clone)]
pub struct AnonymousAxis {
    value: i64,
    id: u64,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl AnonymousAxis {
    /// Creates a fresh anonymous axis of the given length.
    ///
    /// # Panics
    ///
    /// Panics if `value < 2`; callers (the parser) are responsible for
    /// rejecting `0`/`1` as pattern errors before reaching here.
    pub fn new(value: i64) -> Self {
        assert!(value >= 2, "anonymous axis length must be >= 2, got {value}");
        Self {
            value,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The integer length this axis carries.
    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl PartialEq for AnonymousAxis {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnonymousAxis {}

impl std::hash::Hash for AnonymousAxis {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for AnonymousAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-axis", self.value)
    }
}

/// A single axis name as it appears in a parsed pattern side.
#[derive(Debug, Clone)]
pub enum AxisName {
    /// A named identifier, e.g. `batch`, `h`, `_`.
    Named(String),
    /// An anonymous numeric axis with a unique identity.
    Anonymous(AnonymousAxis),
    /// The `...` sentinel, present only before ellipsis expansion (C2 step
    /// C replaces every occurrence with [`AxisName::EllipsisSlot`] values).
    Ellipsis,
    /// One dimension absorbed by `...`, numbered by its position within the
    /// ellipsis span. A dedicated variant rather than a synthesized string
    /// name, so expansion can never collide with a user-supplied
    /// identifier — no reliance on an out-of-alphabet Unicode character.
    EllipsisSlot(usize),
}

impl AxisName {
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        AxisName::Named(name.into())
    }

    #[inline]
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, AxisName::Ellipsis)
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, AxisName::Anonymous(_))
    }

    /// The name string, for named axes only.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            AxisName::Named(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for AxisName {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AxisName::Named(a), AxisName::Named(b)) => a == b,
            (AxisName::Anonymous(a), AxisName::Anonymous(b)) => a == b,
            (AxisName::Ellipsis, AxisName::Ellipsis) => true,
            (AxisName::EllipsisSlot(a), AxisName::EllipsisSlot(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AxisName {}

impl std::hash::Hash for AxisName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            AxisName::Named(s) => s.hash(state),
            AxisName::Anonymous(a) => a.hash(state),
            AxisName::Ellipsis => {}
            AxisName::EllipsisSlot(i) => i.hash(state),
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisName::Named(s) => write!(f, "{s}"),
            AxisName::Anonymous(a) => write!(f, "{a}"),
            AxisName::Ellipsis => write!(f, "..."),
            AxisName::EllipsisSlot(i) => write!(f, "...#{i}"),
        }
    }
}

/// Validates a token as an axis identifier per the pattern grammar:
/// non-empty, first char alphabetic or `_`, remaining chars alphanumeric
/// or `_`, and not starting/ending with `_` unless the whole name is `_`
/// (only permitted when `allow_underscore` is set, e.g. einsum contexts).
pub fn validate_identifier(name: &str, allow_underscore: bool) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("identifier must not be empty");
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err("identifier must start with a letter or underscore");
    }
    for c in chars {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return Err("identifier must contain only letters, digits, and underscores");
        }
    }
    if name == "_" {
        if allow_underscore {
            return Ok(());
        }
        return Err("bare underscore is only allowed in contexts that permit it (e.g. einsum)");
    }
    if name.starts_with('_') || name.ends_with('_') {
        return Err("axis name should not start or end with underscore");
    }
    Ok(())
}
