//! Pattern-side expression parsing (component C1).
//!
//! Parses one side of a pattern (`"b (h h2) w c"`) into a structured
//! [`ParsedExpression`], detecting ellipsis, anonymous numeric axes,
//! duplicate identifiers, and unbalanced brackets along the way.

mod composition;
mod parser;

pub use composition::{CompositionElement, ParsedExpression};
pub use parser::parse_side;
