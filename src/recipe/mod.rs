//! Shape-independent recipe planning (component C2).
//!
//! Turns a pattern string and an [`Operation`] into a [`TransformRecipe`]:
//! an axis-level plan that doesn't depend on the concrete tensor shape.
//! [`crate::cook`] specializes a recipe against a shape into an ordered
//! primitive call sequence.

mod hashing;
mod planner;
mod types;

pub use hashing::{cooked_cache_key, recipe_cache_key};
pub use planner::prepare_transformation_recipe;
pub use types::{AxisLength, InputComposite, Operation, ReduceOp, TransformRecipe};
