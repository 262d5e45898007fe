//! Shape specialization (component C3).
//!
//! Turns a [`crate::recipe::TransformRecipe`] plus a concrete input shape
//! into a [`CookedRecipe`]: an ordered, no-op-free primitive call sequence
//! ready to execute against a [`crate::backend::TensorBackend`].

mod specializer;
mod types;

pub use specializer::reconstruct_from_shape;
pub use types::CookedRecipe;
