//! Pack/unpack planning (component C4).
//!
//! Packs a list of tensors along a shared `*`-marked axis and later
//! restores them: [`analyze_pattern`] parses the `h w * c`-style pattern,
//! [`plan_pack_one`] plans each input tensor's collapsing reshape, and
//! [`plan_unpack`] plans the slice+reshape sequence to split the merged
//! tensor back apart.

mod pack;
mod unpack;

pub use pack::{analyze_pattern, plan_pack_one, PackPattern, PackPlan};
pub use unpack::{plan_unpack, UnpackPlan};
