//! Patch stack resolution.
//!
//! Walks the `revision.parent` graph of a diff, selects the latest diff of
//! every ancestor, resolves the base revision and fetches the raw patches in
//! application order.

pub mod apply;
pub mod assembler;
pub mod base;
pub mod selector;
pub mod target;
pub mod walker;

pub use apply::apply_stack;
pub use assembler::build_stack;
pub use base::resolve_base;
pub use selector::select_latest_diff;
pub use target::{TargetRef, resolve_target};
pub use walker::load_parents;
