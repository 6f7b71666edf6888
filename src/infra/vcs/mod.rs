//! Working copy adapters.

pub mod git;
pub mod traits;

pub use git::GitWorkingCopy;
pub use traits::WorkingCopy;
