//! Domain types for phabstack.
//! Identities, diff records and the patch stack produced for a working copy.

pub mod diff;
pub mod error;
pub mod phid;
pub mod stack;

pub use diff::*;
pub use error::*;
pub use phid::*;
pub use stack::*;
