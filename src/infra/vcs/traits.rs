use crate::domain::WorkingCopyRevision;
use anyhow::Result;

/// Local version control checkout that patch stacks are applied onto.
///
/// The caller owns the checkout and must guarantee exclusive access while a
/// stack is being built or applied.
pub trait WorkingCopy {
    /// Update to `revision`. With `clean`, local modifications are discarded.
    fn checkout(&self, revision: &str, clean: bool) -> Result<()>;

    /// Revision currently checked out.
    fn current_revision(&self) -> Result<WorkingCopyRevision>;

    /// Whether `revision` resolves to a commit present locally.
    fn is_revision_available(&self, revision: &str) -> bool;

    /// Apply a unified patch on top of the current checkout.
    fn apply_patch(&self, patch: &str) -> Result<()>;
}
