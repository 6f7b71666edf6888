use crate::domain::PatchStack;
use crate::infra::vcs::WorkingCopy;
use anyhow::{Context, Result};

/// Apply every entry of `stack` in order onto the working copy.
///
/// The working copy is expected to sit at the stack's base, as left by
/// [`crate::application::stack::build_stack`].
pub fn apply_stack<W: WorkingCopy + ?Sized>(working_copy: &W, stack: &PatchStack) -> Result<()> {
    for entry in &stack.entries {
        log::info!("Applying diff {} ({})", entry.diff_id, entry.diff_phid);
        working_copy
            .apply_patch(&entry.patch)
            .with_context(|| format!("apply diff {} ({})", entry.diff_id, entry.diff_phid))?;
    }
    Ok(())
}
