use crate::application::stack::base::resolve_base;
use crate::application::stack::selector::select_latest_diff;
use crate::application::stack::walker::load_parents;
use crate::domain::{
    DiffId, DiffPhid, DiffSnapshot, PatchStack, PatchStackEntry, StackError, StackResult,
};
use crate::infra::conduit::Conduit;
use crate::infra::vcs::WorkingCopy;

/// Fetch `target` and every diff it depends on, then check the working copy
/// out at the resolved base.
///
/// The returned entries are ordered oldest ancestor first, `target` last.
/// The working copy is updated with a clean checkout but no patch is applied.
pub fn build_stack<C, W>(
    conduit: &C,
    working_copy: &W,
    target: &DiffSnapshot,
    default_base: &str,
) -> StackResult<PatchStack>
where
    C: Conduit + ?Sized,
    W: WorkingCopy + ?Sized,
{
    // Diffs from the target down to its root, in insertion order.
    let mut patches: Vec<(DiffPhid, DiffId)> = vec![(target.phid.clone(), target.id)];

    let parents = load_parents(conduit, &target.revision_phid)?;
    let mut parent_diffs = Vec::with_capacity(parents.len());
    for parent in &parents {
        log::info!("Loading parent diff for {parent}");
        let diff = select_latest_diff(conduit, parent)?;
        insert_ordered(&mut patches, diff.phid.clone(), diff.id);
        parent_diffs.push(diff);
    }

    let base = resolve_base(target, &parent_diffs, working_copy, default_base);

    let mut entries = Vec::with_capacity(patches.len());
    for (diff_phid, diff_id) in patches {
        let patch = conduit.load_raw_diff(diff_id)?;
        entries.push(PatchStackEntry {
            diff_phid,
            diff_id,
            patch,
        });
    }

    log::info!("Updating repo to revision {}", base.revision);
    let checkout_error = |source| StackError::Checkout {
        revision: base.revision.clone(),
        source,
    };
    working_copy
        .checkout(&base.revision, true)
        .map_err(checkout_error)?;
    let current = working_copy.current_revision().map_err(checkout_error)?;
    log::info!("Updated repo to revision {}", current.node);

    entries.reverse();
    Ok(PatchStack {
        base: base.revision,
        base_fallback: base.fallback,
        working_copy: current,
        entries,
    })
}

/// Insert keeping first-insertion position; a repeated key only updates its value.
fn insert_ordered(patches: &mut Vec<(DiffPhid, DiffId)>, phid: DiffPhid, id: DiffId) {
    match patches.iter_mut().find(|(existing, _)| *existing == phid) {
        Some(slot) => slot.1 = id,
        None => patches.push((phid, id)),
    }
}
