use crate::domain::{RevisionPhid, StackResult};
use crate::infra::conduit::Conduit;

/// Collect every ancestor of `start` by following `revision.parent` edges.
///
/// Ancestors are returned in traversal order and appear at most once. When an
/// already collected ancestor shows up, the remaining edges of that revision
/// are not examined.
pub fn load_parents<C: Conduit + ?Sized>(
    conduit: &C,
    start: &RevisionPhid,
) -> StackResult<Vec<RevisionPhid>> {
    let mut parents: Vec<RevisionPhid> = Vec::new();
    let mut pending = vec![start.clone()];

    while let Some(phid) = pending.pop() {
        for edge in conduit.search_parent_edges(&phid)? {
            if parents.contains(&edge.parent) {
                log::debug!(
                    "Revision {} already in stack, stopping at {}",
                    edge.parent,
                    edge.child
                );
                break;
            }
            parents.push(edge.parent.clone());
            pending.push(edge.parent);
        }
    }

    Ok(parents)
}
