use crate::domain::{DiffSnapshot, RevisionPhid, StackError, StackResult};
use crate::infra::conduit::{Conduit, DiffQuery};

/// Most recently created diff of `revision`, i.e. the one with the highest id.
///
/// A revision without any diff means the edge graph and the diff index
/// disagree, which is reported as [`StackError::DiffConsistency`].
pub fn select_latest_diff<C: Conduit + ?Sized>(
    conduit: &C,
    revision: &RevisionPhid,
) -> StackResult<DiffSnapshot> {
    let mut diffs = conduit.search_diffs(&DiffQuery::Revision(revision.clone()))?;
    diffs.sort_by_key(|diff| diff.id);
    diffs
        .pop()
        .ok_or_else(|| StackError::DiffConsistency(revision.to_string()))
}
