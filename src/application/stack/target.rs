use crate::application::stack::selector::select_latest_diff;
use crate::domain::{DiffPhid, DiffSnapshot, StackError, StackResult};
use crate::infra::conduit::{Conduit, RevisionQuery};

/// What the user asked to build a stack for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    /// A diff PHID (`PHID-DIFF-…`).
    Diff(DiffPhid),
    /// A numeric diff id.
    DiffId(u64),
    /// A revision (`D1234`); its latest diff is used.
    Revision(u64),
}

impl TargetRef {
    pub fn parse(input: &str) -> StackResult<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with("PHID-") {
            return DiffPhid::parse(trimmed).map(TargetRef::Diff);
        }
        if let Some(id) = trimmed.strip_prefix('D').and_then(|rest| rest.parse().ok()) {
            return Ok(TargetRef::Revision(id));
        }
        trimmed
            .parse()
            .map(TargetRef::DiffId)
            .map_err(|_| StackError::InvalidReference(input.to_string()))
    }
}

/// Look up the diff a [`TargetRef`] points at.
pub fn resolve_target<C: Conduit + ?Sized>(
    conduit: &C,
    target: &TargetRef,
) -> StackResult<DiffSnapshot> {
    match target {
        TargetRef::Diff(phid) => conduit.load_diff(phid),
        TargetRef::DiffId(id) => conduit.load_diff_by_id(*id),
        TargetRef::Revision(id) => {
            let revision = conduit.load_revision(&RevisionQuery::Id(*id))?;
            match revision.diff_phid {
                Some(phid) => conduit.load_diff(&phid),
                None => select_latest_diff(conduit, &revision.phid),
            }
        }
    }
}
