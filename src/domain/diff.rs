use crate::domain::phid::{DiffPhid, RevisionPhid, UserPhid};
use serde::{Deserialize, Serialize};

/// Numeric diff id, increasing in creation order.
pub type DiffId = u64;

/// Version control revision identifier (commit hash, branch or tag name).
pub type VcsRevision = String;

/// One versioned patch submission attached to a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSnapshot {
    pub phid: DiffPhid,
    pub id: DiffId,
    /// Revision this diff was submitted to.
    pub revision_phid: RevisionPhid,
    /// Base revision declared by the submitter, if any.
    pub base_revision: Option<VcsRevision>,
}

/// `child -> parent` dependency between two revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentEdge {
    pub child: RevisionPhid,
    pub parent: RevisionPhid,
}

/// Minimal view of a Differential revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub id: u64,
    pub phid: RevisionPhid,
    pub title: String,
    /// PHID of the revision's latest diff, when the server reports it.
    pub diff_phid: Option<DiffPhid>,
}

/// The account the API token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub phid: UserPhid,
    pub user_name: String,
    pub real_name: String,
}
