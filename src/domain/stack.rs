//! Patch stack domain types.

use crate::domain::diff::{DiffId, VcsRevision};
use crate::domain::phid::DiffPhid;
use serde::{Deserialize, Serialize};

/// One diff of the stack paired with its raw patch text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchStackEntry {
    pub diff_phid: DiffPhid,
    pub diff_id: DiffId,
    pub patch: String,
}

/// Why the declared base revision was replaced by the default one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BaseFallback {
    /// No diff in the chain declared a base revision.
    Missing,
    /// The declared base is not present in the working copy.
    Unavailable { declared: VcsRevision },
}

/// Outcome of base revision resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseResolution {
    pub revision: VcsRevision,
    pub fallback: Option<BaseFallback>,
}

/// State of the working copy after checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingCopyRevision {
    /// Full revision hash.
    pub node: String,
    /// First line of the revision description.
    pub summary: String,
}

/// Ordered patches ready for sequential application.
///
/// `entries[0]` is the most distant ancestor and the last entry is the
/// requested diff. Applying them in order on top of `base` reproduces the
/// requested diff's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchStack {
    pub base: VcsRevision,
    pub base_fallback: Option<BaseFallback>,
    pub working_copy: WorkingCopyRevision,
    pub entries: Vec<PatchStackEntry>,
}

impl PatchStack {
    pub fn target(&self) -> Option<&PatchStackEntry> {
        self.entries.last()
    }

    /// Diffs that must be applied before the target, oldest first.
    pub fn ancestors(&self) -> &[PatchStackEntry] {
        match self.entries.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}
