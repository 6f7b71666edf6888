use crate::domain::{
    DiffId, DiffPhid, DiffSnapshot, ParentEdge, RevisionPhid, RevisionRecord, StackError,
    StackResult, UserIdentity,
};
use crate::infra::conduit::envelope::{
    DiffRecord, EdgeRecord, RevisionSearchRecord, SearchPage, WhoAmIRecord, decode,
};
use serde_json::{Value, json};

/// Edge type linking a revision to the revisions it depends on.
pub const REVISION_PARENT_EDGE: &str = "revision.parent";

/// Selects diffs for `differential.diff.search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffQuery {
    Phids(Vec<DiffPhid>),
    Ids(Vec<DiffId>),
    Revision(RevisionPhid),
}

impl DiffQuery {
    fn constraints(&self) -> Value {
        match self {
            DiffQuery::Phids(phids) => json!({ "phids": phids }),
            DiffQuery::Ids(ids) => json!({ "ids": ids }),
            DiffQuery::Revision(phid) => json!({ "revisionPHIDs": [phid] }),
        }
    }
}

/// Selects a single revision for `differential.revision.search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionQuery {
    Phid(RevisionPhid),
    Id(u64),
}

impl RevisionQuery {
    fn constraints(&self) -> Value {
        match self {
            RevisionQuery::Phid(phid) => json!({ "phids": [phid] }),
            RevisionQuery::Id(id) => json!({ "ids": [id] }),
        }
    }

    fn describe(&self) -> String {
        match self {
            RevisionQuery::Phid(phid) => phid.to_string(),
            RevisionQuery::Id(id) => format!("D{id}"),
        }
    }
}

/// Synchronous Conduit transport.
///
/// Implementors only provide [`Conduit::call`]; the typed API methods are
/// built on top of it and validate every response shape.
pub trait Conduit {
    /// Call `method` with `params` and return the envelope's `result`.
    fn call(&self, method: &str, params: Value) -> StackResult<Value>;

    fn whoami(&self) -> StackResult<UserIdentity> {
        let method = "user.whoami";
        let record: WhoAmIRecord = decode(method, self.call(method, json!({}))?)?;
        Ok(record.into())
    }

    fn search_diffs(&self, query: &DiffQuery) -> StackResult<Vec<DiffSnapshot>> {
        let method = "differential.diff.search";
        let result = self.call(method, json!({ "constraints": query.constraints() }))?;
        let page: SearchPage<DiffRecord> = decode(method, result)?;
        Ok(page.data.into_iter().map(DiffSnapshot::from).collect())
    }

    /// Load exactly one diff by its PHID.
    fn load_diff(&self, phid: &DiffPhid) -> StackResult<DiffSnapshot> {
        let diffs = self.search_diffs(&DiffQuery::Phids(vec![phid.clone()]))?;
        exactly_one(diffs, || phid.to_string())
    }

    /// Load exactly one diff by its numeric id.
    fn load_diff_by_id(&self, id: DiffId) -> StackResult<DiffSnapshot> {
        let diffs = self.search_diffs(&DiffQuery::Ids(vec![id]))?;
        exactly_one(diffs, || format!("diff {id}"))
    }

    /// Raw unified patch text of a diff.
    fn load_raw_diff(&self, id: DiffId) -> StackResult<String> {
        let method = "differential.getrawdiff";
        decode(method, self.call(method, json!({ "diffID": id }))?)
    }

    fn load_revision(&self, query: &RevisionQuery) -> StackResult<RevisionRecord> {
        let method = "differential.revision.search";
        let result = self.call(method, json!({ "constraints": query.constraints() }))?;
        let page: SearchPage<RevisionSearchRecord> = decode(method, result)?;
        let revisions = page.data.into_iter().map(RevisionRecord::from).collect();
        exactly_one(revisions, || query.describe())
    }

    /// Outgoing `revision.parent` edges of a revision.
    fn search_parent_edges(&self, source: &RevisionPhid) -> StackResult<Vec<ParentEdge>> {
        let method = "edge.search";
        let result = self.call(
            method,
            json!({
                "types": [REVISION_PARENT_EDGE],
                "sourcePHIDs": [source],
            }),
        )?;
        let page: SearchPage<EdgeRecord> = decode(method, result)?;
        Ok(page.data.into_iter().map(ParentEdge::from).collect())
    }
}

fn exactly_one<T>(mut items: Vec<T>, describe: impl FnOnce() -> String) -> StackResult<T> {
    if items.len() != 1 {
        return Err(StackError::RevisionNotFound(describe()));
    }
    items.pop().ok_or_else(|| StackError::RevisionNotFound(String::new()))
}
