#![allow(dead_code)]

use phabstack::domain::{StackError, StackResult};
use phabstack::infra::conduit::Conduit;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

/// Conduit server backed by in-memory revisions, diffs and parent edges.
#[derive(Default)]
pub struct FakeConduit {
    edges: HashMap<String, Vec<String>>,
    diffs: Vec<Value>,
    raw: HashMap<u64, String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeConduit {
    pub fn parent(mut self, child: &str, parent: &str) -> Self {
        self.edges
            .entry(child.to_string())
            .or_default()
            .push(parent.to_string());
        self
    }

    pub fn diff(mut self, id: u64, phid: &str, revision: &str, base: Option<&str>, raw: &str) -> Self {
        let refs = match base {
            Some(base) => json!([{ "type": "base", "identifier": base }]),
            None => json!([]),
        };
        self.diffs.push(json!({
            "id": id,
            "type": "DIFF",
            "phid": phid,
            "fields": {
                "revisionPHID": revision,
                "authorPHID": "PHID-USER-author",
                "refs": refs,
                "dateCreated": 1_540_000_000 + id,
            },
            "attachments": {}
        }));
        self.raw.insert(id, raw.to_string());
        self
    }

    fn matching_diffs(&self, constraints: &Value) -> Vec<Value> {
        self.diffs
            .iter()
            .filter(|diff| {
                if let Some(revisions) = constraints["revisionPHIDs"].as_array() {
                    return revisions.contains(&diff["fields"]["revisionPHID"]);
                }
                if let Some(phids) = constraints["phids"].as_array() {
                    return phids.contains(&diff["phid"]);
                }
                if let Some(ids) = constraints["ids"].as_array() {
                    return ids.contains(&diff["id"]);
                }
                true
            })
            .cloned()
            .collect()
    }
}

impl Conduit for FakeConduit {
    fn call(&self, method: &str, params: Value) -> StackResult<Value> {
        self.calls.borrow_mut().push(method.to_string());
        match method {
            "edge.search" => {
                let source = params["sourcePHIDs"][0].as_str().unwrap_or_default();
                let data: Vec<Value> = self
                    .edges
                    .get(source)
                    .into_iter()
                    .flatten()
                    .map(|parent| {
                        json!({
                            "sourcePHID": source,
                            "edgeType": "revision.parent",
                            "destinationPHID": parent,
                        })
                    })
                    .collect();
                Ok(json!({ "data": data, "cursor": { "after": null } }))
            }
            "differential.diff.search" => Ok(json!({
                "data": self.matching_diffs(&params["constraints"]),
                "cursor": { "after": null }
            })),
            "differential.getrawdiff" => {
                let id = params["diffID"].as_u64().unwrap_or_default();
                self.raw.get(&id).map(|raw| json!(raw)).ok_or_else(|| {
                    StackError::Conduit {
                        code: "ERR-NOT-FOUND".into(),
                        info: Some(format!("diff {id} not found")),
                    }
                })
            }
            other => Err(StackError::Conduit {
                code: "ERR-CONDUIT-CALL".into(),
                info: Some(format!("method {other} does not exist")),
            }),
        }
    }
}
