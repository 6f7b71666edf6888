//! Conduit response envelope and typed response records.
//!
//! Every response is validated here, at the deserialization boundary, so the
//! rest of the crate only ever sees well-formed domain types.

use crate::domain::{
    DiffPhid, DiffSnapshot, ParentEdge, RevisionPhid, RevisionRecord, StackError, StackResult,
    UserIdentity, UserPhid,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `{result, error_code, error_info}` wrapper around every Conduit answer.
///
/// A missing `result` reads as null; the typed decoders reject it when a
/// method needs a payload.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    error_info: Option<String>,
}

/// Unwrap a raw response body into its `result` payload.
///
/// A non-null `error_code` becomes [`StackError::Conduit`] and is logged at
/// warning level before being returned.
pub fn parse_envelope(method: &str, body: &str) -> StackResult<Value> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|err| StackError::invalid_response(method, format!("malformed envelope: {err}")))?;

    if let Some(code) = envelope.error_code.filter(|code| !code.is_null()) {
        let code = match code {
            Value::String(code) => code,
            other => other.to_string(),
        };
        log::warn!(
            "Conduit API error {} : {}",
            code,
            envelope.error_info.as_deref().unwrap_or("unknown")
        );
        return Err(StackError::Conduit {
            code,
            info: envelope.error_info,
        });
    }

    Ok(envelope.result)
}

/// Decode a `result` payload into a typed record.
pub fn decode<T: DeserializeOwned>(method: &str, value: Value) -> StackResult<T> {
    serde_json::from_value(value).map_err(|err| StackError::invalid_response(method, err))
}

/// One page of a `*.search` method.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiffRecord {
    id: u64,
    phid: DiffPhid,
    fields: DiffFields,
}

#[derive(Debug, Deserialize)]
struct DiffFields {
    #[serde(rename = "revisionPHID")]
    revision_phid: RevisionPhid,
    #[serde(default)]
    refs: Vec<DiffRef>,
}

#[derive(Debug, Deserialize)]
struct DiffRef {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    identifier: Option<String>,
}

impl From<DiffRecord> for DiffSnapshot {
    fn from(record: DiffRecord) -> Self {
        let base_revision = record
            .fields
            .refs
            .into_iter()
            .find(|r| r.kind == "base")
            .and_then(|r| r.identifier)
            .filter(|identifier| !identifier.is_empty());

        DiffSnapshot {
            phid: record.phid,
            id: record.id,
            revision_phid: record.fields.revision_phid,
            base_revision,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EdgeRecord {
    #[serde(rename = "sourcePHID")]
    source_phid: RevisionPhid,
    #[serde(rename = "destinationPHID")]
    destination_phid: RevisionPhid,
}

impl From<EdgeRecord> for ParentEdge {
    fn from(record: EdgeRecord) -> Self {
        ParentEdge {
            child: record.source_phid,
            parent: record.destination_phid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RevisionSearchRecord {
    id: u64,
    phid: RevisionPhid,
    fields: RevisionFields,
}

#[derive(Debug, Deserialize)]
struct RevisionFields {
    title: String,
    #[serde(rename = "diffPHID", default)]
    diff_phid: Option<DiffPhid>,
}

impl From<RevisionSearchRecord> for RevisionRecord {
    fn from(record: RevisionSearchRecord) -> Self {
        RevisionRecord {
            id: record.id,
            phid: record.phid,
            title: record.fields.title,
            diff_phid: record.fields.diff_phid,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WhoAmIRecord {
    phid: UserPhid,
    user_name: String,
    real_name: String,
}

impl From<WhoAmIRecord> for UserIdentity {
    fn from(record: WhoAmIRecord) -> Self {
        UserIdentity {
            phid: record.phid,
            user_name: record.user_name,
            real_name: record.real_name,
        }
    }
}
