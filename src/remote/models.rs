// ABOUTME: Data structures exchanged with the remote copy service
// ABOUTME: Request payload, status snapshots and the final result record

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response handed back by a [`super::CopyTransport`] regardless of HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status_code: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status_code: u16, body: Value) -> Self {
        Self { status_code, body }
    }
}

/// Submission body: exactly these five keys go on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRequestPayload {
    pub src_host: String,
    pub src_incl_db: String,
    pub tgt_host: String,
    pub tgt_db_name: String,
    pub user: Option<String>,
}

impl CopyRequestPayload {
    pub fn to_wire(&self) -> String {
        // Only string fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_wire(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
}

/// One poll's view of the remote job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    /// `None` only when the key is absent; a present `null` is `Some(Value::Null)`.
    pub overall_status: Option<Value>,
    pub detailed_status: Map<String, Value>,
}

impl JobStatus {
    /// A missing or non-object `detailed_status` becomes an empty map.
    pub fn from_body(body: &Value) -> Self {
        let overall_status = body.get("overall_status").cloned();
        let detailed_status = body
            .get("detailed_status")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self {
            overall_status,
            detailed_status,
        }
    }

    /// The status text, if the service sent a string.
    pub fn status_str(&self) -> Option<&str> {
        self.overall_status.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    pub source_db_uri: String,
    pub target_db_uri: String,
    pub runtime: String,
}
