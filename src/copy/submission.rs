// ABOUTME: Validates the copy service's reply to a job submission
// ABOUTME: Extracts the job id or fails with the full request/response detail

use serde_json::Value;
use tracing::warn;

use crate::error::{CopyError, Result};
use crate::remote::{JobHandle, TransportResponse};

/// JSON "falsiness": null, false, zero, and empty strings, arrays and objects.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Returns the job handle from a submission response.
///
/// When the service answers with a list of ids only the first one is
/// tracked; the others are logged and otherwise ignored.
pub fn validate_submission(
    response: &TransportResponse,
    method: &str,
    endpoint: &str,
    payload: Option<&str>,
) -> Result<JobHandle> {
    let job_id = match response.body.get("job_id") {
        Some(id) if is_present(id) => id,
        _ => {
            return Err(CopyError::SubmissionFailure {
                status_code: response.status_code,
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                payload: payload.unwrap_or("None").to_string(),
                body: response.body.to_string(),
            })
        }
    };

    let job_id = match job_id {
        Value::Array(ids) => {
            if ids.len() > 1 {
                let discarded = Value::Array(ids[1..].to_vec());
                warn!(
                    discarded = %discarded,
                    "copy service returned several job ids; tracking only the first"
                );
            }
            id_string(&ids[0])
        }
        other => id_string(other),
    };

    Ok(JobHandle { job_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENDPOINT: &str = "http://copy.example.org/api/dbcopy/requestjob";

    fn validate(status_code: u16, body: Value) -> Result<JobHandle> {
        validate_submission(
            &TransportResponse::new(status_code, body),
            "POST",
            ENDPOINT,
            Some(r#"{"src_host":"host1:3306"}"#),
        )
    }

    #[test]
    fn test_string_job_id() {
        let handle = validate(201, json!({"job_id": "42"})).unwrap();
        assert_eq!(handle.job_id, "42");
    }

    #[test]
    fn test_first_of_job_id_list() {
        let handle = validate(201, json!({"job_id": ["abc", "def"]})).unwrap();
        assert_eq!(handle.job_id, "abc");
    }

    #[test]
    fn test_numeric_job_id() {
        let handle = validate(200, json!({"job_id": 7})).unwrap();
        assert_eq!(handle.job_id, "7");
        let handle = validate(200, json!({"job_id": [9, 10]})).unwrap();
        assert_eq!(handle.job_id, "9");
    }

    #[test]
    fn test_missing_job_id_reports_request_and_response() {
        let err = validate(400, json!({"error": "source host unknown"})).unwrap_err();
        match &err {
            CopyError::SubmissionFailure {
                status_code,
                method,
                endpoint,
                payload,
                body,
            } => {
                assert_eq!(*status_code, 400);
                assert_eq!(method, "POST");
                assert_eq!(endpoint, ENDPOINT);
                assert_eq!(payload, r#"{"src_host":"host1:3306"}"#);
                assert_eq!(body, r#"{"error":"source host unknown"}"#);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let msg = err.to_string();
        assert!(msg.contains("POST"));
        assert!(msg.contains(ENDPOINT));
        assert!(msg.contains(r#"{"src_host":"host1:3306"}"#));
        assert!(msg.contains("400"));
        assert!(msg.contains(r#"{"error":"source host unknown"}"#));
    }

    #[test]
    fn test_falsy_job_ids_rejected() {
        for body in [
            json!({"job_id": null}),
            json!({"job_id": ""}),
            json!({"job_id": []}),
            json!({"job_id": 0}),
            json!({"job_id": false}),
            json!([{"job_id": "42"}]),
            json!("42"),
        ] {
            assert!(
                matches!(validate(200, body.clone()), Err(CopyError::SubmissionFailure { .. })),
                "{}",
                body
            );
        }
    }

    #[test]
    fn test_absent_payload_rendered_as_none() {
        let err = validate_submission(
            &TransportResponse::new(500, json!({})),
            "POST",
            ENDPOINT,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains(&format!("POST {} -- None", ENDPOINT)));
    }
}
