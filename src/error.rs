// ABOUTME: Error types for the copy job lifecycle
// ABOUTME: Carries enough raw request/response detail to debug the copy service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CopyError>;

#[derive(Debug, Error)]
pub enum CopyError {
    /// The submission response carried no usable `job_id`.
    #[error(
        "Copy submission failed. The server did not return a job_id. \
         Request: HTTP {method} {endpoint} -- {payload} \
         Response: HTTP {status_code} -- {body}"
    )]
    SubmissionFailure {
        status_code: u16,
        method: String,
        endpoint: String,
        payload: String,
        body: String,
    },

    /// The remote job reported `overall_status == "Failed"`.
    #[error("The Copy failed, check: {endpoint}/{job_id}")]
    JobFailure { endpoint: String, job_id: String },

    #[error("Copy job was accepted but no copy payload is available to report results from")]
    MissingPayload,

    #[error("Invalid copy payload: {0}")]
    InvalidPayload(String),

    #[error("Malformed job status response (HTTP {status_code}): {body}")]
    MalformedStatus { status_code: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Result sink error: {0}")]
    Sink(String),
}

impl From<reqwest::Error> for CopyError {
    fn from(err: reqwest::Error) -> Self {
        CopyError::Transport(err.to_string())
    }
}

impl From<rusqlite::Error> for CopyError {
    fn from(err: rusqlite::Error) -> Self {
        CopyError::Sink(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_failure_embeds_request_and_response() {
        let err = CopyError::SubmissionFailure {
            status_code: 400,
            method: "POST".to_string(),
            endpoint: "http://copy.example.org/api/dbcopy/requestjob".to_string(),
            payload: r#"{"src_host":"h1:3306"}"#.to_string(),
            body: r#"{"error":"bad request"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Copy submission failed. The server did not return a job_id."));
        assert!(msg.contains(
            r#"Request: HTTP POST http://copy.example.org/api/dbcopy/requestjob -- {"src_host":"h1:3306"}"#
        ));
        assert!(msg.contains(r#"Response: HTTP 400 -- {"error":"bad request"}"#));
    }

    #[test]
    fn test_job_failure_names_status_url() {
        let err = CopyError::JobFailure {
            endpoint: "http://copy.example.org/jobs".to_string(),
            job_id: "42".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "The Copy failed, check: http://copy.example.org/jobs/42"
        );
    }

    #[test]
    fn test_malformed_status_display() {
        let err = CopyError::MalformedStatus {
            status_code: 502,
            body: "{}".to_string(),
        };
        assert!(err.to_string().contains("HTTP 502"));
    }
}
