// ABOUTME: Lifecycle of a single database copy job
// ABOUTME: Builds the payload, submits it, polls the job and reports the result

pub mod endpoint;
pub mod payload;
pub mod poll;
pub mod report;
pub mod submission;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::CopyJobConfig;
use crate::error::{CopyError, Result};
use crate::remote::{CopyRequestPayload, CopyResult, CopyTransport};
use crate::sink::{ProgressSink, ResultSink};

pub use endpoint::DatabaseEndpoint;
pub use payload::{build_payload, resolve_payload};
pub use poll::{JobState, PollLoop, PollOutcome};
pub use report::{build_result, format_runtime, report_result};
pub use submission::validate_submission;

/// One copy job invocation. Each instance owns nothing beyond borrowed
/// collaborators, so independent jobs never share state.
pub struct CopyJob<'a> {
    config: &'a CopyJobConfig,
    transport: &'a dyn CopyTransport,
    progress: &'a dyn ProgressSink,
    results: &'a dyn ResultSink,
}

impl<'a> CopyJob<'a> {
    pub fn new(
        config: &'a CopyJobConfig,
        transport: &'a dyn CopyTransport,
        progress: &'a dyn ProgressSink,
        results: &'a dyn ResultSink,
    ) -> Self {
        Self {
            config,
            transport,
            progress,
            results,
        }
    }

    /// Runs the job to completion. The result sink is written only on success.
    pub async fn run(&self) -> Result<CopyResult> {
        let config = self.config;

        let payload = resolve_payload(
            config.source_db_uri.as_deref(),
            config.target_db_uri.as_deref(),
            config.user.as_deref(),
            config.payload.as_deref(),
        );
        if payload.is_none() {
            warn!(
                source = ?config.source_db_uri,
                target = ?config.target_db_uri,
                "copy URIs incomplete and no payload configured; submitting without a body"
            );
        }

        let response = self.transport.submit(payload.as_deref()).await?;
        let handle = validate_submission(
            &response,
            &config.method,
            &config.endpoint,
            payload.as_deref(),
        )?;
        let submitted_at = Instant::now();
        info!(job_id = %handle.job_id, endpoint = %config.endpoint, "copy job submitted");

        let payload = match payload {
            Some(raw) => CopyRequestPayload::from_wire(&raw)
                .map_err(|e| CopyError::InvalidPayload(format!("{}: {}", e, raw)))?,
            None => return Err(CopyError::MissingPayload),
        };

        let outcome = PollLoop::new(
            self.transport,
            self.progress,
            &config.endpoint,
            config.poll_interval,
        )
        .run(&handle, submitted_at)
        .await?;

        let result = report_result(self.results, &payload, outcome.runtime)?;
        info!(
            job_id = %handle.job_id,
            source = %result.source_db_uri,
            target = %result.target_db_uri,
            runtime_secs = %result.runtime,
            "copy result recorded"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Map, Value};

    use crate::error::{CopyError, Result};
    use crate::remote::{CopyResult, CopyTransport, TransportResponse};
    use crate::sink::{ProgressSink, ResultSink};

    /// Answers submissions and polls from fixed scripts, recording what it was asked.
    #[derive(Default)]
    pub struct ScriptedTransport {
        submission: Mutex<Option<TransportResponse>>,
        polls: Mutex<VecDeque<TransportResponse>>,
        submitted: Mutex<Vec<Option<String>>>,
        polled: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub fn new(submission: Value, polls: Vec<Value>) -> Self {
            let transport = Self::polling(polls);
            *transport.submission.lock().unwrap() = Some(TransportResponse::new(201, submission));
            transport
        }

        pub fn polling(polls: Vec<Value>) -> Self {
            Self {
                polls: Mutex::new(
                    polls
                        .into_iter()
                        .map(|body| TransportResponse::new(200, body))
                        .collect(),
                ),
                ..Self::default()
            }
        }

        pub fn submitted_payloads(&self) -> Vec<Option<String>> {
            self.submitted.lock().unwrap().clone()
        }

        pub fn polled_ids(&self) -> Vec<String> {
            self.polled.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CopyTransport for ScriptedTransport {
        async fn submit(&self, payload: Option<&str>) -> Result<TransportResponse> {
            self.submitted
                .lock()
                .unwrap()
                .push(payload.map(str::to_string));
            self.submission
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| CopyError::Transport("no scripted submission".to_string()))
        }

        async fn poll(&self, job_id: &str) -> Result<TransportResponse> {
            self.polled.lock().unwrap().push(job_id.to_string());
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| CopyError::Transport("connection reset".to_string()))
        }
    }

    #[derive(Default)]
    pub struct RecordingProgress(Mutex<Vec<Map<String, Value>>>);

    impl RecordingProgress {
        pub fn snapshots(&self) -> Vec<Map<String, Value>> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ProgressSink for RecordingProgress {
        fn write_progress(&self, progress: &Map<String, Value>) -> Result<()> {
            self.0.lock().unwrap().push(progress.clone());
            Ok(())
        }
    }

    pub struct FailingProgress;

    impl ProgressSink for FailingProgress {
        fn write_progress(&self, _progress: &Map<String, Value>) -> Result<()> {
            Err(CopyError::Sink("progress channel closed".to_string()))
        }
    }

    #[derive(Default)]
    pub struct RecordingResults(Mutex<Vec<CopyResult>>);

    impl RecordingResults {
        pub fn results(&self) -> Vec<CopyResult> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ResultSink for RecordingResults {
        fn write_result(&self, result: &CopyResult) -> Result<()> {
            self.0.lock().unwrap().push(result.clone());
            Ok(())
        }
    }
}
