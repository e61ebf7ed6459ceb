// ABOUTME: Polls a submitted copy job until it completes or fails
// ABOUTME: Reports a progress snapshot per poll and sleeps a fixed interval between polls

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::report::format_runtime;
use crate::error::{CopyError, Result};
use crate::remote::{CopyTransport, JobHandle, JobStatus};
use crate::sink::ProgressSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Polling,
    Complete,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Time from submission until the completed status was seen.
    pub runtime: Duration,
    pub polls: u32,
}

/// Drives one job from `Submitted` to a terminal state.
///
/// There is no iteration or wall-clock limit; the loop only ends on a
/// terminal status or an error. Transport errors are not retried.
pub struct PollLoop<'a> {
    transport: &'a dyn CopyTransport,
    progress: &'a dyn ProgressSink,
    endpoint: &'a str,
    interval: Duration,
    state: JobState,
}

impl<'a> PollLoop<'a> {
    pub fn new(
        transport: &'a dyn CopyTransport,
        progress: &'a dyn ProgressSink,
        endpoint: &'a str,
        interval: Duration,
    ) -> Self {
        Self {
            transport,
            progress,
            endpoint: endpoint.trim_end_matches('/'),
            interval,
            state: JobState::Submitted,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub async fn run(&mut self, handle: &JobHandle, submitted_at: Instant) -> Result<PollOutcome> {
        let job_id = handle.job_id.as_str();
        let mut polls = 0u32;
        self.state = JobState::Polling;

        loop {
            let response = self.transport.poll(job_id).await?;
            polls += 1;

            let status = JobStatus::from_body(&response.body);
            let mut progress = status.detailed_status;
            progress.insert(
                "runtime".to_string(),
                Value::String(format_runtime(submitted_at.elapsed())),
            );
            if let Err(e) = self.progress.write_progress(&progress) {
                warn!(job_id, error = %e, "failed to report copy progress");
            }

            let Some(overall_status) = status.overall_status.as_ref() else {
                self.state = JobState::Failed;
                return Err(CopyError::MalformedStatus {
                    status_code: response.status_code,
                    body: response.body.to_string(),
                });
            };

            match overall_status.as_str() {
                Some("Failed") => {
                    self.state = JobState::Failed;
                    return Err(CopyError::JobFailure {
                        endpoint: self.endpoint.to_string(),
                        job_id: job_id.to_string(),
                    });
                }
                Some("Complete") => {
                    self.state = JobState::Complete;
                    break;
                }
                _ => {
                    debug!(job_id, status = %overall_status, poll = polls, "copy job still running");
                }
            }

            tokio::time::sleep(self.interval).await;
        }

        let runtime = submitted_at.elapsed();
        info!(
            job_id,
            polls,
            runtime_secs = runtime.as_secs_f64(),
            "copy job complete"
        );
        Ok(PollOutcome { runtime, polls })
    }
}
