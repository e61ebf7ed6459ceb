// ABOUTME: Transport seam between the job lifecycle and the copy service
// ABOUTME: Defines the submit/poll interface and its reqwest implementation

pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpTransport;
pub use models::{CopyRequestPayload, CopyResult, JobHandle, JobStatus, TransportResponse};

/// Submit and poll operations the job lifecycle needs from the network.
///
/// Implementations return responses for every HTTP status; only failures to
/// obtain a JSON body at all are errors. Retrying is up to the implementation.
#[async_trait]
pub trait CopyTransport: Send + Sync {
    /// Send the copy request with the configured method, URL, headers and timeout.
    async fn submit(&self, payload: Option<&str>) -> Result<TransportResponse>;

    /// GET `{endpoint}/{job_id}`.
    async fn poll(&self, job_id: &str) -> Result<TransportResponse>;
}
