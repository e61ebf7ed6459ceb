// ABOUTME: Library root for the database copy job client
// ABOUTME: Exposes configuration, transport, sinks and the job lifecycle

pub mod config;
pub mod copy;
pub mod error;
pub mod remote;
pub mod sink;

pub use config::{ConfigFile, CopyJobConfig};
pub use copy::{CopyJob, DatabaseEndpoint, JobState};
pub use error::{CopyError, Result};
pub use remote::{CopyRequestPayload, CopyResult, CopyTransport, HttpTransport};
