// ABOUTME: Progress sink that records each status snapshot as a tracing event

use serde_json::{Map, Value};
use tracing::info;

use super::ProgressSink;
use crate::error::Result;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn write_progress(&self, progress: &Map<String, Value>) -> Result<()> {
        let runtime = progress.get("runtime").and_then(Value::as_str).unwrap_or("");
        let snapshot = Value::Object(progress.clone());
        info!(runtime_secs = runtime, progress = %snapshot, "copy progress");
        Ok(())
    }
}
