// ABOUTME: Output channels for per-poll progress and the final copy result
// ABOUTME: Progress and result go to separate sinks

pub mod json;
pub mod log;
pub mod progress_bar;
pub mod sqlite;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::remote::CopyResult;

pub use json::JsonResultSink;
pub use log::LogProgressSink;
pub use progress_bar::ProgressBarSink;
pub use sqlite::SqliteResultSink;

/// Receives one status snapshot per poll. Errors are logged and ignored.
pub trait ProgressSink: Send + Sync {
    fn write_progress(&self, progress: &Map<String, Value>) -> Result<()>;
}

/// Receives the result of a successful copy, exactly once.
pub trait ResultSink: Send + Sync {
    fn write_result(&self, result: &CopyResult) -> Result<()>;
}

/// Writes the same result to several sinks, stopping at the first failure.
#[derive(Default)]
pub struct MultiResultSink {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl MultiResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl ResultSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultSink for MultiResultSink {
    fn write_result(&self, result: &CopyResult) -> Result<()> {
        for sink in &self.sinks {
            sink.write_result(result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recording(Arc<Mutex<Vec<CopyResult>>>);

    impl ResultSink for Recording {
        fn write_result(&self, result: &CopyResult) -> Result<()> {
            self.0.lock().unwrap().push(result.clone());
            Ok(())
        }
    }

    #[test]
    fn test_multi_sink_writes_to_all() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let mut multi = MultiResultSink::new();
        assert!(multi.is_empty());
        multi.push(Recording(first.clone()));
        multi.push(Recording(second.clone()));

        let result = CopyResult {
            source_db_uri: "h1:1/a".to_string(),
            target_db_uri: "h2:2".to_string(),
            runtime: "1.5".to_string(),
        };
        multi.write_result(&result).unwrap();

        assert_eq!(first.lock().unwrap().as_slice(), &[result.clone()]);
        assert_eq!(second.lock().unwrap().as_slice(), &[result]);
    }
}
