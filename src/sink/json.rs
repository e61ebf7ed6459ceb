// ABOUTME: Result sink writing each copy result as one line of JSON

use std::io::Write;
use std::sync::Mutex;

use super::ResultSink;
use crate::error::{CopyError, Result};
use crate::remote::CopyResult;

pub struct JsonResultSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl JsonResultSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonResultSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> ResultSink for JsonResultSink<W> {
    fn write_result(&self, result: &CopyResult) -> Result<()> {
        let line = serde_json::to_string(result).map_err(|e| CopyError::Sink(e.to_string()))?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| CopyError::Sink("result writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| CopyError::Sink(e.to_string()))?;
        writer.flush().map_err(|e| CopyError::Sink(e.to_string()))
    }
}
