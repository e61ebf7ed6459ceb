// ABOUTME: Terminal progress bar fed from the copy service's detailed status
// ABOUTME: Reads the `progress` percentage and `status_msg`; other fields are ignored

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};

use super::ProgressSink;
use crate::error::Result;

const TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40}] {pos:>3}% {msg}";

pub struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(100))
    }

    pub fn with_bar(bar: ProgressBar) -> Self {
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressBarSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentages arrive as numbers or numeric strings; clamp to 0..=100.
fn percent(value: &Value) -> Option<u64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(raw.clamp(0.0, 100.0) as u64)
}

impl ProgressSink for ProgressBarSink {
    fn write_progress(&self, progress: &Map<String, Value>) -> Result<()> {
        if let Some(pos) = progress.get("progress").and_then(percent) {
            self.bar.set_position(pos);
        }

        let mut message = progress
            .get("status_msg")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if let (Some(done), Some(total)) = (
            progress.get("table_copied").and_then(Value::as_u64),
            progress.get("total_tables").and_then(Value::as_u64),
        ) {
            message = format!("{} ({}/{} tables)", message, done, total)
                .trim()
                .to_string();
        }
        self.bar.set_message(message);
        self.bar.tick();
        Ok(())
    }
}
