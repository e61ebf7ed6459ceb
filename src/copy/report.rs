// ABOUTME: Formats and emits the final copy result after a successful job

use std::time::Duration;

use crate::error::Result;
use crate::remote::{CopyRequestPayload, CopyResult};
use crate::sink::ResultSink;

/// Seconds as a decimal string. Debug formatting keeps the `.0` on whole values.
pub fn format_runtime(runtime: Duration) -> String {
    format!("{:?}", runtime.as_secs_f64())
}

pub fn build_result(payload: &CopyRequestPayload, runtime: Duration) -> CopyResult {
    CopyResult {
        source_db_uri: format!("{}/{}", payload.src_host, payload.src_incl_db),
        target_db_uri: payload.tgt_host.clone(),
        runtime: format_runtime(runtime),
    }
}

pub fn report_result(
    sink: &dyn ResultSink,
    payload: &CopyRequestPayload,
    runtime: Duration,
) -> Result<CopyResult> {
    let result = build_result(payload, runtime);
    sink.write_result(&result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(Duration::from_secs(120)), "120.0");
        assert_eq!(format_runtime(Duration::from_millis(1500)), "1.5");
        assert_eq!(format_runtime(Duration::ZERO), "0.0");
    }

    #[test]
    fn test_build_result_uses_payload_hosts() {
        let payload = CopyRequestPayload {
            src_host: "host1:3306".to_string(),
            src_incl_db: "srcdb".to_string(),
            tgt_host: "host2:3307".to_string(),
            tgt_db_name: "tgtdb".to_string(),
            user: Some("alice".to_string()),
        };
        let result = build_result(&payload, Duration::from_secs(61));

        assert_eq!(result.source_db_uri, "host1:3306/srcdb");
        assert_eq!(result.target_db_uri, "host2:3307");
        assert_eq!(result.runtime, "61.0");
    }
}
