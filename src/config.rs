// ABOUTME: Configuration for a single copy job invocation
// ABOUTME: Loaded from TOML and CLI overrides, then passed explicitly to the job

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CopyError, Result};

pub const DEFAULT_METHOD: &str = "POST";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Resolved configuration consumed read-only by [`crate::copy::CopyJob`].
#[derive(Debug, Clone, PartialEq)]
pub struct CopyJobConfig {
    pub source_db_uri: Option<String>,
    pub target_db_uri: Option<String>,
    pub user: Option<String>,
    /// HTTP method used for the submission request. Polling always uses GET.
    pub method: String,
    /// Submission endpoint; also the base of `{endpoint}/{job_id}` status URLs.
    pub endpoint: String,
    pub headers: BTreeMap<String, String>,
    /// Raw payload used when no payload can be built from the URIs.
    pub payload: Option<String>,
    pub endpoint_timeout: Option<Duration>,
    pub poll_interval: Duration,
}

/// Partial configuration as it appears in a TOML file or on the command line.
///
/// Timeouts are expressed in seconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub source_db_uri: Option<String>,
    pub target_db_uri: Option<String>,
    pub user: Option<String>,
    pub method: Option<String>,
    pub endpoint: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub payload: Option<String>,
    pub endpoint_timeout: Option<f64>,
    pub poll_interval: Option<f64>,
}

impl ConfigFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CopyError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
            .map_err(|e| CopyError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| CopyError::Config(e.to_string()))
    }

    /// Values set in `overrides` win; headers are merged key by key.
    pub fn merge(self, overrides: ConfigFile) -> ConfigFile {
        let headers = match (self.headers, overrides.headers) {
            (Some(mut base), Some(extra)) => {
                base.extend(extra);
                Some(base)
            }
            (base, extra) => extra.or(base),
        };

        ConfigFile {
            source_db_uri: overrides.source_db_uri.or(self.source_db_uri),
            target_db_uri: overrides.target_db_uri.or(self.target_db_uri),
            user: overrides.user.or(self.user),
            method: overrides.method.or(self.method),
            endpoint: overrides.endpoint.or(self.endpoint),
            headers,
            payload: overrides.payload.or(self.payload),
            endpoint_timeout: overrides.endpoint_timeout.or(self.endpoint_timeout),
            poll_interval: overrides.poll_interval.or(self.poll_interval),
        }
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| CopyError::Config(format!("invalid {}: {} ({})", name, value, e)))
}

impl TryFrom<ConfigFile> for CopyJobConfig {
    type Error = CopyError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let endpoint = file
            .endpoint
            .ok_or_else(|| CopyError::Config("endpoint is required".to_string()))?;

        let mut config = CopyJobConfig::new(endpoint);
        config.source_db_uri = file.source_db_uri;
        config.target_db_uri = file.target_db_uri;
        config.user = file.user;
        config.payload = file.payload;
        config.headers = file.headers.unwrap_or_default();
        if let Some(method) = file.method {
            config.method = method;
        }
        if let Some(timeout) = file.endpoint_timeout {
            config.endpoint_timeout = Some(seconds("endpoint_timeout", timeout)?);
        }
        if let Some(interval) = file.poll_interval {
            config.poll_interval = seconds("poll_interval", interval)?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl CopyJobConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            source_db_uri: None,
            target_db_uri: None,
            user: None,
            method: DEFAULT_METHOD.to_string(),
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            payload: None,
            endpoint_timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_source_db_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_db_uri = Some(uri.into());
        self
    }

    pub fn with_target_db_uri(mut self, uri: impl Into<String>) -> Self {
        self.target_db_uri = Some(uri.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_endpoint_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint_timeout = Some(timeout);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| CopyError::Config(format!("invalid endpoint {:?}: {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CopyError::Config(format!(
                "endpoint must be http or https, got {}",
                url.scheme()
            )));
        }

        reqwest::Method::from_bytes(self.method.as_bytes())
            .map_err(|_| CopyError::Config(format!("invalid HTTP method: {:?}", self.method)))?;

        if self.poll_interval.is_zero() {
            return Err(CopyError::Config("poll_interval must be positive".to_string()));
        }

        Ok(())
    }

    /// URL the copy request is submitted to.
    pub fn submit_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// URL of the status resource for one job.
    pub fn status_url(&self, job_id: &str) -> String {
        format!("{}/{}", self.submit_url(), job_id)
    }
}
