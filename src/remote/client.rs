// ABOUTME: HTTP client for communicating with the remote copy service
// ABOUTME: Issues submission and status requests and decodes JSON bodies

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use super::models::TransportResponse;
use super::CopyTransport;
use crate::config::CopyJobConfig;
use crate::error::{CopyError, Result};

pub struct HttpTransport {
    client: Client,
    config: CopyJobConfig,
    method: Method,
    headers: HeaderMap,
}

impl HttpTransport {
    pub fn new(config: CopyJobConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| CopyError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Self::with_client(client, config)
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: Client, config: CopyJobConfig) -> Result<Self> {
        let method = Method::from_bytes(config.method.to_uppercase().as_bytes())
            .map_err(|_| CopyError::Config(format!("invalid HTTP method: {:?}", config.method)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| CopyError::Config(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| CopyError::Config(format!("invalid header value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        Ok(Self {
            client,
            config,
            method,
            headers,
        })
    }

    fn prepare(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .headers(self.headers.clone());
        if let Some(timeout) = self.config.endpoint_timeout {
            request = request.timeout(timeout);
        }
        request
    }

    async fn execute(request: RequestBuilder) -> Result<TransportResponse> {
        let response = request.send().await?;
        let status_code = response.status().as_u16();
        let text = response.text().await?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            CopyError::Transport(format!(
                "response (HTTP {}) is not valid JSON: {}: {}",
                status_code, e, text
            ))
        })?;

        Ok(TransportResponse { status_code, body })
    }
}

#[async_trait]
impl CopyTransport for HttpTransport {
    async fn submit(&self, payload: Option<&str>) -> Result<TransportResponse> {
        let url = self.config.submit_url();
        debug!(method = %self.method, url, "submitting copy request");

        let mut request = self.prepare(self.method.clone(), url);
        if let Some(payload) = payload {
            request = request.body(payload.to_string());
        }

        Self::execute(request).await
    }

    async fn poll(&self, job_id: &str) -> Result<TransportResponse> {
        let url = self.config.status_url(job_id);
        debug!(url = %url, "fetching copy job status");

        Self::execute(self.prepare(Method::GET, &url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let transport = HttpTransport::new(CopyJobConfig::new("https://copy.example.org/jobs"));
        assert!(transport.is_ok());
    }

    #[test]
    fn test_lowercase_method_accepted() {
        let config = CopyJobConfig::new("https://copy.example.org/jobs").with_method("put");
        let transport = HttpTransport::new(config).unwrap();
        assert_eq!(transport.method, Method::PUT);
    }

    #[test]
    fn test_invalid_header_rejected() {
        let config =
            CopyJobConfig::new("https://copy.example.org/jobs").with_header("bad header", "x");
        assert!(matches!(
            HttpTransport::new(config),
            Err(CopyError::Config(_))
        ));
    }
}
