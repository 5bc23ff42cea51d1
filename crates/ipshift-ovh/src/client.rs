//! Signed OVH API client.
//!
//! Implements the scheme the official OVH clients use: every request
//! carries the application key, the consumer key, a drift-corrected
//! timestamp and a `$1$`-prefixed SHA-1 signature over
//! `secret+consumer_key+METHOD+url+body+timestamp`.

use crate::config::OvhConfig;
use crate::error::{OvhError, Result};
use async_trait::async_trait;
use ipshift_core::{MoveError, ResourceClient};
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;

/// Authenticated OVH API client.
pub struct OvhClient {
    http: reqwest::Client,
    config: OvhConfig,
    /// Difference between the API server clock and ours, fetched once per
    /// process from `/auth/time`.
    time_delta: OnceCell<i64>,
}

impl OvhClient {
    pub fn new(config: OvhConfig) -> Result<Self> {
        // Without timeouts a stalled provider call would block the whole
        // run; the convergence loop has its own pacing.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            config,
            time_delta: OnceCell::new(),
        })
    }

    /// Build a client straight from `OVH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OvhConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    /// Signature timestamps must match the API server clock, not ours.
    async fn server_time_delta(&self) -> Result<i64> {
        self.time_delta
            .get_or_try_init(|| async {
                let url = self.url("/auth/time");
                tracing::debug!("GET {url}");
                let server: i64 = self
                    .http
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok::<i64, OvhError>(server - local_time())
            })
            .await
            .copied()
    }

    fn signature(&self, method: &str, url: &str, body: &str, timestamp: i64) -> String {
        let input = format!(
            "{}+{}+{}+{}+{}+{}",
            self.config.application_secret,
            self.config.consumer_key,
            method,
            url,
            body,
            timestamp,
        );
        let digest = Sha1::digest(input.as_bytes());
        let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        format!("$1${hex}")
    }

    async fn call(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.url(path);
        // The signature covers the exact bytes sent, so the body is
        // serialized once and reused.
        let body_text = match &body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };
        let timestamp = local_time() + self.server_time_delta().await?;
        let signature = self.signature(method.as_str(), &url, &body_text, timestamp);

        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header("X-Ovh-Application", &self.config.application_key)
            .header("X-Ovh-Consumer", &self.config.consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature);
        if body.is_some() {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body_text);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OvhError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

fn local_time() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[async_trait]
impl ResourceClient for OvhClient {
    async fn get(&self, path: &str) -> ipshift_core::Result<Value> {
        self.call(reqwest::Method::GET, path, None)
            .await
            .map_err(|e| MoveError::Transport(e.to_string()))
    }

    async fn post(&self, path: &str, body: Value) -> ipshift_core::Result<Value> {
        self.call(reqwest::Method::POST, path, Some(body))
            .await
            .map_err(|e| MoveError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OvhClient {
        OvhClient::new(OvhConfig {
            endpoint: "https://eu.api.ovh.com/1.0".to_string(),
            application_key: "app-key".to_string(),
            application_secret: "app-secret".to_string(),
            consumer_key: "consumer-key".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_endpoint_and_path() {
        assert_eq!(
            client().url("/cloud/project"),
            "https://eu.api.ovh.com/1.0/cloud/project"
        );
    }

    #[test]
    fn test_signature_shape() {
        let sig = client().signature(
            "GET",
            "https://eu.api.ovh.com/1.0/cloud/project",
            "",
            1457018875,
        );
        assert!(sig.starts_with("$1$"));
        // "$1$" plus 40 hex characters of SHA-1
        assert_eq!(sig.len(), 43);
        assert!(sig[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_is_deterministic_and_body_sensitive() {
        let c = client();
        let url = "https://eu.api.ovh.com/1.0/cloud/project/p/ip/failover/i/attach";
        let a = c.signature("POST", url, r#"{"instanceId":"inst-new"}"#, 1457018875);
        let b = c.signature("POST", url, r#"{"instanceId":"inst-new"}"#, 1457018875);
        let other_body = c.signature("POST", url, r#"{"instanceId":"inst-old"}"#, 1457018875);
        let other_time = c.signature("POST", url, r#"{"instanceId":"inst-new"}"#, 1457018876);

        assert_eq!(a, b);
        assert_ne!(a, other_body);
        assert_ne!(a, other_time);
    }
}
