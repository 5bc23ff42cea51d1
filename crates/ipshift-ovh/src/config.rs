//! Client configuration sourced from the environment.

use crate::error::{OvhError, Result};

/// Endpoint alias used when `OVH_ENDPOINT` is unset.
const DEFAULT_ENDPOINT: &str = "ovh-eu";

/// Endpoint aliases accepted by the official OVH clients.
const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

/// Credentials and endpoint for the OVH API.
#[derive(Debug, Clone)]
pub struct OvhConfig {
    /// Base URL of the API, without a trailing slash.
    pub endpoint: String,
    pub application_key: String,
    pub application_secret: String,
    pub consumer_key: String,
}

impl OvhConfig {
    /// Read the configuration from `OVH_*` environment variables.
    ///
    /// `OVH_ENDPOINT` accepts a known alias (`ovh-eu`, `ovh-ca`, ...) or a
    /// full base URL, and defaults to `ovh-eu`. The three credential
    /// variables are required.
    pub fn from_env() -> Result<Self> {
        let endpoint = match std::env::var("OVH_ENDPOINT") {
            Ok(value) => resolve_endpoint(&value)?,
            Err(_) => resolve_endpoint(DEFAULT_ENDPOINT)?,
        };

        Ok(Self {
            endpoint,
            application_key: require_env("OVH_APPLICATION_KEY")?,
            application_secret: require_env("OVH_APPLICATION_SECRET")?,
            consumer_key: require_env("OVH_CONSUMER_KEY")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| OvhError::MissingEnvVar(name.to_string()))
}

/// Map an endpoint alias to its base URL; full URLs pass through unchanged.
fn resolve_endpoint(value: &str) -> Result<String> {
    if value.starts_with("https://") || value.starts_with("http://") {
        return Ok(value.trim_end_matches('/').to_string());
    }

    ENDPOINTS
        .iter()
        .find(|(alias, _)| *alias == value)
        .map(|(_, url)| (*url).to_string())
        .ok_or_else(|| OvhError::UnknownEndpoint(value.to_string()))
}
