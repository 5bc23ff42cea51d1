//! OVH client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OvhError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("unknown OVH endpoint '{0}' (expected an alias like 'ovh-eu' or a base URL)")]
    UnknownEndpoint(String),

    #[error("OVH API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OvhError>;
