//! Provider API seam

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Authenticated access to the provider's HTTP API.
///
/// The workflow only needs two verbs; signing, endpoints and session setup
/// all live behind the implementation. The concrete client is in
/// `ipshift-ovh`; tests drive the workflow with a scripted one.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Authenticated read. The response may be a single object or a list,
    /// of objects or of bare id strings.
    async fn get(&self, path: &str) -> Result<Value>;

    /// Authenticated write with a JSON body; returns the updated resource.
    async fn post(&self, path: &str, body: Value) -> Result<Value>;
}
