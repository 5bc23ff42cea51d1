//! Workflow error types

use crate::model::ResourceKind;
use thiserror::Error;

/// Errors raised by the move workflow.
///
/// Every variant is fatal; the only retry anywhere is the convergence
/// re-poll, which retries the read, never the decision to attach.
#[derive(Error, Debug)]
pub enum MoveError {
    /// Neither a name nor an id was supplied for a resource. Raised before
    /// any network access.
    #[error("no {0} identifier given: pass a name or an id")]
    MissingIdentifier(ResourceKind),

    #[error("unable to find the {kind} '{ident}'")]
    NotFound { kind: ResourceKind, ident: String },

    #[error("unable to fetch the {kind} '{ident}': {cause}")]
    Resolution {
        kind: ResourceKind,
        ident: String,
        cause: String,
    },

    /// The provider call failed at the HTTP/auth/decoding layer.
    #[error("API error: {0}")]
    Transport(String),

    #[error("unable to attach the failover IP '{ip}' to the instance '{instance}': {cause}")]
    Attach {
        ip: String,
        instance: String,
        cause: String,
    },

    /// Only reachable when a poll bound is configured; by default the loop
    /// polls until the provider reports the IP ready.
    #[error("failover IP '{ip}' did not reach status 'ok' after {polls} polls")]
    Convergence { ip: String, polls: u32 },

    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MoveError>;
