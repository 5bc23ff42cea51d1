//! Attach orchestration: idempotency check, attach request, convergence.

use crate::client::ResourceClient;
use crate::error::{MoveError, Result};
use crate::model::{AttachRequest, FloatingIp, Instance, Project, STATUS_OK};
use crate::resolve;
use std::time::Duration;

/// Poll tuning for the convergence loop.
///
/// The default mirrors the tool's operational behavior: fixed one-second
/// cadence, no upper bound. Tests and cautious operators set `max_polls`
/// to bound worst-case blocking.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between status polls.
    pub interval: Duration,

    /// Maximum number of status re-fetches before giving up; `None` polls
    /// forever.
    pub max_polls: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: None,
        }
    }
}

/// How a run ended, with everything the caller needs to report it.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The IP was already routed to the target; no write was issued.
    AlreadyRouted { ip: FloatingIp, target: Instance },

    /// The attach was issued and the IP converged back to ready.
    Attached {
        ip: FloatingIp,
        target: Instance,
        previous: Instance,
        /// Number of status re-fetches the convergence loop needed.
        polls: u32,
    },
}

/// Whether `ip` is already routed to `target`. Pure comparison.
pub fn is_already_routed(ip: &FloatingIp, target: &Instance) -> bool {
    ip.routed_to.as_deref() == Some(target.id.as_str())
}

/// Move `ip` to `target`, unless it is already there.
///
/// The previous holder is resolved up front on both paths so the final
/// report can name it; an unassigned IP therefore fails here, visibly,
/// rather than being silently defaulted. After the attach the response
/// record replaces the in-memory one wholesale, and the loop keeps
/// re-fetching until the provider reports the IP ready.
pub async fn move_floating_ip(
    client: &dyn ResourceClient,
    project: &Project,
    ip: FloatingIp,
    target: &Instance,
    poll: &PollConfig,
) -> Result<MoveOutcome> {
    let holder = ip.routed_to.clone().unwrap_or_default();
    let previous = resolve::fetch_instance(client, &project.id, &holder).await?;

    tracing::debug!(
        "failover IP {} is attached to {} ({}), target is {} ({})",
        ip.address,
        previous.name,
        previous.id,
        target.name,
        target.id,
    );

    if is_already_routed(&ip, target) {
        return Ok(MoveOutcome::AlreadyRouted {
            ip,
            target: target.clone(),
        });
    }

    tracing::info!("attaching failover IP {} to {}", ip.address, target.name);
    let attach_path = format!(
        "/cloud/project/{}/ip/failover/{}/attach",
        project.id, ip.id
    );
    let body = serde_json::to_value(AttachRequest {
        instance_id: target.id.clone(),
    })?;
    let value = client
        .post(&attach_path, body)
        .await
        .map_err(|e| MoveError::Attach {
            ip: ip.address.clone(),
            instance: target.name.clone(),
            cause: e.to_string(),
        })?;

    // The attach response is itself a refreshed failover IP record.
    let mut ip: FloatingIp = serde_json::from_value(value)?;

    let status_path = format!("/cloud/project/{}/ip/failover/{}", project.id, ip.id);
    let mut polls: u32 = 0;
    while !ip.is_ready() {
        tracing::debug!(
            "failover IP {} status is '{}', waiting for '{}'",
            ip.address,
            ip.status,
            STATUS_OK,
        );

        if let Some(max) = poll.max_polls {
            if polls >= max {
                return Err(MoveError::Convergence {
                    ip: ip.address.clone(),
                    polls,
                });
            }
        }

        let value = client
            .get(&status_path)
            .await
            .map_err(|e| MoveError::Attach {
                ip: ip.address.clone(),
                instance: target.name.clone(),
                cause: e.to_string(),
            })?;
        ip = serde_json::from_value(value)?;
        polls += 1;

        tokio::time::sleep(poll.interval).await;
    }

    Ok(MoveOutcome::Attached {
        ip,
        target: target.clone(),
        previous,
        polls,
    })
}
