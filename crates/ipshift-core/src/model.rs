//! Typed projections of the provider records the workflow touches.
//!
//! Each struct mirrors the wire shape of one API response. Records are
//! replaced wholesale on every fetch, never patched in place.

use serde::{Deserialize, Serialize};

/// Terminal status reported by the provider once a failover IP is usable
/// again. Every other status value means "not yet converged".
pub const STATUS_OK: &str = "ok";

/// The resource kinds the workflow resolves, for error context and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    FloatingIp,
    Instance,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Project => write!(f, "project"),
            ResourceKind::FloatingIp => write!(f, "failover IP"),
            ResourceKind::Instance => write!(f, "instance"),
        }
    }
}

/// A cloud project, the tenant scope every other lookup is nested under.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    #[serde(rename = "project_id")]
    pub id: String,

    /// Human-facing project name shown in the provider console.
    pub description: String,
}

/// A failover IP record.
#[derive(Debug, Clone, Deserialize)]
pub struct FloatingIp {
    pub id: String,

    #[serde(rename = "ip")]
    pub address: String,

    /// Id of the instance currently holding the IP; `None` when unassigned.
    #[serde(rename = "routedTo", default)]
    pub routed_to: Option<String>,

    pub status: String,
}

impl FloatingIp {
    /// Whether the provider reports the IP back at its stable status.
    pub fn is_ready(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// A virtual machine instance. Two participate per run: the previous holder
/// of the IP and the target it moves to.
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    pub id: String,
    pub name: String,
}

/// Wire payload for the attach call. Pure intent, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct AttachRequest {
    #[serde(rename = "instanceId")]
    pub instance_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_ip_wire_shape() {
        let ip: FloatingIp = serde_json::from_value(serde_json::json!({
            "id": "ip-9",
            "ip": "203.0.113.10",
            "routedTo": "inst-old",
            "status": "ok"
        }))
        .unwrap();

        assert_eq!(ip.address, "203.0.113.10");
        assert_eq!(ip.routed_to.as_deref(), Some("inst-old"));
        assert!(ip.is_ready());
    }

    #[test]
    fn test_unassigned_floating_ip() {
        // routedTo can be absent or null for an IP nobody holds
        let absent: FloatingIp = serde_json::from_value(serde_json::json!({
            "id": "ip-9",
            "ip": "203.0.113.10",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(absent.routed_to, None);
        assert!(!absent.is_ready());

        let null: FloatingIp = serde_json::from_value(serde_json::json!({
            "id": "ip-9",
            "ip": "203.0.113.10",
            "routedTo": null,
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(null.routed_to, None);
    }

    #[test]
    fn test_project_wire_shape() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "project_id": "proj-1",
            "description": "prod"
        }))
        .unwrap();
        assert_eq!(project.id, "proj-1");
        assert_eq!(project.description, "prod");
    }

    #[test]
    fn test_attach_request_wire_shape() {
        let body = serde_json::to_value(AttachRequest {
            instance_id: "inst-new".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "instanceId": "inst-new" }));
    }
}
