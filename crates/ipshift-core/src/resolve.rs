//! Name-or-id resolution for the three resource kinds.
//!
//! An id is taken at face value and fetched directly, with no fallback. A
//! name falls back to listing the kind in scope and scanning in provider
//! list order; the first record whose display field matches exactly wins,
//! and later duplicates are silently ignored. Two resources sharing a
//! display name must therefore be selected by id.

use crate::client::ResourceClient;
use crate::error::{MoveError, Result};
use crate::model::{FloatingIp, Instance, Project, ResourceKind};
use serde::de::DeserializeOwned;

/// How the operator identified one resource on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Name(String),
}

impl Selector {
    /// Build a selector from the name/id flag pair of one resource kind.
    ///
    /// The id wins when both are given. Both missing is a configuration
    /// error, raised before any network access.
    pub fn from_flags(
        kind: ResourceKind,
        name: Option<String>,
        id: Option<String>,
    ) -> Result<Self> {
        match (id, name) {
            (Some(id), _) if !id.is_empty() => Ok(Selector::Id(id)),
            (_, Some(name)) if !name.is_empty() => Ok(Selector::Name(name)),
            _ => Err(MoveError::MissingIdentifier(kind)),
        }
    }

    /// The raw identifier the operator supplied, whichever form it took.
    pub fn ident(&self) -> &str {
        match self {
            Selector::Id(value) | Selector::Name(value) => value,
        }
    }
}

/// Resolve the project the whole run is scoped to.
///
/// Projects list as bare id strings, so name resolution needs one extra
/// fetch per listed id to obtain the description it compares against.
pub async fn resolve_project(
    client: &dyn ResourceClient,
    selector: &Selector,
) -> Result<Project> {
    tracing::debug!("resolving project '{}'", selector.ident());
    match selector {
        Selector::Id(id) => {
            fetch_direct(
                client,
                ResourceKind::Project,
                id,
                &format!("/cloud/project/{id}"),
            )
            .await
        }
        Selector::Name(name) => {
            let value =
                client
                    .get("/cloud/project")
                    .await
                    .map_err(|e| MoveError::Resolution {
                        kind: ResourceKind::Project,
                        ident: name.clone(),
                        cause: e.to_string(),
                    })?;
            let ids: Vec<String> = serde_json::from_value(value)?;

            for id in ids {
                let project: Project = fetch_direct(
                    client,
                    ResourceKind::Project,
                    &id,
                    &format!("/cloud/project/{id}"),
                )
                .await?;
                if project.description == *name {
                    tracing::debug!("project '{}' resolved to {}", name, project.id);
                    return Ok(project);
                }
            }

            Err(MoveError::NotFound {
                kind: ResourceKind::Project,
                ident: name.clone(),
            })
        }
    }
}

/// Resolve the failover IP inside `project_id`, by id or by address.
pub async fn resolve_floating_ip(
    client: &dyn ResourceClient,
    project_id: &str,
    selector: &Selector,
) -> Result<FloatingIp> {
    tracing::debug!("resolving failover IP '{}'", selector.ident());
    match selector {
        Selector::Id(id) => {
            let path = format!("/cloud/project/{project_id}/ip/failover/{id}");
            fetch_direct(client, ResourceKind::FloatingIp, id, &path).await
        }
        Selector::Name(address) => {
            let path = format!("/cloud/project/{project_id}/ip/failover");
            find_in_list(client, ResourceKind::FloatingIp, &path, address, |ip: &FloatingIp| {
                ip.address.as_str()
            })
            .await
        }
    }
}

/// Resolve the target instance inside `project_id`, by id or by name.
pub async fn resolve_instance(
    client: &dyn ResourceClient,
    project_id: &str,
    selector: &Selector,
) -> Result<Instance> {
    tracing::debug!("resolving instance '{}'", selector.ident());
    match selector {
        Selector::Id(id) => fetch_instance(client, project_id, id).await,
        Selector::Name(name) => {
            let path = format!("/cloud/project/{project_id}/instance");
            find_in_list(client, ResourceKind::Instance, &path, name, |instance: &Instance| {
                instance.name.as_str()
            })
            .await
        }
    }
}

/// Direct instance lookup by id, also used for the previous holder of an IP.
pub async fn fetch_instance(
    client: &dyn ResourceClient,
    project_id: &str,
    instance_id: &str,
) -> Result<Instance> {
    let path = format!("/cloud/project/{project_id}/instance/{instance_id}");
    fetch_direct(client, ResourceKind::Instance, instance_id, &path).await
}

/// Fetch one record at its canonical path, wrapping any failure with the
/// kind and identifier being resolved.
async fn fetch_direct<T: DeserializeOwned>(
    client: &dyn ResourceClient,
    kind: ResourceKind,
    ident: &str,
    path: &str,
) -> Result<T> {
    let value = client.get(path).await.map_err(|e| MoveError::Resolution {
        kind,
        ident: ident.to_string(),
        cause: e.to_string(),
    })?;
    Ok(serde_json::from_value(value)?)
}

/// Scan a listing for the first record whose display field equals `name`
/// exactly (case-sensitive). Provider list order decides ties.
async fn find_in_list<T, F>(
    client: &dyn ResourceClient,
    kind: ResourceKind,
    path: &str,
    name: &str,
    display: F,
) -> Result<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> &str,
{
    let value = client.get(path).await.map_err(|e| MoveError::Resolution {
        kind,
        ident: name.to_string(),
        cause: e.to_string(),
    })?;
    let records: Vec<T> = serde_json::from_value(value)?;

    records
        .into_iter()
        .find(|record| display(record) == name)
        .ok_or_else(|| MoveError::NotFound {
            kind,
            ident: name.to_string(),
        })
}
