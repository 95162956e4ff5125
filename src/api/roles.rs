//! Roles service.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/authorization/v1/roles";

pub(crate) fn role_path(role_id: u64) -> String {
    format!("{URL_BASE}/{role_id}")
}

/// Service for custom roles and their authorities.
#[derive(Debug, Clone)]
pub struct RolesService {
    resource: ResourceClient,
}

impl RolesService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// List all roles.
    pub async fn list(&self) -> Result<Vec<Value>> {
        self.resource.list(URL_BASE, &()).await
    }

    /// Create a role.
    pub async fn create(&self, role: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, role).await
    }

    /// Get a role by id.
    pub async fn get(&self, role_id: u64) -> Result<Value> {
        self.resource.fetch(&role_path(role_id)).await
    }

    /// Delete a role.
    pub async fn delete(&self, role_id: u64) -> Result<()> {
        self.resource.remove(&role_path(role_id)).await
    }

    /// Authorities granted to a role.
    pub async fn list_authorities(&self, role_id: u64) -> Result<Value> {
        let path = format!("{}/authorities", role_path(role_id));
        self.resource.fetch(&path).await
    }

    /// Grant or revoke authorities (`PATCH`).
    pub async fn update_authorities(&self, role_id: u64, authorities: &Value) -> Result<Value> {
        let path = format!("{}/authorities", role_path(role_id));
        self.resource
            .update(&path, authorities, UpdateVerb::Patch)
            .await
    }
}
