//! Workflows service.

use std::sync::Arc;

use serde_json::Value;

use super::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/workflow/v1";

pub(crate) fn instance_path(instance_id: &str) -> String {
    format!("{URL_BASE}/instances/{instance_id}")
}

pub(crate) fn model_permissions_path(model_id: u64) -> String {
    format!("{URL_BASE}/models/{model_id}/permissions")
}

/// Service for workflow instances and model permissions.
#[derive(Debug, Clone)]
pub struct WorkflowsService {
    resource: ResourceClient,
}

impl WorkflowsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Start a workflow by sending it a message.
    pub async fn start(&self, message: &Value) -> Result<Value> {
        let path = format!("{URL_BASE}/instances/message");
        self.resource.create(&path, message).await
    }

    /// Get a workflow instance.
    pub async fn get_instance(&self, instance_id: &str) -> Result<Value> {
        self.resource.fetch(&instance_path(instance_id)).await
    }

    /// Cancel a running instance.
    pub async fn cancel(&self, instance_id: &str) -> Result<()> {
        let path = format!("{}/cancel", instance_path(instance_id));
        self.resource.action(&path).await?;
        Ok(())
    }

    /// Permissions on a workflow model.
    pub async fn get_permissions(&self, model_id: u64) -> Result<Value> {
        self.resource.fetch(&model_permissions_path(model_id)).await
    }

    /// Set permissions on a workflow model.
    pub async fn set_permissions(&self, model_id: u64, permissions: &Value) -> Result<()> {
        self.resource
            .create(&model_permissions_path(model_id), permissions)
            .await?;
        Ok(())
    }
}
