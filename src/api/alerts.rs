//! Alerts service.

use std::sync::Arc;

use serde_json::Value;

use super::base::ResourceClient;
use crate::client::paginated::PageRequest;
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/social/v4/alerts";

pub(crate) fn alert_path(alert_id: u64) -> String {
    format!("{URL_BASE}/{alert_id}")
}

/// Service for alerts and alert subscriptions.
#[derive(Debug, Clone)]
pub struct AlertsService {
    resource: ResourceClient,
}

impl AlertsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Fetch a single page of alerts.
    pub async fn query(&self, limit: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(limit, offset)?;
        self.resource.list(URL_BASE, &page).await
    }

    /// Get an alert by id.
    pub async fn get(&self, alert_id: u64) -> Result<Value> {
        self.resource.fetch(&alert_path(alert_id)).await
    }

    /// Subscribe the caller to an alert.
    pub async fn subscribe(&self, alert_id: u64) -> Result<()> {
        let path = format!("{}/subscribe", alert_path(alert_id));
        self.resource.action(&path).await?;
        Ok(())
    }

    /// Unsubscribe the caller from an alert.
    pub async fn unsubscribe(&self, alert_id: u64) -> Result<()> {
        let path = format!("{}/subscribe", alert_path(alert_id));
        self.resource.remove(&path).await
    }

    /// Share an alert with other users.
    pub async fn share(&self, alert_id: u64, share: &Value) -> Result<()> {
        let path = format!("{}/share", alert_path(alert_id));
        self.resource.create(&path, share).await?;
        Ok(())
    }
}
