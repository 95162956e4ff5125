//! Pages service.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/pages";

pub(crate) fn page_path(page_id: u64) -> String {
    format!("{URL_BASE}/{page_id}")
}

pub(crate) fn collection_path(page_id: u64, collection_id: u64) -> String {
    format!("{URL_BASE}/{page_id}/collections/{collection_id}")
}

/// Service for pages (dashboards) and their card collections.
#[derive(Debug, Clone)]
pub struct PagesService {
    resource: ResourceClient,
}

impl PagesService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a page. The body needs at least a `name`.
    pub async fn create(&self, page: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, page).await
    }

    /// Get a page by id.
    pub async fn get(&self, page_id: u64) -> Result<Value> {
        self.resource.fetch(&page_path(page_id)).await
    }

    /// List all pages.
    pub async fn list(&self) -> Result<Vec<Value>> {
        self.resource.list(URL_BASE, &()).await
    }

    /// Update a page.
    pub async fn update(&self, page_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&page_path(page_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a page.
    pub async fn delete(&self, page_id: u64) -> Result<()> {
        self.resource.remove(&page_path(page_id)).await
    }

    /// Collections on a page.
    pub async fn list_collections(&self, page_id: u64) -> Result<Vec<Value>> {
        let path = format!("{}/collections", page_path(page_id));
        self.resource.list(&path, &()).await
    }

    /// Create a collection. The body needs at least a `title`.
    pub async fn create_collection(&self, page_id: u64, collection: &Value) -> Result<Value> {
        let path = format!("{}/collections", page_path(page_id));
        self.resource.create(&path, collection).await
    }

    /// Update a collection.
    pub async fn update_collection(
        &self,
        page_id: u64,
        collection_id: u64,
        update: &Value,
    ) -> Result<Value> {
        self.resource
            .update(
                &collection_path(page_id, collection_id),
                update,
                UpdateVerb::Put,
            )
            .await
    }

    /// Delete a collection.
    pub async fn delete_collection(&self, page_id: u64, collection_id: u64) -> Result<()> {
        self.resource
            .remove(&collection_path(page_id, collection_id))
            .await
    }
}
