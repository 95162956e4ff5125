//! Cards service.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::PageRequest;
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/cards";

pub(crate) fn card_path(card_id: u64) -> String {
    format!("{URL_BASE}/{card_id}")
}

/// Service for cards (visualizations).
#[derive(Debug, Clone)]
pub struct CardsService {
    resource: ResourceClient,
}

impl CardsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a card.
    pub async fn create(&self, card: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, card).await
    }

    /// Get a card by id.
    pub async fn get(&self, card_id: u64) -> Result<Value> {
        self.resource.fetch(&card_path(card_id)).await
    }

    /// Fetch a single page of cards.
    pub async fn list(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(URL_BASE, &page).await
    }

    /// Update a card.
    pub async fn update(&self, card_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&card_path(card_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a card.
    pub async fn delete(&self, card_id: u64) -> Result<()> {
        self.resource.remove(&card_path(card_id)).await
    }
}
