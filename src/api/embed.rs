//! Embed token service.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::base::ResourceClient;
use crate::client::Transport;
use crate::{Error, Result};

pub(crate) const CARD_AUTH_PATH: &str = "/v1/cards/embed/auth";
pub(crate) const DASHBOARD_AUTH_PATH: &str = "/v1/stories/embed/auth";

/// Build a token request: `params` (an object, or null) plus `key: id`.
pub(crate) fn token_request(key: &str, id: &str, params: Value) -> Result<Value> {
    let mut body = match params {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(Error::Validation(format!(
                "embed token parameters must be a JSON object, got {other}"
            )))
        }
    };
    body.insert(key.to_string(), Value::String(id.to_string()));
    Ok(Value::Object(body))
}

/// Service for generating embed tokens for cards and dashboards.
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let token = client
///     .embed()
///     .create_card_token("a1B2c", json!({"sessionLength": 1440, "authorizations": []}))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EmbedService {
    resource: ResourceClient,
}

impl EmbedService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create an embed token for a card.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `params` is neither an object nor null.
    pub async fn create_card_token(&self, card_id: &str, params: Value) -> Result<Value> {
        let body = token_request("cardId", card_id, params)?;
        self.resource.create(CARD_AUTH_PATH, &body).await
    }

    /// Create an embed token for a dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `params` is neither an object nor null.
    pub async fn create_dashboard_token(&self, dashboard_id: &str, params: Value) -> Result<Value> {
        let body = token_request("dashboardId", dashboard_id, params)?;
        self.resource.create(DASHBOARD_AUTH_PATH, &body).await
    }
}
