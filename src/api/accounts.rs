//! Accounts service for data-provider credentials.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::{PageAdvance, PageOptions, PaginatedStream};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/accounts";

pub(crate) fn account_path(account_id: &str) -> String {
    format!("{URL_BASE}/{account_id}")
}

/// Service for accounts: the stored credentials connectors use to reach
/// third-party data providers.
///
/// # Example
///
/// ```no_run
/// use domo_sdk::PageOptions;
/// use serde_json::json;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let accounts = client.accounts().list(PageOptions::new().limit(5)).await?;
///
/// if let Some(id) = accounts.first().and_then(|a| a["id"].as_str()) {
///     client.accounts().update(id, &json!({"name": "Renamed"})).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AccountsService {
    resource: ResourceClient,
}

impl AccountsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create an account.
    pub async fn create(&self, account: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, account).await
    }

    /// Get an account by id.
    pub async fn get(&self, account_id: &str) -> Result<Value> {
        self.resource.fetch(&account_path(account_id)).await
    }

    /// List accounts, collecting every page.
    ///
    /// Pages advance by the requested size and stop on an empty page.
    pub async fn list(&self, options: PageOptions) -> Result<Vec<Value>> {
        self.list_stream(options)?.collect_all().await
    }

    /// Stream accounts lazily.
    pub fn list_stream(&self, options: PageOptions) -> Result<PaginatedStream<Value>> {
        self.resource
            .paginate(URL_BASE, (), options, PageAdvance::DeclaredSize)
    }

    /// Partially update an account (`PATCH`).
    pub async fn update(&self, account_id: &str, update: &Value) -> Result<Value> {
        self.resource
            .update(&account_path(account_id), update, UpdateVerb::Patch)
            .await
    }

    /// Delete an account.
    pub async fn delete(&self, account_id: &str) -> Result<()> {
        self.resource.remove(&account_path(account_id)).await
    }
}
