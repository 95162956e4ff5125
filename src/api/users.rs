//! Users service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::{PageAdvance, PageOptions, PaginatedStream};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/users";

pub(crate) fn user_path(user_id: u64) -> String {
    format!("{URL_BASE}/{user_id}")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateUserQuery {
    pub(crate) send_invite: bool,
}

/// Service for user management.
///
/// # Example
///
/// ```no_run
/// use domo_sdk::PageOptions;
/// use serde_json::json;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let user = client
///     .users()
///     .create(&json!({"name": "Ada", "email": "ada@example.com", "role": "Participant"}), false)
///     .await?;
///
/// let everyone = client.users().list(PageOptions::new()).await?;
/// println!("{} users", everyone.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UsersService {
    resource: ResourceClient,
}

impl UsersService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a user, optionally emailing an invitation.
    pub async fn create(&self, user: &Value, send_invite: bool) -> Result<Value> {
        let query = CreateUserQuery { send_invite };
        self.resource.create_with_query(URL_BASE, &query, user).await
    }

    /// Get a user by id.
    pub async fn get(&self, user_id: u64) -> Result<Value> {
        self.resource.fetch(&user_path(user_id)).await
    }

    /// List users, collecting every page.
    ///
    /// Pages advance by the requested size and stop on an empty page.
    pub async fn list(&self, options: PageOptions) -> Result<Vec<Value>> {
        self.list_stream(options)?.collect_all().await
    }

    /// Stream users lazily.
    pub fn list_stream(&self, options: PageOptions) -> Result<PaginatedStream<Value>> {
        self.resource
            .paginate(URL_BASE, (), options, PageAdvance::DeclaredSize)
    }

    /// Update a user.
    pub async fn update(&self, user_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&user_path(user_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a user.
    pub async fn delete(&self, user_id: u64) -> Result<()> {
        self.resource.remove(&user_path(user_id)).await
    }
}
