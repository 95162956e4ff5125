//! Groups service.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::{PageAdvance, PageOptions, PageRequest, PaginatedStream};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/groups";

pub(crate) fn group_path(group_id: u64) -> String {
    format!("{URL_BASE}/{group_id}")
}

pub(crate) fn member_path(group_id: u64, user_id: u64) -> String {
    format!("{URL_BASE}/{group_id}/users/{user_id}")
}

/// Service for groups and group membership.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let groups = client.groups();
/// groups.add_user(42, 1001).await?;
///
/// for member in groups.list_users(42, 50, 0).await? {
///     println!("{member}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GroupsService {
    resource: ResourceClient,
}

impl GroupsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a group.
    pub async fn create(&self, group: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, group).await
    }

    /// Get a group by id.
    pub async fn get(&self, group_id: u64) -> Result<Value> {
        self.resource.fetch(&group_path(group_id)).await
    }

    /// Fetch a single page of groups.
    pub async fn list(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(URL_BASE, &page).await
    }

    /// Stream all groups.
    ///
    /// Pages advance by the number of groups returned; a short page ends
    /// the stream.
    pub fn list_stream(&self, options: PageOptions) -> Result<PaginatedStream<Value>> {
        self.resource
            .paginate(URL_BASE, (), options, PageAdvance::StopOnShortPage)
    }

    /// Update a group.
    pub async fn update(&self, group_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&group_path(group_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a group.
    pub async fn delete(&self, group_id: u64) -> Result<()> {
        self.resource.remove(&group_path(group_id)).await
    }

    /// Add a user to a group.
    pub async fn add_user(&self, group_id: u64, user_id: u64) -> Result<()> {
        self.resource.touch(&member_path(group_id, user_id)).await?;
        Ok(())
    }

    /// Remove a user from a group.
    pub async fn remove_user(&self, group_id: u64, user_id: u64) -> Result<()> {
        self.resource.remove(&member_path(group_id, user_id)).await
    }

    /// One page of the group's member ids.
    pub async fn list_users(&self, group_id: u64, limit: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(limit, offset)?;
        let path = format!("{}/users", group_path(group_id));
        self.resource.list(&path, &page).await
    }
}
