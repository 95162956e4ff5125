//! Activity log (audit trail) service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::base::ResourceClient;
use crate::client::paginated::{
    PageAdvance, PageOptions, PageRequest, PaginatedStream, PaginationQuery,
};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/audit";

/// Filters for activity log queries.
///
/// Times are epoch milliseconds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityLogQuery {
    /// Only entries for this user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<u64>,
    /// Entries at or after this time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// Entries before this time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl ActivityLogQuery {
    /// Create an unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by user id.
    pub fn user(mut self, user_id: u64) -> Self {
        self.user = Some(user_id);
        self
    }

    /// Restrict to `[start, end)` in epoch milliseconds.
    pub fn between(mut self, start: i64, end: i64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}

/// Service for the activity log.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use domo_sdk::api::ActivityLogQuery;
/// use domo_sdk::PageOptions;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let query = ActivityLogQuery::new().user(1001).between(1_700_000_000_000, 1_700_086_400_000);
/// let mut entries = client.activity_log().stream(query, PageOptions::new())?;
///
/// while let Some(entry) = entries.try_next().await? {
///     println!("{} {}", entry["actionType"], entry["objectName"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ActivityLogService {
    resource: ResourceClient,
}

impl ActivityLogService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Fetch a single page of entries.
    pub async fn query(
        &self,
        query: &ActivityLogQuery,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Value>> {
        let page = PageRequest::new(limit, offset)?;
        let params = PaginationQuery {
            limit: page.limit,
            offset: page.offset,
            extra: query,
        };
        self.resource.list(URL_BASE, &params).await
    }

    /// Stream all matching entries.
    ///
    /// Pages advance by the number of entries returned; a short page ends
    /// the stream.
    pub fn stream(
        &self,
        query: ActivityLogQuery,
        options: PageOptions,
    ) -> Result<PaginatedStream<Value>> {
        self.resource
            .paginate(URL_BASE, query, options, PageAdvance::StopOnShortPage)
    }
}
