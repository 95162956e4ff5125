//! Search service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use super::base::ResourceClient;
use crate::auth::AuthMode;
use crate::client::paginated::PageRequest;
use crate::client::Transport;
use crate::{Error, Result};

pub(crate) const QUERY_PATH: &str = "/search/v1/query";
pub(crate) const DATASOURCE_SEARCH_PATH: &str = "/data/ui/v3/datasources/search";
pub(crate) const DATASETS_PATH: &str = "/v1/datasets";

/// Body for the internal datasource search endpoint.
pub(crate) fn datasource_search_body(query: &str, count: u32, offset: u64) -> Value {
    json!({
        "entities": ["DATASET"],
        "filters": [{
            "field": "name_sort",
            "filterType": "wildcard",
            "query": format!("*{query}*"),
        }],
        "combineResults": true,
        "query": query,
        "count": count,
        "offset": offset,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NameLikeQuery<'a> {
    pub(crate) limit: u32,
    pub(crate) offset: u64,
    pub(crate) name_like: &'a str,
}

/// Pull the `dataSources` list out of an internal search response.
pub(crate) fn datasource_results(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("dataSources") {
            Some(Value::Array(items)) => Ok(items),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(other) => Err(Error::unexpected_payload("a dataSources array", &other)),
        },
        other => Err(Error::unexpected_payload("a search result object", &other)),
    }
}

/// Service for search.
///
/// Which endpoints are available depends on the authentication mode.
/// Developer tokens reach the instance's internal search API; OAuth
/// clients only see the public dataset listing, filtered by name.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// for dataset in client.search().search_datasets("revenue", 20, 0).await? {
///     println!("{}", dataset["name"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SearchService {
    resource: ResourceClient,
}

impl SearchService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Run a raw search query (`POST /search/v1/query`).
    pub async fn query(&self, search: &Value) -> Result<Value> {
        self.resource.create(QUERY_PATH, search).await
    }

    /// Search datasets by name.
    ///
    /// With a developer token this uses the internal datasource search;
    /// with OAuth it lists `/v1/datasets` filtered by `nameLike`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `count` is outside `1..=50`.
    pub async fn search_datasets(&self, query: &str, count: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(count, offset)?;

        match self.resource.transport().auth_mode() {
            AuthMode::DeveloperToken => {
                let body = datasource_search_body(query, page.limit, page.offset);
                let result = self.resource.create(DATASOURCE_SEARCH_PATH, &body).await?;
                datasource_results(result)
            }
            AuthMode::OAuth => {
                let params = NameLikeQuery {
                    limit: page.limit,
                    offset: page.offset,
                    name_like: query,
                };
                self.resource.list(DATASETS_PATH, &params).await
            }
        }
    }
}
