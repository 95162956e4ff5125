//! Datasets service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::{PageAdvance, PageOptions, PaginatedStream};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/datasets";

pub(crate) fn dataset_path(dataset_id: &str) -> String {
    format!("{URL_BASE}/{dataset_id}")
}

pub(crate) fn datasource_path(dataset_id: &str) -> String {
    format!("/data/v3/datasources/{dataset_id}")
}

pub(crate) fn policy_path(dataset_id: &str, policy_id: u64) -> String {
    format!("{URL_BASE}/{dataset_id}/policies/{policy_id}")
}

/// How imported rows combine with existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportMethod {
    /// Replace all rows.
    #[default]
    Replace,
    /// Append to existing rows.
    Append,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportQuery {
    pub(crate) update_method: ImportMethod,
}

/// Filters for listing datasets.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetListQuery {
    /// Sort order, e.g. `name` or `-lastTouched`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Case-insensitive name substring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
}

impl DatasetListQuery {
    /// Create an unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sort order.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Match names containing `name`.
    pub fn name_like(mut self, name: impl Into<String>) -> Self {
        self.name_like = Some(name.into());
        self
    }
}

/// Service for datasets: CRUD, CSV import/export, SQL queries, schemas,
/// permissions and personalized data policies (PDPs).
///
/// Use datasets for fairly static data that is replaced occasionally.
/// For large or rapidly growing data use [`StreamsService`](super::StreamsService).
///
/// # Example
///
/// ```no_run
/// use domo_sdk::api::{DatasetListQuery, ImportMethod};
/// use domo_sdk::PageOptions;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let sales = client
///     .datasets()
///     .list(PageOptions::new().limit(10), DatasetListQuery::new().name_like("sales"))
///     .await?;
///
/// if let Some(id) = sales.first().and_then(|d| d["id"].as_str()) {
///     client
///         .datasets()
///         .data_import(id, "region,total\nwest,10\n", ImportMethod::Append)
///         .await?;
///     let csv = client.datasets().data_export(id, true).await?;
///     println!("{csv}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetsService {
    resource: ResourceClient,
}

impl DatasetsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a dataset from a `{name, description, schema}` body.
    pub async fn create(&self, dataset: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, dataset).await
    }

    /// Get a dataset by id.
    pub async fn get(&self, dataset_id: &str) -> Result<Value> {
        self.resource.fetch(&dataset_path(dataset_id)).await
    }

    /// List datasets, collecting every page.
    ///
    /// Pages advance by the requested size and stop on an empty page.
    pub async fn list(&self, options: PageOptions, query: DatasetListQuery) -> Result<Vec<Value>> {
        self.list_stream(options, query)?.collect_all().await
    }

    /// Stream datasets lazily, one page at a time.
    pub fn list_stream(
        &self,
        options: PageOptions,
        query: DatasetListQuery,
    ) -> Result<PaginatedStream<Value>> {
        self.resource
            .paginate(URL_BASE, query, options, PageAdvance::DeclaredSize)
    }

    /// Replace a dataset's metadata.
    pub async fn update(&self, dataset_id: &str, update: &Value) -> Result<Value> {
        self.resource
            .update(&dataset_path(dataset_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a dataset.
    pub async fn delete(&self, dataset_id: &str) -> Result<()> {
        self.resource.remove(&dataset_path(dataset_id)).await
    }

    /// Import CSV data.
    pub async fn data_import(
        &self,
        dataset_id: &str,
        csv: &str,
        method: ImportMethod,
    ) -> Result<()> {
        let path = format!("{}/data", dataset_path(dataset_id));
        let query = ImportQuery {
            update_method: method,
        };
        self.resource
            .upload_csv(&path, &query, csv.as_bytes().to_vec())
            .await?;
        Ok(())
    }

    /// Import CSV data, gzip-compressed on the wire.
    pub async fn data_import_gzip(
        &self,
        dataset_id: &str,
        csv: &[u8],
        method: ImportMethod,
    ) -> Result<()> {
        let path = format!("{}/data", dataset_path(dataset_id));
        let query = ImportQuery {
            update_method: method,
        };
        self.resource.upload_gzip(&path, &query, csv).await?;
        Ok(())
    }

    /// Export all rows as CSV.
    pub async fn data_export(&self, dataset_id: &str, include_header: bool) -> Result<String> {
        let path = format!("{}/data", dataset_path(dataset_id));
        self.resource.download_csv(&path, include_header).await
    }

    /// Run a SQL query against a dataset.
    ///
    /// The table is always referred to as `table`, e.g.
    /// `SELECT region, SUM(total) FROM table GROUP BY region`.
    pub async fn query(&self, dataset_id: &str, sql: &str) -> Result<Value> {
        let path = format!("{URL_BASE}/query/execute/{dataset_id}");
        self.resource.create(&path, &json!({ "sql": sql })).await
    }

    /// Latest schema.
    pub async fn get_schema(&self, dataset_id: &str) -> Result<Value> {
        let path = format!("/data/v2/datasources/{dataset_id}/schemas/latest");
        self.resource.fetch(&path).await
    }

    /// Core metadata.
    pub async fn get_metadata(&self, dataset_id: &str) -> Result<Value> {
        self.resource
            .fetch_with_query(&datasource_path(dataset_id), &[("part", "core")])
            .await
    }

    /// Create or alter the schema.
    pub async fn alter_schema(&self, dataset_id: &str, schema: &Value) -> Result<Value> {
        let path = format!("/data/v2/datasources/{dataset_id}/schemas");
        self.resource.create(&path, schema).await
    }

    /// Dataset permissions.
    pub async fn get_permissions(&self, dataset_id: &str) -> Result<Value> {
        let path = format!("{}/permissions", datasource_path(dataset_id));
        self.resource.fetch(&path).await
    }

    /// Replace dataset permissions.
    pub async fn set_permissions(&self, dataset_id: &str, permissions: &Value) -> Result<()> {
        let path = format!("{}/permissions", datasource_path(dataset_id));
        self.resource
            .update(&path, permissions, UpdateVerb::Put)
            .await?;
        Ok(())
    }

    /// Data version details.
    pub async fn list_versions(&self, dataset_id: &str) -> Result<Value> {
        let path = format!("{}/dataversions/details", datasource_path(dataset_id));
        self.resource.fetch(&path).await
    }

    /// Index the given columns.
    pub async fn create_index(&self, dataset_id: &str, columns: &[String]) -> Result<Value> {
        let path = format!("{}/indexes", datasource_path(dataset_id));
        self.resource.create(&path, columns).await
    }

    /// Create a personalized data policy.
    pub async fn create_pdp(&self, dataset_id: &str, policy: &Value) -> Result<Value> {
        let path = format!("{}/policies", dataset_path(dataset_id));
        self.resource.create(&path, policy).await
    }

    /// Get a personalized data policy.
    pub async fn get_pdp(&self, dataset_id: &str, policy_id: u64) -> Result<Value> {
        self.resource.fetch(&policy_path(dataset_id, policy_id)).await
    }

    /// List a dataset's personalized data policies.
    pub async fn list_pdps(&self, dataset_id: &str) -> Result<Vec<Value>> {
        let path = format!("{}/policies", dataset_path(dataset_id));
        self.resource.list(&path, &()).await
    }

    /// Replace a personalized data policy.
    pub async fn update_pdp(
        &self,
        dataset_id: &str,
        policy_id: u64,
        policy: &Value,
    ) -> Result<Value> {
        self.resource
            .update(&policy_path(dataset_id, policy_id), policy, UpdateVerb::Put)
            .await
    }

    /// Delete a personalized data policy.
    pub async fn delete_pdp(&self, dataset_id: &str, policy_id: u64) -> Result<()> {
        self.resource
            .remove(&policy_path(dataset_id, policy_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_serialization() {
        let query = DatasetListQuery::new().name_like("sales").sort("name");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"sort": "name", "nameLike": "sales"})
        );
        assert_eq!(
            serde_json::to_value(DatasetListQuery::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_import_query_serialization() {
        let query = ImportQuery {
            update_method: ImportMethod::Append,
        };
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"updateMethod": "APPEND"})
        );
    }

    #[test]
    fn test_paths() {
        assert_eq!(dataset_path("abc"), "/v1/datasets/abc");
        assert_eq!(datasource_path("abc"), "/data/v3/datasources/abc");
        assert_eq!(policy_path("abc", 7), "/v1/datasets/abc/policies/7");
    }
}
