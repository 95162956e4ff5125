use serde_json::{json, Value};

use crate::api::datasets::{datasource_path, dataset_path, policy_path, ImportQuery, URL_BASE};
use crate::api::s3_export::export_path;
use crate::api::streams::{execution_path, part_path, stream_path};
use crate::api::{DatasetListQuery, ImportMethod, UpdateVerb};
use crate::blocking::ValueIter;
use crate::client::paginated::{PageAdvance, PageOptions, PageRequest};
use crate::Result;

blocking_service! {
    /// Blocking datasets service.
    ///
    /// See [`crate::api::DatasetsService`] for the endpoints.
    DatasetsService
}

impl DatasetsService {
    /// Create a dataset.
    pub fn create(&self, dataset: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, dataset)
    }

    /// Get a dataset by id.
    pub fn get(&self, dataset_id: &str) -> Result<Value> {
        self.resource.fetch(&dataset_path(dataset_id))
    }

    /// List datasets, collecting every page.
    pub fn list(&self, options: PageOptions, query: DatasetListQuery) -> Result<Vec<Value>> {
        self.list_stream(options, query)?.collect_all()
    }

    /// Iterate datasets lazily.
    pub fn list_stream(&self, options: PageOptions, query: DatasetListQuery) -> Result<ValueIter> {
        self.resource
            .paginate(URL_BASE, query, options, PageAdvance::DeclaredSize)
    }

    /// Replace a dataset's metadata.
    pub fn update(&self, dataset_id: &str, update: &Value) -> Result<Value> {
        self.resource
            .update(&dataset_path(dataset_id), update, UpdateVerb::Put)
    }

    /// Delete a dataset.
    pub fn delete(&self, dataset_id: &str) -> Result<()> {
        self.resource.remove(&dataset_path(dataset_id))
    }

    /// Import CSV data.
    pub fn data_import(&self, dataset_id: &str, csv: &str, method: ImportMethod) -> Result<()> {
        let path = format!("{}/data", dataset_path(dataset_id));
        let query = ImportQuery {
            update_method: method,
        };
        self.resource
            .upload_csv(&path, &query, csv.as_bytes().to_vec())?;
        Ok(())
    }

    /// Import CSV data, gzip-compressed on the wire.
    pub fn data_import_gzip(&self, dataset_id: &str, csv: &[u8], method: ImportMethod) -> Result<()> {
        let path = format!("{}/data", dataset_path(dataset_id));
        let query = ImportQuery {
            update_method: method,
        };
        self.resource.upload_gzip(&path, &query, csv)?;
        Ok(())
    }

    /// Export all rows as CSV.
    pub fn data_export(&self, dataset_id: &str, include_header: bool) -> Result<String> {
        let path = format!("{}/data", dataset_path(dataset_id));
        self.resource.download_csv(&path, include_header)
    }

    /// Run a SQL query against a dataset.
    pub fn query(&self, dataset_id: &str, sql: &str) -> Result<Value> {
        let path = format!("{URL_BASE}/query/execute/{dataset_id}");
        self.resource.create(&path, &json!({ "sql": sql }))
    }

    /// Latest schema.
    pub fn get_schema(&self, dataset_id: &str) -> Result<Value> {
        let path = format!("/data/v2/datasources/{dataset_id}/schemas/latest");
        self.resource.fetch(&path)
    }

    /// Core metadata.
    pub fn get_metadata(&self, dataset_id: &str) -> Result<Value> {
        self.resource
            .fetch_with_query(&datasource_path(dataset_id), &[("part", "core")])
    }

    /// Create or alter the schema.
    pub fn alter_schema(&self, dataset_id: &str, schema: &Value) -> Result<Value> {
        let path = format!("/data/v2/datasources/{dataset_id}/schemas");
        self.resource.create(&path, schema)
    }

    /// Dataset permissions.
    pub fn get_permissions(&self, dataset_id: &str) -> Result<Value> {
        let path = format!("{}/permissions", datasource_path(dataset_id));
        self.resource.fetch(&path)
    }

    /// Replace dataset permissions.
    pub fn set_permissions(&self, dataset_id: &str, permissions: &Value) -> Result<()> {
        let path = format!("{}/permissions", datasource_path(dataset_id));
        self.resource.update(&path, permissions, UpdateVerb::Put)?;
        Ok(())
    }

    /// Data version details.
    pub fn list_versions(&self, dataset_id: &str) -> Result<Value> {
        let path = format!("{}/dataversions/details", datasource_path(dataset_id));
        self.resource.fetch(&path)
    }

    /// Index the given columns.
    pub fn create_index(&self, dataset_id: &str, columns: &[String]) -> Result<Value> {
        let path = format!("{}/indexes", datasource_path(dataset_id));
        self.resource.create(&path, columns)
    }

    /// Create a personalized data policy.
    pub fn create_pdp(&self, dataset_id: &str, policy: &Value) -> Result<Value> {
        let path = format!("{}/policies", dataset_path(dataset_id));
        self.resource.create(&path, policy)
    }

    /// Get a personalized data policy.
    pub fn get_pdp(&self, dataset_id: &str, policy_id: u64) -> Result<Value> {
        self.resource.fetch(&policy_path(dataset_id, policy_id))
    }

    /// List a dataset's personalized data policies.
    pub fn list_pdps(&self, dataset_id: &str) -> Result<Vec<Value>> {
        let path = format!("{}/policies", dataset_path(dataset_id));
        self.resource.list(&path, &())
    }

    /// Replace a personalized data policy.
    pub fn update_pdp(&self, dataset_id: &str, policy_id: u64, policy: &Value) -> Result<Value> {
        self.resource
            .update(&policy_path(dataset_id, policy_id), policy, UpdateVerb::Put)
    }

    /// Delete a personalized data policy.
    pub fn delete_pdp(&self, dataset_id: &str, policy_id: u64) -> Result<()> {
        self.resource.remove(&policy_path(dataset_id, policy_id))
    }
}

blocking_service! {
    /// Blocking streams service.
    StreamsService
}

impl StreamsService {
    /// Create a stream.
    pub fn create(&self, stream: &Value) -> Result<Value> {
        self.resource.create(crate::api::streams::URL_BASE, stream)
    }

    /// Get a stream by id.
    pub fn get(&self, stream_id: u64) -> Result<Value> {
        self.resource.fetch(&stream_path(stream_id))
    }

    /// List streams, collecting every page.
    pub fn list(&self, options: PageOptions) -> Result<Vec<Value>> {
        self.list_stream(options)?.collect_all()
    }

    /// Iterate streams lazily.
    pub fn list_stream(&self, options: PageOptions) -> Result<ValueIter> {
        self.resource.paginate(
            crate::api::streams::URL_BASE,
            (),
            options,
            PageAdvance::DeclaredSize,
        )
    }

    /// Update a stream.
    pub fn update(&self, stream_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&stream_path(stream_id), update, UpdateVerb::Put)
    }

    /// Delete a stream.
    pub fn delete(&self, stream_id: u64) -> Result<()> {
        self.resource.remove(&stream_path(stream_id))
    }

    /// Start an upload execution.
    pub fn create_execution(&self, stream_id: u64) -> Result<Value> {
        let path = format!("{}/executions", stream_path(stream_id));
        self.resource.action(&path)
    }

    /// Fetch a single page of executions.
    pub fn list_executions(&self, stream_id: u64, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        let path = format!("{}/executions", stream_path(stream_id));
        self.resource.list(&path, &page)
    }

    /// Upload one CSV part.
    pub fn upload_part(&self, stream_id: u64, execution_id: u64, part: u32, csv: &str) -> Result<()> {
        let path = part_path(stream_id, execution_id, part);
        self.resource.upload_csv(&path, &(), csv.as_bytes().to_vec())?;
        Ok(())
    }

    /// Upload one gzip-compressed CSV part.
    pub fn upload_part_gzip(
        &self,
        stream_id: u64,
        execution_id: u64,
        part: u32,
        csv: &[u8],
    ) -> Result<()> {
        let path = part_path(stream_id, execution_id, part);
        self.resource.upload_gzip(&path, &(), csv)?;
        Ok(())
    }

    /// Commit an execution.
    pub fn commit_execution(&self, stream_id: u64, execution_id: u64) -> Result<Value> {
        let path = format!("{}/commit", execution_path(stream_id, execution_id));
        self.resource.touch(&path)
    }

    /// Abort an execution.
    pub fn abort_execution(&self, stream_id: u64, execution_id: u64) -> Result<()> {
        let path = format!("{}/abort", execution_path(stream_id, execution_id));
        self.resource.touch(&path)?;
        Ok(())
    }
}

blocking_service! {
    /// Blocking S3 export service.
    S3ExportService
}

impl S3ExportService {
    /// Start exporting a dataset.
    pub fn start_export(&self, dataset_id: &str, config: &Value) -> Result<Value> {
        self.resource.create(&export_path(dataset_id), config)
    }

    /// Status of the latest export.
    pub fn get_export_status(&self, dataset_id: &str) -> Result<Value> {
        self.resource.fetch(&export_path(dataset_id))
    }
}
