//! S3 export service.

use std::sync::Arc;

use serde_json::Value;

use super::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) fn export_path(dataset_id: &str) -> String {
    format!("/query/v1/export/{dataset_id}")
}

/// Service for exporting datasets to S3.
#[derive(Debug, Clone)]
pub struct S3ExportService {
    resource: ResourceClient,
}

impl S3ExportService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Start exporting a dataset.
    pub async fn start_export(&self, dataset_id: &str, config: &Value) -> Result<Value> {
        self.resource.create(&export_path(dataset_id), config).await
    }

    /// Status of the latest export.
    pub async fn get_export_status(&self, dataset_id: &str) -> Result<Value> {
        self.resource.fetch(&export_path(dataset_id)).await
    }
}
