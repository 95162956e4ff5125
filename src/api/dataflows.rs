//! Dataflows service.

use std::sync::Arc;

use serde_json::Value;

use super::base::ResourceClient;
use crate::client::paginated::PageRequest;
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/dataflows";

pub(crate) fn dataflow_path(dataflow_id: u64) -> String {
    format!("{URL_BASE}/{dataflow_id}")
}

/// Service for dataflows (ETL pipelines) and their executions.
#[derive(Debug, Clone)]
pub struct DataflowsService {
    resource: ResourceClient,
}

impl DataflowsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Fetch a single page of dataflows.
    pub async fn list(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(URL_BASE, &page).await
    }

    /// Get a dataflow by id.
    pub async fn get(&self, dataflow_id: u64) -> Result<Value> {
        self.resource.fetch(&dataflow_path(dataflow_id)).await
    }

    /// Trigger a run.
    pub async fn execute(&self, dataflow_id: u64) -> Result<Value> {
        let path = format!("{}/executions", dataflow_path(dataflow_id));
        self.resource.action(&path).await
    }

    /// Get one execution of a dataflow.
    pub async fn get_execution(&self, dataflow_id: u64, execution_id: u64) -> Result<Value> {
        let path = format!("{}/executions/{execution_id}", dataflow_path(dataflow_id));
        self.resource.fetch(&path).await
    }
}
