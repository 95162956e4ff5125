//! Connectors service.

use std::sync::Arc;

use serde_json::Value;

use super::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) fn executions_path(stream_id: u64) -> String {
    format!("/data/v1/streams/{stream_id}/executions")
}

/// Service for running connector-backed streams.
#[derive(Debug, Clone)]
pub struct ConnectorsService {
    resource: ResourceClient,
}

impl ConnectorsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Trigger an execution of the connector behind `stream_id`.
    pub async fn run(&self, stream_id: u64) -> Result<Value> {
        self.resource.action(&executions_path(stream_id)).await
    }
}
