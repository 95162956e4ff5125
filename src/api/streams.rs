//! Streams service.

use std::sync::Arc;

use serde_json::Value;

use super::base::{ResourceClient, UpdateVerb};
use crate::client::paginated::{PageAdvance, PageOptions, PageRequest, PaginatedStream};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/v1/streams";

pub(crate) fn stream_path(stream_id: u64) -> String {
    format!("{URL_BASE}/{stream_id}")
}

pub(crate) fn execution_path(stream_id: u64, execution_id: u64) -> String {
    format!("{URL_BASE}/{stream_id}/executions/{execution_id}")
}

pub(crate) fn part_path(stream_id: u64, execution_id: u64, part: u32) -> String {
    format!("{}/part/{part}", execution_path(stream_id, execution_id))
}

/// Service for streams: datasets fed by multi-part upload executions.
///
/// An upload runs as an execution: create it, upload one or more CSV
/// parts (in parallel if desired), then commit or abort.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let streams = client.streams();
/// let stream_id = 17;
///
/// let execution = streams.create_execution(stream_id).await?;
/// let execution_id = execution["id"].as_u64().unwrap_or_default();
///
/// streams.upload_part(stream_id, execution_id, 1, "a,b\n1,2\n").await?;
/// streams.upload_part(stream_id, execution_id, 2, "3,4\n").await?;
/// streams.commit_execution(stream_id, execution_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StreamsService {
    resource: ResourceClient,
}

impl StreamsService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Create a stream and its dataset.
    pub async fn create(&self, stream: &Value) -> Result<Value> {
        self.resource.create(URL_BASE, stream).await
    }

    /// Get a stream by id.
    pub async fn get(&self, stream_id: u64) -> Result<Value> {
        self.resource.fetch(&stream_path(stream_id)).await
    }

    /// List streams, collecting every page.
    ///
    /// Pages advance by the requested size and stop on an empty page.
    pub async fn list(&self, options: PageOptions) -> Result<Vec<Value>> {
        self.list_stream(options)?.collect_all().await
    }

    /// Stream the stream listing lazily.
    pub fn list_stream(&self, options: PageOptions) -> Result<PaginatedStream<Value>> {
        self.resource
            .paginate(URL_BASE, (), options, PageAdvance::DeclaredSize)
    }

    /// Update a stream.
    pub async fn update(&self, stream_id: u64, update: &Value) -> Result<Value> {
        self.resource
            .update(&stream_path(stream_id), update, UpdateVerb::Put)
            .await
    }

    /// Delete a stream.
    pub async fn delete(&self, stream_id: u64) -> Result<()> {
        self.resource.remove(&stream_path(stream_id)).await
    }

    /// Start an upload execution.
    pub async fn create_execution(&self, stream_id: u64) -> Result<Value> {
        let path = format!("{}/executions", stream_path(stream_id));
        self.resource.action(&path).await
    }

    /// One page of a stream's executions.
    pub async fn list_executions(
        &self,
        stream_id: u64,
        per_page: u32,
        offset: u64,
    ) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        let path = format!("{}/executions", stream_path(stream_id));
        self.resource.list(&path, &page).await
    }

    /// Upload one CSV part of an execution.
    pub async fn upload_part(
        &self,
        stream_id: u64,
        execution_id: u64,
        part: u32,
        csv: &str,
    ) -> Result<()> {
        let path = part_path(stream_id, execution_id, part);
        self.resource
            .upload_csv(&path, &(), csv.as_bytes().to_vec())
            .await?;
        Ok(())
    }

    /// Upload one CSV part, gzip-compressed on the wire.
    pub async fn upload_part_gzip(
        &self,
        stream_id: u64,
        execution_id: u64,
        part: u32,
        csv: &[u8],
    ) -> Result<()> {
        let path = part_path(stream_id, execution_id, part);
        self.resource.upload_gzip(&path, &(), csv).await?;
        Ok(())
    }

    /// Commit an execution, making its data visible.
    pub async fn commit_execution(&self, stream_id: u64, execution_id: u64) -> Result<Value> {
        let path = format!("{}/commit", execution_path(stream_id, execution_id));
        self.resource.touch(&path).await
    }

    /// Abort an execution, discarding its parts.
    pub async fn abort_execution(&self, stream_id: u64, execution_id: u64) -> Result<()> {
        let path = format!("{}/abort", execution_path(stream_id, execution_id));
        self.resource.touch(&path).await?;
        Ok(())
    }
}
