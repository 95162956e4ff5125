//! Data files service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use super::base::{ResourceClient, UpdateVerb};
use crate::client::Transport;
use crate::Result;

pub(crate) const URL_BASE: &str = "/data/v1/data-files";

pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

pub(crate) fn file_path(file_id: u64) -> String {
    format!("{URL_BASE}/{file_id}")
}

pub(crate) fn revision_path(file_id: u64, revision_id: u64) -> String {
    format!("{}/revision/{revision_id}", file_path(file_id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileDetailsQuery {
    pub(crate) file_id: u64,
}

pub(crate) fn upload_body(name: &str, description: &str) -> Value {
    json!({ "name": name, "description": description })
}

/// Service for data files.
#[derive(Debug, Clone)]
pub struct FilesService {
    resource: ResourceClient,
}

impl FilesService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Register a new file.
    pub async fn upload(&self, name: &str, description: &str) -> Result<Value> {
        self.resource
            .create(URL_BASE, &upload_body(name, description))
            .await
    }

    /// Replace a file's contents.
    pub async fn update(&self, file_id: u64, data: Vec<u8>) -> Result<Value> {
        let value = self
            .resource
            .transport()
            .put_bytes(&file_path(file_id), &(), data, OCTET_STREAM, None)
            .await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// File details.
    pub async fn get_details(&self, file_id: u64) -> Result<Value> {
        let path = format!("{URL_BASE}/details");
        self.resource
            .fetch_with_query(&path, &FileDetailsQuery { file_id })
            .await
    }

    /// Download one revision of a file.
    pub async fn download(&self, file_id: u64, revision_id: u64) -> Result<String> {
        self.resource
            .transport()
            .get_text(&revision_path(file_id, revision_id), &(), "*/*")
            .await
    }

    /// Replace a file's permissions.
    pub async fn set_permissions(&self, file_id: u64, permissions: &Value) -> Result<()> {
        let path = format!("{}/permissions", file_path(file_id));
        self.resource
            .update(&path, permissions, UpdateVerb::Put)
            .await?;
        Ok(())
    }
}
