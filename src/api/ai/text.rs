use std::sync::Arc;

use serde_json::Value;

use crate::api::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) const GENERATION_PATH: &str = "/ai/v1/text/generation";
pub(crate) const SQL_PATH: &str = "/ai/v1/text/sql";
pub(crate) const SUMMARIZE_PATH: &str = "/ai/v1/text/summarize";
pub(crate) const BEASTMODE_PATH: &str = "/ai/v1/text/beastmode";

/// Text endpoints.
#[derive(Debug, Clone)]
pub struct AiTextService {
    resource: ResourceClient,
}

impl AiTextService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Free-form text generation.
    pub async fn generate(&self, request: &Value) -> Result<Value> {
        self.resource.create(GENERATION_PATH, request).await
    }

    /// Translate a natural-language question into SQL.
    pub async fn to_sql(&self, request: &Value) -> Result<Value> {
        self.resource.create(SQL_PATH, request).await
    }

    /// Summarize text.
    pub async fn summarize(&self, request: &Value) -> Result<Value> {
        self.resource.create(SUMMARIZE_PATH, request).await
    }

    /// Generate a Beast Mode calculation.
    pub async fn beastmode(&self, request: &Value) -> Result<Value> {
        self.resource.create(BEASTMODE_PATH, request).await
    }
}
