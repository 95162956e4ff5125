use std::sync::Arc;

use serde_json::Value;

use crate::api::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) const SENTIMENT_PATH: &str = "/ai/v1/sentiment";
pub(crate) const TARGETED_SENTIMENT_PATH: &str = "/ai/v1/targeted-sentiment";
pub(crate) const CLASSIFICATION_PATH: &str = "/ai/v1/classification";
pub(crate) const EXTRACT_PATH: &str = "/ai/v1/extract";

/// Text analysis endpoints.
#[derive(Debug, Clone)]
pub struct AiAnalysisService {
    resource: ResourceClient,
}

impl AiAnalysisService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Overall sentiment of a text.
    pub async fn sentiment(&self, request: &Value) -> Result<Value> {
        self.resource.create(SENTIMENT_PATH, request).await
    }

    /// Sentiment towards specific targets.
    pub async fn targeted_sentiment(&self, request: &Value) -> Result<Value> {
        self.resource.create(TARGETED_SENTIMENT_PATH, request).await
    }

    /// Classify text into caller-supplied categories.
    pub async fn classify(&self, request: &Value) -> Result<Value> {
        self.resource.create(CLASSIFICATION_PATH, request).await
    }

    /// Extract structured fields from text.
    pub async fn extract(&self, request: &Value) -> Result<Value> {
        self.resource.create(EXTRACT_PATH, request).await
    }
}
