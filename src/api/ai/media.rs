use std::sync::Arc;

use serde_json::Value;

use crate::api::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) const IMAGE_TO_TEXT_PATH: &str = "/ai/v1/image/text";
pub(crate) const EMBED_TEXT_PATH: &str = "/ai/v1/embedding/text";
pub(crate) const EMBED_IMAGE_PATH: &str = "/ai/v1/embedding/image";

/// Image and embedding endpoints.
#[derive(Debug, Clone)]
pub struct AiMediaService {
    resource: ResourceClient,
}

impl AiMediaService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Describe an image.
    pub async fn image_to_text(&self, request: &Value) -> Result<Value> {
        self.resource.create(IMAGE_TO_TEXT_PATH, request).await
    }

    /// Embed text.
    pub async fn embed_text(&self, request: &Value) -> Result<Value> {
        self.resource.create(EMBED_TEXT_PATH, request).await
    }

    /// Embed an image.
    pub async fn embed_image(&self, request: &Value) -> Result<Value> {
        self.resource.create(EMBED_IMAGE_PATH, request).await
    }
}
