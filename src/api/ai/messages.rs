use std::sync::Arc;

use serde_json::Value;

use crate::api::base::ResourceClient;
use crate::client::Transport;
use crate::Result;

pub(crate) const CHAT_PATH: &str = "/ai/v1/messages/chat";
pub(crate) const TOOLS_PATH: &str = "/ai/v1/messages/tools";

/// Conversation endpoints.
#[derive(Debug, Clone)]
pub struct AiMessagesService {
    resource: ResourceClient,
}

impl AiMessagesService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            resource: ResourceClient::new(transport),
        }
    }

    /// Send a chat conversation.
    pub async fn chat(&self, request: &Value) -> Result<Value> {
        self.resource.create(CHAT_PATH, request).await
    }

    /// Send a conversation with tool definitions.
    pub async fn tools(&self, request: &Value) -> Result<Value> {
        self.resource.create(TOOLS_PATH, request).await
    }
}
