//! AI services: text generation, chat, analysis and media.
//!
//! Every endpoint takes a JSON request body and returns the JSON response
//! unchanged.

use std::sync::Arc;

use crate::client::Transport;

mod analysis;
mod media;
mod messages;
mod text;

pub use analysis::AiAnalysisService;
pub use media::AiMediaService;
pub use messages::AiMessagesService;
pub use text::AiTextService;

#[cfg(feature = "blocking")]
pub(crate) use analysis::{
    CLASSIFICATION_PATH, EXTRACT_PATH, SENTIMENT_PATH, TARGETED_SENTIMENT_PATH,
};
#[cfg(feature = "blocking")]
pub(crate) use media::{EMBED_IMAGE_PATH, EMBED_TEXT_PATH, IMAGE_TO_TEXT_PATH};
#[cfg(feature = "blocking")]
pub(crate) use messages::{CHAT_PATH, TOOLS_PATH};
#[cfg(feature = "blocking")]
pub(crate) use text::{BEASTMODE_PATH, GENERATION_PATH, SQL_PATH, SUMMARIZE_PATH};

/// Entry point for the AI endpoints.
///
/// # Example
///
/// ```no_run
/// use serde_json::json;
///
/// # async fn example(client: domo_sdk::DomoClient) -> domo_sdk::Result<()> {
/// let sql = client
///     .ai()
///     .text()
///     .to_sql(&json!({"input": "total sales by region", "dataSourceSchemas": []}))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AiService {
    transport: Arc<Transport>,
}

impl AiService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Text generation, text-to-SQL, summarization and Beast Mode.
    pub fn text(&self) -> AiTextService {
        AiTextService::new(self.transport.clone())
    }

    /// Chat and tool-use conversations.
    pub fn messages(&self) -> AiMessagesService {
        AiMessagesService::new(self.transport.clone())
    }

    /// Sentiment, classification and extraction.
    pub fn analysis(&self) -> AiAnalysisService {
        AiAnalysisService::new(self.transport.clone())
    }

    /// Image description and embeddings.
    pub fn media(&self) -> AiMediaService {
        AiMediaService::new(self.transport.clone())
    }
}
