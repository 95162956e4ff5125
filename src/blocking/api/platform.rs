use serde_json::Value;

use crate::api::ai::{
    BEASTMODE_PATH, CHAT_PATH, CLASSIFICATION_PATH, EMBED_IMAGE_PATH, EMBED_TEXT_PATH,
    EXTRACT_PATH, GENERATION_PATH, IMAGE_TO_TEXT_PATH, SENTIMENT_PATH, SQL_PATH, SUMMARIZE_PATH,
    TARGETED_SENTIMENT_PATH, TOOLS_PATH,
};
use crate::api::connectors::executions_path;
use crate::api::dataflows::dataflow_path;
use crate::api::embed::{token_request, CARD_AUTH_PATH, DASHBOARD_AUTH_PATH};
use crate::api::files::{file_path, revision_path, upload_body, FileDetailsQuery, OCTET_STREAM};
use crate::api::search::{
    datasource_results, datasource_search_body, NameLikeQuery, DATASETS_PATH,
    DATASOURCE_SEARCH_PATH, QUERY_PATH,
};
use crate::api::workflows::{instance_path, model_permissions_path};
use crate::api::{dataflows, files, workflows, UpdateVerb};
use crate::auth::AuthMode;
use crate::client::paginated::PageRequest;
use crate::Result;

blocking_service! {
    /// Blocking search service.
    ///
    /// Dataset search switches endpoints on the client's auth mode, like
    /// [`crate::api::SearchService`].
    SearchService
}

impl SearchService {
    /// Run a raw search query.
    pub fn query(&self, search: &Value) -> Result<Value> {
        self.resource.create(QUERY_PATH, search)
    }

    /// Find datasets whose name contains `query`.
    pub fn search_datasets(&self, query: &str, count: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(count, offset)?;

        match self.resource.transport().auth_mode() {
            AuthMode::DeveloperToken => {
                let body = datasource_search_body(query, page.limit, page.offset);
                datasource_results(self.resource.create(DATASOURCE_SEARCH_PATH, &body)?)
            }
            AuthMode::OAuth => {
                let params = NameLikeQuery {
                    limit: page.limit,
                    offset: page.offset,
                    name_like: query,
                };
                self.resource.list(DATASETS_PATH, &params)
            }
        }
    }
}

blocking_service! {
    /// Blocking workflows service.
    WorkflowsService
}

impl WorkflowsService {
    /// Start a workflow by sending it a message.
    pub fn start(&self, message: &Value) -> Result<Value> {
        let path = format!("{}/instances/message", workflows::URL_BASE);
        self.resource.create(&path, message)
    }

    /// Get a workflow instance.
    pub fn get_instance(&self, instance_id: &str) -> Result<Value> {
        self.resource.fetch(&instance_path(instance_id))
    }

    /// Cancel a running instance.
    pub fn cancel(&self, instance_id: &str) -> Result<()> {
        self.resource
            .action(&format!("{}/cancel", instance_path(instance_id)))?;
        Ok(())
    }

    /// Permissions on a workflow model.
    pub fn get_permissions(&self, model_id: u64) -> Result<Value> {
        self.resource.fetch(&model_permissions_path(model_id))
    }

    /// Set permissions on a workflow model.
    pub fn set_permissions(&self, model_id: u64, permissions: &Value) -> Result<()> {
        self.resource
            .create(&model_permissions_path(model_id), permissions)?;
        Ok(())
    }
}

blocking_service! {
    /// Blocking dataflows service.
    DataflowsService
}

impl DataflowsService {
    /// Fetch a single page of dataflows.
    pub fn list(&self, per_page: u32, offset: u64) -> Result<Vec<Value>> {
        let page = PageRequest::new(per_page, offset)?;
        self.resource.list(dataflows::URL_BASE, &page)
    }

    /// Get a dataflow by id.
    pub fn get(&self, dataflow_id: u64) -> Result<Value> {
        self.resource.fetch(&dataflow_path(dataflow_id))
    }

    /// Trigger a run.
    pub fn execute(&self, dataflow_id: u64) -> Result<Value> {
        self.resource
            .action(&format!("{}/executions", dataflow_path(dataflow_id)))
    }

    /// Get one execution of a dataflow.
    pub fn get_execution(&self, dataflow_id: u64, execution_id: u64) -> Result<Value> {
        let path = format!("{}/executions/{execution_id}", dataflow_path(dataflow_id));
        self.resource.fetch(&path)
    }
}

blocking_service! {
    /// Blocking connectors service.
    ConnectorsService
}

impl ConnectorsService {
    /// Trigger an execution of the connector behind `stream_id`.
    pub fn run(&self, stream_id: u64) -> Result<Value> {
        self.resource.action(&executions_path(stream_id))
    }
}

blocking_service! {
    /// Blocking embed token service.
    EmbedService
}

impl EmbedService {
    /// Create an embed token for a card.
    pub fn create_card_token(&self, card_id: &str, params: Value) -> Result<Value> {
        let body = token_request("cardId", card_id, params)?;
        self.resource.create(CARD_AUTH_PATH, &body)
    }

    /// Create an embed token for a dashboard.
    pub fn create_dashboard_token(&self, dashboard_id: &str, params: Value) -> Result<Value> {
        let body = token_request("dashboardId", dashboard_id, params)?;
        self.resource.create(DASHBOARD_AUTH_PATH, &body)
    }
}

blocking_service! {
    /// Blocking data files service.
    FilesService
}

impl FilesService {
    /// Register a new file.
    pub fn upload(&self, name: &str, description: &str) -> Result<Value> {
        self.resource
            .create(files::URL_BASE, &upload_body(name, description))
    }

    /// Replace a file's contents.
    pub fn update(&self, file_id: u64, data: Vec<u8>) -> Result<Value> {
        let value = self.resource.transport().put_bytes(
            &file_path(file_id),
            &(),
            data,
            OCTET_STREAM,
            None,
        )?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// File details.
    pub fn get_details(&self, file_id: u64) -> Result<Value> {
        let path = format!("{}/details", files::URL_BASE);
        self.resource
            .fetch_with_query(&path, &FileDetailsQuery { file_id })
    }

    /// Download one revision of a file.
    pub fn download(&self, file_id: u64, revision_id: u64) -> Result<String> {
        self.resource
            .transport()
            .get_text(&revision_path(file_id, revision_id), &(), "*/*")
    }

    /// Replace a file's permissions.
    pub fn set_permissions(&self, file_id: u64, permissions: &Value) -> Result<()> {
        let path = format!("{}/permissions", file_path(file_id));
        self.resource.update(&path, permissions, UpdateVerb::Put)?;
        Ok(())
    }
}

blocking_service! {
    /// Blocking AI services.
    AiService
}

impl AiService {
    /// Text generation, text-to-SQL, summarization and Beast Mode.
    pub fn text(&self) -> AiTextService {
        AiTextService {
            resource: self.resource.clone(),
        }
    }

    /// Chat and tool-use conversations.
    pub fn messages(&self) -> AiMessagesService {
        AiMessagesService {
            resource: self.resource.clone(),
        }
    }

    /// Sentiment, classification and extraction.
    pub fn analysis(&self) -> AiAnalysisService {
        AiAnalysisService {
            resource: self.resource.clone(),
        }
    }

    /// Image description and embeddings.
    pub fn media(&self) -> AiMediaService {
        AiMediaService {
            resource: self.resource.clone(),
        }
    }
}

/// Blocking AI text endpoints.
#[derive(Debug, Clone)]
pub struct AiTextService {
    resource: crate::blocking::ResourceClient,
}

impl AiTextService {
    /// Free-form text generation.
    pub fn generate(&self, request: &Value) -> Result<Value> {
        self.resource.create(GENERATION_PATH, request)
    }

    /// Translate a natural-language question into SQL.
    pub fn to_sql(&self, request: &Value) -> Result<Value> {
        self.resource.create(SQL_PATH, request)
    }

    /// Summarize text.
    pub fn summarize(&self, request: &Value) -> Result<Value> {
        self.resource.create(SUMMARIZE_PATH, request)
    }

    /// Generate a Beast Mode calculation.
    pub fn beastmode(&self, request: &Value) -> Result<Value> {
        self.resource.create(BEASTMODE_PATH, request)
    }
}

/// Blocking AI conversation endpoints.
#[derive(Debug, Clone)]
pub struct AiMessagesService {
    resource: crate::blocking::ResourceClient,
}

impl AiMessagesService {
    /// Send a chat conversation.
    pub fn chat(&self, request: &Value) -> Result<Value> {
        self.resource.create(CHAT_PATH, request)
    }

    /// Send a conversation with tool definitions.
    pub fn tools(&self, request: &Value) -> Result<Value> {
        self.resource.create(TOOLS_PATH, request)
    }
}

/// Blocking AI analysis endpoints.
#[derive(Debug, Clone)]
pub struct AiAnalysisService {
    resource: crate::blocking::ResourceClient,
}

impl AiAnalysisService {
    /// Overall sentiment of a text.
    pub fn sentiment(&self, request: &Value) -> Result<Value> {
        self.resource.create(SENTIMENT_PATH, request)
    }

    /// Sentiment towards specific targets.
    pub fn targeted_sentiment(&self, request: &Value) -> Result<Value> {
        self.resource.create(TARGETED_SENTIMENT_PATH, request)
    }

    /// Classify text into caller-supplied categories.
    pub fn classify(&self, request: &Value) -> Result<Value> {
        self.resource.create(CLASSIFICATION_PATH, request)
    }

    /// Extract structured fields from text.
    pub fn extract(&self, request: &Value) -> Result<Value> {
        self.resource.create(EXTRACT_PATH, request)
    }
}

/// Blocking AI image and embedding endpoints.
#[derive(Debug, Clone)]
pub struct AiMediaService {
    resource: crate::blocking::ResourceClient,
}

impl AiMediaService {
    /// Describe an image.
    pub fn image_to_text(&self, request: &Value) -> Result<Value> {
        self.resource.create(IMAGE_TO_TEXT_PATH, request)
    }

    /// Embed text.
    pub fn embed_text(&self, request: &Value) -> Result<Value> {
        self.resource.create(EMBED_TEXT_PATH, request)
    }

    /// Embed an image.
    pub fn embed_image(&self, request: &Value) -> Result<Value> {
        self.resource.create(EMBED_IMAGE_PATH, request)
    }
}
