//! Blocking client, for callers without an async runtime.
//!
//! Enabled by the `blocking` feature (on by default). The surface mirrors
//! the async client: the same configuration, authentication, error kinds,
//! and service methods, returning values directly. Listing methods return
//! a [`PageIter`] instead of a stream.
//!
//! Do not call into this module from within an async runtime.
//!
//! # Example
//!
//! ```no_run
//! use domo_sdk::blocking::DomoClient;
//! use domo_sdk::PageOptions;
//!
//! # fn main() -> domo_sdk::Result<()> {
//! let client = DomoClient::from_developer_token("my-token", "acme.domo.com")?;
//!
//! for dataset in client.datasets().list_stream(PageOptions::new(), Default::default())? {
//!     let dataset = dataset?;
//!     println!("{} ({} rows)", dataset["name"], dataset["rows"]);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod base;
mod paginated;
mod transport;

use std::fmt;
use std::sync::Arc;

pub use api::*;
pub use base::{ResourceClient, ValueIter};
pub use paginated::PageIter;
pub use transport::Transport;

use crate::auth::{AuthMode, AuthStrategy};
use crate::client::ClientConfig;
use crate::Result;

/// Blocking counterpart of [`crate::DomoClient`].
#[derive(Clone)]
pub struct DomoClient {
    transport: Arc<Transport>,
}

impl DomoClient {
    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if the
    /// configuration holds no complete credential set.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let auth = config.auth_strategy()?;
        Ok(Self::with_auth(auth, &config))
    }

    /// Create a client configured from `DOMO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Create a client that authenticates with a developer token.
    pub fn from_developer_token(
        token: impl Into<String>,
        instance_domain: impl Into<String>,
    ) -> Result<Self> {
        Self::new(ClientConfig::new().with_developer_token(token, instance_domain))
    }

    /// Create a client that authenticates with OAuth client credentials.
    pub fn from_oauth<I, S>(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ClientConfig::new()
                .with_oauth(client_id, client_secret)
                .with_scope(scope),
        )
    }

    /// Create a client around an existing authentication strategy.
    pub fn with_auth(auth: Arc<dyn AuthStrategy>, config: &ClientConfig) -> Self {
        Self {
            transport: Arc::new(Transport::from_config(auth, config)),
        }
    }

    /// Wrap an already-built transport.
    pub fn from_transport(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// The shared transport.
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Which kind of credential this client presents.
    pub fn auth_mode(&self) -> AuthMode {
        self.transport.auth_mode()
    }

    /// Release the pooled HTTP connections. Idempotent.
    pub fn close(&self) {
        self.transport.close();
    }

    /// Datasets service.
    pub fn datasets(&self) -> DatasetsService {
        DatasetsService::new(self.transport.clone())
    }

    /// Users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self.transport.clone())
    }

    /// Groups service.
    pub fn groups(&self) -> GroupsService {
        GroupsService::new(self.transport.clone())
    }

    /// Pages service.
    pub fn pages(&self) -> PagesService {
        PagesService::new(self.transport.clone())
    }

    /// Streams service.
    pub fn streams(&self) -> StreamsService {
        StreamsService::new(self.transport.clone())
    }

    /// Accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.transport.clone())
    }

    /// Roles service.
    pub fn roles(&self) -> RolesService {
        RolesService::new(self.transport.clone())
    }

    /// Search service.
    pub fn search(&self) -> SearchService {
        SearchService::new(self.transport.clone())
    }

    /// Cards service.
    pub fn cards(&self) -> CardsService {
        CardsService::new(self.transport.clone())
    }

    /// Activity log service.
    pub fn activity_log(&self) -> ActivityLogService {
        ActivityLogService::new(self.transport.clone())
    }

    /// Alerts service.
    pub fn alerts(&self) -> AlertsService {
        AlertsService::new(self.transport.clone())
    }

    /// Projects service.
    pub fn projects(&self) -> ProjectsService {
        ProjectsService::new(self.transport.clone())
    }

    /// Workflows service.
    pub fn workflows(&self) -> WorkflowsService {
        WorkflowsService::new(self.transport.clone())
    }

    /// Dataflows service.
    pub fn dataflows(&self) -> DataflowsService {
        DataflowsService::new(self.transport.clone())
    }

    /// Connectors service.
    pub fn connectors(&self) -> ConnectorsService {
        ConnectorsService::new(self.transport.clone())
    }

    /// Embed token service.
    pub fn embed(&self) -> EmbedService {
        EmbedService::new(self.transport.clone())
    }

    /// Data files service.
    pub fn files(&self) -> FilesService {
        FilesService::new(self.transport.clone())
    }

    /// S3 export service.
    pub fn s3_export(&self) -> S3ExportService {
        S3ExportService::new(self.transport.clone())
    }

    /// AI services.
    pub fn ai(&self) -> AiService {
        AiService::new(self.transport.clone())
    }
}

impl fmt::Debug for DomoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("blocking::DomoClient")
            .field("transport", &self.transport)
            .finish()
    }
}
