//! The async client facade.

use std::sync::Arc;

use crate::api::{
    AccountsService, ActivityLogService, AiService, AlertsService, CardsService,
    ConnectorsService, DataflowsService, DatasetsService, EmbedService, FilesService,
    GroupsService, PagesService, ProjectsService, RolesService, S3ExportService, SearchService,
    StreamsService, UsersService, WorkflowsService,
};
use crate::auth::{AuthMode, AuthStrategy};
use crate::Result;

use super::config::ClientConfig;
use super::transport::Transport;

/// The main client for interacting with the Domo API.
///
/// The client owns one [`Transport`] and hands out lightweight service
/// structs that share it. Cloning the client is cheap and clones share
/// the same connection pool and cached OAuth token.
///
/// # Example
///
/// ```no_run
/// use domo_sdk::{ClientConfig, DomoClient, PageOptions};
///
/// # async fn example() -> domo_sdk::Result<()> {
/// // Developer token against an instance
/// let client = DomoClient::from_developer_token("my-token", "acme.domo.com")?;
///
/// // Or OAuth client credentials, configured from the environment
/// let client = DomoClient::new(ClientConfig::from_env())?;
///
/// let users = client.users().list(PageOptions::new().limit(100)).await?;
/// println!("Found {} users", users.len());
/// # Ok(())
/// # }
/// ```
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
    ///
    /// Only the timeout and user agent settings of `config` are used.
    pub fn with_auth(auth: Arc<dyn AuthStrategy>, config: &ClientConfig) -> Self {
        Self {
            transport: Arc::new(Transport::from_config(auth, config)),
        }
    }

    /// Wrap an already-built transport.
    pub fn from_transport(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// The shared transport, for endpoints no service covers.
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Which kind of credential this client presents.
    pub fn auth_mode(&self) -> AuthMode {
        self.transport.auth_mode()
    }

    /// Release the pooled HTTP connections. Idempotent.
    ///
    /// The client stays usable; the next request reconnects.
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

impl std::fmt::Debug for DomoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomoClient")
            .field("transport", &self.transport)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_client_without_credentials_is_rejected() {
        let err = DomoClient::new(ClientConfig::new()).unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("Missing credentials")));
    }

    #[test]
    fn test_developer_token_client() {
        let client = DomoClient::from_developer_token("token", "acme.domo.com").unwrap();
        assert_eq!(client.auth_mode(), AuthMode::DeveloperToken);
        assert_eq!(
            client.transport().auth().base_url(),
            "https://acme.domo.com/api"
        );
    }

    #[test]
    fn test_oauth_client_and_clones_share_transport() {
        let client = DomoClient::from_oauth("id", "secret", ["data", "user"]).unwrap();
        assert_eq!(client.auth_mode(), AuthMode::OAuth);

        let clone = client.clone();
        assert!(Arc::ptr_eq(client.transport(), clone.transport()));
    }

    #[test]
    fn test_close_is_idempotent() {
        let client = DomoClient::from_developer_token("token", "acme.domo.com").unwrap();
        client.close();
        client.close();
        assert!(!client.transport().is_open());
    }
}
