//! Client configuration options.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::auth::{AuthStrategy, DeveloperTokenStrategy, OAuthStrategy, DEFAULT_API_HOST};
use crate::{Error, Result};

/// Default overall request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection-establishment timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding a developer token.
pub const ENV_DEVELOPER_TOKEN: &str = "DOMO_DEVELOPER_TOKEN";
/// Environment variable holding the instance domain for developer tokens.
pub const ENV_HOST: &str = "DOMO_HOST";
/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "DOMO_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "DOMO_CLIENT_SECRET";
/// Environment variable overriding the OAuth API host.
pub const ENV_API_HOST: &str = "DOMO_API_HOST";
/// Environment variable holding space-separated OAuth scopes.
pub const ENV_SCOPE: &str = "DOMO_SCOPE";

/// Configuration for the Domo client.
///
/// Exactly one credential set is used. If both a developer token (with
/// instance domain) and OAuth client credentials are present, the
/// developer token wins.
///
/// # Example
///
/// ```
/// use domo_sdk::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_oauth("client-id", "client-secret")
///     .with_scope(["data", "user"])
///     .with_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Developer token (static-token auth)
    pub developer_token: Option<SecretString>,
    /// Instance domain, e.g. `acme.domo.com` (static-token auth)
    pub instance_domain: Option<String>,
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<SecretString>,
    /// OAuth scopes
    pub scope: Vec<String>,
    /// OAuth API host
    pub api_host: String,
    /// Whether OAuth calls use `https`
    pub use_https: bool,
    /// Overall per-request timeout
    pub request_timeout: Duration,
    /// Connection-establishment timeout
    pub connect_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            developer_token: None,
            instance_domain: None,
            client_id: None,
            client_secret: None,
            scope: Vec::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            use_https: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("domo-sdk/{} (Rust)", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read credentials from the environment.
    ///
    /// Looks for `DOMO_DEVELOPER_TOKEN` + `DOMO_HOST`, then
    /// `DOMO_CLIENT_ID` + `DOMO_CLIENT_SECRET`. `DOMO_API_HOST` and
    /// `DOMO_SCOPE` are honored when set. Empty variables count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        config.developer_token = var(ENV_DEVELOPER_TOKEN).map(SecretString::from);
        config.instance_domain = var(ENV_HOST);
        config.client_id = var(ENV_CLIENT_ID);
        config.client_secret = var(ENV_CLIENT_SECRET).map(SecretString::from);
        if let Some(host) = var(ENV_API_HOST) {
            config.api_host = host;
        }
        if let Some(scope) = var(ENV_SCOPE) {
            config.scope = scope.split_whitespace().map(String::from).collect();
        }
        config
    }

    /// Use a developer token against the given instance domain.
    pub fn with_developer_token(
        mut self,
        token: impl Into<String>,
        instance_domain: impl Into<String>,
    ) -> Self {
        self.developer_token = Some(SecretString::from(token.into()));
        self.instance_domain = Some(instance_domain.into());
        self
    }

    /// Use OAuth client credentials.
    pub fn with_oauth(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(SecretString::from(client_secret.into()));
        self
    }

    /// Set the OAuth scopes.
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// Set the OAuth API host.
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    /// Use `https` (default) or plain `http` for OAuth calls.
    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Set the overall request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the authentication strategy selected by these credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if neither credential set is complete.
    pub fn auth_strategy(&self) -> Result<Arc<dyn AuthStrategy>> {
        let non_empty = |s: &str| !s.trim().is_empty();

        if let (Some(token), Some(domain)) = (&self.developer_token, &self.instance_domain) {
            if non_empty(token.expose_secret()) && non_empty(domain) {
                let strategy = DeveloperTokenStrategy::new(token.expose_secret(), domain)?;
                return Ok(Arc::new(strategy));
            }
        }

        if let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) {
            if non_empty(id) && non_empty(secret.expose_secret()) {
                let strategy = OAuthStrategy::new(id.as_str(), secret.expose_secret())
                    .with_scope(self.scope.iter().cloned())
                    .with_api_host(self.api_host.as_str())
                    .with_https(self.use_https)
                    .with_timeout(self.request_timeout);
                return Ok(Arc::new(strategy));
            }
        }

        Err(Error::Validation(
            "Missing credentials. Provide either (developer_token + instance_domain) \
             or (client_id + client_secret)."
                .to_string(),
        ))
    }
}
