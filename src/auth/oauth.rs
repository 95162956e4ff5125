//! OAuth2 client-credentials authentication with token refresh.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use super::token::AccessToken;
use super::{AuthMode, AuthStrategy};
use crate::{Error, Result};

/// Default host for OAuth-authenticated API calls.
pub const DEFAULT_API_HOST: &str = "api.domo.com";

/// Path of the token endpoint relative to the base URL.
pub const TOKEN_PATH: &str = "/oauth/token";

const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Authentication with an OAuth client id and secret.
///
/// Access tokens are short-lived. The strategy caches the current token
/// and refreshes it on demand when it is missing or within
/// [`EXPIRY_MARGIN_SECS`](super::EXPIRY_MARGIN_SECS) of expiring.
///
/// # Thread Safety
///
/// At most one refresh is in flight per strategy. Callers arriving while
/// a refresh is running wait for it and reuse its token. The async path
/// uses a [`tokio::sync::Mutex`]; the blocking path uses a
/// [`parking_lot::Mutex`]. Both guard the same cached token.
///
/// # Example
///
/// ```
/// use domo_sdk::auth::{AuthStrategy, OAuthStrategy};
///
/// let auth = OAuthStrategy::new("client-id", "client-secret")
///     .with_scope(["data", "user"]);
/// assert_eq!(auth.base_url(), "https://api.domo.com");
/// ```
pub struct OAuthStrategy {
    client_id: String,
    client_secret: SecretString,
    scope: Vec<String>,
    api_host: String,
    use_https: bool,
    request_timeout: Duration,
    token: RwLock<Option<AccessToken>>,
    refresh_lock: tokio::sync::Mutex<()>,
    #[cfg(feature = "blocking")]
    blocking_refresh_lock: parking_lot::Mutex<()>,
}

impl OAuthStrategy {
    /// Create a strategy for the given client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            scope: Vec::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            use_https: true,
            request_timeout: DEFAULT_TOKEN_TIMEOUT,
            token: RwLock::new(None),
            refresh_lock: tokio::sync::Mutex::new(()),
            #[cfg(feature = "blocking")]
            blocking_refresh_lock: parking_lot::Mutex::new(()),
        }
    }

    /// Request these scopes (sent space-joined).
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// Override the API host (`host[:port]`).
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    /// Use `https` (default) or plain `http`.
    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Set the timeout for token requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Expiry of the cached token, if one has been obtained.
    pub fn token_expires_at(&self) -> Option<i64> {
        self.token.read().as_ref().map(AccessToken::expires_at)
    }

    /// Drop the cached token so the next request refreshes it.
    pub fn invalidate(&self) {
        *self.token.write() = None;
    }

    fn token_url(&self) -> String {
        format!("{}{}", self.base_url(), TOKEN_PATH)
    }

    fn token_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("grant_type", "client_credentials".to_string())];
        if !self.scope.is_empty() {
            form.push(("scope", self.scope.join(" ")));
        }
        form
    }

    /// The cached token, if it is still usable.
    fn valid_token(&self) -> Option<AccessToken> {
        self.token.read().as_ref().filter(|t| t.is_valid()).cloned()
    }

    fn store_token(&self, status: StatusCode, body: &[u8]) -> Result<AccessToken> {
        let token = parse_token_response(status, body)?;
        tracing::debug!(expires_at = token.expires_at(), "OAuth token refreshed");
        *self.token.write() = Some(token.clone());
        Ok(token)
    }

    async fn refresh(&self) -> Result<AccessToken> {
        let _guard = self.refresh_lock.lock().await;

        // Another task may have refreshed while we waited.
        if let Some(token) = self.valid_token() {
            return Ok(token);
        }

        tracing::debug!(url = %self.token_url(), "requesting OAuth token");
        let map_err = |e: reqwest::Error| Error::from_transport(e, TOKEN_PATH, self.request_timeout);

        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(map_err)?;

        let response = client
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&self.token_form())
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_err)?;
        self.store_token(status, &body)
    }

    #[cfg(feature = "blocking")]
    fn blocking_refresh(&self) -> Result<AccessToken> {
        let _guard = self.blocking_refresh_lock.lock();

        if let Some(token) = self.valid_token() {
            return Ok(token);
        }

        tracing::debug!(url = %self.token_url(), "requesting OAuth token (blocking)");
        let map_err = |e: reqwest::Error| Error::from_transport(e, TOKEN_PATH, self.request_timeout);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(map_err)?;

        let response = client
            .post(self.token_url())
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&self.token_form())
            .send()
            .map_err(map_err)?;

        let status = response.status();
        let body = response.bytes().map_err(map_err)?;
        self.store_token(status, &body)
    }
}

#[async_trait]
impl AuthStrategy for OAuthStrategy {
    fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{}://{}", scheme, self.api_host)
    }

    fn auth_mode(&self) -> AuthMode {
        AuthMode::OAuth
    }

    async fn headers(&self) -> Result<HeaderMap> {
        let token = match self.valid_token() {
            Some(token) => token,
            None => self.refresh().await?,
        };
        bearer_headers(&token)
    }

    #[cfg(feature = "blocking")]
    fn blocking_headers(&self) -> Result<HeaderMap> {
        let token = match self.valid_token() {
            Some(token) => token,
            None => self.blocking_refresh()?,
        };
        bearer_headers(&token)
    }
}

impl std::fmt::Debug for OAuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthStrategy")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("base_url", &self.base_url())
            .field("token", &*self.token.read())
            .finish()
    }
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn parse_token_response(status: StatusCode, body: &[u8]) -> Result<AccessToken> {
    let text = || String::from_utf8_lossy(body).into_owned();

    if status != StatusCode::OK {
        tracing::warn!(status = status.as_u16(), "OAuth token refresh failed");
        return Err(Error::Auth {
            status: status.as_u16(),
            body: text(),
        });
    }

    let response: TokenResponse = serde_json::from_slice(body).map_err(|_| Error::Auth {
        status: status.as_u16(),
        body: text(),
    })?;

    Ok(AccessToken::new(response.access_token))
}

fn bearer_headers(token: &AccessToken) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("bearer {}", token.secret()))
        .map_err(|_| Error::Validation("Invalid token format".to_string()))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}
