//! Async HTTP transport.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use super::config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use super::response::{log_timing, RawResponse};
use crate::auth::{AuthMode, AuthStrategy};
use crate::{Error, Result};

/// Issues authenticated requests against the API and maps every outcome
/// onto [`Error`].
///
/// Paths are relative to the strategy's base URL (`/v1/datasets`, not a
/// full URL). JSON results come back as `Option<Value>`: `None` for
/// `204 No Content` and empty bodies.
///
/// The underlying connection pool is created on first use. [`close`]
/// drops it; a later call builds a new one.
///
/// The transport never retries. Use [`Error::is_retryable`] and
/// [`Error::retry_after`] to drive a retry policy.
///
/// [`close`]: Transport::close
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use domo_sdk::auth::DeveloperTokenStrategy;
/// use domo_sdk::Transport;
///
/// # async fn example() -> domo_sdk::Result<()> {
/// let auth = Arc::new(DeveloperTokenStrategy::new("token", "acme.domo.com")?);
/// let transport = Transport::new(auth);
///
/// let dataset = transport.get("/v1/datasets/abc-123").await?;
/// # Ok(())
/// # }
/// ```
pub struct Transport {
    auth: Arc<dyn AuthStrategy>,
    request_timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    http: Mutex<Option<reqwest::Client>>,
}

impl Transport {
    /// Create a transport with default timeouts.
    pub fn new(auth: Arc<dyn AuthStrategy>) -> Self {
        Self {
            auth,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
            http: Mutex::new(None),
        }
    }

    /// Create a transport using the timeouts and user agent in `config`.
    pub fn from_config(auth: Arc<dyn AuthStrategy>, config: &ClientConfig) -> Self {
        Self::new(auth)
            .with_timeout(config.request_timeout)
            .with_connect_timeout(config.connect_timeout)
            .with_user_agent(config.user_agent.clone())
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
        self.user_agent = Some(user_agent.into());
        self
    }

    /// The authentication strategy requests are signed with.
    pub fn auth(&self) -> &Arc<dyn AuthStrategy> {
        &self.auth
    }

    /// Shorthand for `self.auth().auth_mode()`.
    pub fn auth_mode(&self) -> AuthMode {
        self.auth.auth_mode()
    }

    /// The configured overall request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Drop the pooled HTTP client. Idempotent.
    ///
    /// The next request lazily creates a fresh client.
    pub fn close(&self) {
        if self.http.lock().take().is_some() {
            tracing::debug!("transport closed");
        }
    }

    /// Whether a pooled HTTP client currently exists.
    pub fn is_open(&self) -> bool {
        self.http.lock().is_some()
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::GET, path, None, None)
            .await
    }

    /// `GET path` with query parameters.
    pub async fn get_with_query<Q>(&self, path: &str, query: &Q) -> Result<Option<Value>>
    where
        Q: Serialize + ?Sized,
    {
        self.json_request::<Q, ()>(Method::GET, path, Some(query), None)
            .await
    }

    /// `POST path` with a JSON body.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.json_request::<(), B>(Method::POST, path, None, Some(body))
            .await
    }

    /// `POST path` without a body.
    pub async fn post_empty(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::POST, path, None, None)
            .await
    }

    /// `POST path` with query parameters and an optional JSON body.
    pub async fn post_with_query<Q, B>(
        &self,
        path: &str,
        query: &Q,
        body: Option<&B>,
    ) -> Result<Option<Value>>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.json_request(Method::POST, path, Some(query), body)
            .await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.json_request::<(), B>(Method::PUT, path, None, Some(body))
            .await
    }

    /// `PUT path` without a body.
    pub async fn put_empty(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::PUT, path, None, None)
            .await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.json_request::<(), B>(Method::PATCH, path, None, Some(body))
            .await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::DELETE, path, None, None)
            .await
    }

    /// `PUT path` with a raw body, e.g. CSV data.
    ///
    /// `content_encoding` is sent as `Content-Encoding` when set (`gzip`
    /// for pre-compressed uploads).
    pub async fn put_bytes<Q>(
        &self,
        path: &str,
        query: &Q,
        data: Vec<u8>,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> Result<Option<Value>>
    where
        Q: Serialize + ?Sized,
    {
        let content_type = header_value(content_type)?;
        let content_encoding = content_encoding.map(header_value).transpose()?;

        let raw = self
            .execute(Method::PUT, path, None, |req| {
                let mut req = req.query(query).header(CONTENT_TYPE, content_type);
                if let Some(encoding) = content_encoding {
                    req = req.header(CONTENT_ENCODING, encoding);
                }
                req.body(data)
            })
            .await?;
        raw.into_json(path)
    }

    /// `GET path` returning the body as text, e.g. a CSV export.
    ///
    /// The response-size limit does not apply.
    pub async fn get_text<Q>(&self, path: &str, query: &Q, accept: &str) -> Result<String>
    where
        Q: Serialize + ?Sized,
    {
        let accept = header_value(accept)?;
        let raw = self
            .execute(Method::GET, path, Some(accept), |req| req.query(query))
            .await?;
        raw.into_text(path)
    }

    /// Issue a JSON request with optional query parameters and body.
    pub async fn json_request<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Option<Value>>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let payload = body.map(encode_json).transpose()?;

        let raw = self
            .execute(method, path, None, |mut req| {
                if let Some(query) = query {
                    req = req.query(query);
                }
                if let Some(payload) = payload {
                    req = req
                        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                        .body(payload);
                }
                req
            })
            .await?;
        raw.into_json(path)
    }

    async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        accept: Option<HeaderValue>,
        build: F,
    ) -> Result<RawResponse>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.auth.base_url(), path);
        let mut headers = self.auth.headers().await?;
        if let Some(accept) = accept {
            headers.insert(ACCEPT, accept);
        }

        let http = self.client(path)?;
        let request = build(http.request(method.clone(), &url).headers(headers));

        let started = Instant::now();
        let result = self.receive(request, path).await;
        log_timing(&method, path, started.elapsed());
        result
    }

    async fn receive(&self, request: RequestBuilder, path: &str) -> Result<RawResponse> {
        let map_err = |e: reqwest::Error| Error::from_transport(e, path, self.request_timeout);

        let response = request.send().await.map_err(map_err)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_err)?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    fn client(&self, path: &str) -> Result<reqwest::Client> {
        let mut slot = self.http.lock();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| Error::from_transport(e, path, self.request_timeout))?;

        tracing::debug!("created HTTP client");
        *slot = Some(client.clone());
        Ok(client)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("auth", &self.auth)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("open", &self.is_open())
            .finish()
    }
}

pub(crate) fn encode_json<B>(body: &B) -> Result<Vec<u8>>
where
    B: Serialize + ?Sized,
{
    serde_json::to_vec(body)
        .map_err(|e| Error::Validation(format!("request body is not serializable: {e}")))
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Validation(format!("invalid header value {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DeveloperTokenStrategy;
    use std::collections::BTreeMap;

    fn transport() -> Transport {
        let auth = DeveloperTokenStrategy::new("token", "acme.domo.com").unwrap();
        Transport::new(Arc::new(auth))
    }

    #[test]
    fn test_default_timeouts() {
        let transport = transport();
        assert_eq!(transport.request_timeout(), Duration::from_secs(60));
        assert_eq!(transport.connect_timeout, Duration::from_secs(10));
        assert_eq!(transport.auth_mode(), AuthMode::DeveloperToken);
    }

    #[test]
    fn test_client_created_lazily_and_recreated() {
        let transport = transport();
        assert!(!transport.is_open());

        transport.client("/x").unwrap();
        assert!(transport.is_open());

        transport.close();
        transport.close();
        assert!(!transport.is_open());

        transport.client("/x").unwrap();
        assert!(transport.is_open());
    }

    #[test]
    fn test_unserializable_body_is_validation_error() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "non-string key");
        assert!(matches!(encode_json(&map), Err(Error::Validation(_))));
    }

    #[test]
    fn test_invalid_header_value() {
        assert!(matches!(header_value("text/csv\n"), Err(Error::Validation(_))));
        assert!(header_value("text/csv").is_ok());
    }
}
