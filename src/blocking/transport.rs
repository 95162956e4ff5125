//! Blocking HTTP transport.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{AuthMode, AuthStrategy};
use crate::client::response::{log_timing, RawResponse};
use crate::client::{encode_json, header_value, ClientConfig};
use crate::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::{Error, Result};

/// Blocking counterpart of [`crate::Transport`].
///
/// Status classification, size limits and timing logs are identical to
/// the async transport. Must not be used from within an async runtime.
pub struct Transport {
    auth: Arc<dyn AuthStrategy>,
    request_timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
    http: Mutex<Option<Client>>,
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
    pub fn close(&self) {
        if self.http.lock().take().is_some() {
            tracing::debug!("blocking transport closed");
        }
    }

    /// Whether a pooled HTTP client currently exists.
    pub fn is_open(&self) -> bool {
        self.http.lock().is_some()
    }

    /// `GET path`.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::GET, path, None, None)
    }

    /// `GET path` with query parameters.
    pub fn get_with_query<Q>(&self, path: &str, query: &Q) -> Result<Option<Value>>
    where
        Q: Serialize + ?Sized,
    {
        self.json_request::<Q, ()>(Method::GET, path, Some(query), None)
    }

    /// `POST path` with a JSON body.
    pub fn post<B>(&self, path: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.json_request::<(), B>(Method::POST, path, None, Some(body))
    }

    /// `POST path` without a body.
    pub fn post_empty(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::POST, path, None, None)
    }

    /// `POST path` with query parameters and an optional JSON body.
    pub fn post_with_query<Q, B>(
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
    }

    /// `PUT path` with a JSON body.
    pub fn put<B>(&self, path: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.json_request::<(), B>(Method::PUT, path, None, Some(body))
    }

    /// `PUT path` without a body.
    pub fn put_empty(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::PUT, path, None, None)
    }

    /// `PATCH path` with a JSON body.
    pub fn patch<B>(&self, path: &str, body: &B) -> Result<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        self.json_request::<(), B>(Method::PATCH, path, None, Some(body))
    }

    /// `DELETE path`.
    pub fn delete(&self, path: &str) -> Result<Option<Value>> {
        self.json_request::<(), ()>(Method::DELETE, path, None, None)
    }

    /// `PUT path` with a raw body.
    pub fn put_bytes<Q>(
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

        let raw = self.execute(Method::PUT, path, None, |req| {
            let mut req = req.query(query).header(CONTENT_TYPE, content_type);
            if let Some(encoding) = content_encoding {
                req = req.header(CONTENT_ENCODING, encoding);
            }
            req.body(data)
        })?;
        raw.into_json(path)
    }

    /// `GET path` returning the body as text.
    pub fn get_text<Q>(&self, path: &str, query: &Q, accept: &str) -> Result<String>
    where
        Q: Serialize + ?Sized,
    {
        let accept = header_value(accept)?;
        let raw = self.execute(Method::GET, path, Some(accept), |req| req.query(query))?;
        raw.into_text(path)
    }

    /// Issue a JSON request with optional query parameters and body.
    pub fn json_request<Q, B>(
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

        let raw = self.execute(method, path, None, |mut req| {
            if let Some(query) = query {
                req = req.query(query);
            }
            if let Some(payload) = payload {
                req = req
                    .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .body(payload);
            }
            req
        })?;
        raw.into_json(path)
    }

    fn execute<F>(
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
        let mut headers = self.auth.blocking_headers()?;
        if let Some(accept) = accept {
            headers.insert(ACCEPT, accept);
        }

        let http = self.client(path)?;
        let request = build(http.request(method.clone(), &url).headers(headers));

        let started = Instant::now();
        let result = self.receive(request, path);
        log_timing(&method, path, started.elapsed());
        result
    }

    fn receive(&self, request: RequestBuilder, path: &str) -> Result<RawResponse> {
        let map_err = |e: reqwest::Error| Error::from_transport(e, path, self.request_timeout);

        let response = request.send().map_err(map_err)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(map_err)?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    fn client(&self, path: &str) -> Result<Client> {
        let mut slot = self.http.lock();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let mut builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| Error::from_transport(e, path, self.request_timeout))?;

        tracing::debug!("created blocking HTTP client");
        *slot = Some(client.clone());
        Ok(client)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("blocking::Transport")
            .field("auth", &self.auth)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("open", &self.is_open())
            .finish()
    }
}
