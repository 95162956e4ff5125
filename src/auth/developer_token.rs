//! Static developer-token authentication.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use secrecy::{ExposeSecret, SecretString};

use super::{AuthMode, AuthStrategy};
use crate::{Error, Result};

/// Header carrying the developer token on every request.
pub const DEVELOPER_TOKEN_HEADER: &str = "X-DOMO-Developer-Token";

/// Authentication with a long-lived developer token.
///
/// Requests go to the instance domain (`https://<instance>/api`), which
/// also exposes the internal UI endpoints (search, extended dataset
/// operations). The token never expires, so no network call is ever made
/// to produce headers.
///
/// # Example
///
/// ```
/// use domo_sdk::auth::{AuthStrategy, DeveloperTokenStrategy};
///
/// let auth = DeveloperTokenStrategy::new("token", "acme.domo.com/").unwrap();
/// assert_eq!(auth.base_url(), "https://acme.domo.com/api");
/// ```
pub struct DeveloperTokenStrategy {
    token: SecretString,
    base_url: String,
}

impl DeveloperTokenStrategy {
    /// Create a strategy for the given token and instance domain.
    ///
    /// The domain may include a scheme; `https` is assumed otherwise.
    /// Trailing slashes are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the token or domain is empty, the
    /// token is not a valid header value, or the resulting base URL does
    /// not parse.
    pub fn new(token: impl Into<String>, instance_domain: impl AsRef<str>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Validation("developer token must not be empty".into()));
        }
        HeaderValue::from_str(&token).map_err(|_| {
            Error::Validation("developer token contains invalid header characters".into())
        })?;

        let domain = instance_domain.as_ref().trim().trim_end_matches('/');
        if domain.is_empty() {
            return Err(Error::Validation("instance domain must not be empty".into()));
        }

        let base_url = if domain.starts_with("http") {
            format!("{domain}/api")
        } else {
            format!("https://{domain}/api")
        };
        url::Url::parse(&base_url).map_err(|e| {
            Error::Validation(format!("invalid instance domain {domain:?}: {e}"))
        })?;

        Ok(Self {
            token: SecretString::from(token),
            base_url,
        })
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut value = HeaderValue::from_str(self.token.expose_secret())
            .map_err(|_| Error::Validation("Invalid token format".to_string()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-domo-developer-token"), value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl AuthStrategy for DeveloperTokenStrategy {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    fn auth_mode(&self) -> AuthMode {
        AuthMode::DeveloperToken
    }

    async fn headers(&self) -> Result<HeaderMap> {
        self.header_map()
    }

    #[cfg(feature = "blocking")]
    fn blocking_headers(&self) -> Result<HeaderMap> {
        self.header_map()
    }
}

impl std::fmt::Debug for DeveloperTokenStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeveloperTokenStrategy")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_defaults_to_https() {
        let auth = DeveloperTokenStrategy::new("t", "acme.domo.com").unwrap();
        assert_eq!(auth.base_url(), "https://acme.domo.com/api");
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let auth = DeveloperTokenStrategy::new("t", "http://localhost:8080///").unwrap();
        assert_eq!(auth.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert!(matches!(
            DeveloperTokenStrategy::new("", "acme.domo.com"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            DeveloperTokenStrategy::new("t", "/"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_token_with_newline() {
        assert!(matches!(
            DeveloperTokenStrategy::new("bad\ntoken", "acme.domo.com"),
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_headers_are_static() {
        let auth = DeveloperTokenStrategy::new("dev-token", "acme.domo.com").unwrap();
        let headers = auth.headers().await.unwrap();
        assert_eq!(headers.get(DEVELOPER_TOKEN_HEADER).unwrap(), "dev-token");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(auth.auth_mode(), AuthMode::DeveloperToken);
    }

    #[test]
    fn test_debug_redacts_token() {
        let auth = DeveloperTokenStrategy::new("super-secret-token", "acme.domo.com").unwrap();
        let debug_str = format!("{:?}", auth);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }
}
