//! Authentication strategies for the Domo API.
//!
//! Two strategies are provided:
//!
//! 1. **Developer token** - a long-lived token sent on every request to
//!    the instance domain (`https://<instance>.domo.com/api`)
//! 2. **OAuth client credentials** - a client id/secret pair exchanged for
//!    short-lived access tokens against `api.domo.com`
//!
//! Both implement [`AuthStrategy`], which the transport consults for the
//! base URL and per-request headers.
//!
//! # Developer Token
//!
//! ```
//! use domo_sdk::auth::{AuthMode, AuthStrategy, DeveloperTokenStrategy};
//!
//! let auth = DeveloperTokenStrategy::new("my-token", "acme.domo.com")?;
//! assert_eq!(auth.auth_mode(), AuthMode::DeveloperToken);
//! # Ok::<(), domo_sdk::Error>(())
//! ```
//!
//! # OAuth
//!
//! ```no_run
//! use domo_sdk::auth::{AuthStrategy, OAuthStrategy};
//!
//! # async fn example() -> domo_sdk::Result<()> {
//! let auth = OAuthStrategy::new("client-id", "client-secret").with_scope(["data"]);
//!
//! // Fetches a token on first use, then reuses it until it nears expiry.
//! let headers = auth.headers().await?;
//! # Ok(())
//! # }
//! ```

mod developer_token;
mod oauth;
mod token;

use std::fmt;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

pub use developer_token::{DeveloperTokenStrategy, DEVELOPER_TOKEN_HEADER};
pub use oauth::{OAuthStrategy, DEFAULT_API_HOST, TOKEN_PATH};
pub use token::{extract_expiry, AccessToken, EXPIRY_MARGIN_SECS};

use crate::Result;

/// Which kind of credential a strategy presents.
///
/// Some endpoints (notably search) behave differently depending on the
/// mode, because developer tokens can reach internal UI endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// Static developer token against the instance domain.
    DeveloperToken,
    /// OAuth client credentials against the public API host.
    OAuth,
}

impl AuthMode {
    /// Stable identifier for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::DeveloperToken => "developer_token",
            AuthMode::OAuth => "oauth",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces the base URL and authentication headers for API requests.
///
/// Implementations must be safe to share between threads and tasks; the
/// transport holds one behind an `Arc` for the lifetime of the client.
#[async_trait]
pub trait AuthStrategy: Send + Sync + fmt::Debug {
    /// Base URL every request path is appended to (no trailing slash).
    fn base_url(&self) -> String;

    /// The credential kind this strategy presents.
    fn auth_mode(&self) -> AuthMode;

    /// Headers to attach to a request, refreshing credentials if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`](crate::Error::Auth) if a token refresh is
    /// rejected, or a transport error if the token endpoint is unreachable.
    async fn headers(&self) -> Result<HeaderMap>;

    /// Blocking counterpart of [`headers`](Self::headers).
    ///
    /// Must not be called from within an async runtime.
    #[cfg(feature = "blocking")]
    fn blocking_headers(&self) -> Result<HeaderMap>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_identifiers() {
        assert_eq!(AuthMode::DeveloperToken.as_str(), "developer_token");
        assert_eq!(AuthMode::OAuth.to_string(), "oauth");
    }
}
