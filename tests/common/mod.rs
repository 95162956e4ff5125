//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

use domo_sdk::auth::{DeveloperTokenStrategy, OAuthStrategy};
use domo_sdk::{DomoClient, Transport};

pub const DEV_TOKEN: &str = "test-developer-token";

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A signed-looking token whose payload carries `exp`.
pub fn jwt_expiring_at(exp: i64) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"sub":"client"}}"#))
    )
}

/// A token valid for `secs` more seconds.
pub fn jwt_valid_for(secs: i64) -> String {
    jwt_expiring_at(Utc::now().timestamp() + secs)
}

/// Developer-token strategy pointed at the mock server.
///
/// API paths are served under `/api`.
pub fn developer_auth(server: &MockServer) -> Arc<DeveloperTokenStrategy> {
    Arc::new(DeveloperTokenStrategy::new(DEV_TOKEN, server.uri()).unwrap())
}

/// OAuth strategy pointed at the mock server over plain HTTP.
pub fn oauth_auth(server: &MockServer) -> Arc<OAuthStrategy> {
    Arc::new(
        OAuthStrategy::new("client-id", "client-secret")
            .with_scope(["data", "user"])
            .with_api_host(server.address().to_string())
            .with_https(false),
    )
}

pub fn developer_transport(server: &MockServer) -> Arc<Transport> {
    Arc::new(Transport::new(developer_auth(server)))
}

pub fn developer_client(server: &MockServer) -> DomoClient {
    DomoClient::from_transport(developer_transport(server))
}

pub fn oauth_client(server: &MockServer) -> DomoClient {
    DomoClient::from_transport(Arc::new(Transport::new(oauth_auth(server))))
}
