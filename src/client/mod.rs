//! HTTP plumbing and the async client facade.
//!
//! [`DomoClient`] is the main entry point. Underneath it, [`Transport`]
//! signs requests with an [`AuthStrategy`](crate::auth::AuthStrategy),
//! classifies responses into [`Error`](crate::Error) kinds, and logs
//! timing. Listing endpoints page through results with
//! [`PaginatedStream`].
//!
//! # Example
//!
//! ```no_run
//! use domo_sdk::{ClientConfig, DomoClient};
//!
//! # async fn example() -> domo_sdk::Result<()> {
//! let config = ClientConfig::new()
//!     .with_oauth("client-id", "client-secret")
//!     .with_scope(["data"]);
//! let client = DomoClient::new(config)?;
//!
//! let dataset = client.datasets().get("a1b2c3").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
pub(crate) mod response;
mod transport;

pub use config::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, ENV_API_HOST, ENV_CLIENT_ID,
    ENV_CLIENT_SECRET, ENV_DEVELOPER_TOKEN, ENV_HOST, ENV_SCOPE,
};
pub use http::DomoClient;
pub use paginated::{
    BoxFuture, PageAdvance, PageCursor, PageOptions, PageRequest, PaginatedStream,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use response::{MAX_RESPONSE_SIZE, SLOW_REQUEST_THRESHOLD};
pub use transport::Transport;
#[cfg(feature = "blocking")]
pub(crate) use transport::{encode_json, header_value};
