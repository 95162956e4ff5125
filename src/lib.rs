//! # domo-sdk
//!
//! A Rust client for the Domo REST API.
//!
//! The crate covers datasets, streams, users, groups, pages, cards, search,
//! AI endpoints and more, with async and blocking variants sharing the same
//! configuration, authentication and error model.
//!
//! ## Features
//!
//! - **Authentication**: developer tokens against an instance domain, or
//!   OAuth client credentials with automatic token refresh
//! - **Errors**: one [`Error`] enum with a fixed set of kinds, including
//!   `Retry-After` information for rate limiting
//! - **Pagination**: bounded page sizes and lazy
//!   [`PaginatedStream`]s that fetch one page at a time
//! - **Uploads**: CSV import and export, with optional gzip compression
//! - **Blocking client**: [`blocking::DomoClient`] behind the default
//!   `blocking` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domo_sdk::{DomoClient, PageOptions};
//! use domo_sdk::api::DatasetListQuery;
//!
//! #[tokio::main]
//! async fn main() -> domo_sdk::Result<()> {
//!     // Reads DOMO_DEVELOPER_TOKEN + DOMO_HOST, or DOMO_CLIENT_ID + DOMO_CLIENT_SECRET
//!     let client = DomoClient::from_env()?;
//!
//!     let datasets = client
//!         .datasets()
//!         .list(PageOptions::new().limit(20), DatasetListQuery::new().sort("name"))
//!         .await?;
//!     println!("Found {} datasets", datasets.len());
//!
//!     if let Some(id) = datasets.first().and_then(|d| d["id"].as_str()) {
//!         let csv = client.datasets().data_export(id, true).await?;
//!         println!("{csv}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Handling Errors
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use domo_sdk::{DomoClient, Error};
//!
//! # async fn example(client: DomoClient) -> domo_sdk::Result<()> {
//! match client.datasets().get("missing-id").await {
//!     Ok(dataset) => println!("{}", dataset["name"]),
//!     Err(Error::NotFound { path }) => println!("nothing at {path}"),
//!     Err(e) if e.is_retryable() => {
//!         let wait = e.retry_after().unwrap_or(Duration::from_secs(1));
//!         tokio::time::sleep(wait).await;
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{AuthMode, AuthStrategy};
pub use client::{
    ClientConfig, DomoClient, PageAdvance, PageCursor, PageOptions, PageRequest,
    PaginatedStream, Transport,
};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
///
/// ```rust
/// use domo_sdk::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ActivityLogQuery, DatasetListQuery, ImportMethod, ResourceClient, UpdateVerb,
    };
    pub use crate::auth::{AuthMode, AuthStrategy, DeveloperTokenStrategy, OAuthStrategy};
    pub use crate::client::{ClientConfig, DomoClient, PageOptions, PaginatedStream};
    pub use crate::error::{Error, Result};
    pub use crate::models::{Column, ColumnType, Schema};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate() {
        let config = ClientConfig::default();
        assert!(config.user_agent.starts_with("domo-sdk/"));
    }

    #[test]
    fn test_page_options_defaults() {
        let options = PageOptions::default();
        assert_eq!(options.per_page, 50);
        assert_eq!(options.offset, 0);
        assert_eq!(options.limit, None);
    }
}
