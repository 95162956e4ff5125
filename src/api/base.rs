//! CRUD helpers shared by every resource service.

use std::io::Write;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use serde_json::Value;

use crate::client::paginated::{PageAdvance, PageOptions, PaginatedStream, PaginationQuery};
use crate::client::Transport;
use crate::{Error, Result};

/// MIME type for CSV uploads and downloads.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// HTTP verb used for updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateVerb {
    /// Full replacement.
    #[default]
    Put,
    /// Partial update.
    Patch,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvExportQuery {
    include_header: bool,
}

/// A thin wrapper over [`Transport`] that every service composes.
///
/// Results are returned as [`serde_json::Value`]; an empty response body
/// becomes [`Value::Null`].
#[derive(Debug, Clone)]
pub struct ResourceClient {
    transport: Arc<Transport>,
}

impl ResourceClient {
    /// Wrap a shared transport.
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// `POST path` with a JSON body.
    pub async fn create<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.transport.post(path, body).await?.unwrap_or(Value::Null))
    }

    /// `POST path` with query parameters and a JSON body.
    pub async fn create_with_query<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<Value>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let value = self.transport.post_with_query(path, query, Some(body)).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// `POST path` without a body, for action endpoints.
    pub async fn action(&self, path: &str) -> Result<Value> {
        Ok(self.transport.post_empty(path).await?.unwrap_or(Value::Null))
    }

    /// `GET path`.
    pub async fn fetch(&self, path: &str) -> Result<Value> {
        Ok(self.transport.get(path).await?.unwrap_or(Value::Null))
    }

    /// `GET path` with query parameters.
    pub async fn fetch_with_query<Q>(&self, path: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let value = self.transport.get_with_query(path, query).await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// `GET path`, expecting a JSON array.
    pub async fn list<Q>(&self, path: &str, query: &Q) -> Result<Vec<Value>>
    where
        Q: Serialize + ?Sized,
    {
        into_items(self.transport.get_with_query(path, query).await?)
    }

    /// `PUT` or `PATCH path` with a JSON body.
    pub async fn update<B>(&self, path: &str, body: &B, verb: UpdateVerb) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let value = match verb {
            UpdateVerb::Put => self.transport.put(path, body).await?,
            UpdateVerb::Patch => self.transport.patch(path, body).await?,
        };
        Ok(value.unwrap_or(Value::Null))
    }

    /// `PUT path` without a body.
    pub async fn touch(&self, path: &str) -> Result<Value> {
        Ok(self.transport.put_empty(path).await?.unwrap_or(Value::Null))
    }

    /// `DELETE path`.
    pub async fn remove(&self, path: &str) -> Result<()> {
        self.transport.delete(path).await?;
        Ok(())
    }

    /// `PUT path` with a CSV body.
    pub async fn upload_csv<Q>(&self, path: &str, query: &Q, csv: Vec<u8>) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let value = self
            .transport
            .put_bytes(path, query, csv, CSV_CONTENT_TYPE, None)
            .await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Gzip `csv` and `PUT` it with `Content-Encoding: gzip`.
    pub async fn upload_gzip<Q>(&self, path: &str, query: &Q, csv: &[u8]) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let compressed = gzip(csv)?;
        let value = self
            .transport
            .put_bytes(path, query, compressed, CSV_CONTENT_TYPE, Some("gzip"))
            .await?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// `GET path` as CSV text.
    pub async fn download_csv(&self, path: &str, include_header: bool) -> Result<String> {
        let query = CsvExportQuery { include_header };
        self.transport
            .get_text(path, &query, CSV_CONTENT_TYPE)
            .await
    }

    /// Lazily page through `path`, merging `limit`/`offset` into `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `options.per_page` is outside
    /// `1..=50`. No request is made in that case.
    pub fn paginate<Q>(
        &self,
        path: impl Into<String>,
        query: Q,
        options: PageOptions,
        advance: PageAdvance,
    ) -> Result<PaginatedStream<Value>>
    where
        Q: Serialize + Send + Sync + 'static,
    {
        let cursor = options.cursor(advance)?;
        let transport = self.transport.clone();
        let path: Arc<str> = Arc::from(path.into());
        let query = Arc::new(query);

        Ok(PaginatedStream::new(cursor, move |page| {
            let transport = transport.clone();
            let path = path.clone();
            let query = query.clone();

            Box::pin(async move {
                let pagination_query = PaginationQuery {
                    limit: page.limit,
                    offset: page.offset,
                    extra: &*query,
                };
                into_items(transport.get_with_query(&path, &pagination_query).await?)
            })
        }))
    }
}

/// Interpret a list response: an array, or nothing.
pub(crate) fn into_items(value: Option<Value>) -> Result<Vec<Value>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::unexpected_payload("a JSON array", &other)),
    }
}

/// Gzip-compress an upload body.
pub(crate) fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Validation(format!("gzip compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| Error::Validation(format!("gzip finalization failed: {e}")))
}
