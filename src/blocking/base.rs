//! Blocking CRUD helpers shared by the blocking services.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::paginated::PageIter;
use super::transport::Transport;
use crate::api::base::{gzip, into_items};
use crate::api::{UpdateVerb, CSV_CONTENT_TYPE};
use crate::client::paginated::{PageAdvance, PageOptions, PageRequest, PaginationQuery};
use crate::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvExportQuery {
    include_header: bool,
}

/// Iterator over JSON items returned by the blocking services.
pub type ValueIter = PageIter<Value, Box<dyn FnMut(PageRequest) -> Result<Vec<Value>> + Send>>;

/// Blocking counterpart of [`crate::api::ResourceClient`].
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
    pub fn create<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        Ok(self.transport.post(path, body)?.unwrap_or(Value::Null))
    }

    /// `POST path` with query parameters and a JSON body.
    pub fn create_with_query<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<Value>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let value = self.transport.post_with_query(path, query, Some(body))?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// `POST path` without a body.
    pub fn action(&self, path: &str) -> Result<Value> {
        Ok(self.transport.post_empty(path)?.unwrap_or(Value::Null))
    }

    /// `GET path`.
    pub fn fetch(&self, path: &str) -> Result<Value> {
        Ok(self.transport.get(path)?.unwrap_or(Value::Null))
    }

    /// `GET path` with query parameters.
    pub fn fetch_with_query<Q>(&self, path: &str, query: &Q) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        Ok(self.transport.get_with_query(path, query)?.unwrap_or(Value::Null))
    }

    /// `GET path`, expecting a JSON array.
    pub fn list<Q>(&self, path: &str, query: &Q) -> Result<Vec<Value>>
    where
        Q: Serialize + ?Sized,
    {
        into_items(self.transport.get_with_query(path, query)?)
    }

    /// `PUT` or `PATCH path` with a JSON body.
    pub fn update<B>(&self, path: &str, body: &B, verb: UpdateVerb) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let value = match verb {
            UpdateVerb::Put => self.transport.put(path, body)?,
            UpdateVerb::Patch => self.transport.patch(path, body)?,
        };
        Ok(value.unwrap_or(Value::Null))
    }

    /// `PUT path` without a body.
    pub fn touch(&self, path: &str) -> Result<Value> {
        Ok(self.transport.put_empty(path)?.unwrap_or(Value::Null))
    }

    /// `DELETE path`.
    pub fn remove(&self, path: &str) -> Result<()> {
        self.transport.delete(path)?;
        Ok(())
    }

    /// `PUT path` with a CSV body.
    pub fn upload_csv<Q>(&self, path: &str, query: &Q, csv: Vec<u8>) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let value = self
            .transport
            .put_bytes(path, query, csv, CSV_CONTENT_TYPE, None)?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// Gzip `csv` and `PUT` it with `Content-Encoding: gzip`.
    pub fn upload_gzip<Q>(&self, path: &str, query: &Q, csv: &[u8]) -> Result<Value>
    where
        Q: Serialize + ?Sized,
    {
        let compressed = gzip(csv)?;
        let value = self
            .transport
            .put_bytes(path, query, compressed, CSV_CONTENT_TYPE, Some("gzip"))?;
        Ok(value.unwrap_or(Value::Null))
    }

    /// `GET path` as CSV text.
    pub fn download_csv(&self, path: &str, include_header: bool) -> Result<String> {
        let query = CsvExportQuery { include_header };
        self.transport.get_text(path, &query, CSV_CONTENT_TYPE)
    }

    /// Lazily page through `path`, merging `limit`/`offset` into `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) if
    /// `options.per_page` is outside `1..=50`. No request is made in that
    /// case.
    pub fn paginate<Q>(
        &self,
        path: impl Into<String>,
        query: Q,
        options: PageOptions,
        advance: PageAdvance,
    ) -> Result<ValueIter>
    where
        Q: Serialize + Send + 'static,
    {
        let cursor = options.cursor(advance)?;
        let transport = self.transport.clone();
        let path = path.into();

        let fetch: Box<dyn FnMut(PageRequest) -> Result<Vec<Value>> + Send> =
            Box::new(move |page| {
                let pagination_query = PaginationQuery {
                    limit: page.limit,
                    offset: page.offset,
                    extra: &query,
                };
                into_items(transport.get_with_query(&path, &pagination_query)?)
            });
        Ok(PageIter::new(cursor, fetch))
    }
}
