use async_trait::async_trait;
use thiserror::Error;

use super::entities::Invoice;
use super::errors::InvoiceError;
use super::form::InvoiceFields;
use super::value_objects::InvoiceId;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  /// Rewrites customer, amount and status. Returns the number of rows matched.
  async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<u64, InvoiceError>;
  /// Hard delete. Returns the number of rows removed.
  async fn delete(&self, id: &InvoiceId) -> Result<u64, InvoiceError>;
  async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceError>;
  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError>;
}

#[derive(Debug, Error)]
pub enum CacheError {
  #[error("Cache backend error: {0}")]
  Backend(String),
}

/// Result of looking a view up in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedView {
  Hit(String),
  /// Nothing fresh is stored. A body rendered from data read after this
  /// lookup may be stored under `generation`.
  Miss { generation: u64 },
}

/// Rendered views keyed by their logical path.
///
/// Every path has a generation that `revalidate` advances. Bodies are stored
/// per generation, so a render that raced a revalidation is never served.
#[async_trait]
pub trait ViewCache: Send + Sync {
  async fn lookup(&self, path: &str) -> Result<CachedView, CacheError>;
  async fn put(&self, path: &str, generation: u64, body: &str) -> Result<(), CacheError>;
  /// Marks the view at `path` stale so the next read renders it again.
  async fn revalidate(&self, path: &str) -> Result<(), CacheError>;
}

/// Where the caller should be sent once a form flow completes
pub trait Navigator: Send + Sync {
  fn redirect(&self, location: &str);
}
