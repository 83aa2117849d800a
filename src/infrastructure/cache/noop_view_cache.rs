use async_trait::async_trait;

use crate::domain::invoice::ports::{CacheError, CachedView, ViewCache};

/// No-operation view cache
/// Used when caching is disabled: every read misses and revalidation does nothing
pub struct NoOpViewCache;

impl NoOpViewCache {
  pub fn new() -> Self {
    Self
  }
}

impl Default for NoOpViewCache {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ViewCache for NoOpViewCache {
  async fn lookup(&self, _path: &str) -> Result<CachedView, CacheError> {
    Ok(CachedView::Miss { generation: 0 })
  }

  async fn put(&self, path: &str, _generation: u64, _body: &str) -> Result<(), CacheError> {
    tracing::debug!("NoOpViewCache: Not caching {} (cache disabled)", path);
    Ok(())
  }

  async fn revalidate(&self, path: &str) -> Result<(), CacheError> {
    tracing::debug!("NoOpViewCache: Skipping revalidation of {} (cache disabled)", path);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_noop_cache_never_hits() {
    let cache = NoOpViewCache::new();
    cache
      .put("/dashboard/invoices", 0, "<html></html>")
      .await
      .unwrap();
    assert_eq!(
      cache.lookup("/dashboard/invoices").await.unwrap(),
      CachedView::Miss { generation: 0 }
    );
    assert!(cache.revalidate("/dashboard/invoices").await.is_ok());
  }
}
