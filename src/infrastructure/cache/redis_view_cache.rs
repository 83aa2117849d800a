use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::invoice::ports::{CacheError, CachedView, ViewCache};

const KEY_PREFIX: &str = "view:";
const GENERATION_PREFIX: &str = "view:gen:";

impl From<redis::RedisError> for CacheError {
  fn from(error: redis::RedisError) -> Self {
    CacheError::Backend(error.to_string())
  }
}

/// Redis-backed cache of rendered views.
///
/// `view:gen:{path}` holds the path's generation (absent means 0) and
/// `view:{path}:{generation}` the body rendered for it, with a TTL.
/// Revalidating increments the generation, so a render that read the
/// database before the write lands under a key nobody looks up again.
pub struct RedisViewCache {
  redis: ConnectionManager,
  ttl_seconds: u64,
}

impl RedisViewCache {
  pub fn new(redis: ConnectionManager, ttl_seconds: u64) -> Self {
    Self { redis, ttl_seconds }
  }

  fn generation_key(path: &str) -> String {
    format!("{}{}", GENERATION_PREFIX, path)
  }

  fn body_key(path: &str, generation: u64) -> String {
    format!("{}{}:{}", KEY_PREFIX, path, generation)
  }
}

#[async_trait]
impl ViewCache for RedisViewCache {
  async fn lookup(&self, path: &str) -> Result<CachedView, CacheError> {
    let mut conn = self.redis.clone();
    let generation: Option<u64> = conn.get(Self::generation_key(path)).await?;
    let generation = generation.unwrap_or(0);

    let body: Option<String> = conn.get(Self::body_key(path, generation)).await?;
    Ok(match body {
      Some(body) => CachedView::Hit(body),
      None => CachedView::Miss { generation },
    })
  }

  async fn put(&self, path: &str, generation: u64, body: &str) -> Result<(), CacheError> {
    let mut conn = self.redis.clone();
    let _: () = conn
      .set_ex(Self::body_key(path, generation), body, self.ttl_seconds)
      .await?;
    Ok(())
  }

  async fn revalidate(&self, path: &str) -> Result<(), CacheError> {
    let mut conn = self.redis.clone();
    let generation: u64 = conn.incr(Self::generation_key(path), 1).await?;
    // The previous body is unreachable now; drop it instead of waiting for the TTL
    let removed: u64 = conn.del(Self::body_key(path, generation - 1)).await?;
    tracing::debug!(path, generation, removed, "Revalidated cached view");
    Ok(())
  }
}
