pub mod noop_view_cache;
pub mod redis_view_cache;

pub use noop_view_cache::NoOpViewCache;
pub use redis_view_cache::RedisViewCache;
