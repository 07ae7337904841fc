pub mod cache;

pub use cache::{Cache, CacheError, RedisCache};
