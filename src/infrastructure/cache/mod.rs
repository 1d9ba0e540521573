//! Cache infrastructure - Cache implementations

mod factory;
mod in_memory;
mod noop;
mod redis;

pub use factory::{snapshot_ttl, CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCache, InMemoryCacheConfig};
pub use noop::NoopCache;
pub use redis::{RedisCache, RedisCacheConfig};
