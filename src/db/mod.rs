pub mod cache;
pub mod file_store;
pub mod redis;
pub mod store;

mod macros;

pub use cache::{CacheKey, ReleaseCache};
pub use file_store::FileStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use store::{KeyValueStore, MemoryStore};
