use redis::AsyncCommands;
use redis::Client;

use crate::{db::KeyValueStore, error::AppResult};

/// Creates a Redis client for caching
///
/// The client connects lazily; nothing touches the network until the first
/// command.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key/value store on a Redis server
///
/// Keys are written without a server-side TTL. Entries expire lazily in the
/// release cache, so stale values stay until the next overwrite.
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
    prefix: String,
}

impl RedisStore {
    pub fn new(redis_client: Client) -> Self {
        Self {
            redis_client,
            prefix: "cinepick:".to_string(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(self.namespaced(key)).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis get failed");
            e
        })?;
        Ok(cached)
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn
            .set(self.namespaced(key), value)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis set failed");
                e
            })?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
