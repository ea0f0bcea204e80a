use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{Result, SchoolSystemError};

declare_object_cache_plugin!("redis", RedisObjectCache);

// SCAN 每批数量
const SCAN_BATCH: usize = 500;

pub struct RedisObjectCache {
    conn: MultiplexedConnection,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub async fn connect() -> Result<Self> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str()).map_err(|e| {
            SchoolSystemError::cache_connection(format!("Invalid Redis URL: {e}"))
        })?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| SchoolSystemError::cache_connection(format!("Redis connect failed: {e}")))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| SchoolSystemError::cache_connection(format!("Redis ping failed: {e}")))?;
        debug!(
            "Redis cache ready ({}), prefix '{}', default ttl {}s",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            conn,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Failed to insert key '{}': {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, i64>(self.make_key(key)).await {
            error!("Failed to remove key '{}': {}", key, e);
        }
    }

    // 只清理本应用前缀下的键
    async fn invalidate_all(&self) {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(result) => result,
                Err(e) => {
                    error!("Failed to scan keys with prefix '{}': {}", self.key_prefix, e);
                    return;
                }
            };
            if !keys.is_empty()
                && let Err(e) = conn.del::<_, i64>(keys).await
            {
                error!("Failed to delete scanned keys: {}", e);
                return;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
    }
}
