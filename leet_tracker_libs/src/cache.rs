use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::time::{timeout, Duration};

type Result<T> = std::result::Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to reach the cache backend")]
    Backend(#[from] redis::RedisError),
    #[error("cache operation timed out")]
    Timeout,
    #[error("failed to serialize value for caching")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to deserialize cached payload")]
    Deserialize(#[source] serde_json::Error),
}

/// Key/value cache with per-key expiry. Values are serialized to JSON on
/// write and deserialized on read; a miss is a distinct outcome, not an
/// error.
#[async_trait]
pub trait Cache {
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send;

    /// A zero `ttl` stores the value without expiry.
    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + Send + Sync;

    /// Overwrites the key with an empty payload so the next `get` misses.
    async fn invalidate(&self, key: &str) -> Result<()>;
}

/// Decodes a raw cached payload. An absent, empty, or `null` payload is a
/// miss: invalidation stores an empty payload, so an evicted key reads the
/// same as an expired one.
pub fn decode_payload<T>(payload: Option<Vec<u8>>) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let payload = match payload {
        Some(payload) if !payload.is_empty() && payload.as_slice() != b"null" => payload,
        _ => return Ok(None),
    };
    let value = serde_json::from_slice(&payload).map_err(CacheError::Deserialize)?;
    Ok(Some(value))
}

pub struct RedisCache {
    conn: ConnectionManager,
    deadline: Duration,
}

impl RedisCache {
    /// - deadline: per-command budget; a read that exceeds it is a miss.
    pub async fn connect(url: &str, deadline: Duration) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_tokio_connection_manager().await?;

        Ok(Self { conn, deadline })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut conn = self.conn.clone();
        let payload: Option<Vec<u8>> = match timeout(self.deadline, conn.get(key)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::debug!("cache read for key {} timed out", key);
                return Ok(None);
            }
        };

        decode_payload(payload)
    }

    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let payload = serde_json::to_vec(value).map_err(CacheError::Serialize)?;
        let mut conn = self.conn.clone();
        let write = async {
            if ttl.is_zero() {
                conn.set::<_, _, ()>(key, payload).await
            } else {
                conn.set_ex::<_, _, ()>(key, payload, ttl.as_secs() as usize)
                    .await
            }
        };

        match timeout(self.deadline, write).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(CacheError::Timeout),
        }
    }

    async fn invalidate(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let write = conn.set::<_, _, ()>(key, Vec::<u8>::new());

        match timeout(self.deadline, write).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(CacheError::Timeout),
        }
    }
}
