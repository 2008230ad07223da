use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Resolved poster URL for a movie id
    Poster(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Poster(movie_id) => write!(f, "poster:{}", movie_id),
        }
    }
}

/// Creates a Redis client for caching
///
/// Opening the client does not connect; connections are made per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
///
/// Every Redis round trip is bounded by `op_timeout`. A read that runs out of
/// time is a miss.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
    op_timeout: Duration,
}

/// Bounds a Redis operation; `None` when it ran out of time
async fn bounded<T>(op_timeout: Duration, op: impl Future<Output = T>) -> Option<T> {
    tokio::time::timeout(op_timeout, op).await.ok()
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer task
    ///
    /// Writes go through a channel so that rendering a page never waits on Redis.
    pub fn new(redis_client: Client, op_timeout: Duration) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, op_timeout, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
            op_timeout,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Drains write messages until shutdown, then flushes what is left
    async fn cache_writer_task(
        client: Client,
        op_timeout: Duration,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes = 0u64;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg, op_timeout).await {
                        failed_writes += 1;
                        tracing::error!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // Senders may still be alive in clones of the cache, so only drain what is queued
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg, op_timeout).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(
        client: &Client,
        msg: CacheWriteMessage,
        op_timeout: Duration,
    ) -> AppResult<()> {
        let key = msg.key.clone();
        let write = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
            Ok::<_, AppError>(())
        };

        bounded(op_timeout, write).await.unwrap_or_else(|| {
            Err(AppError::Internal(format!("Cache write timed out for {}", key)))
        })
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    ///
    /// A Redis that accepts connections but never answers costs at most the
    /// configured timeout and is then treated as a miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let read = async {
            let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
            let cached: Option<String> = conn.get(key.to_string()).await?;
            Ok::<_, AppError>(cached)
        };

        let cached = match bounded(self.op_timeout, read).await {
            Some(result) => result?,
            None => {
                tracing::warn!(
                    key = %key,
                    timeout_ms = self.op_timeout.as_millis() as u64,
                    "Cache read timed out, treating as miss"
                );
                return Ok(None);
            }
        };

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a write without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    // Nothing listens on port 1, so every connection attempt is refused
    const UNREACHABLE_REDIS: &str = "redis://127.0.0.1:1";

    const OP_TIMEOUT: Duration = Duration::from_millis(100);

    #[test]
    fn test_cache_key_display_poster() {
        let key = CacheKey::Poster(27205);
        assert_eq!(key.to_string(), "poster:27205");
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert_err!(create_redis_client("not a url"));
        assert_ok!(create_redis_client(UNREACHABLE_REDIS));
    }

    #[tokio::test]
    async fn test_unreachable_cache_read_is_an_error() {
        let client = create_redis_client(UNREACHABLE_REDIS).unwrap();
        let (cache, handle) = Cache::new(client, OP_TIMEOUT);

        let result: AppResult<Option<String>> = cache.get_from_cache(&CacheKey::Poster(1)).await;

        assert!(matches!(result, Err(AppError::Cache(_))));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_cached_macro_falls_through_on_unreachable_cache() {
        let client = create_redis_client(UNREACHABLE_REDIS).unwrap();
        let (cache, handle) = Cache::new(client, OP_TIMEOUT);
        let key = CacheKey::Poster(42);

        let value: AppResult<String> = crate::cached!(cache, key, 60, async {
            Ok::<_, AppError>("https://image.example/p.jpg".to_string())
        });

        assert_eq!(assert_ok!(value), "https://image.example/p.jpg");
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_cached_macro_propagates_block_errors() {
        let client = create_redis_client(UNREACHABLE_REDIS).unwrap();
        let (cache, handle) = Cache::new(client, OP_TIMEOUT);
        let key = CacheKey::Poster(7);

        let value: AppResult<String> = crate::cached!(cache, key, 60, async {
            Err::<String, _>(AppError::PosterUnavailable(7))
        });

        assert!(matches!(value, Err(AppError::PosterUnavailable(7))));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_silent_redis_read_times_out_as_miss() {
        // Accepts TCP connections through the backlog but never speaks RESP
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = create_redis_client(&format!("redis://{}", addr)).unwrap();
        let (cache, handle) = Cache::new(client, OP_TIMEOUT);

        let started = std::time::Instant::now();
        let result: AppResult<Option<String>> = cache.get_from_cache(&CacheKey::Poster(3)).await;

        assert_eq!(assert_ok!(result), None);
        assert!(started.elapsed() < Duration::from_secs(2));
        handle.shutdown().await;
        drop(listener);
    }

    #[tokio::test]
    async fn test_silent_redis_does_not_stall_cached_lookup() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = create_redis_client(&format!("redis://{}", addr)).unwrap();
        let (cache, handle) = Cache::new(client, OP_TIMEOUT);
        let key = CacheKey::Poster(9);

        let started = std::time::Instant::now();
        let value: AppResult<String> = crate::cached!(cache, key, 60, async {
            Ok::<_, AppError>("https://image.example/9.jpg".to_string())
        });

        assert_eq!(assert_ok!(value), "https://image.example/9.jpg");
        assert!(started.elapsed() < Duration::from_secs(2));
        handle.shutdown().await;
        drop(listener);
    }
}
