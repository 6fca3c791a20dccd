//! Redis client with retry logic
//!
//! Wraps a multiplexed connection and retries transient failures with
//! exponential backoff. Each command attempt is bounded by the configured
//! response timeout. Every operation used by the revocation store lives
//! here: set with expiry, get, exists, delete and cursor scan.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use atlas_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Base delay between retries in milliseconds
const RETRY_BASE_DELAY_MS: u64 = 50;
/// Backoff never waits longer than this between attempts
const RETRY_MAX_DELAY_MS: u64 = 5000;

/// Redis client with retry logic
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    response_timeout: Duration,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the given configuration
    pub async fn new(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        Self::new_with_retry_config(config, config.max_retries.max(1), RETRY_BASE_DELAY_MS).await
    }

    pub async fn new_with_retry_config(
        config: &CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            Duration::from_secs(config.connection_timeout),
            max_retries,
            retry_delay_ms,
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            response_timeout: Duration::from_secs(config.response_timeout.max(1)),
            max_retries,
            retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        connect_timeout: Duration,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await
            {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::Timeout(format!(
                    "connect timed out after {}s",
                    connect_timeout.as_secs()
                ))),
            };

            match outcome {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        attempt = attempts,
                        max_retries,
                        retry_in_ms = delay,
                        error = %e,
                        "Failed to connect to Redis"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(RETRY_MAX_DELAY_MS);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Giving up connecting to Redis");
                    return Err(e);
                }
            }
        }
    }

    /// Set a value with expiration time
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!(key, error = %e, "Failed to set key");
            e
        })
    }

    /// Get a value; `None` when absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!(key, error = %e, "Failed to get key");
            e
        })
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(|e| {
            error!(key, error = %e, "Failed to check key existence");
            e
        })
    }

    /// Delete a key
    ///
    /// # Returns
    /// `true` when this call removed the key (DEL reported one deletion)
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        // A DEL that reached the server must not be replayed: the retry would
        // report 0 and turn a successful redemption into a reuse.
        let mut conn = self.connection.clone();
        self.with_response_timeout("DEL", conn.del::<_, u32>(key))
            .await
            .map(|deleted| deleted > 0)
            .map_err(|e| {
                error!(key, error = %e, "Failed to delete key");
                e
            })
    }

    /// One SCAN page over keys matching `pattern`
    pub async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), InfrastructureError> {
        self.execute_with_retry(|mut conn| {
            let pattern = pattern.to_string();
            Box::pin(async move {
                redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(pattern)
                    .arg("COUNT")
                    .arg(count)
                    .query_async::<_, (u64, Vec<String>)>(&mut conn)
                    .await
            })
        })
        .await
        .map_err(|e| {
            error!(cursor, pattern, error = %e, "Failed to scan keys");
            e
        })
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response != "PONG" {
            warn!(response = %response, "Redis health check returned unexpected response");
        }
        Ok(response == "PONG")
    }

    /// Run one command attempt under the response timeout
    async fn with_response_timeout<T>(
        &self,
        command: &'static str,
        fut: impl Future<Output = RedisResult<T>>,
    ) -> Result<T, InfrastructureError> {
        match timeout(self.response_timeout, fut).await {
            Ok(result) => result.map_err(InfrastructureError::Cache),
            Err(_) => Err(InfrastructureError::Timeout(format!(
                "{} got no response within {}s",
                command,
                self.response_timeout.as_secs()
            ))),
        }
    }

    /// Retries transient errors; a timed out attempt is not retried since the
    /// command may already have been applied
    async fn execute_with_retry<F, T>(&self, operation: F) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> std::pin::Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match self.with_response_timeout("command", operation(conn)).await {
                Ok(result) => return Ok(result),
                Err(InfrastructureError::Cache(e))
                    if attempts < self.max_retries && is_retriable_error(&e) =>
                {
                    warn!(
                        attempt = attempts,
                        max_retries = self.max_retries,
                        retry_in_ms = delay,
                        error = %e,
                        "Redis operation failed, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(RETRY_MAX_DELAY_MS);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Transient failures worth another attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.find('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
