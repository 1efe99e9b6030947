//! `bb8` pool of `diesel-async` PostgreSQL connections.
//!
//! Sizing follows the reminder scan: every in-flight delivery holds one
//! connection while it reads the child, guardian and log, so the pool is
//! sized from the scan concurrency plus headroom for HTTP requests. Checkout
//! failures surface as [`PoolError`] and each repository maps them to its own
//! connection variant.

use std::fmt;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use reqwest::Url;
use tracing::info;

/// Connections kept for HTTP traffic on top of the scan's share.
pub const HTTP_CONNECTION_HEADROOM: u32 = 4;
/// Smallest pool built, whatever the scan concurrency.
pub const MIN_POOL_SIZE: u32 = 10;

/// Errors raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool sizing and checkout timeout.
///
/// `Debug` masks the password in the database URL.
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: [`MIN_POOL_SIZE`] connections, 2 idle, 30 second checkout
    /// timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: MIN_POOL_SIZE,
            min_idle: Some(2),
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// A pool large enough for `scan_concurrency` deliveries plus
    /// [`HTTP_CONNECTION_HEADROOM`], never below [`MIN_POOL_SIZE`].
    ///
    /// # Examples
    /// ```
    /// use immunisation::outbound::persistence::PoolConfig;
    ///
    /// let config = PoolConfig::for_reminder_scan("postgres://localhost/immunisation", 12);
    /// assert_eq!(config.max_size(), 16);
    /// ```
    pub fn for_reminder_scan(database_url: impl Into<String>, scan_concurrency: usize) -> Self {
        let scan = u32::try_from(scan_concurrency).unwrap_or(u32::MAX);
        let max_size = scan
            .saturating_add(HTTP_CONNECTION_HEADROOM)
            .max(MIN_POOL_SIZE);
        Self::new(database_url).with_max_size(max_size)
    }

    /// Override the pool size; the idle floor is capped to match.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self.min_idle = self.min_idle.map(|idle| idle.min(max_size));
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    fn redacted_url(&self) -> String {
        match Url::parse(&self.database_url) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("***"));
                url.to_string()
            }
            Ok(url) => url.to_string(),
            Err(_) => "<unparseable>".to_owned(),
        }
    }
}

impl fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("database_url", &self.redacted_url())
            .field("max_size", &self.max_size)
            .field("min_idle", &self.min_idle)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

/// Shared handle to the connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL is invalid or the initial
    /// idle connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        info!(
            database = %config.redacted_url(),
            max_size = config.max_size,
            "database pool ready"
        );
        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when no connection is available within
    /// the configured timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn defaults_match_the_minimum_pool() {
        let config = PoolConfig::new("postgres://localhost/immunisation");

        assert_eq!(config.database_url(), "postgres://localhost/immunisation");
        assert_eq!(config.max_size, MIN_POOL_SIZE);
        assert_eq!(config.min_idle, Some(2));
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
    }

    #[rstest]
    #[case(1, MIN_POOL_SIZE)]
    #[case(4, MIN_POOL_SIZE)]
    #[case(12, 16)]
    #[case(usize::MAX, u32::MAX)]
    fn pool_grows_with_scan_concurrency(#[case] concurrency: usize, #[case] expected: u32) {
        let config = PoolConfig::for_reminder_scan("postgres://localhost/immunisation", concurrency);

        assert_eq!(config.max_size(), expected);
    }

    #[rstest]
    fn small_pools_cap_the_idle_floor() {
        let config = PoolConfig::new("postgres://localhost/immunisation").with_max_size(1);

        assert_eq!(config.max_size(), 1);
        assert_eq!(config.min_idle, Some(1));
    }

    #[rstest]
    #[case("postgres://svc:hunter2@db:5432/immunisation", "postgres://svc:***@db:5432/immunisation")]
    #[case("postgres://db/immunisation", "postgres://db/immunisation")]
    #[case("not a url", "<unparseable>")]
    fn debug_output_masks_the_password(#[case] url: &str, #[case] shown: &str) {
        let rendered = format!("{:?}", PoolConfig::new(url));

        assert!(rendered.contains(shown), "{rendered}");
        assert!(!rendered.contains("hunter2"));
    }
}
