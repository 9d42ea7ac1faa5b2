//! Process-wide Postgres pool, created once at startup.
use std::{future::Future, pin::Pin, str::FromStr};

use sqlx::{
    PgPool, Postgres, Transaction,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{
    config::Config,
    db::retry::{RetryPolicy, with_retry},
    errors::AppError,
};

pub type TxFuture<'t, T> = Pin<Box<dyn Future<Output = Result<T, sqlx::Error>> + Send + 't>>;

pub struct Database {
    pool: Option<PgPool>,
    retry: RetryPolicy,
}

impl Database {
    /// Tries to connect once. A failure is logged and leaves the handle
    /// disconnected for the lifetime of the process.
    pub async fn connect(config: &Config) -> Self {
        let retry = RetryPolicy::with_max_attempts(config.retry_max_attempts);

        match create_pool(config).await {
            Ok(pool) => {
                tracing::info!(
                    "Connected to database '{}' at {}",
                    config.database_name,
                    redact(&config.database_endpoint)
                );
                Self {
                    pool: Some(pool),
                    retry,
                }
            }
            Err(e) => {
                tracing::error!("Database connection error: {}", e);
                Self { pool: None, retry }
            }
        }
    }

    pub fn disconnected() -> Self {
        Self {
            pool: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    pub fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool.as_ref().ok_or(AppError::NotConnected)
    }

    /// Runs `op` inside a transaction and commits, re-running the whole
    /// unit on transient failures. An error drops the transaction, which
    /// rolls it back.
    pub async fn run_in_transaction<T, F>(&self, op: F) -> Result<T, sqlx::Error>
    where
        T: Send,
        F: for<'t> Fn(&'t mut Transaction<'static, Postgres>) -> TxFuture<'t, T> + Sync,
    {
        let pool = match self.pool.as_ref() {
            Some(pool) => pool,
            None => return Err(sqlx::Error::PoolClosed),
        };
        let op = &op;

        with_retry(&self.retry, move || async move {
            let mut tx = pool.begin().await?;
            let value = op(&mut tx).await?;
            tx.commit().await?;
            Ok::<T, sqlx::Error>(value)
        })
        .await
    }
}

async fn create_pool(config: &Config) -> Result<PgPool, String> {
    let options = PgConnectOptions::from_str(&config.database_endpoint)
        .map_err(|e| format!("invalid database endpoint: {e}"))?
        .database(&config.database_name);

    let connect = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options);

    match tokio::time::timeout(config.connect_timeout, connect).await {
        Ok(Ok(pool)) => Ok(pool),
        Ok(Err(e)) => Err(format!("postgres connect error: {e}")),
        Err(_) => Err(format!(
            "postgres connect timed out after {:?}",
            config.connect_timeout
        )),
    }
}

/// Strips credentials from an endpoint URL before it is logged.
fn redact(endpoint: &str) -> String {
    match (endpoint.find("://"), endpoint.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &endpoint[..scheme_end], &endpoint[at + 1..])
        }
        _ => endpoint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn redacts_credentials() {
        assert_eq!(
            redact("postgres://user:secret@db:5432"),
            "postgres://***@db:5432"
        );
        assert_eq!(redact("postgres://db:5432"), "postgres://db:5432");
    }

    #[tokio::test]
    async fn disconnected_handle_fails_fast() {
        let db = Database::disconnected();
        assert!(!db.is_connected());
        assert!(matches!(db.pool(), Err(AppError::NotConnected)));
    }

    #[tokio::test]
    async fn bad_endpoint_degrades_instead_of_panicking() {
        let config = Config {
            database_endpoint: "not a url".into(),
            connect_timeout: Duration::from_millis(200),
            ..Config::from_lookup(|_| None)
        };
        let db = Database::connect(&config).await;
        assert!(!db.is_connected());
    }
}
