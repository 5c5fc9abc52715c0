#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use sqlx::sqlite;
use std::{str::FromStr, time::Duration};
use tokio::try_join;

pub mod config;
mod r#impl;
mod sql;
mod types;

use config::SqliteConfig;

/// A SQLite-backed record store.
///
/// Reads go through `reader`, writes through `writer`, which holds a single
/// connection so that writes are serialized. An in-memory database lives
/// inside one connection, so in that case both fields share the same
/// single-connection pool.
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open (and migrate) the configured database.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection fails or a migration does not apply.
    pub async fn open(config: &SqliteConfig) -> Result<Self, sqlx::Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true)
                .journal_mode(sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("temp_store", "memory")
                .create_if_missing(!config.must_exist);

        let (reader, writer) = if db_path.is_some() {
            let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
            let writer = sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options);
            try_join!(reader, writer)?
        } else {
            // Dropping the connection drops the database
            let pool = sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            (pool.clone(), pool)
        };

        sqlx::migrate!("./schema").run(&writer).await?;

        tracing::event!(
            tracing::Level::DEBUG,
            path = db_path.as_deref().unwrap_or(":memory:"),
            "opened database"
        );

        Ok(Self { reader, writer })
    }
}
