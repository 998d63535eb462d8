//! SQLite row store.
//!
//! One `messages` row per conversation. An in-memory database is pinned to a
//! single pooled connection that never expires, since every SQLite connection
//! to `:memory:` opens its own private database.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::RowStore;
use crate::errors::BotError;

const MAX_CONNECTIONS: u32 = 8;
const MEMORY_URL: &str = "sqlite::memory:";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS messages (
    chat_id TEXT PRIMARY KEY NOT NULL,
    text TEXT NOT NULL
)";

#[derive(Clone)]
pub struct SqliteRowStore {
    pool: SqlitePool,
}

impl SqliteRowStore {
    /// Opens (creating if needed) the database and the `messages` table.
    ///
    /// Accepts both SQLAlchemy-style (`sqlite:///:memory:`, `sqlite:///tldr.db`)
    /// and sqlx-style (`sqlite::memory:`, `sqlite://tldr.db`) URLs.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` for non-SQLite URLs and
    /// `BotError::StoreError` if the database cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, BotError> {
        let url = normalize_database_url(database_url)?;
        let in_memory = is_in_memory(&url);

        let mut options = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        info!(in_memory, "Connected message store");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RowStore for SqliteRowStore {
    async fn find(&self, conversation_id: &str) -> Result<Option<String>, BotError> {
        let row = sqlx::query("SELECT text FROM messages WHERE chat_id = ?")
            .bind(conversation_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("text")?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, conversation_id: &str, blob: &str) -> Result<(), BotError> {
        sqlx::query(
            r#"INSERT INTO messages (chat_id, text) VALUES (?, ?)
               ON CONFLICT (chat_id) DO UPDATE SET text = excluded.text"#,
        )
        .bind(conversation_id)
        .bind(blob)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed message store");
    }
}

/// Maps a `DATABASE_URL` onto the form sqlx understands.
///
/// `sqlite:///<path>` follows SQLAlchemy: three slashes precede a relative
/// path, four an absolute one.
///
/// # Errors
///
/// Returns `BotError::ConfigError` for any scheme other than `sqlite`.
pub fn normalize_database_url(database_url: &str) -> Result<String, BotError> {
    let url = database_url.trim();
    if !url.starts_with("sqlite:") {
        return Err(BotError::ConfigError(format!(
            "DATABASE_URL: unsupported database '{url}', only sqlite is available"
        )));
    }

    if let Some(path) = url.strip_prefix("sqlite:///") {
        return Ok(match path {
            "" | ":memory:" => MEMORY_URL.to_string(),
            _ => format!("sqlite://{path}"),
        });
    }

    match url {
        "sqlite:" | "sqlite://" | "sqlite://:memory:" => Ok(MEMORY_URL.to_string()),
        _ => Ok(url.to_string()),
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sqlalchemy_urls() {
        assert_eq!(normalize_database_url("sqlite:///:memory:").unwrap(), "sqlite::memory:");
        assert_eq!(normalize_database_url("sqlite://").unwrap(), "sqlite::memory:");
        assert_eq!(normalize_database_url("sqlite:///tldr.db").unwrap(), "sqlite://tldr.db");
        assert_eq!(
            normalize_database_url("sqlite:////var/lib/tldr.db").unwrap(),
            "sqlite:///var/lib/tldr.db"
        );
    }

    #[test]
    fn test_normalize_keeps_sqlx_urls() {
        assert_eq!(normalize_database_url("sqlite::memory:").unwrap(), "sqlite::memory:");
        assert_eq!(normalize_database_url("sqlite://tldr.db?mode=rwc").unwrap(), "sqlite://tldr.db?mode=rwc");
    }

    #[test]
    fn test_normalize_rejects_other_databases() {
        let err = normalize_database_url("postgres://localhost/tldr").unwrap_err();
        assert!(matches!(err, BotError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_find_missing_row() {
        let store = SqliteRowStore::connect("sqlite:///:memory:").await.unwrap();
        assert_eq!(store.find("1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_creates_then_overwrites() {
        let store = SqliteRowStore::connect("sqlite::memory:").await.unwrap();
        store.upsert("1", "1:doc_robotnik:emeralds\r\n").await.unwrap();
        assert_eq!(
            store.find("1").await.unwrap().as_deref(),
            Some("1:doc_robotnik:emeralds\r\n")
        );

        store.upsert("1", "replaced").await.unwrap();
        assert_eq!(store.find("1").await.unwrap().as_deref(), Some("replaced"));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        // absolute path, so four slashes in SQLAlchemy form
        let url = format!("sqlite:///{}", dir.path().join("tldr.db").display());

        let store = SqliteRowStore::connect(&url).await.unwrap();
        store.upsert("42", "7:amy:hello\r\n").await.unwrap();
        store.close().await;

        let reopened = SqliteRowStore::connect(&url).await.unwrap();
        assert_eq!(reopened.find("42").await.unwrap().as_deref(), Some("7:amy:hello\r\n"));
    }
}
