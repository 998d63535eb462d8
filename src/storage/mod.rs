//! Per-conversation message logs
//!
//! [`MessageLogStore`] owns the read-modify-write cycle for each conversation
//! and serializes appends per conversation id. The actual persistence sits
//! behind [`RowStore`], a plain find/upsert table keyed by conversation id.

pub mod codec;
pub mod memory;
pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::models::Entry;
use crate::errors::BotError;

pub use memory::MemoryRowStore;
pub use postgres::PostgresRowStore;
pub use sqlite::SqliteRowStore;

/// Key-value table of `{conversation_id (unique), blob}` rows.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn find(&self, conversation_id: &str) -> Result<Option<String>, BotError>;

    /// Creates the row if absent, otherwise overwrites its blob.
    async fn upsert(&self, conversation_id: &str, blob: &str) -> Result<(), BotError>;

    /// Releases connections. Further calls may fail.
    async fn close(&self) {}
}

/// Database server a `DATABASE_URL` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    /// Picks the backend from the URL scheme, ignoring any `+driver` suffix.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` for unsupported databases.
    pub fn from_url(database_url: &str) -> Result<Self, BotError> {
        let url = database_url.trim();
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme.split('+').next().unwrap_or_default() {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            _ => Err(BotError::ConfigError(format!(
                "DATABASE_URL: unsupported database '{url}', expected sqlite or postgres"
            ))),
        }
    }
}

/// Opens the row store `database_url` names.
///
/// # Errors
///
/// Returns `BotError::ConfigError` for unsupported URLs and
/// `BotError::StoreError` if the database cannot be opened.
pub async fn connect_row_store(database_url: &str) -> Result<Box<dyn RowStore>, BotError> {
    let backend = Backend::from_url(database_url)?;
    info!("Opening {:?} message store", backend);
    let rows: Box<dyn RowStore> = match backend {
        Backend::Sqlite => Box::new(SqliteRowStore::connect(database_url).await?),
        Backend::Postgres => Box::new(PostgresRowStore::connect(database_url).await?),
    };
    Ok(rows)
}

pub struct MessageLogStore {
    rows: Box<dyn RowStore>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MessageLogStore {
    pub fn new<R: RowStore + 'static>(rows: R) -> Self {
        Self::from_boxed(Box::new(rows))
    }

    #[must_use]
    pub fn from_boxed(rows: Box<dyn RowStore>) -> Self {
        Self {
            rows,
            locks: DashMap::new(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &dyn RowStore {
        self.rows.as_ref()
    }

    fn lock_for(&self, conversation_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }

    /// Appends `entry` to the conversation's log, creating the log if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying row store fails.
    pub async fn append(&self, conversation_id: &str, entry: Entry) -> Result<(), BotError> {
        let lock = self.lock_for(conversation_id);
        let _guard = lock.lock().await;

        let mut entries = match self.rows.find(conversation_id).await? {
            Some(blob) => codec::try_decode(&blob).unwrap_or_else(|e| {
                warn!(
                    "Starting a fresh log for chat_id={} after decode failure: {}",
                    conversation_id, e
                );
                Vec::new()
            }),
            None => {
                info!("Creating message log for chat_id={}", conversation_id);
                Vec::new()
            }
        };
        entries.push(entry);

        let blob = codec::encode(&entries);
        self.rows.upsert(conversation_id, &blob).await?;
        debug!(
            "Stored {} entries ({} bytes) for chat_id={}",
            entries.len(),
            blob.len(),
            conversation_id
        );
        Ok(())
    }

    /// Returns the conversation's entries, or `None` if nothing was ever logged.
    ///
    /// A stored blob that cannot be decoded reads as an empty log.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying row store fails.
    pub async fn get(&self, conversation_id: &str) -> Result<Option<Vec<Entry>>, BotError> {
        let Some(blob) = self.rows.find(conversation_id).await? else {
            return Ok(None);
        };

        match codec::try_decode(&blob) {
            Ok(entries) => Ok(Some(entries)),
            Err(e) => {
                warn!("Unreadable message log for chat_id={}: {}", conversation_id, e);
                Ok(Some(Vec::new()))
            }
        }
    }

    pub async fn close(&self) {
        self.rows.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_without_append_is_absent() {
        let store = MessageLogStore::new(MemoryRowStore::new());
        assert_eq!(store.get("1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_append_then_get() {
        let store = MessageLogStore::new(MemoryRowStore::new());
        store
            .append("1", Entry::new("1", "doc_robotnik", "emeralds"))
            .await
            .unwrap();
        store
            .append("1", Entry::new("2", "sonic", "rings"))
            .await
            .unwrap();

        let entries = store.get("1").await.unwrap().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "emeralds");
        assert_eq!(entries[1].username, "sonic");
        assert_eq!(
            store.rows().find("1").await.unwrap().unwrap(),
            "1:doc_robotnik:emeralds\r\n2:sonic:rings\r\n"
        );
    }

    #[tokio::test]
    async fn test_corrupt_blob_reads_as_empty_and_is_replaced() {
        let rows = MemoryRowStore::new();
        rows.upsert("1", "\"broken").await.unwrap();
        let store = MessageLogStore::new(rows);

        assert_eq!(store.get("1").await.unwrap(), Some(Vec::new()));

        store
            .append("1", Entry::new("1", "doc_robotnik", "emeralds"))
            .await
            .unwrap();
        assert_eq!(
            store.get("1").await.unwrap(),
            Some(vec![Entry::new("1", "doc_robotnik", "emeralds")])
        );
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(Backend::from_url("sqlite:///:memory:").unwrap(), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert_eq!(
            Backend::from_url("postgres://localhost/tldr").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("postgresql+psycopg2://localhost/tldr").unwrap(),
            Backend::Postgres
        );
        assert!(matches!(
            Backend::from_url("mysql://localhost/tldr"),
            Err(BotError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_row_store_opens_sqlite() {
        let rows = connect_row_store("sqlite:///:memory:").await.unwrap();
        let store = MessageLogStore::from_boxed(rows);
        store.append("1", Entry::new("1", "sonic", "rings")).await.unwrap();
        assert_eq!(store.get("1").await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_row_store_rejects_unknown_scheme() {
        assert!(connect_row_store("mysql://localhost/tldr").await.is_err());
    }

    #[tokio::test]
    async fn test_conversations_are_independent() {
        let store = MessageLogStore::new(MemoryRowStore::new());
        store.append("a", Entry::new("1", "u", "for a")).await.unwrap();
        assert_eq!(store.get("b").await.unwrap(), None);
        assert_eq!(store.get("a").await.unwrap().unwrap().len(), 1);
    }
}
