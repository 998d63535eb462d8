use async_trait::async_trait;
use dashmap::DashMap;

use super::RowStore;
use crate::errors::BotError;

/// Process-local row store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: DashMap<String, String>,
}

impl MemoryRowStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn find(&self, conversation_id: &str) -> Result<Option<String>, BotError> {
        Ok(self.rows.get(conversation_id).map(|blob| blob.value().clone()))
    }

    async fn upsert(&self, conversation_id: &str, blob: &str) -> Result<(), BotError> {
        self.rows
            .insert(conversation_id.to_string(), blob.to_string());
        Ok(())
    }
}
