// State store trait — backend-agnostic async key/value interface.
//
// Implementors: SqliteStore (wraps rusqlite), MemoryStore (HashMap).
// Methods are async so a sync backend behind a Mutex and a native async
// backend fit the same interface.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get a value by key (e.g., "last_form_submission").
    async fn get_state(&self, key: &str) -> Result<Option<String>>;

    /// Set a value (upsert).
    async fn set_state(&self, key: &str, value: &str) -> Result<()>;
}
