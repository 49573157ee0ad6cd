// SqliteStore — rusqlite backend implementing the StateStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Each method locks, does synchronous rusqlite work, and returns; the lock
// is never held across an .await.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::traits::StateStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_state(&conn, key)
    }

    async fn set_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_state(&conn, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[tokio::test]
    async fn test_trait_state_roundtrip() {
        let store = test_store();
        assert_eq!(store.get_state("last_form_submission").await.unwrap(), None);
        store
            .set_state("last_form_submission", "1700000000000")
            .await
            .unwrap();
        assert_eq!(
            store.get_state("last_form_submission").await.unwrap(),
            Some("1700000000000".to_string())
        );
        assert_eq!(store.table_count().await.unwrap(), 2);
    }

    #[test]
    fn test_initialize_creates_file_and_parent_dirs() {
        let dir = std::env::temp_dir().join(format!(
            "contact-relay-test-{}",
            std::process::id()
        ));
        let path = dir.join("nested").join("state.db");
        let conn = crate::db::initialize(&path).unwrap();
        assert!(path.exists());
        drop(conn);
        assert!(crate::db::open(&path).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_open_missing_database_fails() {
        let path = std::env::temp_dir().join("contact-relay-definitely-missing.db");
        let err = crate::db::open(&path).unwrap_err();
        assert!(err.to_string().contains("contact-relay init"));
    }
}
