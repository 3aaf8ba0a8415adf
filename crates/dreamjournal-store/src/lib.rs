pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;

pub use memory::MemoryStorage;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Key/value device storage for client-side state.
///
/// Reads and writes are synchronous; callers hold no lock across an await.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed storage, one row per key.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode so a second process can read while we write
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn)?;

        info!("Local storage opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}

impl Storage for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_item(key)?.map(|row| row.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_item(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.remove_item(key)
    }
}
