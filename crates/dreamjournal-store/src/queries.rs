use crate::Database;
use crate::models::StorageRow;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    pub fn get_item(&self, key: &str) -> Result<Option<StorageRow>> {
        self.with_conn(|conn| query_item(conn, key))
    }

    /// Insert or overwrite the value stored under `key`.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                (key, value),
            )?;
            Ok(())
        })
    }

    /// Removing a missing key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    #[cfg(test)]
    pub fn keys(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(keys)
        })
    }

    #[cfg(test)]
    pub fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM local_storage", [])?;
            Ok(())
        })
    }
}

fn query_item(conn: &Connection, key: &str) -> Result<Option<StorageRow>> {
    let mut stmt =
        conn.prepare("SELECT key, value, updated_at FROM local_storage WHERE key = ?1")?;

    let row = stmt
        .query_row([key], |row| {
            Ok(StorageRow {
                key: row.get(0)?,
                value: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
