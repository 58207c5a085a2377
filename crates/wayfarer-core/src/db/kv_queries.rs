//! Key-value reads and whole-value writes.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::error::{DatabaseResultExt, Result};

const SELECT_VALUE_SQL: &str = "SELECT value FROM kv_store WHERE key = ?1";
const UPSERT_VALUE_SQL: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_VALUE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

impl super::Database {
    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_VALUE_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to read value")
    }

    /// Overwrites the value stored under `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(UPSERT_VALUE_SQL, params![key, value, now])
            .db_context("Failed to write value")?;
        Ok(())
    }

    /// Deletes `key`. Returns whether a value was present.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .connection
            .execute(DELETE_VALUE_SQL, params![key])
            .db_context("Failed to delete value")?;
        Ok(affected > 0)
    }
}
