//! Abacus Storage Layer
//!
//! Implements the CalcLogStore trait using SQLite.
//!
//! # Architecture
//!
//! - One flat `calc_logs` table holding the calculation log collection
//! - Entry ids are UUIDv7 values stored as 16-byte blobs
//! - Listing returns rowid order, which is insertion order
//!
//! # Examples
//!
//! ```no_run
//! use abacus_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for log operations
//! ```

#![warn(missing_docs)]

use abacus_domain::traits::CalcLogStore;
use abacus_domain::{CalcLogEntry, EntryId, LogEntryPatch, NewLogEntry};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of CalcLogStore
///
/// # Thread Safety
///
/// SQLite connections are not `Sync`. Callers that share a store across
/// request handlers wrap it in a mutex and keep storage calls short.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use abacus_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("abacus.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert EntryId to bytes for storage
    fn entry_id_to_bytes(id: EntryId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to EntryId
    fn bytes_to_entry_id(bytes: &[u8]) -> Result<EntryId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for EntryId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(EntryId::from_value(u128::from_be_bytes(arr)))
    }

    /// Current time as Unix epoch seconds
    fn now_epoch_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Map a calc_logs row (id, input, output, timestamp) to an entry
    fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<CalcLogEntry> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_entry_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        Ok(CalcLogEntry {
            id,
            input: row.get(1)?,
            output: row.get(2)?,
            timestamp: row.get::<_, i64>(3)? as u64,
        })
    }

    /// Fetch a single entry by id
    fn get_entry(&self, id: EntryId) -> Result<Option<CalcLogEntry>, StoreError> {
        let id_bytes = Self::entry_id_to_bytes(id);

        let entry = self
            .conn
            .query_row(
                "SELECT id, input, output, timestamp FROM calc_logs WHERE id = ?1",
                params![&id_bytes],
                Self::row_to_entry,
            )
            .optional()?;

        Ok(entry)
    }
}

impl CalcLogStore for SqliteStore {
    type Error = StoreError;

    fn create_entry(&mut self, entry: NewLogEntry) -> Result<CalcLogEntry, Self::Error> {
        let id = EntryId::new();
        let id_bytes = Self::entry_id_to_bytes(id);
        let timestamp = entry.timestamp.unwrap_or_else(Self::now_epoch_secs);

        self.conn.execute(
            "INSERT INTO calc_logs (id, input, output, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![&id_bytes, &entry.input, &entry.output, timestamp as i64],
        )?;

        Ok(CalcLogEntry {
            id,
            input: entry.input,
            output: entry.output,
            timestamp,
        })
    }

    fn list_entries(&self) -> Result<Vec<CalcLogEntry>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, input, output, timestamp FROM calc_logs ORDER BY rowid")?;

        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn update_entry(
        &mut self,
        id: EntryId,
        patch: LogEntryPatch,
    ) -> Result<Option<CalcLogEntry>, Self::Error> {
        if patch.is_empty() {
            // Nothing to write; still report whether the entry exists
            return self.get_entry(id);
        }

        let id_bytes = Self::entry_id_to_bytes(id);

        // Build the SET clause from the fields the patch actually carries
        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(input) = &patch.input {
            assignments.push("input = ?");
            values.push(Box::new(input.clone()));
        }

        if let Some(output) = &patch.output {
            assignments.push("output = ?");
            values.push(Box::new(output.clone()));
        }

        if let Some(timestamp) = patch.timestamp {
            assignments.push("timestamp = ?");
            values.push(Box::new(timestamp as i64));
        }

        let sql = format!(
            "UPDATE calc_logs SET {} WHERE id = ?",
            assignments.join(", ")
        );
        values.push(Box::new(id_bytes));

        let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let updated = self.conn.execute(&sql, &value_refs[..])?;

        if updated == 0 {
            return Ok(None);
        }

        self.get_entry(id)
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<bool, Self::Error> {
        let id_bytes = Self::entry_id_to_bytes(id);

        let deleted = self
            .conn
            .execute("DELETE FROM calc_logs WHERE id = ?1", params![&id_bytes])?;

        Ok(deleted > 0)
    }
}
