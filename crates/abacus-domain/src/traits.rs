//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates.

use crate::{CalcLogEntry, EntryId, LogEntryPatch, NewLogEntry};

/// Trait for storing and retrieving calculation log entries
///
/// Implemented by the infrastructure layer (abacus-store).
pub trait CalcLogStore {
    /// Error type for store operations
    type Error;

    /// Create a new entry, assigning its id and defaulting an absent
    /// timestamp to the current time. Returns the stored entry.
    fn create_entry(&mut self, entry: NewLogEntry) -> Result<CalcLogEntry, Self::Error>;

    /// List all entries in insertion order
    fn list_entries(&self) -> Result<Vec<CalcLogEntry>, Self::Error>;

    /// Apply a partial update to the entry with the given id
    ///
    /// Returns the updated entry, or `None` if no entry matched the id.
    fn update_entry(
        &mut self,
        id: EntryId,
        patch: LogEntryPatch,
    ) -> Result<Option<CalcLogEntry>, Self::Error>;

    /// Delete the entry with the given id
    ///
    /// Returns whether an entry was removed. Deleting an absent id is a
    /// no-op, not an error.
    fn delete_entry(&mut self, id: EntryId) -> Result<bool, Self::Error>;
}
