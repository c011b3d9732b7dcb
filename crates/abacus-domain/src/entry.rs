//! Entry module - the persisted record of one calculation

use std::fmt;

/// Unique identifier for a calculation log entry, based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so id order matches insertion order
/// - 128-bit uniqueness without coordination
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u128);

impl EntryId {
    /// Generate a new UUIDv7-based EntryId
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EntryId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EntryId from its UUID string form
    ///
    /// # Examples
    ///
    /// ```
    /// use abacus_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// let parsed = EntryId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid entry id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A persisted record of one calculation
///
/// The id is assigned by the persistence layer on creation and is immutable
/// thereafter. The timestamp is set once at creation and only changes when an
/// update explicitly supplies a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcLogEntry {
    /// Unique identifier, assigned on creation
    pub id: EntryId,

    /// Text representation of the requested operation (e.g. `"2 + 3"`)
    pub input: String,

    /// Text representation of the computed result (e.g. `"2 + 3 = 5"`)
    pub output: String,

    /// Creation time as Unix epoch seconds
    pub timestamp: u64,
}

/// Input for creating a new log entry
///
/// The id is never caller-supplied; an absent timestamp means "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    /// Text representation of the requested operation
    pub input: String,

    /// Text representation of the computed result
    pub output: String,

    /// Creation time as Unix epoch seconds; defaulted by the store if absent
    pub timestamp: Option<u64>,
}

/// Partial update of a log entry
///
/// Absent fields are left untouched. In particular the timestamp is never
/// regenerated on update; it only changes when supplied here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntryPatch {
    /// Replacement input text, if any
    pub input: Option<String>,

    /// Replacement output text, if any
    pub output: Option<String>,

    /// Replacement timestamp, if any
    pub timestamp: Option<u64>,
}

impl LogEntryPatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.timestamp.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_display_and_parse() {
        let id = EntryId::new();
        let id_str = id.to_string();

        // UUID strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id_str.len(), 36);

        let parsed = EntryId::from_string(&id_str).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_entry_id_invalid_string() {
        assert!(EntryId::from_string("not-a-valid-uuid").is_err());
        assert!(EntryId::from_string("").is_err());
    }

    #[test]
    fn test_entry_id_chronological() {
        // UUIDv7s generated in sequence should be chronologically ordered
        let id1 = EntryId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = EntryId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(LogEntryPatch::default().is_empty());

        let patch = LogEntryPatch {
            output: Some("2 + 3 = 5".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
