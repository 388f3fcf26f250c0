//! In-process slot storage.
//!
//! Used by tests and by callers that want a session-only list. The optional
//! byte quota and the disabled mode reproduce the two ways a browser-style
//! local store rejects writes.

use super::{SlotStorage, StorageError, StorageResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemorySlotStorage {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
    writes: usize,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose total stored bytes (keys + values) may not exceed `limit`.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota_bytes: Some(limit),
            ..Self::default()
        }
    }

    /// Storage that rejects every write.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// Seeds a slot directly, bypassing quota checks.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    /// Raw slot contents, for inspection in tests.
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    /// Number of successful writes performed.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.disabled {
            return Err(StorageError::Unavailable(
                "memory storage is disabled".to_string(),
            ));
        }

        if let Some(limit) = self.quota_bytes {
            let requested = self.used_bytes_without(key) + key.len() + value.len();
            if requested > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
