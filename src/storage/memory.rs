use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AppResult;
use crate::storage::KeyValueSlot;

/// In-memory key-value slot for tests and hosts without durable storage.
#[derive(Default)]
pub struct MemorySlot {
    slots: Mutex<HashMap<String, String>>,
}

impl KeyValueSlot for MemorySlot {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
