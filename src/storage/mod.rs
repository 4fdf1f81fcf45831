mod local;
mod memory;

use std::sync::Arc;

use log::warn;

use crate::config::STORAGE_KEY;
use crate::error::AppResult;
use crate::reminder::Reminder;

pub use local::LocalSlot;
pub use memory::MemorySlot;

/// A persistent key-value slot, the storage boundary the host provides.
///
/// One key holds one opaque string value. The engine keeps its entire
/// reminder collection as a single JSON array under [`STORAGE_KEY`].
pub trait KeyValueSlot: Send + Sync {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
}

/// Reminder collection persistence over a [`KeyValueSlot`].
pub struct ReminderStore {
    slot: Arc<dyn KeyValueSlot>,
}

impl ReminderStore {
    pub fn new(slot: Arc<dyn KeyValueSlot>) -> Self {
        Self { slot }
    }

    /// Load the stored collection. A missing key, an unreadable slot, or a
    /// malformed blob all yield an empty collection: corrupt state is
    /// discarded, never surfaced to the caller.
    pub fn load(&self) -> Vec<Reminder> {
        let raw = match self.slot.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("reminder slot unreadable, starting empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(reminders) => reminders,
            Err(e) => {
                warn!("discarding malformed reminder blob: {}", e);
                Vec::new()
            }
        }
    }

    /// Full overwrite of the blob on every mutation.
    pub fn save(&self, reminders: &[Reminder]) -> AppResult<()> {
        let raw = serde_json::to_string(reminders)?;
        self.slot.write(STORAGE_KEY, &raw)
    }
}
