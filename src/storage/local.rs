use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::storage::KeyValueSlot;

/// File-backed key-value slot: one `<key>.json` file per key under the
/// platform local-data directory (or a caller-supplied one).
pub struct LocalSlot {
    dir: PathBuf,
}

impl LocalSlot {
    pub fn new() -> AppResult<Arc<Self>> {
        let dir = dirs::data_local_dir()
            .ok_or_else(|| AppError::storage("Failed to get local data dir"))?
            .join("CropCare");
        Self::with_dir(dir)
    }

    pub fn with_dir(dir: PathBuf) -> AppResult<Arc<Self>> {
        fs::create_dir_all(&dir).map_err(|e| AppError::storage(e.to_string()))?;
        Ok(Arc::new(Self { dir }))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueSlot for LocalSlot {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| AppError::storage(e.to_string()))
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        fs::write(self.path_for(key), value).map_err(|e| AppError::storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_read_nonexistent_returns_none() {
        let temp_dir = env::temp_dir().join("cropcare_test_read_nonexistent");
        let slot = LocalSlot::with_dir(temp_dir.clone()).unwrap();

        assert!(slot.read("cropcare_reminders").unwrap().is_none());

        let _ = fs::remove_dir_all(&temp_dir);
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let temp_dir = env::temp_dir().join("cropcare_test_roundtrip");
        let slot = LocalSlot::with_dir(temp_dir.clone()).unwrap();

        slot.write("cropcare_reminders", "[]").unwrap();
        assert_eq!(slot.read("cropcare_reminders").unwrap().as_deref(), Some("[]"));

        let _ = fs::remove_dir_all(&temp_dir);
    }
}
