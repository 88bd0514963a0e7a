use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::usecase::ports::state_store::{StateStore, StoreError};

/// Keeps grid state in memory only; for hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, page_path: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(page_path)
            .cloned())
    }

    fn save(&self, page_path: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page_path.to_string(), blob.to_string());
        Ok(())
    }
}
