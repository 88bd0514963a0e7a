use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::domain::entities::column::Record;
use crate::domain::entities::page::EntityId;
use crate::usecase::ports::cache::{CacheError, RecordCache, RecordSource};

pub const ID_ATTRIBUTE: &str = "id";

/// Reads the id attribute of a record, accepting numbers and numeric strings.
pub fn record_id(record: &Record) -> Option<EntityId> {
    match record.get(ID_ATTRIBUTE)? {
        Value::Number(number) => number.as_i64().map(EntityId),
        Value::String(text) => text.trim().parse::<i64>().ok().map(EntityId),
        _ => None,
    }
}

/// Thread-safe record cache. Ids it does not hold are loaded from the
/// configured source, one batch per `ensure_resolved` call.
#[derive(Default)]
pub struct InMemoryRecordCache {
    records: RwLock<HashMap<EntityId, Record>>,
    source: Option<Arc<dyn RecordSource>>,
}

impl InMemoryRecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: Arc<dyn RecordSource>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            source: Some(source),
        }
    }

    /// Stores a record under its id attribute. Records without a usable id
    /// are rejected.
    pub fn insert(&self, record: Record) -> Option<EntityId> {
        let id = record_id(&record)?;
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, record);
        Some(id)
    }

    fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn missing(&self, ids: &[EntityId]) -> Vec<EntityId> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        let mut missing: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| !records.contains_key(id))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

impl RecordCache for InMemoryRecordCache {
    fn get(&self, id: EntityId) -> Option<Record> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn ensure_resolved(&self, ids: &[EntityId]) -> Result<(), CacheError> {
        let missing = self.missing(ids);
        if missing.is_empty() {
            return Ok(());
        }

        let Some(source) = self.source.as_ref() else {
            return Err(CacheError::Resolve {
                requested: ids.len(),
                missing: missing.len(),
                message: "no record source configured".to_string(),
            });
        };

        debug!(
            missing = missing.len(),
            cached = self.len(),
            "fetching uncached records"
        );
        let fetched = source.fetch_records(&missing)?;
        for record in fetched {
            self.insert(record);
        }

        let still_missing = self.missing(&missing).len();
        if still_missing > 0 {
            return Err(CacheError::Resolve {
                requested: ids.len(),
                missing: still_missing,
                message: "source did not return every id".to_string(),
            });
        }
        Ok(())
    }
}
