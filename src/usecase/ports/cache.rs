use thiserror::Error;

use crate::domain::entities::column::Record;
use crate::domain::entities::page::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("failed to resolve {missing} of {requested} records: {message}")]
    Resolve {
        requested: usize,
        missing: usize,
        message: String,
    },
    #[error("{0}")]
    Message(String),
}

/// Keyed store of entity records shared with other views. The page
/// controller only reads from it and asks it to make ids present.
pub trait RecordCache: Send + Sync {
    fn get(&self, id: EntityId) -> Option<Record>;

    /// Fetches and stores whichever of `ids` are not cached yet. Best effort:
    /// on error some ids may still have been filled.
    fn ensure_resolved(&self, ids: &[EntityId]) -> Result<(), CacheError>;
}

/// Where a cache loads records it does not hold yet.
pub trait RecordSource: Send + Sync {
    fn fetch_records(&self, ids: &[EntityId]) -> Result<Vec<Record>, CacheError>;
}
