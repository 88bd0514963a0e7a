use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0}")]
    Message(String),
}

/// Raw persistence for grid display state, keyed by page path. The blob is
/// whatever JSON the state service hands over.
pub trait StateStore: Send + Sync {
    fn load(&self, page_path: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, page_path: &str, blob: &str) -> Result<(), StoreError>;
}
