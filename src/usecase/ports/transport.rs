use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::entities::page::IdPage;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("server at {url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode id list from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Carries the merged search criteria to the id-listing endpoint.
pub trait IdListTransport: Send + Sync {
    fn fetch_ids(&self, criteria: &Map<String, Value>) -> Result<IdPage, TransportError>;
}
