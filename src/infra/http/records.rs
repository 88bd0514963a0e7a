use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::column::Record;
use crate::domain::entities::page::EntityId;
use crate::usecase::ports::cache::{CacheError, RecordSource};

#[derive(Serialize)]
struct RecordsQuery<'a> {
    ids: &'a [EntityId],
}

/// Fetches a batch of records by id. The endpoint answers with a JSON array
/// of record objects; anything in the array that is not an object is
/// ignored.
pub struct HttpRecordSource {
    client: Client,
    url: String,
}

impl HttpRecordSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch_records(&self, ids: &[EntityId]) -> Result<Vec<Record>, CacheError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RecordsQuery { ids })
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| CacheError::Message(format!("{}: {err}", self.url)))?;

        let body = response
            .json::<Vec<Value>>()
            .map_err(|err| CacheError::Message(format!("{}: {err}", self.url)))?;

        Ok(body
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect())
    }
}
