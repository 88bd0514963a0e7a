use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{Map, Value};

use crate::domain::entities::page::IdPage;
use crate::usecase::ports::transport::{IdListTransport, TransportError};

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Posts search criteria as JSON to the id-listing endpoint.
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl IdListTransport for HttpTransport {
    fn fetch_ids(&self, criteria: &Map<String, Value>) -> Result<IdPage, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(criteria)
            .send()
            .map_err(|err| TransportError::Request {
                url: self.url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<IdPage>().map_err(|err| TransportError::Decode {
            url: self.url.clone(),
            message: err.to_string(),
        })
    }
}
