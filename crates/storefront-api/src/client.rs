//! Storefront REST client implementation.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{ApiError, ProductId};

/// Client for the storefront backend's JSON collections.
///
/// Requests are issued once; failures are returned to the caller without
/// retrying.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: Client,
    base_url: String,
}

impl StorefrontClient {
    /// Create a new client for the given base URL (e.g. `http://host/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: ProductId) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    /// Read every record of a collection.
    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, ApiError> {
        let url = self.collection_url(collection);
        debug!(%url, "fetching collection");

        let response = self.http.get(&url).send().await?;
        let records: Vec<T> = Self::handle_response(response).await?;

        debug!(collection, count = records.len(), "fetched collection");
        Ok(records)
    }

    /// Create a record and return the backend's copy of it.
    pub async fn create<T, R>(&self, collection: &str, record: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.collection_url(collection);
        if let Ok(json) = serde_json::to_string(record) {
            debug!(collection, body = %json, "creating record");
        }

        let response = self.http.post(&url).json(record).send().await?;
        Self::handle_response(response).await
    }

    /// Replace a record by id. The response body is ignored.
    pub async fn replace<T>(&self, collection: &str, id: ProductId, record: &T) -> Result<(), ApiError>
    where
        T: Serialize + ?Sized,
    {
        let url = self.record_url(collection, id);
        debug!(collection, id, "replacing record");

        let response = self.http.put(&url).json(record).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Delete a record by id. The response body is ignored.
    pub async fn delete(&self, collection: &str, id: ProductId) -> Result<(), ApiError> {
        let url = self.record_url(collection, id);
        debug!(collection, id, "deleting record");

        let response = self
            .http
            .delete(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Handle HTTP response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Turn a non-2xx response into [`ApiError::Backend`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;

        // Prefer the `error` field of a JSON error body
        let body = match serde_json::from_str::<BackendError>(&text) {
            Ok(err) => err.error,
            Err(_) => text,
        };

        Err(ApiError::Backend {
            status: status.as_u16(),
            body,
        })
    }
}

/// Error body format used by the backend.
#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}
