//! HTTP client for the collection backend.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::protocol::{AviaryDto, CollectChickenDto, CollectEggDataDto, WaterDto};

/// Backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// The backend operations a submission needs.
///
/// [`ApiClient`] is the real implementation; tests substitute recording fakes.
#[allow(async_fn_in_trait)]
pub trait CollectionApi {
    async fn create_egg_collection(
        &self,
        dto: &CollectEggDataDto,
    ) -> Result<CollectEggDataDto, ApiError>;

    async fn create_chicken_collection(
        &self,
        dto: &CollectChickenDto,
    ) -> Result<CollectChickenDto, ApiError>;

    async fn create_water(&self, dto: &WaterDto) -> Result<WaterDto, ApiError>;

    async fn list_aviaries(&self) -> Result<Vec<AviaryDto>, ApiError>;
}

/// JSON client for the `/api` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client with reqwest's default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Aviaries

    pub async fn list_aviaries_by_batch(&self, batch_id: i64) -> Result<Vec<AviaryDto>, ApiError> {
        self.get_json(&format!("/api/aviaries/batch/{}", batch_id))
            .await
    }

    pub async fn get_aviary(&self, id: i64) -> Result<AviaryDto, ApiError> {
        self.get_json(&format!("/api/aviaries/{}", id)).await
    }

    pub async fn create_aviary(&self, aviary: &AviaryDto) -> Result<AviaryDto, ApiError> {
        self.create("/api/aviaries", aviary).await
    }

    pub async fn update_aviary(&self, id: i64, aviary: &AviaryDto) -> Result<AviaryDto, ApiError> {
        let url = self.build_url(&format!("/api/aviaries/{}", id));
        let response = self
            .execute(Method::PUT, &url, self.http.put(&url).json(aviary))
            .await?;
        decode(response, &url).await
    }

    pub async fn delete_aviary(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/aviaries/{}", id)).await
    }

    // Egg collections

    pub async fn list_egg_collections(&self) -> Result<Vec<CollectEggDataDto>, ApiError> {
        self.get_json("/api/collect-egg").await
    }

    pub async fn list_egg_collections_by_aviary(
        &self,
        aviary_id: i64,
    ) -> Result<Vec<CollectEggDataDto>, ApiError> {
        self.get_json(&format!("/api/collect-egg/aviary/{}", aviary_id))
            .await
    }

    pub async fn egg_collections_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<CollectEggDataDto>, ApiError> {
        self.get_json(&format!("/api/collect-egg/date/{}", date.format("%Y-%m-%d")))
            .await
    }

    pub async fn delete_egg_collection(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/collect-egg/{}", id)).await
    }

    // Mortality collections

    pub async fn list_chicken_collections(&self) -> Result<Vec<CollectChickenDto>, ApiError> {
        self.get_json("/api/collect-chicken").await
    }

    pub async fn list_chicken_collections_by_aviary(
        &self,
        aviary_id: i64,
    ) -> Result<Vec<CollectChickenDto>, ApiError> {
        self.get_json(&format!("/api/collect-chicken/aviary/{}", aviary_id))
            .await
    }

    pub async fn chicken_collections_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<CollectChickenDto>, ApiError> {
        self.get_json(&format!(
            "/api/collect-chicken/date/{}",
            date.format("%Y-%m-%d")
        ))
        .await
    }

    pub async fn delete_chicken_collection(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/collect-chicken/{}", id)).await
    }

    // Water

    pub async fn list_water(&self) -> Result<Vec<WaterDto>, ApiError> {
        self.get_json("/api/water").await
    }

    pub async fn list_water_by_aviary(&self, aviary_id: i64) -> Result<Vec<WaterDto>, ApiError> {
        self.get_json(&format!("/api/water/aviary/{}", aviary_id))
            .await
    }

    pub async fn delete_water(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/water/{}", id)).await
    }

    // Plumbing

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let response = self
            .execute(Method::GET, &url, self.http.get(&url))
            .await?;
        decode(response, &url).await
    }

    /// Posts a new record. An empty response body echoes the request back.
    async fn create<T>(&self, path: &str, body: &T) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let url = self.build_url(path);
        let response = self
            .execute(Method::POST, &url, self.http.post(&url).json(body))
            .await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(body.clone());
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.build_url(path);
        self.execute(Method::DELETE, &url, self.http.delete(&url))
            .await?;
        Ok(())
    }

    /// Sends a request, logging both directions, and turns non-2xx answers into errors.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<Response, ApiError> {
        tracing::debug!("Request: {} {}", method, url);

        let response = request.send().await.map_err(|e| {
            tracing::debug!("Request error: {} {}: {}", method, url, e);
            ApiError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Response error: {} {} -> {} {}", method, url, status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Response: {} {} -> {}", method, url, status);
        Ok(response)
    }

    /// Builds a full URL, assuming `http://` when the base has no scheme.
    fn build_url(&self, path: &str) -> String {
        let base_url = if self.base_url.starts_with("http://") || self.base_url.starts_with("https://")
        {
            self.base_url.clone()
        } else {
            format!("http://{}", self.base_url)
        };

        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CollectionApi for ApiClient {
    async fn create_egg_collection(
        &self,
        dto: &CollectEggDataDto,
    ) -> Result<CollectEggDataDto, ApiError> {
        self.create("/api/collect-egg", dto).await
    }

    async fn create_chicken_collection(
        &self,
        dto: &CollectChickenDto,
    ) -> Result<CollectChickenDto, ApiError> {
        self.create("/api/collect-chicken", dto).await
    }

    async fn create_water(&self, dto: &WaterDto) -> Result<WaterDto, ApiError> {
        self.create("/api/water", dto).await
    }

    async fn list_aviaries(&self) -> Result<Vec<AviaryDto>, ApiError> {
        self.get_json("/api/aviaries").await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
