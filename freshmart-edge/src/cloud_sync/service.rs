//! JsonBinClient - HTTP client for the JSONBin v3 bins API
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | fetch | `GET {base}/{bin}/latest` | `{ record, metadata }` |
//! | store | `PUT {base}/{bin}` | `{ record, metadata }` |
//! | create | `POST {base}` | `{ record, metadata: { id } }` |

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::RemoteRecord;
use std::time::Duration;
use thiserror::Error;

/// Remote mirror errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("Remote bin not found")]
    NotFound,

    #[error("Remote rejected credentials")]
    Unauthorized,

    #[error("Remote returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid remote response: {0}")]
    Decode(String),
}

/// Whole-document remote mirror
#[async_trait]
pub trait RemoteMirror: Send + Sync {
    async fn fetch(&self, bin_id: &str) -> Result<RemoteRecord, MirrorError>;

    async fn store(&self, bin_id: &str, record: &RemoteRecord) -> Result<(), MirrorError>;

    /// Create a new bin and return its id
    async fn create(&self, record: &RemoteRecord) -> Result<String, MirrorError>;
}

#[derive(Deserialize)]
struct FetchResponse {
    record: RemoteRecord,
}

#[derive(Deserialize)]
struct CreateResponse {
    metadata: CreateMetadata,
}

#[derive(Deserialize)]
struct CreateMetadata {
    id: String,
}

pub struct JsonBinClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl JsonBinClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, MirrorError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::NOT_FOUND => Err(MirrorError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(MirrorError::Unauthorized),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(MirrorError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

fn network(e: reqwest::Error) -> MirrorError {
    MirrorError::Network(e.to_string())
}

#[async_trait]
impl RemoteMirror for JsonBinClient {
    async fn fetch(&self, bin_id: &str) -> Result<RemoteRecord, MirrorError> {
        let url = format!("{}/{}/latest", self.base_url, bin_id);
        let response = self
            .client
            .get(&url)
            .header("X-Master-Key", &self.api_key)
            .send()
            .await
            .map_err(network)?;

        let body: FetchResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| MirrorError::Decode(e.to_string()))?;
        Ok(body.record)
    }

    async fn store(&self, bin_id: &str, record: &RemoteRecord) -> Result<(), MirrorError> {
        let url = format!("{}/{}", self.base_url, bin_id);
        let response = self
            .client
            .put(&url)
            .header("X-Master-Key", &self.api_key)
            .json(record)
            .send()
            .await
            .map_err(network)?;

        Self::check(response).await?;
        Ok(())
    }

    async fn create(&self, record: &RemoteRecord) -> Result<String, MirrorError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("X-Master-Key", &self.api_key)
            .json(record)
            .send()
            .await
            .map_err(network)?;

        let body: CreateResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| MirrorError::Decode(e.to_string()))?;
        Ok(body.metadata.id)
    }
}
