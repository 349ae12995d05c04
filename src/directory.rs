use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::error::DirectoryError;

/// Read access to the directory backend. List endpoints respond with an
/// `{ "items": [...] }` envelope; biobank fetches return the full envelope.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn get(&self, uri: &str) -> Result<Value, DirectoryError>;
}

#[derive(Clone)]
pub struct DirectoryHttpClient {
    client: Client,
    base_url: String,
}

impl DirectoryHttpClient {
    pub fn new(base_url: &str) -> Result<Self, DirectoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("bbdir/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DirectoryError::ClientBuild(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| DirectoryError::ClientBuild(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn handle_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DirectoryError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "directory request failed".to_string());
        Err(DirectoryError::DirectoryStatus { status, message })
    }
}

#[async_trait]
impl DirectoryClient for DirectoryHttpClient {
    async fn get(&self, uri: &str) -> Result<Value, DirectoryError> {
        let url = format!("{}{}", self.base_url, uri);
        tracing::debug!(%url, "directory request");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| DirectoryError::DirectoryHttp(err.to_string()))?;
        let response = Self::handle_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| DirectoryError::DirectoryHttp(err.to_string()))
    }
}
