use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BackendConfig;
use crate::error::BackendError;

#[derive(Debug, Serialize)]
struct SaveDiaryRequest<'a> {
    entry: &'a str,
}

#[derive(Debug, Serialize)]
struct AnalyzeDiaryRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeDiaryResponse {
    #[serde(default)]
    answer: Option<String>,
}

/// HTTP client for the diary backend (`/save_diary`, `/analyze_diary`).
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

fn build_http_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|_| Client::new())
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, None)
    }

    pub fn with_config(config: &BackendConfig) -> Self {
        Self::with_timeout(config.url.clone(), config.request_timeout())
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        BackendClient {
            base_url,
            client: build_http_client(timeout),
        }
    }

    /// Stores one diary entry. Any 2xx status counts as accepted; the body is
    /// ignored.
    pub async fn save_diary(&self, entry: &str) -> Result<(), BackendError> {
        let url = format!("{}/save_diary", self.base_url);
        tracing::debug!(%url, chars = entry.chars().count(), "saving diary entry");

        let response = self
            .client
            .post(&url)
            .json(&SaveDiaryRequest { entry })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected { status: status.as_u16() });
        }

        Ok(())
    }

    /// Asks the assistant a question about the diary. `Ok(None)` means the
    /// backend answered without an `answer` field.
    pub async fn analyze_diary(&self, query: &str) -> Result<Option<String>, BackendError> {
        let url = format!("{}/analyze_diary", self.base_url);
        tracing::debug!(%url, query, "querying assistant");

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeDiaryRequest { query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected { status: status.as_u16() });
        }

        let body = response.bytes().await?;
        let parsed: AnalyzeDiaryResponse = serde_json::from_slice(&body)?;

        Ok(parsed.answer)
    }
}
