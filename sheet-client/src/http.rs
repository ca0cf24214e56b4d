//! HTTP client for the Apps Script sheet endpoint

use reqwest::Client;
use shared::models::PropertyId;
use shared::wire::{MutationRequest, RawPropertyData, SheetEnvelope};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client wrapping the single GET/POST surface the sheet script
/// exposes.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: Client,
    endpoint: String,
}

impl SheetClient {
    /// Create a new client from configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: config.endpoint_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one property's full dataset.
    ///
    /// `t` is a cache-busting timestamp; the script host aggressively
    /// caches GET responses without it.
    pub async fn fetch_property(&self, property: PropertyId) -> ClientResult<RawPropertyData> {
        let url = format!(
            "{}?hotel={}&t={}",
            self.endpoint,
            property.as_str(),
            shared::util::now_millis()
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Remote(format!(
                "fetch returned HTTP {status}"
            )));
        }

        let envelope: SheetEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !envelope.is_success() {
            return Err(ClientError::Remote(
                envelope.message.unwrap_or_else(|| envelope.status.clone()),
            ));
        }

        Ok(envelope.data.unwrap_or_default())
    }

    /// Push one mutation to the sheet script.
    ///
    /// The script historically ran in a write-only mode with an
    /// unreadable response body; when a body is readable it carries
    /// the same status envelope as GET, and an explicit error status
    /// is surfaced to the caller. An empty or non-JSON body is treated
    /// as accepted (best-effort baseline behavior).
    pub async fn push_mutation(&self, request: &MutationRequest) -> ClientResult<()> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Remote(format!(
                "mutation returned HTTP {status}"
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        match serde_json::from_str::<SheetEnvelope>(&body) {
            Ok(envelope) if !envelope.is_success() => Err(ClientError::Remote(
                envelope.message.unwrap_or_else(|| envelope.status.clone()),
            )),
            _ => Ok(()),
        }
    }
}
