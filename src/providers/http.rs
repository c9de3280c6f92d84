use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Transport, TransportResponse};

/// reqwest-backed transport for the translation endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, ProviderError> {
        debug!("GET {}", url);

        let response = self.client.get(url.clone())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::BadNetwork(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::BadNetwork(e.to_string())
                } else {
                    ProviderError::RequestFailed(format!("Failed to read response body: {}", e))
                }
            })?;

        Ok(TransportResponse { status, body })
    }
}
