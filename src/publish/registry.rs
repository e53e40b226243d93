use crate::publish::{backends, Publisher};
use crate::reconcile::EndpointMapping;
use crate::{DiscoveryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:81";

/// Pushes backend records to a Marco registry over HTTP.
pub struct RegistryPublisher {
    client: Client,
    url: Url,
}

impl RegistryPublisher {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| {
            DiscoveryError::ConfigError(format!("Invalid registry URL '{}': {}", url, e))
        })?;

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            DiscoveryError::ConfigError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Publisher for RegistryPublisher {
    async fn publish(&self, mapping: &EndpointMapping) -> Result<()> {
        let records = backends(mapping);
        debug!("Pushing {} backends to {}", records.len(), self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&records)
            .send()
            .await
            .map_err(|e| {
                DiscoveryError::PublishError(format!("Request to {} failed: {}", self.url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::PublishError(format!(
                "Registry returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
