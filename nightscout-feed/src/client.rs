//! Nightscout REST client for `/api/v1/entries.json`.
//!
//! The API secret is never sent in clear: Nightscout expects the SHA-1 hex
//! digest in the `api-secret` header. Certificate validation stays on; a
//! self-signed site is trusted by adding its CA with
//! [`NightscoutClientBuilder::ca_certificate_pem`].
//!
//! ```rust,no_run
//! use nightscout_feed::{EntrySource, NightscoutClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NightscoutClient::builder()
//!         .base_url("https://my-site.example.com")
//!         .api_secret("change-me")
//!         .build()?;
//!
//!     let entries = client.fetch_entries(48).await?;
//!     println!("{} readings", entries.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use nightscout_core::Measurement;
use reqwest::header::ACCEPT;
use reqwest::{Certificate, Client};
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use crate::{parse_entries_value, EntrySource, FeedError};

/// Fixed bound for the single fetch of an invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// SHA-1 hex digest of the shared secret, as Nightscout expects it.
pub fn hashed_secret(secret: &str) -> String {
    format!("{:x}", Sha1::digest(secret.as_bytes()))
}

#[derive(Debug, Clone)]
pub struct NightscoutClient {
    client: Client,
    base_url: String,
    hashed_secret: String,
}

impl NightscoutClient {
    pub fn builder() -> NightscoutClientBuilder {
        NightscoutClientBuilder::default()
    }

    pub fn entries_url(&self, count: u32) -> String {
        format!("{}/api/v1/entries.json?count={count}", self.base_url)
    }

    async fn fetch_body(&self, count: u32) -> Result<Value, FeedError> {
        let url = self.entries_url(count);
        debug!(%url, "fetching Nightscout entries");

        let response = self
            .client
            .get(&url)
            .header("api-secret", &self.hashed_secret)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Nightscout rejected entries request");
            return Err(FeedError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[async_trait]
impl EntrySource for NightscoutClient {
    async fn fetch_entries(&self, count: u32) -> Result<Vec<Measurement>, FeedError> {
        let body = self.fetch_body(count).await?;
        let entries = parse_entries_value(&body)?;
        debug!(received = entries.len(), "parsed Nightscout entries");
        Ok(entries)
    }
}

#[derive(Debug, Default)]
pub struct NightscoutClientBuilder {
    base_url: Option<String>,
    api_secret: Option<String>,
    timeout: Option<Duration>,
    ca_certificate: Option<Vec<u8>>,
}

impl NightscoutClientBuilder {
    /// Site root, e.g. "https://my-site.example.com".
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Plain shared secret; hashed before use.
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Extra trusted root in PEM form, for self-signed deployments.
    pub fn ca_certificate_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.ca_certificate = Some(pem.into());
        self
    }

    pub fn build(self) -> Result<NightscoutClient, FeedError> {
        let base_url = self
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| FeedError::Http("Nightscout URL is not set".to_string()))?;
        let secret = self
            .api_secret
            .ok_or_else(|| FeedError::Http("Nightscout API secret is not set".to_string()))?;

        let mut builder = Client::builder().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        if let Some(pem) = self.ca_certificate {
            let certificate =
                Certificate::from_pem(&pem).map_err(|e| FeedError::Certificate(e.to_string()))?;
            builder = builder.add_root_certificate(certificate);
        }
        let client = builder.build()?;

        Ok(NightscoutClient {
            client,
            base_url,
            hashed_secret: hashed_secret(&secret),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_sha1_hex() {
        assert_eq!(
            hashed_secret("abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn builds_entries_url_without_double_slash() {
        let client = NightscoutClient::builder()
            .base_url("https://ns.example.com/ ")
            .api_secret("secret")
            .build()
            .unwrap();

        assert_eq!(
            client.entries_url(48),
            "https://ns.example.com/api/v1/entries.json?count=48"
        );
        assert_eq!(client.hashed_secret, hashed_secret("secret"));
    }

    #[test]
    fn missing_url_fails_to_build() {
        let err = NightscoutClient::builder().api_secret("secret").build();
        assert!(err.is_err());
    }

    #[test]
    fn invalid_certificate_is_rejected() {
        let result = NightscoutClient::builder()
            .base_url("https://ns.example.com")
            .api_secret("secret")
            .ca_certificate_pem(b"not a certificate".to_vec())
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unreachable_site_is_a_transport_error() {
        let client = NightscoutClient::builder()
            .base_url("http://127.0.0.1:9")
            .api_secret("secret")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        let err = client.fetch_entries(1).await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::Connection(_) | FeedError::Timeout | FeedError::Http(_)
        ));
    }
}
