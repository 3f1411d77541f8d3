//! HTTP client for the doorbell announcement service.
//!
//! The service exposes a single endpoint, `POST http://{host}/doorbell`, which
//! plays the doorbell sound and answers with the clip length:
//!
//! ```text
//! {"status": "ok", "voice_length_ms": 2000}
//! ```
//!
//! Any failure is reported as an [`AnnouncementError`]; the client never
//! retries.

use crate::error::{ApiError, Result};
use gatelock_controller::{AnnouncementError, Announcer};
use gatelock_core::AnnouncementConfig;
use gatelock_core::constants::ANNOUNCEMENT_PATH;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct DoorbellResponse {
    status: String,
    voice_length_ms: u64,
}

/// Announcer backed by the doorbell HTTP service.
///
/// # Examples
///
/// ```
/// use gatelock_core::AnnouncementConfig;
/// use gatelock_network::DoorbellClient;
/// use std::time::Duration;
///
/// let config = AnnouncementConfig {
///     enabled: true,
///     host: "lightning-control.local:8080".to_string(),
/// };
/// let client = DoorbellClient::new(&config, Duration::from_secs(5)).unwrap();
/// assert_eq!(client.url(), "http://lightning-control.local:8080/doorbell");
/// ```
#[derive(Debug, Clone)]
pub struct DoorbellClient {
    enabled: bool,
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl DoorbellClient {
    /// Create a client for the configured host.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &AnnouncementConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            enabled: config.enabled,
            url: format!("http://{}{}", config.host, ANNOUNCEMENT_PATH),
            timeout,
            client,
        })
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn transport_error(&self, error: reqwest::Error) -> AnnouncementError {
        if error.is_timeout() {
            AnnouncementError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            AnnouncementError::transport(error.to_string())
        }
    }
}

impl Announcer for DoorbellClient {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn announce(&self) -> std::result::Result<u64, AnnouncementError> {
        debug!(url = %self.url, "Calling doorbell service");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(Vec::new())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AnnouncementError::Status(status.as_u16()));
        }

        let body: DoorbellResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                AnnouncementError::decode(e.to_string())
            }
        })?;

        info!(
            status = %body.status,
            voice_length_ms = body.voice_length_ms,
            "Doorbell triggered"
        );
        Ok(body.voice_length_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_client() {
        let client =
            DoorbellClient::new(&AnnouncementConfig::default(), Duration::from_secs(5)).unwrap();
        assert!(!client.is_enabled());
        assert_eq!(client.url(), "http://lightning-control.local:8080/doorbell");
    }

    #[test]
    fn test_response_decoding() {
        let body: DoorbellResponse =
            serde_json::from_str(r#"{"status":"ok","voice_length_ms":2000}"#).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.voice_length_ms, 2000);

        assert!(serde_json::from_str::<DoorbellResponse>(r#"{"status":"ok"}"#).is_err());
        assert!(
            serde_json::from_str::<DoorbellResponse>(r#"{"status":"ok","voice_length_ms":-1}"#)
                .is_err()
        );
    }
}
