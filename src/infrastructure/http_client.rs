//! HTTP client for listing and article requests
//!
//! One [`HttpClient`] (one connection pool) is shared by every scrape task.
//! The [`PageTransport`] trait is the seam the pipeline depends on, so tests
//! can substitute a scripted transport.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::config::HttpClientConfig;
use super::errors::FetchError;

/// A successful (HTTP 200) response, fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// URL after redirects
    pub url: String,
    /// Declared `Content-Type`, if any
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One GET per call; anything but HTTP 200 is an error
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, FetchError>;
}

/// reqwest-backed transport with an optional in-flight request cap
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    in_flight: Option<Arc<Semaphore>>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: &HttpClientConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        let in_flight = (config.max_in_flight_requests > 0)
            .then(|| Arc::new(Semaphore::new(config.max_in_flight_requests)));

        info!(
            "🌐 HTTP client ready (max in-flight: {}, redirects: {})",
            if config.max_in_flight_requests == 0 {
                "unlimited".to_string()
            } else {
                config.max_in_flight_requests.to_string()
            },
            config.follow_redirects
        );

        Ok(Self { client, in_flight })
    }

    fn map_send_error(url: &str, timeout: Duration, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl PageTransport for HttpClient {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, FetchError> {
        // Semaphore is never closed, so acquire only fails if that changes
        let _permit = match &self.in_flight {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        };

        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::map_send_error(url, timeout, &e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Self::map_send_error(url, timeout, &e)
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("Successfully fetched: {} ({} bytes)", url, body.len());
        Ok(RawResponse {
            url: final_url,
            content_type,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = HttpClient::new(&HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unlimited_in_flight_has_no_semaphore() {
        let config = HttpClientConfig {
            max_in_flight_requests: 0,
            ..Default::default()
        };
        let client = HttpClient::new(&config).unwrap();
        assert!(client.in_flight.is_none());
    }

    #[test]
    fn test_raw_response_text_is_lossy() {
        let response = RawResponse {
            url: "https://example.com".to_string(),
            content_type: Some("text/html".to_string()),
            body: b"caf\xc3\xa9 \xff".to_vec(),
        };
        assert_eq!(response.text(), "café \u{fffd}");
    }
}
