//! Article content fetcher
//!
//! Fetches a report's article URL and keeps the body according to its
//! declared content type: HTML as text, PDF and generic binary downloads as
//! bytes. Everything else is reported as unsupported.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::errors::FetchError;
use super::http_client::{PageTransport, RawResponse};
use crate::domain::ReportContent;

/// How a declared content type is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDisposition {
    Text,
    Binary { media_type: String },
    Unsupported,
}

/// Classify a `Content-Type` header value (case-insensitive, parameters ignored)
pub fn classify_content_type(content_type: &str) -> ContentDisposition {
    let lowered = content_type.to_ascii_lowercase();
    if lowered.contains("text/html") {
        return ContentDisposition::Text;
    }

    ["application/pdf", "application/octet-stream"]
        .into_iter()
        .find(|binary| lowered.contains(binary))
        .map_or(ContentDisposition::Unsupported, |media_type| {
            ContentDisposition::Binary {
                media_type: media_type.to_string(),
            }
        })
}

/// Content-type aware fetcher over a shared transport
#[derive(Clone)]
pub struct ContentFetcher {
    transport: Arc<dyn PageTransport>,
}

impl ContentFetcher {
    pub fn new(transport: Arc<dyn PageTransport>) -> Self {
        Self { transport }
    }

    /// Fetch `url` and convert the body by content type
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<ReportContent, FetchError> {
        let response = self.transport.get(url, timeout).await?;
        Self::into_content(url, response)
    }

    /// Fail-soft variant: any failure is logged and becomes `None`
    pub async fn fetch_or_none(&self, url: &str, timeout: Duration) -> Option<ReportContent> {
        match self.fetch(url, timeout).await {
            Ok(content) => {
                debug!("Fetched {} bytes of content for {}", content.len(), url);
                Some(content)
            }
            Err(e @ FetchError::UnsupportedContent { .. }) => {
                warn!("{}", e);
                None
            }
            Err(e) => {
                warn!("Failed to fetch content: {}", e);
                None
            }
        }
    }

    fn into_content(url: &str, response: RawResponse) -> Result<ReportContent, FetchError> {
        let content_type = response.content_type.clone().unwrap_or_default();

        match classify_content_type(&content_type) {
            ContentDisposition::Text => Ok(ReportContent::Text(response.text())),
            ContentDisposition::Binary { media_type } => Ok(ReportContent::Binary {
                media_type,
                data: response.body,
            }),
            ContentDisposition::Unsupported => Err(FetchError::UnsupportedContent {
                url: url.to_string(),
                content_type,
            }),
        }
    }
}
