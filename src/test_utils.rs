//! Test utilities
//!
//! A scripted [`PageTransport`] so pipeline tests run without a network.
//! Each URL maps to a canned reply and an optional delay; unknown URLs
//! answer 404.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::infrastructure::errors::FetchError;
use crate::infrastructure::http_client::{PageTransport, RawResponse};

/// Canned outcome for one URL
#[derive(Debug, Clone)]
pub enum StubReply {
    Ok {
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Status(u16),
    Timeout,
    Network,
}

impl StubReply {
    pub fn ok(content_type: Option<&str>, body: Vec<u8>) -> Self {
        Self::Ok {
            content_type: content_type.map(ToString::to_string),
            body,
        }
    }

    pub fn html(body: &str) -> Self {
        Self::ok(Some("text/html; charset=utf-8"), body.as_bytes().to_vec())
    }
}

#[derive(Default)]
pub struct StubTransport {
    replies: HashMap<String, (StubReply, Duration)>,
    requests: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, reply: StubReply) -> Self {
        self.with_delay(url, reply, Duration::ZERO)
    }

    /// Reply after `delay`, to control completion order between tasks
    pub fn with_delay(mut self, url: &str, reply: StubReply, delay: Duration) -> Self {
        self.replies.insert(url.to_string(), (reply, delay));
        self
    }

    /// URLs requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageTransport for StubTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let (reply, delay) = self
            .replies
            .get(url)
            .cloned()
            .unwrap_or((StubReply::Status(404), Duration::ZERO));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            StubReply::Ok { content_type, body } => Ok(RawResponse {
                url: url.to_string(),
                content_type,
                body,
            }),
            StubReply::Status(status) => Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            }),
            StubReply::Timeout => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: timeout.as_secs(),
            }),
            StubReply::Network => Err(FetchError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}
