//! JSON fetch capability and its HTTP implementation.
//!
//! Providers only need "give me the JSON behind this request", so they
//! depend on [`JsonFetcher`] and tests can substitute canned payloads.
//! [`HttpFetcher`] retries with linear backoff and, when the exchange's
//! certificate chain fails verification, repeats the request once without
//! verification.

use std::error::Error as _;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Browser-like user agent; the exchange endpoints reject unknown agents.
pub const USER_AGENT: &str = "Mozilla/5.0";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON from {url}: {reason}")]
    Decode { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Parameters go in the query string.
    Get,
    /// Parameters go in an urlencoded form body.
    PostForm,
}

/// One JSON request: URL, method and parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRequest {
    pub url: String,
    pub method: Method,
    pub params: Vec<(String, String)>,
}

impl JsonRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            params: Vec::new(),
        }
    }

    pub fn post_form(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::PostForm,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Value of a parameter, if set.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Fetch structured JSON for a request.
pub trait JsonFetcher: Send + Sync {
    fn fetch_json(&self, request: &JsonRequest) -> Result<Value, FetchError>;
}

/// Decode a response body, tolerating a UTF-8 byte order mark.
pub fn decode_body(url: &str, body: &[u8]) -> Result<Value, FetchError> {
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Blocking HTTP fetcher over reqwest.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    insecure_client: reqwest::blocking::Client,
    max_attempts: u32,
    backoff: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_attempts: u32) -> Result<Self, FetchError> {
        let build = |insecure: bool| {
            reqwest::blocking::Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .danger_accept_invalid_certs(insecure)
                .build()
                .map_err(|e| FetchError::Client(e.to_string()))
        };
        Ok(Self {
            client: build(false)?,
            insecure_client: build(true)?,
            max_attempts: max_attempts.max(1),
            backoff: Duration::from_millis(600),
        })
    }

    fn send(
        client: &reqwest::blocking::Client,
        request: &JsonRequest,
    ) -> Result<Value, SendError> {
        let builder = match request.method {
            Method::Get => client.get(&request.url).query(&request.params),
            Method::PostForm => client.post(&request.url).form(&request.params),
        };
        let response = builder.send().map_err(SendError::Reqwest)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SendError::Fetch(FetchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            }));
        }
        let body = response.bytes().map_err(SendError::Reqwest)?;
        decode_body(&request.url, &body).map_err(SendError::Fetch)
    }
}

/// Internal error keeping the reqwest error around for certificate checks.
enum SendError {
    Reqwest(reqwest::Error),
    Fetch(FetchError),
}

impl SendError {
    fn into_fetch_error(self, url: &str) -> FetchError {
        match self {
            SendError::Reqwest(e) => FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            },
            SendError::Fetch(e) => e,
        }
    }
}

/// Whether any error in the chain reports a certificate verification failure.
fn is_certificate_error(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_lowercase();
        if text.contains("certificate") {
            return true;
        }
        source = inner.source();
    }
    false
}

impl JsonFetcher for HttpFetcher {
    fn fetch_json(&self, request: &JsonRequest) -> Result<Value, FetchError> {
        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            match Self::send(&self.client, request) {
                Ok(value) => return Ok(value),
                Err(SendError::Reqwest(e)) if is_certificate_error(&e) => {
                    warn!(
                        url = %request.url,
                        "certificate verification failed, retrying without verification"
                    );
                    return Self::send(&self.insecure_client, request)
                        .map_err(|e| e.into_fetch_error(&request.url));
                }
                Err(e) => {
                    let err = e.into_fetch_error(&request.url);
                    debug!(url = %request.url, attempt = attempt + 1, error = %err, "fetch failed");
                    last_error = Some(err);
                }
            }
            if attempt + 1 < self.max_attempts {
                std::thread::sleep(self.backoff * (attempt + 1));
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Transport {
            url: request.url.clone(),
            reason: "no attempts made".into(),
        }))
    }
}
