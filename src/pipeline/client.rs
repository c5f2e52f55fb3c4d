//! Summarisation client and the retry-controlled caller.
//!
//! [`SummarizationClient`] builds the request payload and hands it to
//! [`SummarizationClient::call_with_retry`], a small state machine:
//!
//! ```text
//! Attempting(n) ──2xx──────────────▶ Success(Generated | NotGenerated)
//!      │  ──429, n < max_retries──▶ RateLimited(n) ──wait delay(n)──▶ Attempting(n+1)
//!      └──other error / 429 at limit──▶ Failed
//! ```
//!
//! Only HTTP 429 is retried. A 2xx body without candidate text is a soft
//! success and is returned immediately.

use crate::config::SummarizerConfig;
use crate::error::SummaryError;
use crate::output::Summary;
use crate::pipeline::payload::{GenerateContentRequest, GenerateContentResponse};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Backoff for the first retry, in milliseconds.
const BASE_DELAY_MS: u64 = 1_000;
/// Upper bound on any single backoff, in milliseconds.
const MAX_DELAY_MS: u64 = 60_000;
/// HTTP 429 Too Many Requests.
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Wait before attempt `attempt + 1`: `min(1000 * 2^attempt, 60000)` ms.
pub fn backoff_delay(attempt: u32) -> Duration {
    let ms = 2u64
        .checked_pow(attempt)
        .and_then(|factor| factor.checked_mul(BASE_DELAY_MS))
        .map_or(MAX_DELAY_MS, |ms| ms.min(MAX_DELAY_MS));
    Duration::from_millis(ms)
}

/// A raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request. Returns `Ok` for any HTTP response, whatever its
/// status; `Err` only when no response arrived.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &Url,
        request: &GenerateContentRequest,
    ) -> Result<HttpResponse, SummaryError>;
}

/// Blocking reqwest transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, SummaryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummaryError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(
        &self,
        url: &Url,
        request: &GenerateContentRequest,
    ) -> Result<HttpResponse, SummaryError> {
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .map_err(|e| SummaryError::Transport {
                status: e.status().map(|s| s.as_u16()),
                detail: e.without_url().to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| SummaryError::Transport {
            status: Some(status),
            detail: format!("failed to read response body: {}", e.without_url()),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// States of one retry-controlled exchange.
#[derive(Debug)]
enum CallState {
    Attempting(u32),
    RateLimited(u32),
    Success(Summary),
    Failed(SummaryError),
}

/// Builds summary requests and sends them with 429 backoff.
pub struct SummarizationClient {
    config: SummarizerConfig,
    transport: Arc<dyn Transport>,
    url: Url,
}

impl SummarizationClient {
    /// Create a client from `config`, building a reqwest transport unless one
    /// was injected.
    pub fn new(config: &SummarizerConfig) -> Result<Self, SummaryError> {
        let url = config.request_url()?;
        let transport: Arc<dyn Transport> = match config.transport {
            Some(ref transport) => Arc::clone(transport),
            None => Arc::new(ReqwestTransport::new(Duration::from_secs(
                config.request_timeout_secs,
            ))?),
        };
        Ok(Self {
            config: config.clone(),
            transport,
            url,
        })
    }

    /// Summarise extracted document text in a single-part request.
    pub fn summarize_text(&self, text: &str, word_count: u32) -> Result<Summary, SummaryError> {
        info!(
            "Summarising {} chars of text in ~{} words",
            text.chars().count(),
            word_count
        );
        self.call_with_retry(&GenerateContentRequest::for_text(text, word_count))
    }

    /// Summarise rendered pages: one instruction part, then one PNG part per page.
    pub fn summarize_images(
        &self,
        images: &[Vec<u8>],
        word_count: u32,
    ) -> Result<Summary, SummaryError> {
        info!(
            "Summarising {} page images in ~{} words",
            images.len(),
            word_count
        );
        self.call_with_retry(&GenerateContentRequest::for_images(images, word_count))
    }

    /// Send `request`, retrying on HTTP 429 with capped exponential backoff.
    ///
    /// At most `max_retries + 1` requests are made.
    pub fn call_with_retry(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Summary, SummaryError> {
        let max_attempts = self.config.max_attempts();
        let mut state = CallState::Attempting(0);

        loop {
            state = match state {
                CallState::Attempting(attempt) => {
                    if let Some(ref cb) = self.config.progress_callback {
                        cb.on_request_attempt(attempt, max_attempts);
                    }
                    debug!("Attempt {}/{}", attempt + 1, max_attempts);
                    self.attempt(attempt, request)
                }
                CallState::RateLimited(attempt) => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "API rate limit exceeded. Retrying in {:.2} seconds ({}/{})",
                        delay.as_secs_f64(),
                        attempt + 1,
                        self.config.max_retries
                    );
                    if let Some(ref cb) = self.config.progress_callback {
                        cb.on_rate_limited(attempt, delay);
                    }
                    (self.config.delay)(delay);
                    CallState::Attempting(attempt + 1)
                }
                CallState::Success(summary) => {
                    if let Some(ref cb) = self.config.progress_callback {
                        cb.on_summary_complete(true);
                    }
                    return Ok(summary);
                }
                CallState::Failed(err) => {
                    warn!("API call failed: {}", err);
                    if let Some(ref cb) = self.config.progress_callback {
                        cb.on_summary_complete(false);
                    }
                    return Err(err);
                }
            };
        }
    }

    /// One request/response exchange and the transition it implies.
    fn attempt(&self, attempt: u32, request: &GenerateContentRequest) -> CallState {
        let response = match self.transport.post_json(&self.url, request) {
            Ok(response) => response,
            Err(err) => return CallState::Failed(err),
        };

        if response.status == STATUS_TOO_MANY_REQUESTS {
            return if attempt < self.config.max_retries {
                CallState::RateLimited(attempt)
            } else {
                CallState::Failed(SummaryError::RateLimited {
                    attempts: attempt + 1,
                })
            };
        }

        if !response.is_success() {
            return CallState::Failed(SummaryError::Transport {
                status: Some(response.status),
                detail: error_detail(&response.body),
            });
        }

        match parse_summary(&response.body) {
            Ok(summary) => CallState::Success(summary),
            Err(err) => CallState::Failed(err),
        }
    }
}

/// Interpret a 2xx body.
///
/// Not JSON → [`SummaryError::MalformedResponse`]. JSON without
/// `candidates[0].content.parts[0].text` → [`Summary::NotGenerated`].
pub fn parse_summary(body: &str) -> Result<Summary, SummaryError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SummaryError::MalformedResponse {
            detail: e.to_string(),
        })?;

    let text = serde_json::from_value::<GenerateContentResponse>(value)
        .ok()
        .and_then(|r| r.first_text().map(str::to_owned));

    Ok(match text {
        Some(text) => Summary::Generated(text),
        None => {
            warn!("Response carried no candidate text");
            Summary::NotGenerated
        }
    })
}

/// Pull `error.message` out of a Google API error body, else return a
/// truncated copy of the raw body.
fn error_detail(body: &str) -> String {
    const MAX_LEN: usize = 200;

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value["error"]["message"].as_str() {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_LEN) {
        Some((cut, _)) => format!("{}\u{2026}", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
