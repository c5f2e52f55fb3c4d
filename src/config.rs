//! Configuration for the summariser.
//!
//! Everything the library needs at run time (API key, endpoint, retry budget,
//! and the injectable collaborators) lives in one [`SummarizerConfig`], built
//! through [`SummarizerConfigBuilder`]. Nothing is read from globals.

use crate::error::SummaryError;
use crate::pipeline::client::Transport;
use crate::pipeline::extract::DocumentExtractor;
use crate::progress::ProgressCallback;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Gemini `generateContent` endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Wait step between retry attempts. Receives the computed backoff delay.
pub type DelayFn = Arc<dyn Fn(Duration) + Send + Sync>;

/// Configuration for summarising a PDF.
///
/// Built via [`SummarizerConfig::builder()`] or using
/// [`SummarizerConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_summarize::SummarizerConfig;
///
/// let config = SummarizerConfig::builder()
///     .api_key("my-key")
///     .max_retries(5)
///     .dpi(200)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_attempts(), 6);
/// ```
#[derive(Clone)]
pub struct SummarizerConfig {
    /// API key, sent as the `key` query parameter. Empty means "not sent";
    /// a hosting proxy may inject it instead.
    pub api_key: String,

    /// Full `generateContent` URL without the key. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Retries after the first attempt on HTTP 429. Default: 3 (4 attempts total).
    pub max_retries: u32,

    /// Rendering resolution for the image fallback. Range: 72–600. Default: 300.
    pub dpi: u32,

    /// Per-request HTTP timeout in seconds. Default: 120.
    ///
    /// Image requests for long documents carry tens of megabytes of base64.
    pub request_timeout_secs: u64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Pre-constructed extractor. If None, pdfium is used.
    pub extractor: Option<Arc<dyn DocumentExtractor>>,

    /// Pre-constructed transport. If None, a blocking reqwest client is built.
    pub transport: Option<Arc<dyn Transport>>,

    /// Wait step between retries. Default: `std::thread::sleep`.
    pub delay: DelayFn,

    /// Optional progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_retries: 3,
            dpi: 300,
            request_timeout_secs: 120,
            password: None,
            extractor: None,
            transport: None,
            delay: Arc::new(std::thread::sleep),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("endpoint", &self.endpoint)
            .field("max_retries", &self.max_retries)
            .field("dpi", &self.dpi)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn DocumentExtractor>"))
            .field("transport", &self.transport.as_ref().map(|_| "<dyn Transport>"))
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl SummarizerConfig {
    /// Create a new builder for `SummarizerConfig`.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Total attempts the retry caller may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// The endpoint with the API key attached as a query parameter.
    pub fn request_url(&self) -> Result<Url, SummaryError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            SummaryError::InvalidConfig(format!("endpoint '{}' is not a URL: {e}", self.endpoint))
        })?;
        if !self.api_key.is_empty() {
            url.query_pairs_mut().append_pair("key", &self.api_key);
        }
        Ok(url)
    }
}

/// Builder for [`SummarizerConfig`].
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl fmt::Debug for SummarizerConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl SummarizerConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn DocumentExtractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Replace the wait step between retries (tests pass a recorder).
    pub fn delay(mut self, delay: DelayFn) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, SummaryError> {
        let c = &self.config;
        if !(72..=600).contains(&c.dpi) {
            return Err(SummaryError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.request_timeout_secs == 0 {
            return Err(SummaryError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        c.request_url()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = SummarizerConfig::default();
        assert_eq!(c.max_retries, 3);
        assert_eq!(c.max_attempts(), 4);
        assert_eq!(c.dpi, 300);
        assert_eq!(c.endpoint, DEFAULT_ENDPOINT);
        assert!(c.api_key.is_empty());
    }

    #[test]
    fn request_url_appends_key() {
        let c = SummarizerConfig::builder()
            .api_key("abc 123")
            .build()
            .unwrap();
        let url = c.request_url().unwrap();
        assert_eq!(url.query(), Some("key=abc+123"));
        assert!(url.as_str().starts_with(DEFAULT_ENDPOINT));
    }

    #[test]
    fn request_url_without_key_has_no_query() {
        let c = SummarizerConfig::default();
        assert_eq!(c.request_url().unwrap().query(), None);
    }

    #[test]
    fn build_rejects_bad_endpoint() {
        let err = SummarizerConfig::builder()
            .endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, SummaryError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_out_of_range_dpi() {
        assert!(SummarizerConfig::builder().dpi(10).build().is_err());
        assert!(SummarizerConfig::builder().dpi(1200).build().is_err());
        assert!(SummarizerConfig::builder().dpi(72).build().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = SummarizerConfig::builder()
            .api_key("super-secret")
            .password("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
