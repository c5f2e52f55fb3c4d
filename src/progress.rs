//! Progress-callback trait for summarisation events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummarizerConfigBuilder::progress_callback`] to hear about
//! extraction, the text/image decision, and each API attempt as they happen.
//! The library never prints; the CLI turns these events into terminal output.
//!
//! # Example
//!
//! ```rust
//! use pdf_summarize::{SummarizerConfig, SummaryProgressCallback};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct Log;
//!
//! impl SummaryProgressCallback for Log {
//!     fn on_rate_limited(&self, attempt: u32, delay: Duration) {
//!         eprintln!("attempt {attempt} rate limited, waiting {delay:?}");
//!     }
//! }
//!
//! let config = SummarizerConfig::builder()
//!     .progress_callback(Arc::new(Log))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::SummaryMode;
use std::sync::Arc;
use std::time::Duration;

/// Called by the summariser as it works through a document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called before the text layer is read.
    fn on_extraction_start(&self) {}

    /// Called once the text layer has been read.
    ///
    /// # Arguments
    /// * `chars` — characters of extracted text, whitespace included
    fn on_text_extracted(&self, chars: usize) {
        let _ = chars;
    }

    /// Called when the summariser commits to text or image mode.
    fn on_mode_selected(&self, mode: SummaryMode) {
        let _ = mode;
    }

    /// Called after every page has been rendered in image mode.
    fn on_pages_rendered(&self, pages: usize) {
        let _ = pages;
    }

    /// Called just before each API request is sent.
    ///
    /// # Arguments
    /// * `attempt`      — 0-indexed attempt number
    /// * `max_attempts` — `max_retries + 1`
    fn on_request_attempt(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called when the API returned 429 and the caller is about to wait.
    fn on_rate_limited(&self, attempt: u32, delay: Duration) {
        let _ = (attempt, delay);
    }

    /// Called once the exchange reaches a terminal state.
    fn on_summary_complete(&self, succeeded: bool) {
        let _ = succeeded;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummarizerConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
