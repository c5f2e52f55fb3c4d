//! # pdf-summarize
//!
//! Summarise PDF documents with the Gemini `generateContent` API.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract  read the text layer via pdfium
//!  ├─ 2. Decide   non-blank text → single text prompt
//!  │              blank text     → render every page at 300 DPI
//!  ├─ 3. Encode   PNG → base64 inlineData parts (image mode only)
//!  ├─ 4. Request  POST generateContent, retrying 429 with capped backoff
//!  └─ 5. Output   Summary::Generated(text) or Summary::NotGenerated
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_summarize::{summarize_pdf, SummarizerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummarizerConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .build()?;
//!     let output = summarize_pdf("document.pdf", 200, &config)?;
//!     println!("{}", output.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-summarize` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Retry policy
//!
//! Only HTTP 429 is retried, up to `max_retries` times (default 3), waiting
//! `min(1000 * 2^n, 60000)` ms before retry `n + 1`. The wait step is a
//! configurable function so callers and tests can skip real sleeping.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DelayFn, SummarizerConfig, SummarizerConfigBuilder, DEFAULT_ENDPOINT};
pub use error::SummaryError;
pub use output::{Summary, SummaryMode, SummaryOutput, NO_SUMMARY_MESSAGE};
pub use pipeline::client::{backoff_delay, HttpResponse, SummarizationClient, Transport};
pub use pipeline::extract::{DocumentExtractor, PdfiumExtractor};
pub use pipeline::payload::GenerateContentRequest;
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use prompts::{parse_word_count, DEFAULT_WORD_COUNT};
pub use summarize::{has_text_layer, summarize_pdf, summarize_to_file};
