//! Result types returned by the summarisation entry points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown when the API answered but produced no candidate text.
pub const NO_SUMMARY_MESSAGE: &str = "No summary was generated.";

/// The outcome of a successful API exchange.
///
/// `NotGenerated` is a soft success: the API returned 2xx JSON without a
/// `candidates[0].content.parts[0].text` field. It is kept distinct from
/// [`crate::error::SummaryError`] so callers can treat it however they like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Summary {
    /// The model returned summary text.
    Generated(String),
    /// The response carried no candidate content.
    NotGenerated,
}

impl Summary {
    /// The printable text of this summary.
    pub fn as_text(&self) -> &str {
        match self {
            Summary::Generated(text) => text,
            Summary::NotGenerated => NO_SUMMARY_MESSAGE,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Summary::Generated(_))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Which content the request was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMode {
    /// The document had a text layer; the text was sent as a single prompt.
    TextLayer,
    /// No text layer; every page was rendered and sent as an image.
    PageImages,
}

/// Everything [`crate::summarize_pdf`] reports about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub summary: Summary,
    pub mode: SummaryMode,
    /// Target length that was requested from the model.
    pub word_count: u32,
    /// Characters of extracted text (before trimming).
    pub text_chars: usize,
    /// Number of page images sent; zero in text mode.
    pub pages_rendered: usize,
    pub duration_ms: u64,
}
