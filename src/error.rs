//! Error types for the pdf-summarize library.
//!
//! Every failure the library can produce is a [`SummaryError`]. Callers get a
//! structured value they can match on; the CLI is the only place that turns
//! it into printed text.
//!
//! A response that parses as JSON but carries no candidate text is **not** an
//! error. It comes back as [`crate::output::Summary::NotGenerated`], so a soft
//! "nothing generated" outcome can always be told apart from a hard failure.
//!
//! Display strings start with `Error:` so they can be printed verbatim in the
//! summary block.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-summarize library.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Error: The file '{}' was not found.", .path.display())]
    NotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Error: Permission denied reading '{}'", .path.display())]
    PermissionDenied { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The file exists but pdfium could not open or parse it.
    #[error("Error: Failed to extract text from PDF '{}'. Details: {detail}", .path.display())]
    ParseFailure { path: PathBuf, detail: String },

    /// The PDF is encrypted and no password was supplied.
    #[error("Error: The PDF '{}' is password-protected. Pass --password.", .path.display())]
    PasswordRequired { path: PathBuf },

    /// A password was supplied but pdfium rejected it.
    #[error("Error: Wrong password for PDF '{}'.", .path.display())]
    WrongPassword { path: PathBuf },

    /// pdfium returned an error while rasterising or encoding a page.
    #[error("Error: Failed to render page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── API errors ────────────────────────────────────────────────────────
    /// The request failed in transit or the API answered with a non-2xx,
    /// non-retryable status. `status` is `None` when no response arrived.
    #[error("Error: Failed to get summary. {}", transport_detail(.status, .detail))]
    Transport { status: Option<u16>, detail: String },

    /// HTTP 429 was still being returned when the retry budget ran out.
    #[error("Error: Failed to get summary. Rate limit still exceeded after {attempts} attempts.")]
    RateLimited { attempts: u32 },

    /// A 2xx response whose body is not JSON at all.
    #[error("Error: Failed to get summary. The API response was not valid JSON: {detail}")]
    MalformedResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the summary output file.
    #[error("Error: Failed to write output file '{}': {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Error: Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Error: Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide,\n\
or set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),
}

impl SummaryError {
    /// The HTTP status attached to this error, if one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SummaryError::Transport { status, .. } => *status,
            SummaryError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// `true` for failures that happened before any network call was made.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            SummaryError::NotFound { .. }
                | SummaryError::PermissionDenied { .. }
                | SummaryError::ParseFailure { .. }
                | SummaryError::PasswordRequired { .. }
                | SummaryError::WrongPassword { .. }
                | SummaryError::RenderFailed { .. }
                | SummaryError::PdfiumBindingFailed(_)
        )
    }
}

fn transport_detail(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code}: {detail}"),
        None => format!("Request failed: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_path() {
        let e = SummaryError::NotFound {
            path: PathBuf::from("missing/report.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Error:"), "got: {msg}");
        assert!(msg.contains("missing/report.pdf"), "got: {msg}");
    }

    #[test]
    fn password_errors_are_extraction_errors() {
        let required = SummaryError::PasswordRequired {
            path: PathBuf::from("locked.pdf"),
        };
        let wrong = SummaryError::WrongPassword {
            path: PathBuf::from("locked.pdf"),
        };
        assert!(required.to_string().contains("password-protected"));
        assert!(wrong.to_string().starts_with("Error: Wrong password"));
        assert!(required.is_extraction_error() && wrong.is_extraction_error());
    }

    #[test]
    fn transport_display_with_status() {
        let e = SummaryError::Transport {
            status: Some(500),
            detail: "internal".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Failed to get summary"), "got: {msg}");
        assert!(msg.contains("HTTP 500"), "got: {msg}");
        assert_eq!(e.http_status(), Some(500));
    }

    #[test]
    fn transport_display_without_status() {
        let e = SummaryError::Transport {
            status: None,
            detail: "connection refused".into(),
        };
        assert!(e.to_string().contains("connection refused"));
        assert_eq!(e.http_status(), None);
    }

    #[test]
    fn rate_limited_reports_attempts() {
        let e = SummaryError::RateLimited { attempts: 4 };
        assert!(e.to_string().contains("4 attempts"));
        assert_eq!(e.http_status(), Some(429));
        assert!(!e.is_extraction_error());
    }

    #[test]
    fn extraction_errors_are_classified() {
        assert!(SummaryError::ParseFailure {
            path: PathBuf::from("a.pdf"),
            detail: "bad xref".into(),
        }
        .is_extraction_error());
        assert!(!SummaryError::MalformedResponse {
            detail: "eof".into()
        }
        .is_extraction_error());
    }
}
