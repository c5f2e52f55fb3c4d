//! Top-level entry points: extract, choose text or images, summarise.
//!
//! The text layer is always read first. If it holds anything besides
//! whitespace, the text is sent as a single prompt and the pages are never
//! rendered. Otherwise every page is rendered and sent as an image. The two
//! paths never mix.

use crate::config::SummarizerConfig;
use crate::error::SummaryError;
use crate::output::{SummaryMode, SummaryOutput};
use crate::pipeline::client::SummarizationClient;
use crate::pipeline::extract::{DocumentExtractor, PdfiumExtractor};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Summarise a PDF in approximately `word_count` words.
///
/// # Errors
/// Extraction failures (missing file, unparseable PDF, render failure) are
/// returned before any request is sent. API failures are returned after the
/// retry budget is spent. A response with no candidate text is **not** an
/// error: check `output.summary` for [`crate::Summary::NotGenerated`].
///
/// # Example
/// ```rust,no_run
/// use pdf_summarize::{summarize_pdf, SummarizerConfig};
///
/// let config = SummarizerConfig::builder().api_key("my-key").build()?;
/// let output = summarize_pdf("report.pdf", 200, &config)?;
/// println!("{}", output.summary);
/// # Ok::<(), pdf_summarize::SummaryError>(())
/// ```
pub fn summarize_pdf(
    input: impl AsRef<Path>,
    word_count: u32,
    config: &SummarizerConfig,
) -> Result<SummaryOutput, SummaryError> {
    let start = Instant::now();
    let path = input.as_ref();
    info!("Starting summary: {}", path.display());

    let extractor = resolve_extractor(config);
    let client = SummarizationClient::new(config)?;
    let cb = config.progress_callback.as_ref();

    // ── Step 1: Text layer ───────────────────────────────────────────────
    if let Some(cb) = cb {
        cb.on_extraction_start();
    }
    let text = extractor.extract_text(path)?;
    let text_chars = text.chars().count();
    if let Some(cb) = cb {
        cb.on_text_extracted(text_chars);
    }

    // ── Step 2: Choose mode and summarise ────────────────────────────────
    let (summary, mode, pages_rendered) = if has_text_layer(&text) {
        debug!("Text layer found ({} chars)", text_chars);
        if let Some(cb) = cb {
            cb.on_mode_selected(SummaryMode::TextLayer);
        }
        let summary = client.summarize_text(&text, word_count)?;
        (summary, SummaryMode::TextLayer, 0)
    } else {
        debug!("No text layer; falling back to page images");
        if let Some(cb) = cb {
            cb.on_mode_selected(SummaryMode::PageImages);
        }
        let images = extractor.extract_page_images(path, config.dpi)?;
        if let Some(cb) = cb {
            cb.on_pages_rendered(images.len());
        }
        let summary = client.summarize_images(&images, word_count)?;
        (summary, SummaryMode::PageImages, images.len())
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Summary complete: {:?} mode, generated={}, {}ms",
        mode,
        summary.is_generated(),
        duration_ms
    );

    Ok(SummaryOutput {
        summary,
        mode,
        word_count,
        text_chars,
        pages_rendered,
        duration_ms,
    })
}

/// Summarise a PDF and write the summary text to `output_path`.
///
/// The text goes to an anonymous temp file in the target directory, which is
/// then persisted over `output_path`. A failed write leaves no partial file.
pub fn summarize_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    word_count: u32,
    config: &SummarizerConfig,
) -> Result<SummaryOutput, SummaryError> {
    let output = summarize_pdf(input, word_count, config)?;
    let path = output_path.as_ref();
    let write_err = |source| SummaryError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(write_err)?;
            parent
        }
        None => Path::new("."),
    };

    let mut contents = output.summary.as_text().to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!("Summary written to {}", path.display());
    Ok(output)
}

/// `true` when extracted text holds anything besides whitespace.
pub fn has_text_layer(text: &str) -> bool {
    !text.trim().is_empty()
}

fn resolve_extractor(config: &SummarizerConfig) -> Arc<dyn DocumentExtractor> {
    match config.extractor {
        Some(ref extractor) => Arc::clone(extractor),
        None => Arc::new(PdfiumExtractor::new(config.password.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_not_a_text_layer() {
        assert!(!has_text_layer(""));
        assert!(!has_text_layer(" \n\t \r\n"));
        assert!(has_text_layer("  a  "));
    }

    #[test]
    fn missing_file_fails_without_network() {
        // No transport is injected: reaching the network would need a real
        // endpoint, so a NotFound here proves extraction failed first.
        let config = SummarizerConfig::builder()
            .endpoint("http://127.0.0.1:9/unreachable")
            .build()
            .unwrap();
        let err = summarize_pdf("does/not/exist.pdf", 200, &config).unwrap_err();
        assert!(matches!(err, SummaryError::NotFound { .. }));
        assert!(err.to_string().starts_with("Error:"));
        assert!(err.to_string().contains("does/not/exist.pdf"));
    }
}
