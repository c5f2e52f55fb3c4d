//! Document extraction via pdfium: the text layer, or every page as a PNG.
//!
//! Each call opens the document, walks its pages and drops it before
//! returning. `PdfDocument` closes the underlying pdfium handle in `Drop`, so
//! the handle is released on every path, including early `?` returns.

use crate::error::SummaryError;
use crate::pipeline::{encode, input};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF user-space units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Source of document content. [`PdfiumExtractor`] is the real one; tests
/// inject fakes through [`crate::config::SummarizerConfigBuilder::extractor`].
pub trait DocumentExtractor: Send + Sync {
    /// Concatenated text layer of every page, in document order.
    fn extract_text(&self, path: &Path) -> Result<String, SummaryError>;

    /// Every page rendered at `dpi` as PNG bytes, in document order.
    fn extract_page_images(&self, path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, SummaryError>;
}

/// pdfium-backed extractor.
#[derive(Debug, Clone, Default)]
pub struct PdfiumExtractor {
    password: Option<String>,
}

impl PdfiumExtractor {
    pub fn new(password: Option<String>) -> Self {
        Self { password }
    }
}

impl DocumentExtractor for PdfiumExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, SummaryError> {
        extract_text(path, self.password.as_deref())
    }

    fn extract_page_images(&self, path: &Path, dpi: u32) -> Result<Vec<Vec<u8>>, SummaryError> {
        extract_page_images(path, dpi, self.password.as_deref())
    }
}

/// Read the text layer of every page and join it in page order.
///
/// Pages are separated by a newline. A scanned document yields an empty or
/// whitespace-only string, not an error.
pub fn extract_text(path: &Path, password: Option<&str>) -> Result<String, SummaryError> {
    let path = input::validate_pdf(path)?;
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, &path, password)?;

    let mut full_text = String::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let text = page.text().map_err(|e| SummaryError::ParseFailure {
            path: path.clone(),
            detail: format!("text layer of page {}: {:?}", idx + 1, e),
        })?;
        if idx > 0 {
            full_text.push('\n');
        }
        full_text.push_str(&text.all());
    }

    info!(
        "Extracted {} chars of text from {}",
        full_text.chars().count(),
        path.display()
    );
    Ok(full_text)
}

/// Render every page at `dpi` and return the PNG bytes, in page order.
pub fn extract_page_images(
    path: &Path,
    dpi: u32,
    password: Option<&str>,
) -> Result<Vec<Vec<u8>>, SummaryError> {
    let path = input::validate_pdf(path)?;
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, &path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    let render_config = PdfRenderConfig::new().scale_page_by_factor(render_scale(dpi));

    let mut images = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| SummaryError::RenderFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {}/{} → {}x{} px",
            idx + 1,
            total_pages,
            image.width(),
            image.height()
        );

        let png = encode::encode_png(&image).map_err(|e| SummaryError::RenderFailed {
            page: idx + 1,
            detail: format!("PNG encoding failed: {}", e),
        })?;
        images.push(png);
    }

    info!("Rendered {} pages at {} DPI", images.len(), dpi);
    Ok(images)
}

/// Scale factor that turns PDF points into pixels at `dpi`.
pub fn render_scale(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, SummaryError> {
    pdfium
        .load_pdf_from_file(path, password)
        .map_err(|e| classify_open_error(path, password.is_some(), format!("{:?}", e)))
}

/// Map a pdfium load failure to a password error when pdfium blames the
/// password, else to [`SummaryError::ParseFailure`].
fn classify_open_error(path: &Path, password_given: bool, detail: String) -> SummaryError {
    let path = path.to_path_buf();
    if !detail.to_ascii_lowercase().contains("password") {
        return SummaryError::ParseFailure { path, detail };
    }
    if password_given {
        SummaryError::WrongPassword { path }
    } else {
        SummaryError::PasswordRequired { path }
    }
}

/// Bind to a pdfium library.
///
/// Resolution order: `PDFIUM_LIB_PATH`, then the working directory, then the
/// system library search path.
pub fn bind_pdfium() -> Result<Pdfium, SummaryError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(explicit) => Pdfium::bind_to_library(PathBuf::from(explicit)),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| SummaryError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn render_scale_matches_dpi() {
        assert!((render_scale(72) - 1.0).abs() < f32::EPSILON);
        assert!((render_scale(300) - 300.0 / 72.0).abs() < 1e-6);
    }

    #[test]
    fn password_failures_are_told_apart() {
        let path = Path::new("locked.pdf");
        let detail = "PdfiumLibraryInternalError(PasswordError)".to_string();

        assert!(matches!(
            classify_open_error(path, false, detail.clone()),
            SummaryError::PasswordRequired { .. }
        ));
        assert!(matches!(
            classify_open_error(path, true, detail),
            SummaryError::WrongPassword { .. }
        ));
        assert!(matches!(
            classify_open_error(path, true, "PdfiumLibraryInternalError(FormatError)".into()),
            SummaryError::ParseFailure { .. }
        ));
    }

    #[test]
    fn missing_file_fails_before_pdfium() {
        let err = extract_text(Path::new("no/such/file.pdf"), None).unwrap_err();
        assert!(matches!(err, SummaryError::NotFound { .. }));
        let msg = err.to_string();
        assert!(msg.starts_with("Error:"));
        assert!(msg.contains("no/such/file.pdf"));

        let err = extract_page_images(Path::new("no/such/file.pdf"), 300, None).unwrap_err();
        assert!(matches!(err, SummaryError::NotFound { .. }));
    }

    #[test]
    fn non_pdf_fails_before_pdfium() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"plain text, not a pdf").unwrap();
        let err = PdfiumExtractor::default()
            .extract_text(tmp.path())
            .unwrap_err();
        assert!(matches!(err, SummaryError::ParseFailure { .. }));
    }
}
