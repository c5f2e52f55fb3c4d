//! Input validation: make sure a local path is a readable PDF before pdfium
//! is asked to open it.
//!
//! pdfium's own error for a missing or non-PDF file is an opaque code, so
//! existence, permission and the `%PDF` magic bytes are checked here to give
//! callers a precise [`SummaryError`].

use crate::error::SummaryError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_pdf(path: &Path) -> Result<PathBuf, SummaryError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(SummaryError::NotFound { path });
    }

    match File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(SummaryError::ParseFailure {
                    path,
                    detail: format!("not a PDF file (first bytes: {magic:?})"),
                });
            }
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(SummaryError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(SummaryError::NotFound { path });
        }
    }

    debug!("Validated local PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = validate_pdf(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, SummaryError::NotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here.pdf"));
    }

    #[test]
    fn non_pdf_is_parse_failure() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"PK\x03\x04 not a pdf").unwrap();
        let err = validate_pdf(tmp.path()).unwrap_err();
        assert!(matches!(err, SummaryError::ParseFailure { .. }), "got {err:?}");
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n").unwrap();
        let path = validate_pdf(tmp.path()).unwrap();
        assert_eq!(path, tmp.path());
    }
}
