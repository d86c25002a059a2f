//! Input resolution: normalise a user-supplied path and validate the file.
//!
//! Paths typed at a prompt or pasted from a file manager often arrive wrapped
//! in quotes. We strip those, then check that the file exists, is readable,
//! and starts with the PDF magic bytes (`%PDF`) so callers get a meaningful
//! error rather than a pdfium failure.

use crate::error::Pdf2DocxError;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

/// Strip surrounding whitespace and matching single or double quotes.
pub fn normalize_input(raw: &str) -> &str {
    let mut s = raw.trim();
    loop {
        let stripped = s
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .or_else(|| s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')));
        match stripped {
            Some(inner) => s = inner.trim(),
            None => return s,
        }
    }
}

/// Resolve a user-supplied path to a readable local PDF.
pub fn resolve_input(raw: &str) -> Result<PathBuf, Pdf2DocxError> {
    let cleaned = normalize_input(raw);
    if cleaned.is_empty() {
        return Err(Pdf2DocxError::InvalidInput {
            input: raw.to_string(),
        });
    }
    resolve_local(cleaned)
}

/// Validate existence, read permission and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<PathBuf, Pdf2DocxError> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(Pdf2DocxError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            let read = f.read(&mut magic).unwrap_or(0);
            if read < 4 || &magic != b"%PDF" {
                return Err(Pdf2DocxError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2DocxError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2DocxError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
