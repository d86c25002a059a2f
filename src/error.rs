//! Error types for the edgequake-pdf2docx library.
//!
//! Three types reflect three distinct failure modes:
//!
//! * [`Pdf2DocxError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing input, not a PDF, pdfium unavailable, output not writable).
//!   Returned as `Err(Pdf2DocxError)` from the top-level `convert*` functions.
//!   No output file is written when one of these is returned.
//!
//! * [`PageError`] — **Non-fatal**: a single page could not be decoded but
//!   every other page is fine. The page is skipped and the error is stored in
//!   [`crate::output::ConversionOutput::page_errors`].
//!
//! * [`ConversionWarning`] — conditions worth surfacing at the end of a run
//!   that still produce an output document (skipped pages, no text at all).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2docx library.
#[derive(Debug, Error)]
pub enum Pdf2DocxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is empty once quotes and whitespace are stripped.
    #[error("Invalid input '{input}': expected a path to a PDF file")]
    InvalidInput { input: String },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The PDF is password-protected. Decryption is not supported.
    #[error("PDF '{path}' is encrypted; password-protected documents are not supported.\nTry: qpdf --decrypt input.pdf output.pdf")]
    EncryptedPdf { path: PathBuf },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Text extraction needs the pdfium shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n\
  • Place libpdfium next to the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output DOCX file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2DocxError {
    /// `true` for problems with the input file itself (missing, unreadable,
    /// not a PDF, corrupt or encrypted).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Pdf2DocxError::FileNotFound { .. }
                | Pdf2DocxError::PermissionDenied { .. }
                | Pdf2DocxError::InvalidInput { .. }
                | Pdf2DocxError::NotAPdf { .. }
                | Pdf2DocxError::CorruptPdf { .. }
                | Pdf2DocxError::EncryptedPdf { .. }
        )
    }
}

/// A non-fatal error for a single page.
///
/// The page is skipped; the conversion continues with the next one.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum PageError {
    /// The page could not be loaded or its text layer could not be decoded.
    #[error("Page {page}: text extraction failed: {detail}")]
    ExtractionFailed { page: usize, detail: String },
}

impl PageError {
    /// 1-indexed page number the error refers to.
    pub fn page(&self) -> usize {
        match self {
            PageError::ExtractionFailed { page, .. } => *page,
        }
    }
}

/// Conditions reported at the end of a run that did produce output.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ConversionWarning {
    /// A page was skipped because extraction failed.
    #[error("{0}")]
    PageSkipped(PageError),

    /// No extractable text was found on any page (e.g. a scanned document).
    /// An empty document is still written.
    #[error("No extractable text found in {pages} page(s); the output document is empty (scanned PDFs need OCR)")]
    EmptyDocument { pages: usize },
}
