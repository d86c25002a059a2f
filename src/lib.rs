//! # edgequake-pdf2docx
//!
//! Convert PDF documents into editable DOCX files by reconstructing their
//! structure from the native text layer.
//!
//! ## Why this crate?
//!
//! A PDF text layer is a flat list of positioned glyphs: nothing marks a
//! heading, a list item or a table. This crate rebuilds that structure from
//! geometry alone (font sizes, baselines, indentation and column alignment)
//! with small deterministic heuristics, then writes a styled Word document.
//! It runs locally, needs no network access and does no OCR.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     strip quotes, validate the %PDF header
//!  ├─ 2. Extract   positioned fragments + table regions via pdfium
//!  ├─ 3. Lines     baseline clustering, superscript folding, fragment merging
//!  ├─ 4. Profile   document-wide body font size and line spacing
//!  ├─ 5. Classify  headings, bullets, contact lines, paragraphs, tables
//!  └─ 6. Build     styled DOCX, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2docx::{convert_to_file, ConversionConfig, FormattingLevel};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .level(FormattingLevel::Structured)
//!         .build()?;
//!     let output = convert_to_file("document.pdf", "document.docx", &config)?;
//!     eprintln!(
//!         "{} headings, {} paragraphs, {} tables",
//!         output.stats.headings, output.stats.paragraphs, output.stats.tables
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Formatting Levels
//!
//! | Level | Default output file | Reconstructs |
//! |-------|---------------------|--------------|
//! | `minimal`    | `PDF-Enhanced-output.docx`    | paragraphs |
//! | `structured` | `PDF-Advanced-Formatted.docx` | + headings, bullet lists, tables |
//! | `maximal`    | `PDF-Ultra-Formatted.docx`    | + contact lines, heading depth 1–3, indented blocks |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2docx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-pdf2docx = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, FormattingLevel, LayoutThresholds, PageSelection,
};
pub use convert::{
    classify_pages, convert, convert_from_bytes, convert_to_default_path, convert_to_file, inspect,
};
pub use error::{ConversionWarning, PageError, Pdf2DocxError};
pub use model::{
    Block, BlockKind, Document, DocumentPage, Line, PageContent, PageFontProfile, TableRegion,
    TextFragment,
};
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata};
pub use pipeline::extract::{ExtractedPdf, PdfBackend, PdfiumBackend};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
