//! Conversion entry points.
//!
//! The driver runs strictly in page order on the calling thread: extract
//! every selected page, compute the font profile across all of them, then
//! classify page by page. Nothing is written until the whole document has
//! been built, so a failed run never leaves a partial file behind.

use crate::config::ConversionConfig;
use crate::error::{ConversionWarning, Pdf2DocxError};
use crate::model::{Document, DocumentPage, Line, PageContent, PageFontProfile};
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::extract::{PdfBackend, PdfiumBackend};
use crate::pipeline::{classify, docx, input, lines, profile};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF file into a classified [`Document`].
///
/// This is the primary entry point for the library. No file is written;
/// use [`convert_to_file`] for that.
///
/// # Arguments
/// * `input` — Path to a PDF; surrounding quotes and whitespace are ignored
/// * `config` — Conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some pages failed
/// (check `output.page_errors`) or no text was found at all
/// (check `output.warnings`).
///
/// # Errors
/// Returns `Err(Pdf2DocxError)` only for fatal errors:
/// - File not found / permission denied / not a PDF
/// - Corrupt or encrypted PDF
/// - pdfium could not be loaded
/// - The page selection matches no page of the document
pub fn convert(input_str: impl AsRef<str>, config: &ConversionConfig) -> Result<ConversionOutput, Pdf2DocxError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_input(input_str)?;

    // ── Step 2: Extract fragments ────────────────────────────────────────
    let backend = resolve_backend(config);
    let extract_start = Instant::now();
    let extracted = backend.extract(&pdf_path, &config.pages)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let metadata = extracted.metadata;
    let total_pages = metadata.page_count;
    let selected = extracted.pages.len();
    if selected == 0 && total_pages > 0 {
        return Err(Pdf2DocxError::InvalidConfig(format!(
            "page selection {:?} matches none of the {} pages",
            config.pages, total_pages
        )));
    }
    info!(
        "Extracted {}/{} pages in {}ms",
        selected, total_pages, extract_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(selected);
    }

    // ── Step 3: Assemble lines and build the font profile ────────────────
    let classify_start = Instant::now();
    let assembled: Vec<_> = extracted
        .pages
        .into_iter()
        .map(|page| page.map(|content| AssembledPage::new(content, config)))
        .collect();
    let profile = document_profile(assembled.iter().filter_map(|p| p.as_ref().ok()), config);

    // ── Step 4: Classify page by page ────────────────────────────────────
    let mut document = Document::default();
    let mut page_errors = Vec::new();
    let mut empty_pages = 0;

    for page in &assembled {
        match page {
            Ok(page) => {
                let number = page.content.number;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_start(number, selected);
                }
                let classified = page.classify(&profile, config);
                debug!("Page {}: {} blocks", number, classified.blocks.len());
                if classified.blocks.is_empty() {
                    empty_pages += 1;
                }
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(number, selected, classified.blocks.len());
                }
                document.pages.push(classified);
            }
            Err(e) => {
                warn!("Skipping page {}: {}", e.page(), e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(e.page(), selected, &e.to_string());
                }
                page_errors.push(e.clone());
            }
        }
    }
    let classify_duration_ms = classify_start.elapsed().as_millis() as u64;

    // ── Step 5: Stats and warnings ───────────────────────────────────────
    let mut warnings: Vec<ConversionWarning> = page_errors
        .iter()
        .cloned()
        .map(ConversionWarning::PageSkipped)
        .collect();
    // Pages that failed are already reported; only pages that were read and
    // held no text make the document empty.
    if document.is_empty() && !document.pages.is_empty() {
        let warning = ConversionWarning::EmptyDocument {
            pages: document.pages.len(),
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    let mut stats = ConversionStats {
        total_pages,
        processed_pages: document.pages.len(),
        failed_pages: page_errors.len(),
        empty_pages,
        extract_duration_ms,
        classify_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        ..ConversionStats::default()
    };
    stats.count_blocks(&document);

    info!(
        "Conversion complete: {}/{} pages, {} blocks, {}ms total",
        stats.processed_pages,
        selected,
        stats.block_count(),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(selected, stats.processed_pages);
    }

    Ok(ConversionOutput {
        document,
        metadata,
        stats,
        warnings,
        page_errors,
    })
}

/// Convert a PDF and write the DOCX to `output_path`, replacing any existing
/// file.
///
/// Uses atomic write (temp file + rename) to prevent partial files. An empty
/// document is still written.
pub fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    let mut output = convert(input_str, config)?;
    let path = output_path.as_ref();

    let docx = docx::build_docx(&output.document, config);
    docx::save_docx(docx, path)?;
    info!("Saved {}", path.display());

    output.stats.output_path = Some(path.to_path_buf());
    Ok(output)
}

/// Convert a PDF and write the DOCX to the preset's fixed filename in the
/// working directory (see [`crate::FormattingLevel::default_output_name`]).
pub fn convert_to_default_path(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2DocxError> {
    let path = PathBuf::from(config.level.default_output_name());
    convert_to_file(input_str, path, config)
}

/// Convert PDF bytes in memory.
///
/// The bytes are written to a managed [`tempfile`] that is removed on return.
pub fn convert_from_bytes(bytes: &[u8], config: &ConversionConfig) -> Result<ConversionOutput, Pdf2DocxError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| Pdf2DocxError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2DocxError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(&path, config)
}

/// Extract PDF metadata without converting content.
pub fn inspect(input_str: impl AsRef<str>, config: &ConversionConfig) -> Result<DocumentMetadata, Pdf2DocxError> {
    let pdf_path = input::resolve_input(input_str.as_ref())?;
    resolve_backend(config).metadata(&pdf_path)
}

/// Run line assembly, profiling and classification over already extracted
/// pages. Pure: no I/O and no callbacks.
pub fn classify_pages(pages: &[PageContent], config: &ConversionConfig) -> Document {
    let assembled: Vec<AssembledPage> = pages
        .iter()
        .cloned()
        .map(|content| AssembledPage::new(content, config))
        .collect();
    let profile = document_profile(assembled.iter(), config);
    Document {
        pages: assembled.iter().map(|p| p.classify(&profile, config)).collect(),
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Use the injected backend when present, pdfium otherwise.
fn resolve_backend(config: &ConversionConfig) -> Arc<dyn PdfBackend> {
    match config.backend {
        Some(ref backend) => Arc::clone(backend),
        None => Arc::new(PdfiumBackend::new(
            config.pdfium_library_path.clone(),
            config.thresholds.clone(),
        )),
    }
}

struct AssembledPage {
    content: PageContent,
    lines: Vec<Line>,
}

impl AssembledPage {
    fn new(content: PageContent, config: &ConversionConfig) -> Self {
        let lines = lines::assemble_lines(content.number, &content.fragments, &config.thresholds);
        Self { content, lines }
    }

    fn classify(&self, profile: &PageFontProfile, config: &ConversionConfig) -> DocumentPage {
        DocumentPage {
            number: self.content.number,
            blocks: classify::classify_page(&self.lines, &self.content.tables, profile, config),
        }
    }
}

fn document_profile<'a>(
    pages: impl Iterator<Item = &'a AssembledPage>,
    config: &ConversionConfig,
) -> PageFontProfile {
    profile::compute_profile(
        pages.map(|p| p.lines.as_slice()),
        config.thresholds.font_size_tolerance,
    )
}
