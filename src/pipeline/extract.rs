//! Fragment extraction: turn a PDF's text layer into positioned fragments.
//!
//! The conversion driver only talks to the [`PdfBackend`] trait. The default
//! [`PdfiumBackend`] reads characters through `pdfium-render` and groups them
//! into [`TextFragment`]s; tests and embedders can supply their own backend
//! through [`crate::config::ConversionConfigBuilder::backend`].
//!
//! ## Library binding
//!
//! pdfium is a shared library loaded at runtime. The backend tries, in order:
//! the configured path, `PDFIUM_LIB_PATH`, the working directory, and finally
//! the system library search path.

use crate::config::{LayoutThresholds, PageSelection};
use crate::error::{PageError, Pdf2DocxError};
use crate::model::{PageContent, TextFragment};
use crate::output::DocumentMetadata;
use crate::pipeline::{lines, table};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a backend read from one PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPdf {
    pub metadata: DocumentMetadata,
    /// One entry per selected page, in page order. A page that could not be
    /// decoded is an `Err` and is skipped by the driver.
    pub pages: Vec<Result<PageContent, PageError>>,
}

/// Source of positioned text for the conversion pipeline.
///
/// Implementations must open the file, read what they need, and release it
/// before returning.
pub trait PdfBackend: Send + Sync {
    /// Extract fragments and table regions for the selected pages.
    fn extract(&self, path: &Path, pages: &PageSelection) -> Result<ExtractedPdf, Pdf2DocxError>;

    /// Read document metadata without extracting any text.
    fn metadata(&self, path: &Path) -> Result<DocumentMetadata, Pdf2DocxError>;
}

/// [`PdfBackend`] over the pdfium shared library.
#[derive(Debug, Clone, Default)]
pub struct PdfiumBackend {
    library_path: Option<PathBuf>,
    thresholds: LayoutThresholds,
}

impl PdfiumBackend {
    pub fn new(library_path: Option<PathBuf>, thresholds: LayoutThresholds) -> Self {
        Self {
            library_path,
            thresholds,
        }
    }

    fn bind(&self) -> Result<Pdfium, Pdf2DocxError> {
        let mut attempts: Vec<String> = Vec::new();

        let explicit = self
            .library_path
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));
        if let Some(path) = explicit {
            let lib = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path.clone()
            };
            match Pdfium::bind_to_library(&lib) {
                Ok(bindings) => {
                    debug!("Bound pdfium from {}", lib.display());
                    return Ok(Pdfium::new(bindings));
                }
                Err(e) => attempts.push(format!("{}: {}", lib.display(), e)),
            }
        }

        let local = Pdfium::pdfium_platform_library_name_at_path("./");
        match Pdfium::bind_to_library(&local) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", local.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {}", local.display(), e)),
        }

        match Pdfium::bind_to_system_library() {
            Ok(bindings) => {
                debug!("Bound system pdfium");
                Ok(Pdfium::new(bindings))
            }
            Err(e) => {
                attempts.push(format!("system library: {}", e));
                Err(Pdf2DocxError::PdfiumBindingFailed(attempts.join("; ")))
            }
        }
    }
}

impl PdfBackend for PdfiumBackend {
    fn extract(&self, path: &Path, selection: &PageSelection) -> Result<ExtractedPdf, Pdf2DocxError> {
        let pdfium = self.bind()?;
        let document = open_document(&pdfium, path)?;
        let metadata = read_metadata(&document);

        let pages = document.pages();
        let total = pages.len() as usize;
        info!("PDF loaded: {} pages", total);

        let mut out = Vec::new();
        for idx in selection.to_indices(total) {
            let number = idx + 1;
            let page = match pages.get(idx as u16) {
                Ok(page) => page,
                Err(e) => {
                    warn!("Page {}: could not be loaded: {:?}", number, e);
                    out.push(Err(PageError::ExtractionFailed {
                        page: number,
                        detail: format!("{:?}", e),
                    }));
                    continue;
                }
            };
            out.push(extract_page(&page, number, &self.thresholds));
        }

        Ok(ExtractedPdf { metadata, pages: out })
    }

    fn metadata(&self, path: &Path) -> Result<DocumentMetadata, Pdf2DocxError> {
        let pdfium = self.bind()?;
        let document = open_document(&pdfium, path)?;
        Ok(read_metadata(&document))
    }
}

fn open_document<'a>(pdfium: &'a Pdfium, path: &Path) -> Result<PdfDocument<'a>, Pdf2DocxError> {
    pdfium.load_pdf_from_file(path, None).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            Pdf2DocxError::EncryptedPdf {
                path: path.to_path_buf(),
            }
        } else {
            Pdf2DocxError::CorruptPdf {
                path: path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

fn read_metadata(document: &PdfDocument<'_>) -> DocumentMetadata {
    let metadata = document.metadata();
    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        page_count: document.pages().len() as usize,
        pdf_version: format!("{:?}", document.version()),
    }
}

fn extract_page(page: &PdfPage<'_>, number: usize, t: &LayoutThresholds) -> Result<PageContent, PageError> {
    let text = page.text().map_err(|e| PageError::ExtractionFailed {
        page: number,
        detail: format!("{:?}", e),
    })?;

    let mut glyphs = Vec::new();
    for ch in text.chars().iter() {
        let Some(c) = ch.unicode_char() else {
            continue;
        };
        let Ok(bounds) = ch.loose_bounds() else {
            continue;
        };
        glyphs.push(Glyph {
            ch: c,
            x0: bounds.left().value,
            y0: bounds.bottom().value,
            x1: bounds.right().value,
            y1: bounds.top().value,
            size: ch.scaled_font_size().value,
            font: ch.font_name(),
            heavy: is_heavy_weight(ch.font_weight()),
        });
    }

    let fragments = group_glyphs(&glyphs, t);
    let page_lines = lines::assemble_lines(number, &fragments, t);
    let tables = table::detect_tables(&page_lines, t);
    debug!(
        "Page {}: {} glyphs → {} fragments, {} tables",
        number,
        glyphs.len(),
        fragments.len(),
        tables.len()
    );

    Ok(PageContent {
        number,
        width: page.width().value,
        height: page.height().value,
        fragments,
        tables,
    })
}

fn is_heavy_weight(weight: Option<PdfFontWeight>) -> bool {
    match weight {
        Some(PdfFontWeight::Weight700Bold | PdfFontWeight::Weight800 | PdfFontWeight::Weight900) => true,
        Some(PdfFontWeight::Custom(w)) => w >= 700,
        _ => false,
    }
}

/// One character as read from the text layer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Glyph {
    pub ch: char,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub size: f32,
    pub font: String,
    /// Font weight reported as 700 or more.
    pub heavy: bool,
}

/// Group glyphs in content order into fragments of one font, size and
/// baseline.
///
/// A fragment ends at a font or size change, a baseline shift, a jump
/// backwards, or a gap wider than `fragment_gap_ratio × size`. Whitespace
/// glyphs and gaps wider than `word_gap_ratio × size` become single spaces.
pub(crate) fn group_glyphs(glyphs: &[Glyph], t: &LayoutThresholds) -> Vec<TextFragment> {
    let mut out: Vec<TextFragment> = Vec::new();
    let mut current: Option<TextFragment> = None;
    let mut pending_space = false;

    for g in glyphs {
        if g.ch.is_whitespace() || g.ch.is_control() {
            pending_space = current.is_some();
            continue;
        }

        if let Some(frag) = current.as_mut() {
            let gap = g.x0 - frag.x1;
            let same_run = frag.font_name == g.font
                && (frag.font_size - g.size).abs() < 0.1
                && (frag.y0 - g.y0).abs() <= t.line_tolerance
                && gap >= -g.size * 0.5
                && gap <= g.size * t.fragment_gap_ratio;

            if same_run {
                if pending_space || gap > g.size * t.word_gap_ratio {
                    frag.text.push(' ');
                }
                frag.text.push(g.ch);
                frag.x1 = frag.x1.max(g.x1);
                frag.y0 = frag.y0.min(g.y0);
                frag.y1 = frag.y1.max(g.y1);
                frag.bold |= g.heavy;
                pending_space = false;
                continue;
            }
        }

        if let Some(done) = current.take() {
            out.push(done);
        }
        pending_space = false;
        current = Some(
            TextFragment::new(g.ch.to_string(), g.x0, g.y0, g.x1, g.y1, g.size)
                .with_font(g.font.clone())
                .with_bold(g.heavy || is_bold_name(&g.font))
                .with_italic(is_italic_name(&g.font)),
        );
    }

    if let Some(done) = current {
        out.push(done);
    }
    out
}

fn is_bold_name(font: &str) -> bool {
    let lower = font.to_lowercase();
    ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|k| lower.contains(k))
}

fn is_italic_name(font: &str) -> bool {
    let lower = font.to_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}
