//! Configuration types for PDF-to-DOCX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The layout heuristics are threshold
//! based, so every threshold lives in [`LayoutThresholds`] where it can be
//! tuned (or loaded from JSON) instead of being hard-coded in the classifier.

use crate::error::Pdf2DocxError;
use crate::pipeline::extract::PdfBackend;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a PDF-to-DOCX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`] (the maximal preset).
///
/// # Example
/// ```rust
/// use edgequake_pdf2docx::{ConversionConfig, FormattingLevel};
///
/// let config = ConversionConfig::builder()
///     .level(FormattingLevel::Structured)
///     .page_breaks(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// How much structure to reconstruct. Default: [`FormattingLevel::Maximal`].
    pub level: FormattingLevel,

    /// Layout heuristics thresholds.
    pub thresholds: LayoutThresholds,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Insert a page break between PDF pages. Default: true.
    pub page_breaks: bool,

    /// Treat short all-caps lines as level-2 headings. Default: false.
    ///
    /// Useful for résumés and forms whose section titles are set in capitals
    /// at body size; harmful for documents with capitalised acronyms lines.
    pub caps_headings: bool,

    /// Short lines (< 30 characters) containing one of these words become
    /// underlined level-2 section headers in the maximal preset. Matched case-insensitively.
    /// Default: empty.
    pub section_keywords: Vec<String>,

    /// Explicit path to the pdfium shared library. When `None`, the
    /// `PDFIUM_LIB_PATH` environment variable, the working directory and the
    /// system library are tried in that order.
    pub pdfium_library_path: Option<PathBuf>,

    /// Pre-constructed extraction backend. Takes precedence over pdfium.
    pub backend: Option<Arc<dyn PdfBackend>>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            level: FormattingLevel::default(),
            thresholds: LayoutThresholds::default(),
            pages: PageSelection::default(),
            page_breaks: true,
            caps_headings: false,
            section_keywords: Vec::new(),
            pdfium_library_path: None,
            backend: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("level", &self.level)
            .field("thresholds", &self.thresholds)
            .field("pages", &self.pages)
            .field("page_breaks", &self.page_breaks)
            .field("caps_headings", &self.caps_headings)
            .field("section_keywords", &self.section_keywords)
            .field("pdfium_library_path", &self.pdfium_library_path)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn PdfBackend>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn level(mut self, level: FormattingLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn thresholds(mut self, thresholds: LayoutThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_breaks(mut self, v: bool) -> Self {
        self.config.page_breaks = v;
        self
    }

    pub fn caps_headings(mut self, v: bool) -> Self {
        self.config.caps_headings = v;
        self
    }

    pub fn section_keywords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.section_keywords = words
            .into_iter()
            .map(|w| w.into().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn PdfBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2DocxError> {
        self.config.thresholds.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How much document structure the pipeline reconstructs.
///
/// | Level | Output |
/// |-------|--------|
/// | Minimal    | Paragraphs only |
/// | Structured | + headings (single level), bullet lists, tables |
/// | Maximal    | + contact lines, heading depth from font size, indented blocks and larger body sizes (default) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingLevel {
    Minimal,
    Structured,
    #[default]
    Maximal,
}

impl FormattingLevel {
    /// Fixed output filename written to the working directory.
    pub fn default_output_name(&self) -> &'static str {
        match self {
            FormattingLevel::Minimal => "PDF-Enhanced-output.docx",
            FormattingLevel::Structured => "PDF-Advanced-Formatted.docx",
            FormattingLevel::Maximal => "PDF-Ultra-Formatted.docx",
        }
    }

    pub fn detects_structure(&self) -> bool {
        !matches!(self, FormattingLevel::Minimal)
    }

    pub fn detects_contacts(&self) -> bool {
        matches!(self, FormattingLevel::Maximal)
    }

    /// Heading depth follows the font-size ratio (levels 1–3) instead of a
    /// single fixed level.
    pub fn graded_headings(&self) -> bool {
        matches!(self, FormattingLevel::Maximal)
    }

    /// Body text keeps its indentation and larger font sizes.
    pub fn formats_body(&self) -> bool {
        matches!(self, FormattingLevel::Maximal)
    }
}

/// Tunable thresholds for line assembly, classification and table detection.
///
/// Lengths are PDF points; `*_ratio` fields are relative to a font size or to
/// the document's typical line gap as documented per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutThresholds {
    /// Max baseline difference for fragments on the same line.
    pub line_tolerance: f32,
    /// Fragments on a line closer than this (or overlapping) are merged.
    pub merge_gap: f32,
    /// Horizontal gap, relative to font size, that inserts a space.
    pub word_gap_ratio: f32,
    /// Horizontal gap, relative to font size, that starts a new fragment.
    pub fragment_gap_ratio: f32,
    /// Short raised clusters whose font is at most this fraction of a
    /// neighbour's are superscripts and fold into that line.
    pub superscript_ratio: f32,
    pub heading1_ratio: f32,
    pub heading2_ratio: f32,
    pub heading3_ratio: f32,
    /// Bold-only headings must not exceed this many words.
    pub bold_heading_max_words: usize,
    /// Bold-only headings need a following gap larger than
    /// `line_gap × bold_heading_gap_ratio`.
    pub bold_heading_gap_ratio: f32,
    /// Consecutive lines stay in one paragraph while their baseline distance
    /// is at most `line_gap × paragraph_gap_ratio`.
    pub paragraph_gap_ratio: f32,
    pub indent_tolerance: f32,
    pub font_size_tolerance: f32,
    /// Bullet nesting step (0.25in).
    pub bullet_indent_unit: f32,
    pub table_min_rows: usize,
    /// Inter-fragment gap, relative to the average character width, that
    /// counts as a column boundary.
    pub table_column_gap_ratio: f32,
    pub table_boundary_tolerance: f32,
    /// Paragraphs starting further than this right of the page's left
    /// margin become indented blocks.
    pub indented_block_offset: f32,
    /// Paragraph text set larger than this keeps its size in the output.
    pub body_size_limit: f32,
}

impl Default for LayoutThresholds {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            merge_gap: 1.5,
            word_gap_ratio: 0.25,
            fragment_gap_ratio: 1.0,
            superscript_ratio: 0.8,
            heading1_ratio: 1.5,
            heading2_ratio: 1.3,
            heading3_ratio: 1.15,
            bold_heading_max_words: 8,
            bold_heading_gap_ratio: 1.15,
            paragraph_gap_ratio: 1.5,
            indent_tolerance: 4.0,
            font_size_tolerance: 1.0,
            bullet_indent_unit: 18.0,
            table_min_rows: 3,
            table_column_gap_ratio: 2.0,
            table_boundary_tolerance: 5.0,
            indented_block_offset: 50.0,
            body_size_limit: 12.0,
        }
    }
}

impl LayoutThresholds {
    /// Parse thresholds from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Pdf2DocxError> {
        let t: Self = serde_json::from_str(json)
            .map_err(|e| Pdf2DocxError::InvalidConfig(format!("thresholds JSON: {e}")))?;
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<(), Pdf2DocxError> {
        let positive = [
            ("line_tolerance", self.line_tolerance),
            ("word_gap_ratio", self.word_gap_ratio),
            ("fragment_gap_ratio", self.fragment_gap_ratio),
            ("paragraph_gap_ratio", self.paragraph_gap_ratio),
            ("bullet_indent_unit", self.bullet_indent_unit),
            ("table_column_gap_ratio", self.table_column_gap_ratio),
            ("indented_block_offset", self.indented_block_offset),
            ("body_size_limit", self.body_size_limit),
        ];
        for (name, v) in positive {
            if !(v > 0.0) {
                return Err(Pdf2DocxError::InvalidConfig(format!(
                    "{name} must be > 0, got {v}"
                )));
            }
        }
        if !(self.heading1_ratio >= self.heading2_ratio
            && self.heading2_ratio >= self.heading3_ratio
            && self.heading3_ratio > 1.0)
        {
            return Err(Pdf2DocxError::InvalidConfig(format!(
                "heading ratios must satisfy h1 ≥ h2 ≥ h3 > 1, got {} / {} / {}",
                self.heading1_ratio, self.heading2_ratio, self.heading3_ratio
            )));
        }
        if self.table_min_rows < 2 {
            return Err(Pdf2DocxError::InvalidConfig(
                "table_min_rows must be ≥ 2".into(),
            ));
        }
        Ok(())
    }
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let in_range = |p: usize| p >= 1 && p <= total_pages;
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if in_range(*p) {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .copied()
                .filter(|&p| in_range(p))
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_maximal_with_page_breaks() {
        let c = ConversionConfig::default();
        assert_eq!(c.level, FormattingLevel::Maximal);
        assert!(c.page_breaks);
        assert!(c.backend.is_none());
    }

    #[test]
    fn output_names_per_level() {
        assert_eq!(
            FormattingLevel::Minimal.default_output_name(),
            "PDF-Enhanced-output.docx"
        );
        assert_eq!(
            FormattingLevel::Structured.default_output_name(),
            "PDF-Advanced-Formatted.docx"
        );
        assert_eq!(
            FormattingLevel::Maximal.default_output_name(),
            "PDF-Ultra-Formatted.docx"
        );
    }

    #[test]
    fn builder_rejects_inverted_heading_ratios() {
        let t = LayoutThresholds {
            heading1_ratio: 1.2,
            heading2_ratio: 1.4,
            ..LayoutThresholds::default()
        };
        let err = ConversionConfig::builder().thresholds(t).build().unwrap_err();
        assert!(matches!(err, Pdf2DocxError::InvalidConfig(_)));
    }

    #[test]
    fn builder_normalises_keywords() {
        let c = ConversionConfig::builder()
            .section_keywords(["  Experience ", "", "SKILLS"])
            .build()
            .unwrap();
        assert_eq!(c.section_keywords, vec!["experience", "skills"]);
    }

    #[test]
    fn thresholds_from_partial_json() {
        let t = LayoutThresholds::from_json(r#"{ "paragraph_gap_ratio": 2.0 }"#).unwrap();
        assert_eq!(t.paragraph_gap_ratio, 2.0);
        assert_eq!(t.line_tolerance, LayoutThresholds::default().line_tolerance);
    }

    #[test]
    fn thresholds_from_invalid_json() {
        assert!(LayoutThresholds::from_json("{ nope").is_err());
        assert!(LayoutThresholds::from_json(r#"{ "line_tolerance": 0.0 }"#).is_err());
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(3), vec![0, 1, 2]);
        assert_eq!(PageSelection::Single(4).to_indices(3), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 9).to_indices(3), vec![1, 2]);
        assert_eq!(PageSelection::Set(vec![3, 1, 3]).to_indices(5), vec![0, 2]);
    }
}
