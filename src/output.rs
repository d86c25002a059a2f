//! Conversion results: the classified document plus run statistics.

use crate::error::{ConversionWarning, PageError};
use crate::model::{BlockKind, Document};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a conversion produced, before (or instead of) writing DOCX.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub document: Document,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
    /// Non-fatal conditions, in the order they were detected.
    pub warnings: Vec<ConversionWarning>,
    /// Pages that were skipped.
    pub page_errors: Vec<PageError>,
}

impl ConversionOutput {
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

/// Counters and timings for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the PDF.
    pub total_pages: usize,
    /// Pages extracted and classified.
    pub processed_pages: usize,
    /// Pages skipped after an extraction error.
    pub failed_pages: usize,
    /// Processed pages that produced no blocks.
    pub empty_pages: usize,
    pub headings: usize,
    pub bullet_items: usize,
    pub contact_lines: usize,
    pub paragraphs: usize,
    pub tables: usize,
    pub extract_duration_ms: u64,
    pub classify_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Set by [`crate::convert::convert_to_file`] once the file is on disk.
    pub output_path: Option<PathBuf>,
}

impl ConversionStats {
    pub(crate) fn count_blocks(&mut self, document: &Document) {
        self.headings = document.count_kind(BlockKind::Heading);
        self.bullet_items = document.count_kind(BlockKind::BulletItem);
        self.contact_lines = document.count_kind(BlockKind::ContactLine);
        self.paragraphs = document.count_kind(BlockKind::Paragraph);
        self.tables = document.count_kind(BlockKind::Table);
    }

    pub fn block_count(&self) -> usize {
        self.headings + self.bullet_items + self.contact_lines + self.paragraphs + self.tables
    }
}

/// PDF document-information fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}
