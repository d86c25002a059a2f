//! Data model shared by the pipeline stages.
//!
//! Coordinates are PDF points in page space: `x` grows to the right and `y`
//! grows upwards, so the top of the page has the largest `y`. "Top-to-bottom"
//! reading order therefore means *descending* `y`.

use serde::{Deserialize, Serialize};

/// A single positioned run of text with font metadata.
///
/// Produced by the extractor; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x0: f32,
    pub x1: f32,
    /// Bottom edge (baseline approximation).
    pub y0: f32,
    /// Top edge.
    pub y1: f32,
    pub font_size: f32,
    pub font_name: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextFragment {
    /// Build a fragment from its bounding box, normalising the edges so that
    /// `x0 <= x1` and `y0 <= y1` always hold.
    pub fn new(text: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x0: x0.min(x1),
            x1: x0.max(x1),
            y0: y0.min(y1),
            y1: y0.max(y1),
            font_size,
            font_name: String::new(),
            bold: false,
            italic: false,
        }
    }

    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Visible character count (whitespace excluded).
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Average advance per character; falls back to half the font size for
    /// degenerate fragments.
    pub fn avg_char_width(&self) -> f32 {
        let n = self.text.chars().count();
        if n == 0 || self.width() <= 0.0 {
            self.font_size * 0.5
        } else {
            self.width() / n as f32
        }
    }
}

/// An externally detected table grid: `rows[row][col]` plus its bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    pub rows: Vec<Vec<String>>,
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
}

impl TableRegion {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row; shorter rows are padded with empty cells on output.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether a line lies inside this region (baseline within the vertical
    /// span, horizontal extents overlapping), allowing `tolerance` points.
    pub fn contains_line(&self, line: &Line, tolerance: f32) -> bool {
        line.baseline >= self.y0 - tolerance
            && line.baseline <= self.y1 + tolerance
            && line.left_indent <= self.x1 + tolerance
            && line.right >= self.x0 - tolerance
    }
}

/// Everything the extractor yields for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// 1-indexed page number.
    pub number: usize,
    pub width: f32,
    pub height: f32,
    pub fragments: Vec<TextFragment>,
    pub tables: Vec<TableRegion>,
}

/// Fragments sharing a visual baseline, in left-to-right order.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-indexed page number.
    pub page: usize,
    pub fragments: Vec<TextFragment>,
    pub text: String,
    pub baseline: f32,
    pub top: f32,
    pub left_indent: f32,
    pub right: f32,
    pub max_font_size: f32,
    /// Font size covering the most characters on the line.
    pub dominant_font_size: f32,
    pub bold_dominant: bool,
}

impl Line {
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn height(&self) -> f32 {
        self.top - self.baseline
    }
}

/// A semantically classified unit of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Heading at level 1..=3.
    Heading { level: u8, text: String },
    /// List item; `level` is the indentation depth (0-based).
    BulletItem { level: u8, text: String },
    /// Email / phone / URL line.
    ContactLine { text: String },
    /// Line matching a configured section keyword; written as an underlined
    /// level-2 heading.
    SectionHeader { text: String },
    /// Body text. `font_size` is kept when the text is set larger than 12pt.
    Paragraph {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f32>,
    },
    /// Body text set well inside the page margin.
    Indented { text: String },
    Table { rows: Vec<Vec<String>> },
}

impl Block {
    /// Plain paragraph at the document's default size.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph {
            text: text.into(),
            font_size: None,
        }
    }

    /// Coarse kind used for statistics: section headers count as headings
    /// and indented blocks as paragraphs.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } | Block::SectionHeader { .. } => BlockKind::Heading,
            Block::BulletItem { .. } => BlockKind::BulletItem,
            Block::ContactLine { .. } => BlockKind::ContactLine,
            Block::Paragraph { .. } | Block::Indented { .. } => BlockKind::Paragraph,
            Block::Table { .. } => BlockKind::Table,
        }
    }

    /// Text of a textual block; `None` for tables.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Heading { text, .. }
            | Block::BulletItem { text, .. }
            | Block::ContactLine { text }
            | Block::SectionHeader { text }
            | Block::Paragraph { text, .. }
            | Block::Indented { text } => Some(text),
            Block::Table { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    BulletItem,
    ContactLine,
    Paragraph,
    Table,
}

/// The blocks classified from one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// 1-indexed page number.
    pub number: usize,
    pub blocks: Vec<Block>,
}

/// Ordered blocks across all converted pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<DocumentPage>,
}

impl Document {
    /// All blocks in reading order (page order, then top-to-bottom).
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.block_count() == 0
    }

    pub fn count_kind(&self, kind: BlockKind) -> usize {
        self.blocks().filter(|b| b.kind() == kind).count()
    }
}

/// Document-wide font statistics used as the heading baseline.
///
/// Computed once from every page before classification starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFontProfile {
    /// Modal font size weighted by character count.
    pub body_size: f32,
    pub max_size: f32,
    /// Modal baseline-to-baseline distance between consecutive body lines.
    pub line_gap: f32,
}

impl Default for PageFontProfile {
    fn default() -> Self {
        Self {
            body_size: 12.0,
            max_size: 12.0,
            line_gap: 14.4,
        }
    }
}

impl PageFontProfile {
    /// Ratio of `size` to the body size.
    pub fn ratio(&self, size: f32) -> f32 {
        if self.body_size <= 0.0 {
            1.0
        } else {
            size / self.body_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_normalises_edges() {
        let f = TextFragment::new("x", 20.0, 110.0, 10.0, 100.0, 12.0);
        assert_eq!((f.x0, f.x1, f.y0, f.y1), (10.0, 20.0, 100.0, 110.0));
    }

    #[test]
    fn table_region_counts_ragged_rows() {
        let t = TableRegion {
            rows: vec![vec!["a".into(), "b".into(), "c".into()], vec!["1".into()]],
            x0: 0.0,
            x1: 100.0,
            y0: 0.0,
            y1: 50.0,
        };
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 3);
    }

    #[test]
    fn document_counts_blocks_across_pages() {
        let doc = Document {
            pages: vec![
                DocumentPage {
                    number: 1,
                    blocks: vec![Block::paragraph("a")],
                },
                DocumentPage {
                    number: 2,
                    blocks: vec![
                        Block::Heading {
                            level: 1,
                            text: "b".into(),
                        },
                        Block::paragraph("c"),
                    ],
                },
            ],
        };
        assert_eq!(doc.block_count(), 3);
        assert_eq!(doc.count_kind(BlockKind::Paragraph), 2);
        assert_eq!(doc.blocks().next().and_then(Block::text), Some("a"));
    }

    #[test]
    fn block_serialises_with_kind_tag() {
        let json = serde_json::to_string(&Block::ContactLine {
            text: "jane@example.com".into(),
        })
        .unwrap();
        assert!(json.contains("\"kind\":\"contact_line\""));
    }

    #[test]
    fn paragraph_font_size_is_optional_in_json() {
        let plain = serde_json::to_string(&Block::paragraph("Body")).unwrap();
        assert!(!plain.contains("font_size"));

        let sized: Block =
            serde_json::from_str(r#"{"kind":"paragraph","text":"Big","font_size":14.0}"#).unwrap();
        assert_eq!(
            sized,
            Block::Paragraph {
                text: "Big".into(),
                font_size: Some(14.0)
            }
        );
    }

    #[test]
    fn section_and_indented_blocks_count_as_headings_and_paragraphs() {
        let header = Block::SectionHeader { text: "Skills".into() };
        let quote = Block::Indented { text: "Quoted".into() };
        assert_eq!(header.kind(), BlockKind::Heading);
        assert_eq!(quote.kind(), BlockKind::Paragraph);
        assert_eq!(quote.text(), Some("Quoted"));
    }
}
