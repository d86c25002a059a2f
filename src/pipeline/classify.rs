//! Block classification: assign each assembled line a semantic role.
//!
//! Every decision is a pure function of the line, its immediate neighbours,
//! the document [`PageFontProfile`] and the block classified just before it.
//! There is no hidden running state, so each threshold can be exercised in
//! isolation.
//!
//! ## Precedence
//!
//! For a single line, the first matching rule wins:
//!
//! 1. **Size heading**: dominant font ≥ `heading3_ratio` × body size
//! 2. **Bullet**: text starts with a recognised marker followed by text
//! 3. **Contact**: email / phone / URL anywhere in the line (maximal only)
//! 4. **Bold heading**: bold, short, followed by a wider-than-usual gap
//! 5. **Caps / keyword heading**: opt-in rules from [`ConversionConfig`];
//!    keyword matches become underlined section headers
//! 6. **Continuation** of the preceding paragraph, indented block or bullet
//! 7. **Paragraph**: at maximal level a line starting well right of the page
//!    margin opens an indented block, and text larger than
//!    `body_size_limit` keeps its size
//!
//! At [`FormattingLevel::Minimal`] only rules 6 and 7 apply.

use crate::config::{ConversionConfig, FormattingLevel, LayoutThresholds};
use crate::model::{Block, Line, PageFontProfile, TableRegion};
use crate::pipeline::text::{is_all_caps, join_lines};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use tracing::trace;

/// Deepest bullet nesting level (0-based); matches the DOCX numbering levels.
pub const MAX_BULLET_LEVEL: u8 = 8;

/// Caps headings must be shorter than this many characters.
const CAPS_HEADING_MAX_CHARS: usize = 50;
/// Keyword headings must be shorter than this many characters.
const KEYWORD_HEADING_MAX_CHARS: usize = 30;

static RE_BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[•◦▪▫]\s*|(?:[-*–]|\d{1,3}[.)]|[a-z][.)])\s+)(\S.*)$").unwrap()
});

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)\s?|\b\d{3}[\s.-]?)\d{3}[\s.-]?\d{4}\b").unwrap()
});

static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhttps?://\S+|\bwww\.\S+").unwrap());

/// The neighbourhood of a line on its page.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// The line directly above, if it belongs to the same text flow.
    pub previous: Option<&'a Line>,
    /// The line directly below, if it belongs to the same text flow.
    pub next: Option<&'a Line>,
    /// Leftmost text edge on the page; bullet levels are measured from here.
    pub left_margin: f32,
}

impl LineContext<'_> {
    /// Baseline distance from the previous line down to `line`.
    pub fn gap_before(&self, line: &Line) -> Option<f32> {
        self.previous.map(|p| p.baseline - line.baseline)
    }

    /// Baseline distance from `line` down to the next line.
    pub fn gap_after(&self, line: &Line) -> Option<f32> {
        self.next.map(|n| line.baseline - n.baseline)
    }
}

/// Outcome of classifying one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The line opens a new block.
    Start(Block),
    /// The line continues the preceding block; its text is appended to it.
    Continue,
}

/// Classify a single line.
pub fn classify_line(
    line: &Line,
    ctx: &LineContext<'_>,
    profile: &PageFontProfile,
    preceding: Option<&Block>,
    config: &ConversionConfig,
) -> Classification {
    let t = &config.thresholds;
    let level = config.level;

    if level.detects_structure() {
        if let Some(heading) = size_heading_level(line, profile, level, t) {
            if matches!(preceding, Some(Block::Heading { level: l, .. }) if *l == heading)
                && continues_flow(line, ctx, profile, t)
            {
                return Classification::Continue;
            }
            return Classification::Start(Block::Heading {
                level: heading,
                text: line.text.clone(),
            });
        }

        if let Some(text) = strip_bullet(&line.text) {
            return Classification::Start(Block::BulletItem {
                level: bullet_level(line.left_indent, ctx.left_margin, t),
                text: text.to_string(),
            });
        }

        if level.detects_contacts() && is_contact(&line.text) {
            return Classification::Start(Block::ContactLine {
                text: line.text.clone(),
            });
        }

        if is_bold_heading(line, ctx, profile, t) {
            let heading = if level.graded_headings() { 3 } else { 2 };
            return Classification::Start(Block::Heading {
                level: heading,
                text: line.text.clone(),
            });
        }

        if let Some(heading) = opt_in_heading(line, config) {
            return Classification::Start(heading);
        }
    }

    match preceding {
        Some(Block::Paragraph { .. } | Block::Indented { .. })
            if continues_flow(line, ctx, profile, t) =>
        {
            Classification::Continue
        }
        Some(Block::BulletItem { .. })
            if level.detects_structure() && continues_bullet(line, ctx, profile, t) =>
        {
            Classification::Continue
        }
        _ => Classification::Start(body_block(line, ctx, config)),
    }
}

/// Classify one page: table regions become table blocks in reading order and
/// the remaining lines run through [`classify_line`].
///
/// Lines inside a table region are not classified individually. At
/// [`FormattingLevel::Minimal`] tables are ignored and their lines flow as
/// ordinary text.
pub fn classify_page(
    lines: &[Line],
    tables: &[TableRegion],
    profile: &PageFontProfile,
    config: &ConversionConfig,
) -> Vec<Block> {
    let t = &config.thresholds;
    let tables: Vec<&TableRegion> = if config.level.detects_structure() {
        tables
            .iter()
            .filter(|tb| tb.row_count() > 0 && tb.column_count() > 0)
            .collect()
    } else {
        Vec::new()
    };

    let free: Vec<&Line> = lines
        .iter()
        .filter(|l| !tables.iter().any(|tb| tb.contains_line(l, t.table_boundary_tolerance)))
        .collect();
    let left_margin = free
        .iter()
        .map(|l| l.left_indent)
        .fold(f32::INFINITY, f32::min);

    // Merge free lines and tables into one top-to-bottom sequence.
    enum Item<'a> {
        Line(&'a Line),
        Table(&'a TableRegion),
    }
    let mut items: Vec<(f32, Item<'_>)> = free.iter().map(|&l| (l.baseline, Item::Line(l))).collect();
    items.extend(tables.iter().map(|&tb| (tb.y1, Item::Table(tb))));
    items.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let mut blocks: Vec<Block> = Vec::new();
    let mut previous: Option<&Line> = None;

    for (i, (_, item)) in items.iter().enumerate() {
        let line = match item {
            Item::Table(tb) => {
                blocks.push(Block::Table {
                    rows: padded_rows(tb),
                });
                previous = None;
                continue;
            }
            Item::Line(line) => *line,
        };

        let next = match items.get(i + 1) {
            Some((_, Item::Line(n))) => Some(*n),
            _ => None,
        };
        let ctx = LineContext {
            previous,
            next,
            left_margin,
        };

        match classify_line(line, &ctx, profile, blocks.last(), config) {
            Classification::Continue => {
                if let Some(last) = blocks.last_mut() {
                    append_text(last, &line.text);
                }
            }
            Classification::Start(block) => {
                trace!("page {} y={:.1}: {:?}", line.page, line.baseline, block.kind());
                blocks.push(block);
            }
        }
        previous = Some(line);
    }

    blocks
}

/// Strip a leading bullet or enumeration marker. Returns `None` when the text
/// does not start with one or nothing follows the marker.
pub fn strip_bullet(text: &str) -> Option<&str> {
    RE_BULLET
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end())
}

/// Whether the text contains an email address, phone number or URL.
pub fn is_contact(text: &str) -> bool {
    RE_EMAIL.is_match(text) || RE_PHONE.is_match(text) || RE_URL.is_match(text)
}

/// Heading level implied by font size alone.
fn size_heading_level(
    line: &Line,
    profile: &PageFontProfile,
    level: FormattingLevel,
    t: &LayoutThresholds,
) -> Option<u8> {
    let ratio = profile.ratio(line.dominant_font_size);
    if ratio < t.heading3_ratio {
        return None;
    }
    if !level.graded_headings() {
        return Some(2);
    }
    Some(if ratio >= t.heading1_ratio {
        1
    } else if ratio >= t.heading2_ratio {
        2
    } else {
        3
    })
}

fn bullet_level(left_indent: f32, left_margin: f32, t: &LayoutThresholds) -> u8 {
    if !left_margin.is_finite() || t.bullet_indent_unit <= 0.0 {
        return 0;
    }
    let depth = ((left_indent - left_margin).max(0.0) / t.bullet_indent_unit).floor();
    (depth as u8).min(MAX_BULLET_LEVEL)
}

/// Bold, short, and followed by a gap wider than normal line spacing.
/// The last line of a page has no following gap and never qualifies.
fn is_bold_heading(line: &Line, ctx: &LineContext<'_>, profile: &PageFontProfile, t: &LayoutThresholds) -> bool {
    line.bold_dominant
        && line.word_count() <= t.bold_heading_max_words
        && ctx
            .gap_after(line)
            .is_some_and(|gap| gap > profile.line_gap * t.bold_heading_gap_ratio)
}

/// All-caps lines become level-2 headings; short lines naming a section
/// keyword become section headers.
fn opt_in_heading(line: &Line, config: &ConversionConfig) -> Option<Block> {
    let len = line.text.chars().count();
    if config.caps_headings && len < CAPS_HEADING_MAX_CHARS && is_all_caps(&line.text) {
        return Some(Block::Heading {
            level: 2,
            text: line.text.clone(),
        });
    }
    if config.level.graded_headings() && len < KEYWORD_HEADING_MAX_CHARS {
        let lower = line.text.to_lowercase();
        if config.section_keywords.iter().any(|k| lower.contains(k.as_str())) {
            return Some(Block::SectionHeader {
                text: line.text.clone(),
            });
        }
    }
    None
}

/// The block a body line opens when no other rule matched.
fn body_block(line: &Line, ctx: &LineContext<'_>, config: &ConversionConfig) -> Block {
    let t = &config.thresholds;
    let text = line.text.clone();
    if !config.level.formats_body() {
        return Block::paragraph(text);
    }
    if ctx.left_margin.is_finite() && line.left_indent - ctx.left_margin > t.indented_block_offset {
        return Block::Indented { text };
    }
    let size = line.dominant_font_size;
    Block::Paragraph {
        text,
        font_size: (size > t.body_size_limit).then_some(size),
    }
}

/// Same font size, same left edge, and no wider than the paragraph gap.
fn continues_flow(line: &Line, ctx: &LineContext<'_>, profile: &PageFontProfile, t: &LayoutThresholds) -> bool {
    let Some(prev) = ctx.previous else {
        return false;
    };
    same_size(prev, line, t)
        && (prev.left_indent - line.left_indent).abs() <= t.indent_tolerance
        && within_paragraph_gap(line, ctx, profile, t)
}

/// A wrapped bullet: same size, close below, and starting right of the page
/// margin while not further left than the line above.
fn continues_bullet(line: &Line, ctx: &LineContext<'_>, profile: &PageFontProfile, t: &LayoutThresholds) -> bool {
    let Some(prev) = ctx.previous else {
        return false;
    };
    same_size(prev, line, t)
        && within_paragraph_gap(line, ctx, profile, t)
        && line.left_indent >= prev.left_indent - t.indent_tolerance
        && line.left_indent > ctx.left_margin + t.indent_tolerance
}

fn same_size(a: &Line, b: &Line, t: &LayoutThresholds) -> bool {
    (a.dominant_font_size - b.dominant_font_size).abs() <= t.font_size_tolerance
}

/// The allowed gap scales with the line's size relative to body text, so
/// multi-line headings continue at their own leading.
fn within_paragraph_gap(line: &Line, ctx: &LineContext<'_>, profile: &PageFontProfile, t: &LayoutThresholds) -> bool {
    let scale = profile.ratio(line.dominant_font_size).max(1.0);
    ctx.gap_before(line)
        .is_some_and(|gap| gap > 0.0 && gap <= profile.line_gap * scale * t.paragraph_gap_ratio)
}

fn append_text(block: &mut Block, next: &str) {
    match block {
        Block::Heading { text, .. }
        | Block::BulletItem { text, .. }
        | Block::ContactLine { text }
        | Block::SectionHeader { text }
        | Block::Paragraph { text, .. }
        | Block::Indented { text } => join_lines(text, next),
        Block::Table { .. } => {}
    }
}

/// Rows padded with empty cells to the widest row, so the grid is R×C.
fn padded_rows(table: &TableRegion) -> Vec<Vec<String>> {
    let cols = table.column_count();
    table
        .rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.resize(cols, String::new());
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextFragment;

    fn line(text: &str, x: f32, baseline: f32, size: f32) -> Line {
        let width = text.chars().count() as f32 * size * 0.5;
        Line {
            page: 1,
            fragments: vec![TextFragment::new(text, x, baseline, x + width, baseline + size, size)],
            text: text.to_string(),
            baseline,
            top: baseline + size,
            left_indent: x,
            right: x + width,
            max_font_size: size,
            dominant_font_size: size,
            bold_dominant: false,
        }
    }

    fn bold(mut l: Line) -> Line {
        l.bold_dominant = true;
        l
    }

    fn profile() -> PageFontProfile {
        PageFontProfile {
            body_size: 12.0,
            max_size: 24.0,
            line_gap: 14.0,
        }
    }

    fn config(level: FormattingLevel) -> ConversionConfig {
        ConversionConfig {
            level,
            ..ConversionConfig::default()
        }
    }

    fn alone(left_margin: f32) -> LineContext<'static> {
        LineContext {
            previous: None,
            next: None,
            left_margin,
        }
    }

    fn start(c: Classification) -> Block {
        match c {
            Classification::Start(b) => b,
            Classification::Continue => panic!("expected a new block"),
        }
    }

    #[test]
    fn heading_levels_follow_size_ratio() {
        let cfg = config(FormattingLevel::Maximal);
        let p = profile();
        for (size, expected) in [(18.0, 1), (24.0, 1), (16.0, 2), (14.0, 3)] {
            let l = line("Title", 72.0, 700.0, size);
            let b = start(classify_line(&l, &alone(72.0), &p, None, &cfg));
            assert_eq!(
                b,
                Block::Heading {
                    level: expected,
                    text: "Title".into()
                },
                "size {size}"
            );
        }
    }

    #[test]
    fn structured_uses_single_heading_level() {
        let cfg = config(FormattingLevel::Structured);
        let l = line("Big", 72.0, 700.0, 24.0);
        let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b, Block::Heading { level: 2, text: "Big".into() });
    }

    #[test]
    fn minimal_flattens_everything_to_paragraphs() {
        let cfg = config(FormattingLevel::Minimal);
        for text in ["• item", "jane@example.com"] {
            let l = line(text, 72.0, 700.0, 12.0);
            let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
            assert_eq!(b, Block::paragraph(text));
        }
        let big = line("Huge", 72.0, 700.0, 30.0);
        let b = start(classify_line(&big, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b.kind(), crate::model::BlockKind::Paragraph);
    }

    #[test]
    fn strips_bullet_markers() {
        assert_eq!(strip_bullet("• First item"), Some("First item"));
        assert_eq!(strip_bullet("•Tight glyph"), Some("Tight glyph"));
        assert_eq!(strip_bullet("- dash item"), Some("dash item"));
        assert_eq!(strip_bullet("* star item"), Some("star item"));
        assert_eq!(strip_bullet("◦ hollow"), Some("hollow"));
        assert_eq!(strip_bullet("12. numbered"), Some("numbered"));
        assert_eq!(strip_bullet("3) paren"), Some("paren"));
        assert_eq!(strip_bullet("a) alpha"), Some("alpha"));
        assert_eq!(strip_bullet("b. lower alpha"), Some("lower alpha"));
    }

    #[test]
    fn initials_and_roman_numerals_are_not_bullets() {
        assert_eq!(strip_bullet("J. Smith reported the results."), None);
        assert_eq!(strip_bullet("I. Introduction"), None);
        assert_eq!(strip_bullet("A) Upper paren"), None);

        let cfg = config(FormattingLevel::Maximal);
        let l = line("J. Smith reported the results.", 72.0, 700.0, 12.0);
        let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b, Block::paragraph("J. Smith reported the results."));
    }

    #[test]
    fn rejects_non_bullets() {
        assert_eq!(strip_bullet("-5 degrees"), None);
        assert_eq!(strip_bullet("e.g. this"), None);
        assert_eq!(strip_bullet("Dr. Smith"), None);
        assert_eq!(strip_bullet("2024 was a year"), None);
        assert_eq!(strip_bullet("•"), None);
    }

    #[test]
    fn bullet_level_from_indent() {
        let cfg = config(FormattingLevel::Maximal);
        let l = line("- nested", 72.0 + 36.0, 700.0, 12.0);
        let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b, Block::BulletItem { level: 2, text: "nested".into() });

        let deep = line("- deep", 72.0 + 18.0 * 20.0, 700.0, 12.0);
        let b = start(classify_line(&deep, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b, Block::BulletItem { level: MAX_BULLET_LEVEL, text: "deep".into() });
    }

    #[test]
    fn contact_patterns() {
        assert!(is_contact("Contact: jane@example.com"));
        assert!(is_contact("(555) 123-4567"));
        assert!(is_contact("555-123-4567"));
        assert!(is_contact("+1 555 123 4567"));
        assert!(is_contact("https://example.com/about"));
        assert!(is_contact("www.example.org"));
        assert!(!is_contact("Revenue grew 12% in 2023-2024"));
    }

    #[test]
    fn contact_line_at_body_size() {
        let cfg = config(FormattingLevel::Maximal);
        let l = line("Contact: jane@example.com", 72.0, 700.0, 12.0);
        let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b, Block::ContactLine { text: "Contact: jane@example.com".into() });
    }

    #[test]
    fn large_contact_line_is_heading() {
        let cfg = config(FormattingLevel::Maximal);
        let l = bold(line("jane@example.com", 72.0, 700.0, 20.0));
        let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b.kind(), crate::model::BlockKind::Heading);
    }

    #[test]
    fn structured_does_not_detect_contacts() {
        let cfg = config(FormattingLevel::Structured);
        let l = line("jane@example.com", 72.0, 700.0, 12.0);
        let b = start(classify_line(&l, &alone(72.0), &profile(), None, &cfg));
        assert_eq!(b.kind(), crate::model::BlockKind::Paragraph);
    }

    #[test]
    fn bold_short_line_before_gap_is_heading() {
        let cfg = config(FormattingLevel::Maximal);
        let h = bold(line("Experience", 72.0, 700.0, 12.0));
        let next = line("Worked on things.", 72.0, 670.0, 12.0);
        let ctx = LineContext {
            previous: None,
            next: Some(&next),
            left_margin: 72.0,
        };
        let b = start(classify_line(&h, &ctx, &profile(), None, &cfg));
        assert_eq!(b, Block::Heading { level: 3, text: "Experience".into() });
    }

    #[test]
    fn bold_line_at_normal_spacing_is_not_heading() {
        let cfg = config(FormattingLevel::Maximal);
        let h = bold(line("Experience", 72.0, 700.0, 12.0));
        let next = line("Worked on things.", 72.0, 686.0, 12.0);
        let ctx = LineContext {
            previous: None,
            next: Some(&next),
            left_margin: 72.0,
        };
        let b = start(classify_line(&h, &ctx, &profile(), None, &cfg));
        assert_eq!(b.kind(), crate::model::BlockKind::Paragraph);
    }

    #[test]
    fn opt_in_caps_and_keyword_headings() {
        let p = profile();
        let mut cfg = config(FormattingLevel::Structured);
        let caps = line("WORK HISTORY", 72.0, 700.0, 12.0);
        let b = start(classify_line(&caps, &alone(72.0), &p, None, &cfg));
        assert_eq!(b.kind(), crate::model::BlockKind::Paragraph);

        cfg.caps_headings = true;
        let b = start(classify_line(&caps, &alone(72.0), &p, None, &cfg));
        assert_eq!(b, Block::Heading { level: 2, text: "WORK HISTORY".into() });

        let mut cfg = config(FormattingLevel::Maximal);
        cfg.section_keywords = vec!["education".into()];
        let kw = line("Education and Training", 72.0, 700.0, 12.0);
        let b = start(classify_line(&kw, &alone(72.0), &p, None, &cfg));
        assert_eq!(b, Block::SectionHeader { text: "Education and Training".into() });
    }

    #[test]
    fn far_indented_line_opens_indented_block_at_maximal() {
        let p = profile();
        let quote = line("A quoted passage set in", 140.0, 700.0, 12.0);
        let b = start(classify_line(&quote, &alone(72.0), &p, None, &config(FormattingLevel::Maximal)));
        assert_eq!(b, Block::Indented { text: "A quoted passage set in".into() });

        let near = line("A first-line indent", 108.0, 700.0, 12.0);
        let b = start(classify_line(&near, &alone(72.0), &p, None, &config(FormattingLevel::Maximal)));
        assert_eq!(b, Block::paragraph("A first-line indent"));

        let b = start(classify_line(&quote, &alone(72.0), &p, None, &config(FormattingLevel::Structured)));
        assert_eq!(b, Block::paragraph("A quoted passage set in"));
    }

    #[test]
    fn indented_block_continues_at_its_own_indent() {
        let cfg = config(FormattingLevel::Maximal);
        let prev = line("A quoted passage set in", 140.0, 700.0, 12.0);
        let ctx = LineContext {
            previous: Some(&prev),
            next: None,
            left_margin: 72.0,
        };
        let block = Block::Indented { text: prev.text.clone() };
        let cont = line("from the margin.", 140.0, 686.0, 12.0);
        assert_eq!(
            classify_line(&cont, &ctx, &profile(), Some(&block), &cfg),
            Classification::Continue
        );
    }

    #[test]
    fn paragraph_keeps_font_size_above_twelve_points() {
        let p = PageFontProfile {
            body_size: 13.0,
            max_size: 24.0,
            line_gap: 16.0,
        };
        let l = line("Large print body text", 72.0, 700.0, 13.0);
        let b = start(classify_line(&l, &alone(72.0), &p, None, &config(FormattingLevel::Maximal)));
        assert_eq!(
            b,
            Block::Paragraph {
                text: "Large print body text".into(),
                font_size: Some(13.0)
            }
        );

        let b = start(classify_line(&l, &alone(72.0), &p, None, &config(FormattingLevel::Structured)));
        assert_eq!(b, Block::paragraph("Large print body text"));

        let normal = line("Regular body text", 72.0, 700.0, 12.0);
        let b = start(classify_line(&normal, &alone(72.0), &profile(), None, &config(FormattingLevel::Maximal)));
        assert_eq!(b, Block::paragraph("Regular body text"));
    }

    #[test]
    fn paragraph_continuation_rules() {
        let cfg = config(FormattingLevel::Maximal);
        let p = profile();
        let prev = line("The first line of a paragraph", 72.0, 700.0, 12.0);
        let para = Block::paragraph(prev.text.clone());

        let ctx = LineContext {
            previous: Some(&prev),
            next: None,
            left_margin: 72.0,
        };

        let cont = line("continues here", 72.0, 686.0, 12.0);
        assert_eq!(classify_line(&cont, &ctx, &p, Some(&para), &cfg), Classification::Continue);

        let far = line("after a blank line", 72.0, 650.0, 12.0);
        assert!(matches!(
            classify_line(&far, &ctx, &p, Some(&para), &cfg),
            Classification::Start(Block::Paragraph { .. })
        ));

        let indented = line("indented quote", 110.0, 686.0, 12.0);
        assert!(matches!(
            classify_line(&indented, &ctx, &p, Some(&para), &cfg),
            Classification::Start(_)
        ));

        let smaller = line("footnote text", 72.0, 686.0, 9.0);
        assert!(matches!(
            classify_line(&smaller, &ctx, &p, Some(&para), &cfg),
            Classification::Start(_)
        ));
    }

    #[test]
    fn page_merges_single_size_text_into_one_paragraph() {
        let cfg = config(FormattingLevel::Maximal);
        let lines = vec![
            line("The quick brown fox jumps over", 72.0, 700.0, 12.0),
            line("the lazy dog and keeps on run-", 72.0, 686.0, 12.0),
            line("ning until the end of the page.", 72.0, 672.0, 12.0),
        ];
        let blocks = classify_page(&lines, &[], &profile(), &cfg);
        assert_eq!(
            blocks,
            vec![Block::paragraph(
                "The quick brown fox jumps over the lazy dog and keeps on running until the end of the page."
            )]
        );
    }

    #[test]
    fn page_continues_wrapped_bullets() {
        let cfg = config(FormattingLevel::Maximal);
        let lines = vec![
            line("• A bullet that wraps", 72.0, 700.0, 12.0),
            line("onto a second line", 84.0, 686.0, 12.0),
            line("• Another bullet", 72.0, 672.0, 12.0),
            line("Back to body text.", 72.0, 658.0, 12.0),
        ];
        let blocks = classify_page(&lines, &[], &profile(), &cfg);
        assert_eq!(
            blocks,
            vec![
                Block::BulletItem { level: 0, text: "A bullet that wraps onto a second line".into() },
                Block::BulletItem { level: 0, text: "Another bullet".into() },
                Block::paragraph("Back to body text."),
            ]
        );
    }

    #[test]
    fn page_joins_multi_line_heading() {
        let cfg = config(FormattingLevel::Maximal);
        let lines = vec![
            line("A Very Long Report", 72.0, 700.0, 24.0),
            line("Title Over Two Lines", 72.0, 672.0, 24.0),
            line("Body starts here.", 72.0, 640.0, 12.0),
        ];
        let blocks = classify_page(&lines, &[], &profile(), &cfg);
        assert_eq!(
            blocks[0],
            Block::Heading { level: 1, text: "A Very Long Report Title Over Two Lines".into() }
        );
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn page_places_tables_in_reading_order() {
        let cfg = config(FormattingLevel::Maximal);
        let lines = vec![
            line("Intro paragraph.", 72.0, 720.0, 12.0),
            line("a b", 72.0, 700.0, 12.0),
            line("c d", 72.0, 686.0, 12.0),
            line("After the table.", 72.0, 640.0, 12.0),
        ];
        let table = TableRegion {
            rows: vec![vec!["a".into(), "b".into()], vec!["c".into()]],
            x0: 72.0,
            x1: 300.0,
            y0: 686.0,
            y1: 712.0,
        };
        let blocks = classify_page(&lines, &[table], &profile(), &cfg);
        assert_eq!(
            blocks,
            vec![
                Block::paragraph("Intro paragraph."),
                Block::Table {
                    rows: vec![
                        vec!["a".into(), "b".into()],
                        vec!["c".into(), String::new()]
                    ]
                },
                Block::paragraph("After the table."),
            ]
        );
    }

    #[test]
    fn minimal_ignores_tables() {
        let cfg = config(FormattingLevel::Minimal);
        let lines = vec![line("a b", 72.0, 700.0, 12.0)];
        let table = TableRegion {
            rows: vec![vec!["a".into(), "b".into()]],
            x0: 72.0,
            x1: 300.0,
            y0: 700.0,
            y1: 712.0,
        };
        let blocks = classify_page(&lines, &[table], &profile(), &cfg);
        assert_eq!(blocks, vec![Block::paragraph("a b")]);
    }

    #[test]
    fn empty_page_has_no_blocks() {
        let cfg = ConversionConfig::default();
        assert!(classify_page(&[], &[], &profile(), &cfg).is_empty());
    }
}
