//! Document building: walk the classified blocks once and emit DOCX.
//!
//! | Block         | Output                                               |
//! |---------------|------------------------------------------------------|
//! | `Heading`     | paragraph styled `Heading1`..`Heading3`              |
//! | `BulletItem`  | `ListBullet` paragraph on the bullet numbering       |
//! | `ContactLine` | centred italic 11pt paragraph styled `Contact`       |
//! | `SectionHeader` | `Heading2` paragraph with an underlined run        |
//! | `Paragraph`   | plain paragraph, run sized when `font_size` is set   |
//! | `Indented`    | 0.5in left indent, 10pt run                          |
//! | `Table`       | bordered grid, R×C cells, blank cells left empty     |
//!
//! Nothing touches the disk until [`save_docx`], which writes to a temp file
//! next to the destination and renames it into place.

use crate::config::{ConversionConfig, FormattingLevel};
use crate::error::Pdf2DocxError;
use crate::model::{Block, Document};
use crate::pipeline::classify::MAX_BULLET_LEVEL;
use docx_rs::{
    AbstractNumbering, AlignmentType, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText,
    NumberFormat, Numbering, NumberingId, PageMargin, Paragraph, Run, SpecialIndentType, Start,
    Style, StyleType, Table, TableCell, TableRow,
};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

const BULLET_NUMBERING_ID: usize = 1;

/// 1 inch in twentieths of a point.
const INCH: i32 = 1440;
/// One bullet indent step (0.25in).
const BULLET_STEP: i32 = 360;

/// Left indent of indented blocks (0.5in).
const BLOCK_INDENT: i32 = INCH / 2;

/// 11pt in half-points.
const CONTACT_SIZE: usize = 22;
/// 10pt in half-points.
const INDENTED_SIZE: usize = 20;
const TABLE_CELL_SIZE: usize = 22;

/// Build the in-memory DOCX for a classified document.
pub fn build_docx(document: &Document, config: &ConversionConfig) -> Docx {
    let mut docx = base_document(config.level);

    for (i, page) in document.pages.iter().enumerate() {
        if i > 0 && config.page_breaks {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
        for block in &page.blocks {
            docx = add_block(docx, block, config.level);
        }
    }

    debug!(
        "Built DOCX: {} pages, {} blocks",
        document.pages.len(),
        document.block_count()
    );
    docx
}

/// Pack `docx` and move it over `path`. On failure the destination is left
/// untouched.
pub fn save_docx(docx: Docx, path: &Path) -> Result<(), Pdf2DocxError> {
    let write_err = |source: std::io::Error| Pdf2DocxError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    docx.build()
        .pack(tmp.as_file_mut())
        .map_err(|e| write_err(std::io::Error::other(e.to_string())))?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

fn base_document(level: FormattingLevel) -> Docx {
    let margin = match level {
        FormattingLevel::Maximal => INCH * 4 / 5,
        _ => INCH,
    };

    let mut bullets = AbstractNumbering::new(BULLET_NUMBERING_ID);
    for lvl in 0..=MAX_BULLET_LEVEL as usize {
        let glyph = ["•", "◦", "▪"][lvl % 3];
        bullets = bullets.add_level(
            Level::new(
                lvl,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new(glyph),
                LevelJc::new("left"),
            )
            .indent(
                Some(BULLET_STEP * (lvl as i32 + 2)),
                Some(SpecialIndentType::Hanging(BULLET_STEP)),
                None,
                None,
            ),
        );
    }

    Docx::new()
        .page_margin(
            PageMargin::new()
                .top(margin)
                .bottom(margin)
                .left(margin)
                .right(margin),
        )
        .add_style(heading_style(1, 32))
        .add_style(heading_style(2, 26))
        .add_style(heading_style(3, 24))
        .add_style(Style::new("ListBullet", StyleType::Paragraph).name("List Bullet"))
        .add_style(
            Style::new("Contact", StyleType::Paragraph)
                .name("Contact")
                .italic()
                .size(CONTACT_SIZE)
                .align(AlignmentType::Center),
        )
        .add_abstract_numbering(bullets)
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}

fn heading_style(level: u8, half_points: usize) -> Style {
    Style::new(format!("Heading{level}"), StyleType::Paragraph)
        .name(format!("Heading {level}"))
        .size(half_points)
        .bold()
}

fn add_block(docx: Docx, block: &Block, preset: FormattingLevel) -> Docx {
    match block {
        Block::Heading { level, text } => {
            let level = (*level).clamp(1, 3);
            docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(text))
                    .style(&format!("Heading{level}")),
            )
        }
        Block::BulletItem { level, text } => docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .style("ListBullet")
                .numbering(
                    NumberingId::new(BULLET_NUMBERING_ID),
                    IndentLevel::new((*level).min(MAX_BULLET_LEVEL) as usize),
                ),
        ),
        Block::ContactLine { text } => docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text).italic().size(CONTACT_SIZE))
                .style("Contact")
                .align(AlignmentType::Center),
        ),
        Block::SectionHeader { text } => docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text).underline("single"))
                .style("Heading2"),
        ),
        Block::Paragraph { text, font_size } => {
            let mut run = Run::new().add_text(text);
            if let Some(size) = font_size {
                run = run.size(half_points(*size));
            }
            docx.add_paragraph(Paragraph::new().add_run(run))
        }
        Block::Indented { text } => docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(text).size(INDENTED_SIZE))
                .indent(Some(BLOCK_INDENT), None, None, None),
        ),
        Block::Table { rows } => docx
            .add_table(build_table(rows, preset))
            .add_paragraph(Paragraph::new()),
    }
}

fn half_points(points: f32) -> usize {
    (points * 2.0).round().max(1.0) as usize
}

fn build_table(rows: &[Vec<String>], preset: FormattingLevel) -> Table {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let table_rows = rows
        .iter()
        .map(|row| {
            let cells = (0..cols)
                .map(|c| {
                    let text = row.get(c).map(String::as_str).unwrap_or("");
                    let mut paragraph = Paragraph::new();
                    if !text.is_empty() {
                        let mut run = Run::new().add_text(text);
                        if preset == FormattingLevel::Maximal {
                            run = run.size(TABLE_CELL_SIZE);
                        }
                        paragraph = paragraph.add_run(run);
                    }
                    TableCell::new().add_paragraph(paragraph)
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();
    Table::new(table_rows)
}
