//! Table detection from assembled lines.
//!
//! Detects tables by column alignment:
//!
//! 1. Find column boundaries (wide horizontal gaps between fragments) in each line
//! 2. Group consecutive lines whose boundaries line up
//! 3. Runs of `table_min_rows`+ aligned lines become a [`TableRegion`]
//! 4. Cell text is the fragments between two boundaries, joined by spaces
//!
//! Complexity: O(L * F) where L = lines, F = max fragments per line.

use crate::config::LayoutThresholds;
use crate::model::{Line, TableRegion};
use tracing::debug;

/// Detect table regions among one page's lines (top-to-bottom order).
pub fn detect_tables(lines: &[Line], t: &LayoutThresholds) -> Vec<TableRegion> {
    let boundaries: Vec<Vec<f32>> = lines.iter().map(|l| find_column_boundaries(l, t)).collect();
    let mut tables = Vec::new();

    let mut run_start = 0;
    while run_start < lines.len() {
        let mut run_end = run_start + 1;
        while run_end < lines.len()
            && boundaries_align(
                &boundaries[run_start],
                &boundaries[run_end],
                t.table_boundary_tolerance,
            )
        {
            run_end += 1;
        }

        let run_len = run_end - run_start;
        if run_len >= t.table_min_rows.max(1) && !boundaries[run_start].is_empty() {
            let cols = &boundaries[run_start];
            let run = &lines[run_start..run_end];
            tables.push(TableRegion {
                rows: run.iter().map(|l| split_at_boundaries(l, cols)).collect(),
                x0: run.iter().map(|l| l.left_indent).fold(f32::INFINITY, f32::min),
                x1: run.iter().map(|l| l.right).fold(f32::NEG_INFINITY, f32::max),
                y0: run.iter().map(|l| l.baseline).fold(f32::INFINITY, f32::min),
                y1: run.iter().map(|l| l.top).fold(f32::NEG_INFINITY, f32::max),
            });
            debug!(
                "page {}: table {}x{} at y={:.1}",
                run[0].page,
                run_len,
                cols.len() + 1,
                run[0].baseline
            );
        }

        run_start = run_end;
    }

    tables
}

/// X positions where column gaps occur in a line.
///
/// A column gap is a horizontal space between fragments wider than
/// `table_column_gap_ratio` times the line's average character width. The
/// boundary sits at the midpoint of the gap.
fn find_column_boundaries(line: &Line, t: &LayoutThresholds) -> Vec<f32> {
    let frags = &line.fragments;
    if frags.len() < 2 {
        return Vec::new();
    }

    let chars: usize = frags.iter().map(|f| f.char_count()).sum();
    let width: f32 = frags.iter().map(|f| f.width()).sum();
    if chars == 0 {
        return Vec::new();
    }
    let threshold = (width / chars as f32) * t.table_column_gap_ratio;

    frags
        .windows(2)
        .filter_map(|w| {
            let gap = w[1].x0 - w[0].x1;
            (gap > threshold).then(|| w[0].x1 + gap / 2.0)
        })
        .collect()
}

/// Two boundary sets align when they have the same length and each pair is
/// within `tolerance`.
fn boundaries_align(a: &[f32], b: &[f32], tolerance: f32) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(ax, bx)| (ax - bx).abs() < tolerance)
}

fn split_at_boundaries(line: &Line, boundaries: &[f32]) -> Vec<String> {
    let mut cells = vec![String::new(); boundaries.len() + 1];
    for frag in &line.fragments {
        let mid = (frag.x0 + frag.x1) / 2.0;
        let col = boundaries
            .iter()
            .position(|&b| mid < b)
            .unwrap_or(boundaries.len());
        let cell = &mut cells[col];
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(frag.text.trim());
    }
    cells.into_iter().map(|s| s.trim().to_string()).collect()
}
