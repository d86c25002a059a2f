//! Line assembly: group a page's fragments into visual lines.
//!
//! 1. Sort by baseline descending (top of page first), then `x0` ascending.
//! 2. Cluster consecutive fragments whose baseline lies within
//!    `line_tolerance` of the cluster's first fragment.
//! 3. Fold superscript clusters (a few characters in a smaller font, raised
//!    into a neighbour's line box, next to one of its fragments) into that
//!    neighbour. Whole lines are never folded.
//! 4. Within each line, order fragments left-to-right and merge the ones that
//!    overlap or touch (gap ≤ `merge_gap`), so fragments never overlap in x.
//! 5. Derive the line text, indent, dominant font size and boldness.

use crate::config::LayoutThresholds;
use crate::model::{Line, TextFragment};
use crate::pipeline::text::clean_text;
use std::cmp::Ordering;
use tracing::trace;

/// Assemble the fragments of one page into lines, top-to-bottom.
pub fn assemble_lines(page: usize, fragments: &[TextFragment], t: &LayoutThresholds) -> Vec<Line> {
    let mut sorted: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();
    if sorted.is_empty() {
        return Vec::new();
    }

    sorted.sort_by(|a, b| {
        b.y0.partial_cmp(&a.y0)
            .unwrap_or(Ordering::Equal)
            .then(a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal))
    });

    let mut clusters: Vec<Vec<TextFragment>> = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut anchor = sorted[0].y0;

    for frag in sorted {
        if !current.is_empty() && (anchor - frag.y0).abs() > t.line_tolerance {
            clusters.push(std::mem::take(&mut current));
        }
        if current.is_empty() {
            anchor = frag.y0;
        }
        current.push(frag.clone());
    }
    if !current.is_empty() {
        clusters.push(current);
    }

    let clusters = fold_superscripts(clusters, t);

    let mut lines: Vec<Line> = clusters
        .into_iter()
        .filter_map(|c| build_line(page, c, t))
        .collect();
    lines.sort_by(|a, b| b.baseline.partial_cmp(&a.baseline).unwrap_or(Ordering::Equal));

    trace!("page {}: {} fragments → {} lines", page, fragments.len(), lines.len());
    lines
}

/// Longest cluster, in characters, that may be folded as a superscript.
const SUPERSCRIPT_MAX_CHARS: usize = 4;

/// Merge short raised clusters of small glyphs into the line they decorate.
/// Targets are chosen against the unmerged clusters, so a fold never makes
/// another fold possible.
fn fold_superscripts(clusters: Vec<Vec<TextFragment>>, t: &LayoutThresholds) -> Vec<Vec<TextFragment>> {
    let targets: Vec<Option<usize>> = (0..clusters.len())
        .map(|i| superscript_target(&clusters, i, t))
        .collect();
    if targets.iter().all(Option::is_none) {
        return clusters;
    }

    let mut out: Vec<Option<Vec<TextFragment>>> = clusters.into_iter().map(Some).collect();
    for (i, target) in targets.iter().enumerate() {
        let Some(j) = *target else { continue };
        if targets[j].is_some() {
            continue;
        }
        if let Some(small) = out[i].take() {
            if let Some(line) = out[j].as_mut() {
                line.extend(small);
            }
        }
    }
    out.into_iter().flatten().collect()
}

/// Neighbour that cluster `i` is a superscript of: the cluster is a few
/// characters long, in a smaller font, its baseline sits between the
/// neighbour's baseline and top, and it starts or ends within half an em of
/// one of the neighbour's fragments.
fn superscript_target(clusters: &[Vec<TextFragment>], i: usize, t: &LayoutThresholds) -> Option<usize> {
    let small = &clusters[i];
    let chars: usize = small.iter().map(TextFragment::char_count).sum();
    if chars == 0 || chars > SUPERSCRIPT_MAX_CHARS {
        return None;
    }
    let size = max_size(small);
    let baseline = dominant_baseline(small);
    let (x0, x1) = x_span(small);

    [i.checked_sub(1), Some(i + 1)]
        .into_iter()
        .flatten()
        .filter(|&j| j < clusters.len())
        .filter(|&j| {
            let other = &clusters[j];
            let other_size = max_size(other);
            let other_baseline = dominant_baseline(other);
            let other_top = other.iter().map(|f| f.y1).fold(f32::NEG_INFINITY, f32::max);
            let reach = other_size * 0.5;
            size <= other_size * t.superscript_ratio
                && baseline > other_baseline
                && baseline <= other_top
                && other
                    .iter()
                    .any(|f| (x0 - f.x1).max(f.x0 - x1).max(0.0) <= reach)
        })
        .min_by(|&a, &b| {
            let da = (dominant_baseline(&clusters[a]) - baseline).abs();
            let db = (dominant_baseline(&clusters[b]) - baseline).abs();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        })
}

fn build_line(page: usize, mut frags: Vec<TextFragment>, t: &LayoutThresholds) -> Option<Line> {
    frags.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(Ordering::Equal));

    let dominant_font_size = dominant_size(&frags);
    let max_font_size = max_size(&frags);
    let total_chars: usize = frags.iter().map(TextFragment::char_count).sum();
    let bold_chars: usize = frags.iter().filter(|f| f.bold).map(TextFragment::char_count).sum();
    let baseline = dominant_baseline(&frags);

    let fragments = merge_adjacent(frags, t);
    let mut raw = String::new();
    for (i, f) in fragments.iter().enumerate() {
        if i > 0 {
            push_separator(&mut raw, &fragments[i - 1], f, t);
        }
        raw.push_str(&f.text);
    }
    let text = clean_text(&raw);
    if text.is_empty() {
        return None;
    }

    Some(Line {
        page,
        text,
        baseline,
        top: fragments.iter().map(|f| f.y1).fold(f32::NEG_INFINITY, f32::max),
        left_indent: fragments.iter().map(|f| f.x0).fold(f32::INFINITY, f32::min),
        right: fragments.iter().map(|f| f.x1).fold(f32::NEG_INFINITY, f32::max),
        max_font_size,
        dominant_font_size,
        bold_dominant: total_chars > 0 && bold_chars * 2 > total_chars,
        fragments,
    })
}

/// Merge x-sorted fragments that overlap or touch. Exact duplicates drawn on
/// top of each other (simulated bold) collapse into one bold fragment.
fn merge_adjacent(frags: Vec<TextFragment>, t: &LayoutThresholds) -> Vec<TextFragment> {
    let mut out: Vec<TextFragment> = Vec::with_capacity(frags.len());
    for f in frags {
        let Some(last) = out.last_mut() else {
            out.push(f);
            continue;
        };
        let gap = f.x0 - last.x1;
        if last.text == f.text && (last.x0 - f.x0).abs() < 1.0 {
            last.bold = true;
            continue;
        }
        if gap <= t.merge_gap {
            let mut text = std::mem::take(&mut last.text);
            push_separator(&mut text, last, &f, t);
            text.push_str(&f.text);
            if f.char_count() > last.char_count() {
                last.font_size = f.font_size;
                last.font_name = f.font_name.clone();
            }
            last.text = text;
            last.x1 = last.x1.max(f.x1);
            last.y0 = last.y0.min(f.y0);
            last.y1 = last.y1.max(f.y1);
            last.bold &= f.bold;
            last.italic &= f.italic;
        } else {
            out.push(f);
        }
    }
    out
}

/// Insert a space between two fragments when the gap between them is wider
/// than a word space and neither side already carries whitespace.
fn push_separator(text: &mut String, prev: &TextFragment, next: &TextFragment, t: &LayoutThresholds) {
    let gap = next.x0 - prev.x1;
    let size = prev.font_size.max(next.font_size);
    let has_space = text.ends_with(char::is_whitespace) || next.text.starts_with(char::is_whitespace);
    if gap > size * t.word_gap_ratio && !has_space && !text.is_empty() {
        text.push(' ');
    }
}

fn max_size(frags: &[TextFragment]) -> f32 {
    frags.iter().map(|f| f.font_size).fold(0.0, f32::max)
}

fn x_span(frags: &[TextFragment]) -> (f32, f32) {
    (
        frags.iter().map(|f| f.x0).fold(f32::INFINITY, f32::min),
        frags.iter().map(|f| f.x1).fold(f32::NEG_INFINITY, f32::max),
    )
}

/// Font size covering the most characters, bucketed to 0.5pt; ties go to
/// the larger size.
fn dominant_size(frags: &[TextFragment]) -> f32 {
    let mut buckets: Vec<(f32, usize)> = Vec::new();
    for f in frags {
        let key = (f.font_size * 2.0).round() / 2.0;
        let weight = f.char_count().max(1);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += weight,
            None => buckets.push((key, weight)),
        }
    }
    buckets
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)))
        .map(|(k, _)| k)
        .unwrap_or(0.0)
}

/// Baseline of the fragment carrying the most characters.
fn dominant_baseline(frags: &[TextFragment]) -> f32 {
    frags
        .iter()
        .max_by_key(|f| f.char_count())
        .map(|f| f.y0)
        .unwrap_or(0.0)
}
