//! Document-wide font statistics.
//!
//! Heading detection compares each line against the body font size, so the
//! profile is computed once over every extracted page before any page is
//! classified. A one-page cover sheet full of large type cannot skew it as
//! long as the rest of the document is body text.

use crate::model::{Line, PageFontProfile};
use std::cmp::Ordering;
use tracing::debug;

/// Compute the profile from all lines of all pages.
///
/// * `body_size` is the modal dominant font size, weighted by characters and
///   bucketed to 0.5pt.
/// * `line_gap` is the modal baseline distance between consecutive body-size
///   lines on the same page, bucketed to 0.5pt.
///
/// Falls back to [`PageFontProfile::default`] fields when there is nothing to
/// measure.
pub fn compute_profile<'a, I>(pages: I, size_tolerance: f32) -> PageFontProfile
where
    I: IntoIterator<Item = &'a [Line]>,
{
    let pages: Vec<&[Line]> = pages.into_iter().collect();
    let defaults = PageFontProfile::default();

    let mut size_hist: Vec<(f32, usize)> = Vec::new();
    let mut max_size = 0.0f32;
    for line in pages.iter().flat_map(|p| p.iter()) {
        let chars = line.text.chars().filter(|c| !c.is_whitespace()).count();
        bump(&mut size_hist, bucket(line.dominant_font_size), chars);
        max_size = max_size.max(line.max_font_size);
    }

    let Some(body_size) = mode(&size_hist) else {
        return defaults;
    };

    let mut gap_hist: Vec<(f32, usize)> = Vec::new();
    for lines in &pages {
        for pair in lines.windows(2) {
            let is_body = |l: &Line| (l.dominant_font_size - body_size).abs() <= size_tolerance;
            if !is_body(&pair[0]) || !is_body(&pair[1]) {
                continue;
            }
            let gap = pair[0].baseline - pair[1].baseline;
            if gap > 0.0 {
                bump(&mut gap_hist, bucket(gap), 1);
            }
        }
    }
    let line_gap = mode(&gap_hist).unwrap_or(body_size * 1.2);

    let profile = PageFontProfile {
        body_size,
        max_size: max_size.max(body_size),
        line_gap,
    };
    debug!(
        "Font profile: body={:.1}pt max={:.1}pt line_gap={:.1}pt",
        profile.body_size, profile.max_size, profile.line_gap
    );
    profile
}

fn bucket(v: f32) -> f32 {
    (v * 2.0).round() / 2.0
}

fn bump(hist: &mut Vec<(f32, usize)>, key: f32, weight: usize) {
    if weight == 0 {
        return;
    }
    match hist.iter_mut().find(|(k, _)| *k == key) {
        Some((_, n)) => *n += weight,
        None => hist.push((key, weight)),
    }
}

/// Most frequent key; ties go to the smaller key.
fn mode(hist: &[(f32, usize)]) -> Option<f32> {
    hist.iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal)))
        .map(|(k, _)| *k)
}
