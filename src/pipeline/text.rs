//! Deterministic text clean-up applied to assembled lines and joined blocks.
//!
//! PDF text layers carry artefacts that are invisible in the rendered page but
//! end up in an editable document: zero-width characters, soft hyphens,
//! typographic ligatures, stray control characters and runs of spaces used
//! for justification. Each rule is a small pure function.
//!
//! ## Rule Order
//!
//! Invisible characters go first so they cannot split a whitespace run, and
//! whitespace is collapsed last so earlier replacements cannot leave doubles.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all clean-up rules to one line or block of text.
///
/// 1. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, …)
/// 2. Expand typographic ligatures (ﬁ → fi)
/// 3. Replace control characters with spaces
/// 4. Collapse whitespace runs to a single space and trim
pub fn clean_text(input: &str) -> String {
    let s = remove_invisible_chars(input);
    let s = expand_ligatures(&s);
    let s = replace_control_chars(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 2: Expand ligatures ────────────────────────────────────────────────

fn expand_ligatures(input: &str) -> String {
    if !input.chars().any(|c| ('\u{FB00}'..='\u{FB06}').contains(&c)) {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        match c {
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            other => out.push(other),
        }
    }
    out
}

// ── Rule 3: Replace control characters ──────────────────────────────────────

static RE_CONTROL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

fn replace_control_chars(input: &str) -> String {
    RE_CONTROL.replace_all(input, " ").to_string()
}

// ── Rule 4: Collapse whitespace ─────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Joining ─────────────────────────────────────────────────────────────────

/// Append `next` to a running paragraph.
///
/// A trailing hyphen directly after a letter is a line-break hyphenation:
/// before a lowercase continuation it is removed, otherwise it is kept as
/// part of a compound and the words are joined without a space.
pub fn join_lines(current: &mut String, next: &str) {
    let next = next.trim();
    if next.is_empty() {
        return;
    }
    if current.is_empty() {
        current.push_str(next);
        return;
    }
    if is_break_hyphen(current) {
        if next.chars().next().is_some_and(char::is_lowercase) {
            current.pop();
        }
        current.push_str(next);
        return;
    }
    current.push(' ');
    current.push_str(next);
}

fn is_break_hyphen(text: &str) -> bool {
    let mut rev = text.chars().rev();
    matches!(rev.next(), Some('-')) && rev.next().is_some_and(char::is_alphabetic)
}

/// True when every cased character is uppercase and there is at least one
/// letter.
pub fn is_all_caps(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| !c.is_lowercase())
}

// ── Tests ────────────────────────────────────────────────────────────────────
