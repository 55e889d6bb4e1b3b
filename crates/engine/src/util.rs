//! Internal helpers for name normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! normalization rules so duplicate detection behaves the same everywhere.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Collapse whitespace runs and trim, keeping the user's casing for display.
pub(crate) fn normalize_display(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::new();
    for token in trimmed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() { None } else { Some(out) }
}

/// Reduce a name to its comparison key.
///
/// NFKD-decomposed, combining marks dropped, alphanumerics lowercased, any
/// separator run collapsed to a single space. "Standart  Plan" and
/// "standart plan" collide, as do "İki Taksit" and "iki taksit".
pub(crate) fn normalize_name_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::new();
    let mut prev_space = false;
    for ch in trimmed.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}
