//! Text shaping for page front matter

use chrono::{Datelike, NaiveDate};

/// Title-case text outside braces, keep braced spans verbatim
///
/// Words are runs of letters; the first letter of each run is
/// uppercased and the rest lowercased, so acronyms survive only when
/// protected (`{HUMID}`). One level of protecting braces is stripped,
/// and a protected span ends the word before it.
pub(crate) fn title_case(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }
    let title = collapse_double_braces(title);

    let mut out = String::with_capacity(title.len());
    let mut prev_letter = false;
    let mut chars = title.char_indices();

    while let Some((i, c)) = chars.next() {
        if c == '{' {
            if let Some(end) = matching_brace(&title, i) {
                out.push_str(&title[i + 1..end]);
                prev_letter = false;
                for (j, _) in chars.by_ref() {
                    if j == end {
                        break;
                    }
                }
                continue;
            }
        }

        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }

    out
}

/// Reduce `{{...}}` to `{...}` until no doubled braces remain
fn collapse_double_braces(title: &str) -> String {
    let mut title = title.to_string();
    while title.contains("{{") && title.contains("}}") {
        title = title.replace("{{", "{").replace("}}", "}");
    }
    title
}

/// Index of the brace closing the one at `open`, if balanced
pub(crate) fn matching_brace(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Undo the LaTeX escapes that YAML has no use for
pub(crate) fn unescape_for_yaml(s: &str) -> String {
    s.replace("\\&", "&").replace("\\:", ":")
}

/// Wrap a scalar in double quotes, escaping any it contains
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Normalize a date for front matter
///
/// A bare year becomes `YYYY-01-01`; a full `YYYY-MM-DD` is validated
/// and re-rendered; anything else passes through unchanged.
pub(crate) fn display_date(date: &str) -> String {
    let trimmed = date.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return format!("{trimmed}-01-01");
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// The year of a date string, if one can be read off it
pub(crate) fn year_of(date: &str) -> Option<i32> {
    let trimmed = date.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.year());
    }
    trimmed.split('-').next()?.parse().ok()
}
