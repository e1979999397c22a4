//! Author-name handling for publication pages

use super::config::PagesConfig;
use super::format::matching_brace;
use unicode_normalization::UnicodeNormalization;

/// Split an `author` field on ` and ` separators
///
/// Separators inside braces do not count, so corporate names like
/// `{Institute of Land and Water}` stay whole. One level of protecting
/// braces is stripped and empty segments are dropped.
pub(crate) fn split_authors(field: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = field.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b' ' if depth == 0 && field[i..].starts_with(" and ") => {
                names.push(&field[start..i]);
                i += " and ".len();
                start = i;
            }
            _ => i += 1,
        }
    }
    names.push(&field[start..]);

    names
        .into_iter()
        .map(strip_outer_braces)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Strip one pair of braces when they enclose the whole name
fn strip_outer_braces(name: &str) -> &str {
    let name = name.trim();
    if name.len() >= 2
        && name.starts_with('{')
        && matching_brace(name, 0) == Some(name.len() - 1)
    {
        &name[1..name.len() - 1]
    } else {
        name
    }
}

/// Render one author for the page, reordered and decorated
///
/// Site owners come out `**bold**`, group members `*italic*`.
pub(crate) fn format_author(name: &str, config: &PagesConfig) -> String {
    let formatted = reorder_name(name);

    if config
        .self_names
        .iter()
        .any(|own| self_name_matches(&formatted, own))
    {
        format!("**{formatted}**")
    } else if config.group_members.iter().any(|m| nfc(&formatted) == nfc(m)) {
        format!("*{formatted}*")
    } else {
        formatted
    }
}

/// Turn any of the BibTeX name shapes into `Given Family`
fn reorder_name(name: &str) -> String {
    if name.contains("family=") && name.contains("given=") {
        return extended_name(name);
    }
    match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.to_string(),
    }
}

/// Handle the biblatex extended format: `family=..., given=..., prefix=...`
fn extended_name(name: &str) -> String {
    let mut family = "";
    let mut given = "";
    let mut prefix = "";
    let mut use_prefix = false;

    for part in name.split(',') {
        if let Some((key, value)) = part.split_once('=') {
            match key.trim() {
                "family" => family = value.trim(),
                "given" => given = value.trim(),
                "prefix" => prefix = value.trim(),
                "useprefix" => use_prefix = value.trim().eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
    }

    if use_prefix && !prefix.is_empty() {
        format!("{given} {prefix} {family}")
    } else {
        format!("{given} {family}")
    }
}

/// Compare against a configured self name, ignoring hyphens
///
/// Hyphenated surnames appear both ways in exported metadata.
fn self_name_matches(candidate: &str, configured: &str) -> bool {
    let a = nfc(candidate);
    let b = nfc(configured);
    a == b || a.replace('-', "") == b.replace('-', "")
}

fn nfc(s: &str) -> String {
    s.nfc().collect()
}
