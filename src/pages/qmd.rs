//! One publication page per entry
//!
//! The page is YAML front matter for a Quarto `about` page, then the
//! abstract as body text, then the entry itself in a fenced block. The
//! section layout is fixed; only the config names and paths vary.

use super::config::PagesConfig;
use super::format::{display_date, quoted, title_case, unescape_for_yaml, year_of};
use super::names;
use crate::model::{Entry, EntryType};
use crate::writer::{self, WriterConfig};
use crate::Result;

/// Render the full `.qmd` markup for one entry
///
/// `image` is the already-resolved cover image path, if one exists.
pub(crate) fn page_markup(
    entry: &Entry,
    config: &PagesConfig,
    image: Option<&str>,
) -> Result<String> {
    let mut out = String::with_capacity(1024);
    out.push_str("---\n");

    let title = entry.get_text("title").unwrap_or_default();
    out.push_str(&format!(
        "title: {}\n",
        quoted(&title_case(&unescape_for_yaml(&title)))
    ));

    out.push_str("author:\n");
    let authors = entry.get_text("author").unwrap_or_default();
    for name in names::split_authors(&authors) {
        let formatted = names::format_author(name, config);
        if formatted.starts_with('*') {
            out.push_str(&format!("  - {}\n", quoted(&formatted)));
        } else {
            out.push_str(&format!("  - {formatted}\n"));
        }
    }

    // biblatex files carry `date`; classic ones only `year`
    let date = entry
        .get_text("date")
        .filter(|d| !d.is_empty())
        .or_else(|| entry.get_text("year"))
        .unwrap_or_default();
    out.push_str(&format!("date: {}\n", display_date(&date)));

    let details = venue_details(entry);
    out.push_str(&format!(
        "details: {}\n",
        quoted(&title_case(&unescape_for_yaml(&details)))
    ));

    if let Some(year) = year_of(&date) {
        out.push_str(&format!("year: {year}\n"));
    }

    if matches!(entry.entry_type(), EntryType::Article) {
        if let Some(volume) = entry.get_text("volume") {
            out.push_str(&format!("volume: {}\n", quoted(&volume)));
        }
        let issue = entry
            .get_text("number")
            .or_else(|| entry.get_text("issue"));
        if let Some(issue) = issue {
            out.push_str(&format!("issue: {}\n", quoted(&issue)));
        }
        if let Some(pages) = entry.get_text("pages") {
            out.push_str(&format!("pages: {}\n", quoted(&pages)));
        }
    }

    out.push_str(&format!("bibliography: ../../{}\n", config.bibliography));
    out.push_str(&format!("csl: ../../{}\n", config.csl));
    out.push_str(&format!("nocite: {}\n", quoted(&format!("@{}", entry.key()))));

    if let Some(image) = image {
        out.push_str(&format!("image: {image}\n"));
    }

    out.push_str("\nabout:\n");
    out.push_str(&format!("  template: {}\n", config.template));
    push_links(entry, &mut out);

    out.push_str("\nformat:\n  html:\n    page-layout: full\n");
    out.push_str("---");

    if let Some(abstract_text) = entry.get_text("abstract") {
        out.push_str("\n\n");
        out.push_str(&abstract_text);
    }

    out.push_str("\n\n## BibTeX\n\n```bibtex\n");
    let bib = writer::entry_to_string(
        entry,
        WriterConfig {
            omit_fields: vec!["abstract".to_string()],
            ..WriterConfig::default()
        },
    )?;
    out.push_str(&bib);
    out.push_str("```");

    Ok(out)
}

/// The `about` page link list: DOI or URL, then code, then preprint
fn push_links(entry: &Entry, out: &mut String) {
    let doi = entry.get_text("doi");
    let url = entry.get_text("url");
    let repo = entry.get_text("repo");
    let preprint = entry.get_text("preprint");
    let is_open = entry.get("open") == Some("true");

    if doi.is_none() && url.is_none() && repo.is_none() && preprint.is_none() {
        return;
    }
    out.push_str("  links:\n");

    if let Some(doi) = &doi {
        if is_open {
            out.push_str(&format!("    - text: 'DOI: {doi} (Open Access)'\n"));
        } else {
            out.push_str(&format!("    - text: 'DOI: {doi}'\n"));
        }
        out.push_str(&format!("      href: https://doi.org/{doi}\n"));
        out.push_str("      icon: link\n");
    } else if let Some(url) = &url {
        out.push_str(&format!("    - href: {url}\n"));
        out.push_str("      icon: link\n");
        if is_open {
            out.push_str("      text: 'Open Access'\n");
        } else {
            out.push_str("      text: 'Link'\n");
        }
    }

    if let Some(repo) = &repo {
        out.push_str("    - icon: github\n");
        out.push_str("      text: Code\n");
        out.push_str(&format!("      href: {repo}\n"));
    }

    if let Some(preprint) = &preprint {
        out.push_str("    - text: Preprint\n");
        out.push_str("      icon: file-pdf\n");
        out.push_str(&format!("      href: {preprint}\n"));
    }
}

/// The venue line under the title, chosen by entry type
fn venue_details(entry: &Entry) -> String {
    match entry.entry_type() {
        EntryType::Article => entry
            .get_text("journaltitle")
            .or_else(|| entry.get_text("journal"))
            .unwrap_or_default(),
        EntryType::InProceedings => {
            if let Some(booktitle) = entry.get_text("booktitle") {
                booktitle
            } else if let (Some(publisher), Some(event)) =
                (entry.get_text("publisher"), entry.get_text("eventtitle"))
            {
                format!("{publisher} {event}")
            } else if let Some(event) = entry.get_text("eventtitle") {
                event
            } else {
                String::new()
            }
        }
        _ => entry.get_text("howpublished").unwrap_or_default(),
    }
}
