//! Publication pages from a bibliography
//!
//! Renders one Quarto `.qmd` page per entry into the site's
//! `publications/` tree, routed by entry type. Stale pages are removed
//! first, so the tree always mirrors the bibliography exactly.

pub mod config;
mod format;
mod names;
mod qmd;

pub use config::PagesConfig;

use crate::model::{Entry, EntryType};
use crate::{Database, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Which subdirectory a publication page lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationKind {
    /// Journal articles
    Article,
    /// Conference papers
    Conference,
    /// Preprints and other online-first work
    Forthcoming,
    /// Everything else
    Other,
}

impl PublicationKind {
    /// The four routing directories, in cleanup order
    pub const ALL: [Self; 4] = [Self::Article, Self::Conference, Self::Other, Self::Forthcoming];

    /// Route an entry by its type
    #[must_use]
    pub fn of(entry: &Entry) -> Self {
        match entry.entry_type() {
            EntryType::Article => Self::Article,
            EntryType::InProceedings => Self::Conference,
            EntryType::Online => Self::Forthcoming,
            EntryType::Custom(name) if name.eq_ignore_ascii_case("preprint") => Self::Forthcoming,
            _ => Self::Other,
        }
    }

    /// Directory name under the output directory
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Conference => "conference",
            Self::Forthcoming => "forthcoming",
            Self::Other => "other",
        }
    }
}

/// Sanitize a citation key into a filename
///
/// Every character outside `[A-Za-z0-9_-]` becomes an underscore.
#[must_use]
pub fn citekey_slug(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Counts from one render run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagesStats {
    /// Pages written
    pub written: usize,
    /// Entries with a cover image in the assets directory
    pub images_found: usize,
    /// Entries without one
    pub images_missing: usize,
    /// Stale pages removed before rendering
    pub removed: usize,
}

/// Render a page for every entry into the site rooted at `root`
pub fn render(db: &Database, config: &PagesConfig, root: impl AsRef<Path>) -> Result<PagesStats> {
    let root = root.as_ref();
    let mut stats = PagesStats {
        removed: clean_output_dirs(root, config)?,
        ..PagesStats::default()
    };
    fs::create_dir_all(root.join(&config.assets_dir))?;

    for entry in db.entries() {
        let kind = PublicationKind::of(entry);
        let slug = citekey_slug(entry.key());

        let image = find_image(root, config, &slug);
        match &image {
            Some(_) => stats.images_found += 1,
            None => stats.images_missing += 1,
        }

        let page = qmd::page_markup(entry, config, image.as_deref())?;
        let path = root
            .join(&config.out_dir)
            .join(kind.dir_name())
            .join(format!("{slug}.qmd"));
        fs::write(&path, page)?;
        debug!(key = entry.key(), path = %path.display(), "wrote page");
        stats.written += 1;
    }

    info!(
        written = stats.written,
        removed = stats.removed,
        "rendered publication pages"
    );
    Ok(stats)
}

/// Delete stale `.qmd` files from the routing directories, creating
/// any directory that does not exist yet
fn clean_output_dirs(root: &Path, config: &PagesConfig) -> Result<usize> {
    let base = root.join(&config.out_dir);
    let mut removed = 0;

    for kind in PublicationKind::ALL {
        let dir = base.join(kind.dir_name());
        if dir.exists() {
            for dent in fs::read_dir(&dir)? {
                let path = dent?.path();
                if path.extension().is_some_and(|ext| ext == "qmd") {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
        } else {
            fs::create_dir_all(&dir)?;
        }
    }

    Ok(removed)
}

/// The entry's cover image as a page-relative path, if one exists
fn find_image(root: &Path, config: &PagesConfig, slug: &str) -> Option<String> {
    for ext in ["png", "jpg", "jpeg"] {
        let relative = format!("{}/{slug}.{ext}", config.assets_dir);
        if root.join(&relative).exists() {
            return Some(format!("../../{relative}"));
        }
    }
    None
}
