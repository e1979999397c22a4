//! Page generation settings
//!
//! Loaded from a JSON file so the site owner's names and paths live
//! next to the bibliography instead of inside the tool.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings for rendering publication pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Bibliography file the pages cite, relative to the site root
    pub bibliography: String,
    /// CSL style file, relative to the site root
    pub csl: String,
    /// Quarto `about` template the pages use
    pub template: String,
    /// Names of the site owner, rendered in bold
    pub self_names: Vec<String>,
    /// Names of group members, rendered in italics
    pub group_members: Vec<String>,
    /// Directory the pages land in, relative to the site root
    pub out_dir: String,
    /// Directory searched for cover images, relative to the site root
    pub assets_dir: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            bibliography: "my-papers.bib".to_string(),
            csl: "american-geophysical-union.csl".to_string(),
            template: "solana".to_string(),
            self_names: Vec::new(),
            group_members: Vec::new(),
            out_dir: "publications".to_string(),
            assets_dir: "_assets/img/pubs".to_string(),
        }
    }
}

impl PagesConfig {
    /// Load settings from a JSON file
    ///
    /// Missing keys fall back to the defaults; unknown keys are
    /// rejected so typos do not silently disable a setting.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
