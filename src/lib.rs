//! # bibfolio
//!
//! Parse, check, and publish a personal BibTeX bibliography.
//!
//! ## Features
//!
//! - Zero-copy BibTeX parsing with source locations on errors
//! - String variable expansion, month macros included
//! - Consistency checks: duplicate keys, missing required fields,
//!   undefined strings
//! - Quarto publication pages rendered straight from the bibliography
//! - A writer to serialize databases back out, sorted or aligned
//!
//! ## Example
//!
//! ```
//! use bibfolio::Database;
//!
//! let input = r#"
//!     @article{doe2024flood,
//!         author = "Doe, Jane",
//!         title = "Flood Frequency Under Climate Change",
//!         journaltitle = "Water Resources Research",
//!         date = "2024-03-01"
//!     }
//! "#;
//!
//! let db = Database::parse(input)?;
//! assert_eq!(db.entries().len(), 1);
//!
//! let entry = &db.entries()[0];
//! assert_eq!(entry.key(), "doe2024flood");
//! assert_eq!(entry.get("author"), Some("Doe, Jane"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs,
    missing_debug_implementations
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod check;
pub mod error;
pub mod model;
pub mod pages;
pub mod parser;

mod database;
mod writer;

pub use database::{Database, DatabaseStats, ParseOptions};
pub use error::{Error, Result};
pub use model::{Entry, EntryType, Field, Value};
pub use writer::{entry_to_string, to_file, to_string, to_string_with, Writer, WriterConfig};

/// Re-export of the types most callers need
pub mod prelude {
    pub use crate::check::{Problem, Report, Severity};
    pub use crate::pages::PagesConfig;
    pub use crate::{Database, Entry, EntryType, Error, ParseOptions, Result, Value};
}

/// Parse a BibTeX database from a string
pub fn parse(input: &str) -> Result<Database> {
    Database::parse(input)
}

/// Parse a BibTeX database from a file
pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<Database<'static>> {
    ParseOptions::new().parse_file(path)
}
