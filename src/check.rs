//! Consistency checks over a bibliography
//!
//! A check run never aborts on bad data: every finding becomes a
//! [`Problem`] in the [`Report`], and the caller decides what a
//! warning is worth. Only unreadable files surface as errors.

use crate::database::MONTH_MACROS;
use crate::model::Value;
use crate::{Database, Error, Result};
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// How bad a problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The file cannot be trusted as written
    Error,
    /// The file is usable but an entry needs attention
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// What a check found
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemKind {
    /// The input is not syntactically valid BibTeX
    Syntax {
        /// Line of the failure (1-indexed)
        line: usize,
        /// Column of the failure (1-indexed)
        column: usize,
        /// Parser message
        message: String,
    },
    /// The input parsed but could not be loaded as a database
    Invalid {
        /// What went wrong
        message: String,
    },
    /// Two entries share one citation key
    DuplicateKey {
        /// The repeated key
        key: String,
    },
    /// Two citation keys differ only in letter case
    KeyCaseCollision {
        /// The later key
        key: String,
        /// The key it collides with
        existing: String,
    },
    /// An entry lacks fields its type requires
    MissingFields {
        /// Citation key of the entry
        key: String,
        /// Unsatisfied groups, interchangeable names joined with `/`
        groups: Vec<String>,
    },
    /// A field references a `@string` that is never defined
    UndefinedString {
        /// Citation key of the entry
        key: String,
        /// The undefined variable
        name: String,
    },
}

impl ProblemKind {
    /// The severity this kind always carries
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Syntax { .. } | Self::Invalid { .. } | Self::DuplicateKey { .. } => {
                Severity::Error
            }
            Self::KeyCaseCollision { .. }
            | Self::MissingFields { .. }
            | Self::UndefinedString { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax {
                line,
                column,
                message,
            } => write!(f, "syntax error at line {line}, column {column}: {message}"),
            Self::Invalid { message } => write!(f, "{message}"),
            Self::DuplicateKey { key } => write!(f, "duplicate citation key '{key}'"),
            Self::KeyCaseCollision { key, existing } => {
                write!(f, "citation key '{key}' collides with '{existing}' ignoring case")
            }
            Self::MissingFields { key, groups } => write!(
                f,
                "entry '{key}' is missing required fields: {}",
                groups.join(", ")
            ),
            Self::UndefinedString { key, name } => {
                write!(f, "entry '{key}' references undefined string '{name}'")
            }
        }
    }
}

/// One finding, located in a file when the check ran over files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    /// Derived from the kind
    pub severity: Severity,
    /// Source file, absent when checking a string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// The finding itself
    #[serde(flatten)]
    pub kind: ProblemKind,
}

impl Problem {
    fn new(kind: ProblemKind) -> Self {
        Self {
            severity: kind.severity(),
            file: None,
            kind,
        }
    }

    fn from_error(err: &Error) -> Self {
        let kind = match err {
            Error::Parse {
                line,
                column,
                message,
                ..
            } => ProblemKind::Syntax {
                line: *line,
                column: *column,
                message: message.clone(),
            },
            other => ProblemKind::Invalid {
                message: other.to_string(),
            },
        };
        Self::new(kind)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}: ", file.display())?;
        }
        write!(f, "{}: {}", self.severity, self.kind)
    }
}

/// Everything a check run found
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// All findings, in file order
    pub problems: Vec<Problem>,
    /// How many entries were examined
    pub entries_checked: usize,
}

impl Report {
    /// True when nothing was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// True when at least one error-level problem was found
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.problems
            .iter()
            .any(|p| p.severity == Severity::Error)
    }

    /// Number of error-level problems
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.problems
            .iter()
            .filter(|p| p.severity == Severity::Error)
            .count()
    }

    /// Number of warning-level problems
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.problems.len() - self.error_count()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: Report) {
        self.problems.extend(other.problems);
        self.entries_checked += other.entries_checked;
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for problem in &self.problems {
            writeln!(f, "{problem}")?;
        }
        Ok(())
    }
}

/// Check a parsed database
///
/// Duplicate keys are compared within the database only; checking files
/// one at a time will not notice keys repeated across files.
#[must_use]
pub fn check_database(db: &Database) -> Report {
    let mut report = Report {
        entries_checked: db.entries().len(),
        ..Report::default()
    };

    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut seen_folded: AHashMap<String, &str> = AHashMap::new();

    for entry in db.entries() {
        let key = entry.key();

        if !seen.insert(key) {
            report
                .problems
                .push(Problem::new(ProblemKind::DuplicateKey {
                    key: key.to_string(),
                }));
        } else {
            let folded = key.to_lowercase();
            if let Some(existing) = seen_folded.get(folded.as_str()) {
                report
                    .problems
                    .push(Problem::new(ProblemKind::KeyCaseCollision {
                        key: key.to_string(),
                        existing: (*existing).to_string(),
                    }));
            } else {
                seen_folded.insert(folded, key);
            }
        }
    }

    for entry in db.entries() {
        let missing = entry.missing_fields();
        if !missing.is_empty() {
            report
                .problems
                .push(Problem::new(ProblemKind::MissingFields {
                    key: entry.key().to_string(),
                    groups: missing.iter().map(|group| group.join("/")).collect(),
                }));
        }

        let mut unresolved = Vec::new();
        for field in entry.fields() {
            collect_variables(&field.value, &mut unresolved);
        }
        for name in unresolved {
            // Month macros count as defined even in an unexpanded database
            let defined = db.strings().contains_key(name)
                || MONTH_MACROS.contains_key(name.to_ascii_lowercase().as_str());
            if !defined {
                report
                    .problems
                    .push(Problem::new(ProblemKind::UndefinedString {
                        key: entry.key().to_string(),
                        name: name.to_string(),
                    }));
            }
        }
    }

    report
}

/// Parse and check a string of BibTeX
#[must_use]
pub fn check_str(input: &str) -> Report {
    match Database::parse(input) {
        Ok(db) => check_database(&db),
        Err(err) => Report {
            problems: vec![Problem::from_error(&err)],
            entries_checked: 0,
        },
    }
}

/// Read, parse, and check a file
///
/// Returns `Err` only when the file cannot be read; everything the file
/// contains, however broken, lands in the report.
pub fn check_file(path: impl AsRef<Path>) -> Result<Report> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut report = check_str(&content);
    for problem in &mut report.problems {
        problem.file = Some(path.to_path_buf());
    }
    Ok(report)
}

/// Collect unresolved variable names in a value, depth first
fn collect_variables<'v>(value: &'v Value<'_>, out: &mut Vec<&'v str>) {
    match value {
        Value::Variable(name) => {
            let name: &str = name;
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Value::Concat(parts) => {
            for part in parts.iter() {
                collect_variables(part, out);
            }
        }
        Value::Literal(_) | Value::Number(_) => {}
    }
}
