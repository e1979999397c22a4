//! The parsed bibliography: entries, string table, expansion, queries

use crate::model::{Entry, Value};
use crate::parser::{self, Item};
use crate::{Error, Result};
use ahash::AHashMap;
use lazy_static::lazy_static;
use std::borrow::Cow;
use std::path::Path;

lazy_static! {
    /// Month macros that every BibTeX style predefines (`month = jan`)
    pub(crate) static ref MONTH_MACROS: AHashMap<&'static str, &'static str> = {
        let mut months = AHashMap::with_capacity(12);
        months.insert("jan", "January");
        months.insert("feb", "February");
        months.insert("mar", "March");
        months.insert("apr", "April");
        months.insert("may", "May");
        months.insert("jun", "June");
        months.insert("jul", "July");
        months.insert("aug", "August");
        months.insert("sep", "September");
        months.insert("oct", "October");
        months.insert("nov", "November");
        months.insert("dec", "December");
        months
    };
}

/// Parser configuration, builder style
///
/// ```
/// use bibfolio::Database;
///
/// let db = Database::parser()
///     .month_macros(false)
///     .strict_strings(true)
///     .parse("@misc{m, note = {plain}}")?;
/// assert_eq!(db.entries().len(), 1);
/// # Ok::<(), bibfolio::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    expand_strings: bool,
    month_macros: bool,
    strict_strings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            expand_strings: true,
            month_macros: true,
            strict_strings: false,
        }
    }
}

impl ParseOptions {
    /// Create options with the defaults: expansion on, month macros on,
    /// lenient strings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `@string` references and flatten concatenations in entry
    /// fields (default: on)
    ///
    /// Turn this off to preserve values exactly as written, for round
    /// trips that must not inline definitions.
    #[must_use]
    pub const fn expand_strings(mut self, on: bool) -> Self {
        self.expand_strings = on;
        self
    }

    /// Resolve the built-in `jan`..`dec` macros (default: on)
    #[must_use]
    pub const fn month_macros(mut self, on: bool) -> Self {
        self.month_macros = on;
        self
    }

    /// Error out on undefined `@string` references instead of keeping them
    /// as unresolved variables (default: off)
    #[must_use]
    pub const fn strict_strings(mut self, on: bool) -> Self {
        self.strict_strings = on;
        self
    }

    /// Parse an input string under these options
    pub fn parse<'a>(&self, input: &'a str) -> Result<Database<'a>> {
        let items = parser::parse_document(input)?;
        self.build(items)
    }

    /// Parse a file, returning a database detached from the file buffer
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Database<'static>> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.parse(&content)?.into_owned())
    }

    fn build<'a>(&self, items: Vec<Item<'a>>) -> Result<Database<'a>> {
        let mut db = Database::default();

        // Strings first, so definitions resolve regardless of file order
        for item in &items {
            if let Item::StringDef(name, value) = item {
                db.strings.insert(Cow::Borrowed(*name), value.clone());
            }
        }

        for item in items {
            match item {
                Item::Entry(mut entry) => {
                    if self.expand_strings {
                        for field in &mut entry.fields {
                            let raw = std::mem::take(&mut field.value);
                            field.value = self.resolve(&db.strings, raw, &mut Vec::new())?;
                        }
                    }
                    entry.fields.shrink_to_fit();
                    db.entries.push(entry);
                }
                Item::Preamble(value) => {
                    let resolved = if self.expand_strings {
                        self.resolve(&db.strings, value, &mut Vec::new())?
                    } else {
                        value
                    };
                    db.preambles.push(resolved);
                }
                Item::Comment(text) => db.comments.push(Cow::Borrowed(text)),
                Item::StringDef(_, _) => {} // handled above
            }
        }

        db.entries.shrink_to_fit();
        db.preambles.shrink_to_fit();
        db.comments.shrink_to_fit();
        Ok(db)
    }

    /// Expand variables and flatten concatenations
    ///
    /// `trail` records the chain of variable names currently being resolved;
    /// revisiting one means the definitions form a cycle.
    fn resolve<'a>(
        &self,
        strings: &AHashMap<Cow<'a, str>, Value<'a>>,
        value: Value<'a>,
        trail: &mut Vec<String>,
    ) -> Result<Value<'a>> {
        match value {
            Value::Literal(_) | Value::Number(_) => Ok(value),

            Value::Variable(name) => {
                if trail.iter().any(|seen| seen.as_str() == &*name) {
                    trail.push(name.into_owned());
                    return Err(Error::CircularReference(trail.join(" -> ")));
                }

                if let Some(defined) = strings.get(&*name) {
                    trail.push(name.to_string());
                    let resolved = self.resolve(strings, defined.clone(), trail)?;
                    trail.pop();
                    return Ok(resolved);
                }

                if self.month_macros {
                    let lowered = name.to_ascii_lowercase();
                    if let Some(month) = MONTH_MACROS.get(lowered.as_str()) {
                        return Ok(Value::Literal(Cow::Borrowed(*month)));
                    }
                }

                if self.strict_strings {
                    Err(Error::UndefinedVariable(name.into_owned()))
                } else {
                    Ok(Value::Variable(name))
                }
            }

            Value::Concat(parts) => {
                let mut resolved = Vec::with_capacity(parts.len());
                for part in *parts {
                    resolved.push(self.resolve(strings, part, trail)?);
                }

                if resolved
                    .iter()
                    .all(|p| matches!(p, Value::Literal(_) | Value::Number(_)))
                {
                    Ok(Value::Literal(Cow::Owned(join_simple(&resolved))))
                } else {
                    Ok(Value::Concat(Box::new(resolved)))
                }
            }
        }
    }
}

/// Concatenate literal and number parts into one string
fn join_simple(parts: &[Value]) -> String {
    let mut joined = String::with_capacity(
        parts
            .iter()
            .map(|p| match p {
                Value::Literal(s) => s.len(),
                _ => 8,
            })
            .sum(),
    );

    for part in parts {
        match part {
            Value::Literal(s) => joined.push_str(s),
            Value::Number(n) => joined.push_str(&n.to_string()),
            _ => {}
        }
    }

    joined
}

/// A parsed `.bib` file
#[derive(Debug, Clone, Default)]
pub struct Database<'a> {
    entries: Vec<Entry<'a>>,
    strings: AHashMap<Cow<'a, str>, Value<'a>>,
    preambles: Vec<Value<'a>>,
    comments: Vec<Cow<'a, str>>,
}

impl<'a> Database<'a> {
    /// Create an empty database
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse with default options (month macros on, lenient strings)
    pub fn parse(input: &'a str) -> Result<Self> {
        ParseOptions::new().parse(input)
    }

    /// Configure parsing through a [`ParseOptions`] builder
    #[must_use]
    pub fn parser() -> ParseOptions {
        ParseOptions::new()
    }

    /// All entries in file order
    #[must_use]
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// The `@string` definitions, unresolved
    #[must_use]
    pub const fn strings(&self) -> &AHashMap<Cow<'a, str>, Value<'a>> {
        &self.strings
    }

    /// All `@preamble` values
    #[must_use]
    pub fn preambles(&self) -> &[Value<'a>] {
        &self.preambles
    }

    /// All comments, in file order
    #[must_use]
    pub fn comments(&self) -> &[Cow<'a, str>] {
        &self.comments
    }

    /// Find an entry by exact citation key
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<&Entry<'a>> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// All entries of a type, compared case-insensitively
    #[must_use]
    pub fn find_by_type(&self, ty: &str) -> Vec<&Entry<'a>> {
        self.entries
            .iter()
            .filter(|e| e.ty.to_string().eq_ignore_ascii_case(ty))
            .collect()
    }

    /// All entries whose rendered field text contains `needle`
    #[must_use]
    pub fn find_by_field(&self, field: &str, needle: &str) -> Vec<&Entry<'a>> {
        self.entries
            .iter()
            .filter(|e| {
                e.get_text(field)
                    .map_or(false, |text| text.contains(needle))
            })
            .collect()
    }

    /// Count what the database holds
    #[must_use]
    pub fn stats(&self) -> DatabaseStats {
        let mut by_type = AHashMap::new();
        for entry in &self.entries {
            *by_type.entry(entry.ty.to_string()).or_insert(0) += 1;
        }

        DatabaseStats {
            entries: self.entries.len(),
            strings: self.strings.len(),
            preambles: self.preambles.len(),
            comments: self.comments.len(),
            by_type,
        }
    }

    /// Convert to a database that owns all of its data
    #[must_use]
    pub fn into_owned(self) -> Database<'static> {
        Database {
            entries: self.entries.into_iter().map(Entry::into_owned).collect(),
            strings: self
                .strings
                .into_iter()
                .map(|(name, value)| (Cow::Owned(name.into_owned()), value.into_owned()))
                .collect(),
            preambles: self.preambles.into_iter().map(Value::into_owned).collect(),
            comments: self
                .comments
                .into_iter()
                .map(|c| Cow::Owned(c.into_owned()))
                .collect(),
        }
    }
}

/// Counts of what a [`Database`] holds
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Number of entries
    pub entries: usize,
    /// Number of `@string` definitions
    pub strings: usize,
    /// Number of preambles
    pub preambles: usize,
    /// Number of comments
    pub comments: usize,
    /// Entry counts keyed by type name
    pub by_type: AHashMap<String, usize>,
}
