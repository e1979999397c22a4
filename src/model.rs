//! Data model for bibliography entries
//!
//! Everything borrows from the parsed input where possible; call
//! `into_owned` to detach a value from its source buffer.

use std::borrow::Cow;
use std::fmt;

/// A single bibliography entry (`@article{key, ...}` and friends)
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    /// Entry type (article, inproceedings, online, ...)
    pub ty: EntryType<'a>,
    /// Citation key
    pub key: Cow<'a, str>,
    /// Fields in file order
    pub fields: Vec<Field<'a>>,
}

impl<'a> Entry<'a> {
    /// Create an entry with no fields
    #[must_use]
    pub const fn new(ty: EntryType<'a>, key: &'a str) -> Self {
        Self {
            ty,
            key: Cow::Borrowed(key),
            fields: Vec::new(),
        }
    }

    /// Get the entry type
    #[must_use]
    pub const fn entry_type(&self) -> &EntryType<'a> {
        &self.ty
    }

    /// Get the citation key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Find a field by name (case-insensitive)
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field<'a>> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// True if a field with this name is present, whatever its value
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Get a field's value when it is a plain string literal
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(|f| f.value.as_str())
    }

    /// Get a field's value rendered to text, whatever its shape
    ///
    /// Numbers are formatted as decimal, unresolved variables as `{name}`,
    /// concatenations as their parts joined together.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.field(name).map(|f| f.value.text())
    }

    /// All fields in file order
    #[must_use]
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    /// Append a field
    pub fn add_field(&mut self, field: Field<'a>) {
        self.fields.push(field);
    }

    /// Required-field groups of this entry's type that no field satisfies
    ///
    /// Each group lists interchangeable names (`year`/`date`); a group is
    /// satisfied when any one of them is present.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static [&'static str]> {
        self.ty
            .required_fields()
            .iter()
            .copied()
            .filter(|group| !group.iter().any(|name| self.has_field(name)))
            .collect()
    }

    /// True when every required-field group of the entry's type is satisfied
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Convert to a version that owns all its data
    #[must_use]
    pub fn into_owned(self) -> Entry<'static> {
        Entry {
            ty: self.ty.into_owned(),
            key: Cow::Owned(self.key.into_owned()),
            fields: self.fields.into_iter().map(Field::into_owned).collect(),
        }
    }
}

/// Entry type, covering classic BibTeX plus the biblatex types the data uses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType<'a> {
    /// Journal article
    Article,
    /// Book with a publisher
    Book,
    /// Part of a book
    InBook,
    /// Paper in conference proceedings
    InProceedings,
    /// Conference proceedings as a whole
    Proceedings,
    /// Master's thesis
    MastersThesis,
    /// Doctoral thesis
    PhdThesis,
    /// Technical report
    TechReport,
    /// Unpublished work
    Unpublished,
    /// Online resource (biblatex)
    Online,
    /// Anything else standard
    Misc,
    /// Nonstandard type, kept verbatim (`@preprint`, ...)
    Custom(Cow<'a, str>),
}

impl<'a> EntryType<'a> {
    /// Parse from the text after `@` (case-insensitive)
    #[must_use]
    pub fn parse(s: &'a str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "inbook" => Self::InBook,
            "inproceedings" | "conference" => Self::InProceedings,
            "proceedings" => Self::Proceedings,
            "mastersthesis" => Self::MastersThesis,
            "phdthesis" => Self::PhdThesis,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" => Self::Online,
            "misc" => Self::Misc,
            _ => Self::Custom(Cow::Borrowed(s)),
        }
    }

    /// Required fields for this type, as groups of interchangeable names
    ///
    /// Groups mix BibTeX and biblatex conventions because exported libraries
    /// do: `year` or `date`, `journal` or `journaltitle`.
    #[must_use]
    pub const fn required_fields(&self) -> &'static [&'static [&'static str]] {
        match self {
            Self::Article => &[
                &["author"],
                &["title"],
                &["journal", "journaltitle"],
                &["year", "date"],
            ],
            Self::Book => &[&["author"], &["title"], &["publisher"], &["year", "date"]],
            Self::InBook => &[
                &["author"],
                &["title"],
                &["chapter", "pages"],
                &["publisher"],
                &["year", "date"],
            ],
            Self::InProceedings => &[
                &["author"],
                &["title"],
                &["booktitle", "eventtitle"],
                &["year", "date"],
            ],
            Self::Proceedings => &[&["title"], &["year", "date"]],
            Self::MastersThesis | Self::PhdThesis => &[
                &["author"],
                &["title"],
                &["school", "institution"],
                &["year", "date"],
            ],
            Self::TechReport => &[
                &["author"],
                &["title"],
                &["institution"],
                &["year", "date"],
            ],
            Self::Unpublished => &[&["author"], &["title"], &["note"]],
            Self::Online => &[
                &["author", "editor"],
                &["title"],
                &["url", "doi", "eprint"],
            ],
            Self::Misc | Self::Custom(_) => &[],
        }
    }

    /// Convert to a version that owns its data
    #[must_use]
    pub fn into_owned(self) -> EntryType<'static> {
        match self {
            Self::Custom(s) => EntryType::Custom(Cow::Owned(s.into_owned())),
            Self::Article => EntryType::Article,
            Self::Book => EntryType::Book,
            Self::InBook => EntryType::InBook,
            Self::InProceedings => EntryType::InProceedings,
            Self::Proceedings => EntryType::Proceedings,
            Self::MastersThesis => EntryType::MastersThesis,
            Self::PhdThesis => EntryType::PhdThesis,
            Self::TechReport => EntryType::TechReport,
            Self::Unpublished => EntryType::Unpublished,
            Self::Online => EntryType::Online,
            Self::Misc => EntryType::Misc,
        }
    }
}

impl fmt::Display for EntryType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Book => write!(f, "book"),
            Self::InBook => write!(f, "inbook"),
            Self::InProceedings => write!(f, "inproceedings"),
            Self::Proceedings => write!(f, "proceedings"),
            Self::MastersThesis => write!(f, "mastersthesis"),
            Self::PhdThesis => write!(f, "phdthesis"),
            Self::TechReport => write!(f, "techreport"),
            Self::Unpublished => write!(f, "unpublished"),
            Self::Online => write!(f, "online"),
            Self::Misc => write!(f, "misc"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// One `name = value` pair inside an entry
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    /// Field name as written
    pub name: Cow<'a, str>,
    /// Field value
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    /// Create a field
    #[must_use]
    pub const fn new(name: &'a str, value: Value<'a>) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value,
        }
    }

    /// Convert to a version that owns its data
    #[must_use]
    pub fn into_owned(self) -> Field<'static> {
        Field {
            name: Cow::Owned(self.name.into_owned()),
            value: self.value.into_owned(),
        }
    }
}

/// A field value as BibTeX models it
///
/// `Concat` is boxed to keep the enum at the size of its `Literal` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Quoted or braced string
    Literal(Cow<'a, str>),
    /// Bare integer
    Number(i64),
    /// Reference to a `@string` definition
    Variable(Cow<'a, str>),
    /// `a # b # c` concatenation
    Concat(Box<Vec<Value<'a>>>),
}

impl Default for Value<'_> {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl<'a> Value<'a> {
    /// Build a borrowed literal
    #[must_use]
    pub const fn literal(s: &'a str) -> Self {
        Self::Literal(Cow::Borrowed(s))
    }

    /// Build a borrowed variable reference
    #[must_use]
    pub const fn variable(name: &'a str) -> Self {
        Self::Variable(Cow::Borrowed(name))
    }

    /// The value as a plain string, if it is a simple literal
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value to text
    ///
    /// Unresolved variables render as `{name}` so they stay visible.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Literal(s) => s.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Variable(name) => format!("{{{name}}}"),
            Self::Concat(parts) => parts.iter().map(Self::text).collect(),
        }
    }

    /// Convert to a version that owns its data
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Self::Literal(s) => Value::Literal(Cow::Owned(s.into_owned())),
            Self::Number(n) => Value::Number(n),
            Self::Variable(s) => Value::Variable(Cow::Owned(s.into_owned())),
            Self::Concat(parts) => {
                Value::Concat(Box::new(parts.into_iter().map(Value::into_owned).collect()))
            }
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => write!(f, "{{{name}}}"),
            Self::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " # ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}
