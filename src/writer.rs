//! Serialize a database back to BibTeX text

use crate::{Database, Entry, Result, Value};
use std::io::{self, Write};

/// Configuration for writing BibTeX
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Indentation string (default: "  ")
    pub indent: String,
    /// Pad field names so values line up (default: false)
    pub align_values: bool,
    /// Sort entries by citation key (default: false)
    pub sort_entries: bool,
    /// Sort fields within each entry by name (default: false)
    pub sort_fields: bool,
    /// Field names to skip, compared case-insensitively (default: none)
    pub omit_fields: Vec<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            align_values: false,
            sort_entries: false,
            sort_fields: false,
            omit_fields: Vec::new(),
        }
    }
}

/// BibTeX writer over any [`io::Write`] sink
#[derive(Debug)]
pub struct Writer<W: Write> {
    writer: W,
    config: WriterConfig,
}

impl<W: Write> Writer<W> {
    /// Create a writer with the default configuration
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            config: WriterConfig::default(),
        }
    }

    /// Create a writer with a custom configuration
    pub const fn with_config(writer: W, config: WriterConfig) -> Self {
        Self { writer, config }
    }

    /// Write a complete database: preambles, strings, then entries
    pub fn write_database(&mut self, db: &Database) -> io::Result<()> {
        for preamble in db.preambles() {
            self.write_preamble(preamble)?;
            writeln!(self.writer)?;
        }

        // The string table has no inherent order; sort so output is stable
        let mut strings: Vec<_> = db.strings().iter().collect();
        strings.sort_by(|a, b| a.0.cmp(b.0));

        for (name, value) in strings {
            self.write_string(name, value)?;
            writeln!(self.writer)?;
        }

        let mut entries: Vec<_> = db.entries().iter().collect();
        if self.config.sort_entries {
            entries.sort_by(|a, b| a.key.cmp(&b.key));
        }

        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                writeln!(self.writer)?;
            }
            self.write_entry(entry)?;
        }

        Ok(())
    }

    /// Write a single entry
    pub fn write_entry(&mut self, entry: &Entry) -> io::Result<()> {
        writeln!(self.writer, "@{}{{{},", entry.ty, entry.key)?;

        let mut fields: Vec<_> = entry
            .fields()
            .iter()
            .filter(|f| {
                !self
                    .config
                    .omit_fields
                    .iter()
                    .any(|omit| omit.eq_ignore_ascii_case(&f.name))
            })
            .collect();

        if self.config.sort_fields {
            fields.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let max_name_len = if self.config.align_values {
            fields.iter().map(|f| f.name.len()).max().unwrap_or(0)
        } else {
            0
        };

        for (i, field) in fields.iter().enumerate() {
            write!(self.writer, "{}", self.config.indent)?;
            write!(self.writer, "{}", field.name)?;

            if self.config.align_values {
                let padding = max_name_len - field.name.len();
                write!(self.writer, "{}", " ".repeat(padding))?;
            }

            write!(self.writer, " = ")?;
            self.write_value(&field.value)?;

            if i + 1 < fields.len() {
                writeln!(self.writer, ",")?;
            } else {
                writeln!(self.writer)?;
            }
        }

        writeln!(self.writer, "}}")?;
        Ok(())
    }

    /// Write a `@string` definition
    fn write_string(&mut self, name: &str, value: &Value) -> io::Result<()> {
        write!(self.writer, "@string{{{name} = ")?;
        self.write_value(value)?;
        writeln!(self.writer, "}}")?;
        Ok(())
    }

    /// Write a `@preamble`
    fn write_preamble(&mut self, value: &Value) -> io::Result<()> {
        write!(self.writer, "@preamble{{")?;
        self.write_value(value)?;
        writeln!(self.writer, "}}")?;
        Ok(())
    }

    /// Write a value: literals braced, numbers and variables bare
    fn write_value(&mut self, value: &Value) -> io::Result<()> {
        match value {
            Value::Literal(s) => write!(self.writer, "{{{s}}}")?,
            Value::Number(n) => write!(self.writer, "{n}")?,
            Value::Variable(name) => write!(self.writer, "{name}")?,
            Value::Concat(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(self.writer, " # ")?;
                    }
                    self.write_value(part)?;
                }
            }
        }
        Ok(())
    }
}

/// Write a database to a string
pub fn to_string(db: &Database) -> Result<String> {
    to_string_with(db, WriterConfig::default())
}

/// Write a database to a string under a custom configuration
pub fn to_string_with(db: &Database, config: WriterConfig) -> Result<String> {
    let mut buf = Vec::new();
    let mut writer = Writer::with_config(&mut buf, config);
    writer.write_database(db)?;
    Ok(String::from_utf8(buf).expect("valid UTF-8"))
}

/// Write a single entry to a string under a custom configuration
pub fn entry_to_string(entry: &Entry, config: WriterConfig) -> Result<String> {
    let mut buf = Vec::new();
    let mut writer = Writer::with_config(&mut buf, config);
    writer.write_entry(entry)?;
    Ok(String::from_utf8(buf).expect("valid UTF-8"))
}

/// Write a database to a file
pub fn to_file(db: &Database, path: impl AsRef<std::path::Path>) -> Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    Writer::new(&mut file).write_database(db)?;
    file.flush()?;
    Ok(())
}
