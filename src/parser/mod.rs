//! BibTeX parsing built on winnow
//!
//! The entry point is [`parse_document`], which splits a `.bib` file into
//! top-level [`Item`]s. Variable expansion happens later, in the database
//! layer; the parser reports values exactly as written.

pub mod entry;
pub mod lexer;
pub mod value;

use crate::model::{Entry, Value};
use crate::{Error, Result};
use winnow::ascii::{multispace0, till_line_ending};
use winnow::combinator::{alt, delimited, preceded, rest, separated_pair};
use winnow::prelude::*;
use winnow::token::take_until;

pub use entry::parse_entry;

/// Parser-internal result type
pub type PResult<O> = winnow::PResult<O, winnow::error::ContextError>;

/// One top-level item of a `.bib` file
#[derive(Debug, Clone, PartialEq)]
pub enum Item<'a> {
    /// A bibliography entry
    Entry(Entry<'a>),
    /// A `@string{name = value}` definition
    StringDef(&'a str, Value<'a>),
    /// A `@preamble{...}`
    Preamble(Value<'a>),
    /// `@comment{...}`, a `%` line, or stray text between entries
    Comment(&'a str),
}

/// Parse a complete `.bib` document into its items
///
/// Fails with a located [`Error::Parse`] on the first malformed item.
pub fn parse_document(input: &str) -> Result<Vec<Item<'_>>> {
    let mut items = Vec::new();
    let mut rest_input = input;

    loop {
        rest_input = rest_input.trim_start();
        if rest_input.is_empty() {
            break;
        }

        match parse_item(&mut rest_input) {
            Ok(item) => items.push(item),
            Err(err) => {
                let offset = input.len() - rest_input.len();
                let (line, column) = position_of(input, offset);
                return Err(Error::Parse {
                    line,
                    column,
                    message: format!("not a valid entry, @string, @preamble, or comment: {err}"),
                    snippet: Some(snippet_of(rest_input)),
                });
            }
        }
    }

    Ok(items)
}

/// `@string` and `@preamble` are matched before generic entries so their
/// keywords never parse as entry types
fn parse_item<'a>(input: &mut &'a str) -> PResult<Item<'a>> {
    alt((
        parse_string_def.map(|(name, value)| Item::StringDef(name, value)),
        parse_preamble.map(Item::Preamble),
        parse_block_comment.map(Item::Comment),
        entry::parse_entry.map(Item::Entry),
        parse_line_comment.map(Item::Comment),
        parse_stray_text.map(Item::Comment),
    ))
    .parse_next(input)
}

fn parse_string_def<'a>(input: &mut &'a str) -> PResult<(&'a str, Value<'a>)> {
    preceded(
        (multispace0, '@', lexer::keyword("string"), multispace0),
        alt((
            delimited('{', string_def_body, '}'),
            delimited('(', string_def_body, ')'),
        )),
    )
    .parse_next(input)
}

fn string_def_body<'a>(input: &mut &'a str) -> PResult<(&'a str, Value<'a>)> {
    separated_pair(
        lexer::ws(lexer::identifier),
        lexer::ws('='),
        lexer::ws(value::parse_value),
    )
    .parse_next(input)
}

fn parse_preamble<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    preceded(
        (multispace0, '@', lexer::keyword("preamble"), multispace0),
        alt((
            delimited('{', lexer::ws(value::parse_value), '}'),
            delimited('(', lexer::ws(value::parse_value), ')'),
        )),
    )
    .parse_next(input)
}

fn parse_block_comment<'a>(input: &mut &'a str) -> PResult<&'a str> {
    preceded(
        (multispace0, '@', lexer::keyword("comment"), multispace0),
        alt((
            delimited('{', lexer::balanced_braces, '}'),
            delimited('(', take_until(0.., ")"), ')'),
        )),
    )
    .parse_next(input)
}

fn parse_line_comment<'a>(input: &mut &'a str) -> PResult<&'a str> {
    preceded('%', till_line_ending).parse_next(input)
}

/// Anything before the next `@` (or to end of input) counts as a comment,
/// the way JabRef and friends treat inter-entry prose. Text starting with
/// `@` is never stray; a broken entry surfaces as a parse error.
fn parse_stray_text<'a>(input: &mut &'a str) -> PResult<&'a str> {
    alt((take_until(1.., "@"), rest))
        .verify(|s: &str| {
            let text = s.trim_start();
            !text.is_empty() && !text.starts_with('@')
        })
        .parse_next(input)
}

/// Translate a byte offset into 1-indexed line and column
fn position_of(input: &str, byte_offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (idx, ch) in input.char_indices() {
        if idx >= byte_offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

/// A short excerpt of the failing input for error messages
fn snippet_of(input: &str) -> String {
    const MAX: usize = 60;
    let excerpt: String = input.chars().take(MAX).collect();
    if input.chars().count() > MAX {
        format!("{excerpt}...")
    } else {
        excerpt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryType;

    #[test]
    fn document_with_every_item_kind() {
        let input = r#"
            % exported by hand
            @string{aguj = "Journal of Geophysical Research"}
            @preamble{"\newcommand{\noop}[1]{}"}
            @comment{manager metadata}

            stray prose between items

            @article{a1, title = "One", journal = aguj, year = 2020}
        "#;

        let items = parse_document(input).unwrap();
        assert_eq!(items.len(), 6);

        assert!(matches!(items[0], Item::Comment(c) if c.contains("exported by hand")));
        assert!(matches!(items[1], Item::StringDef("aguj", _)));
        assert!(matches!(items[2], Item::Preamble(_)));
        assert!(matches!(items[3], Item::Comment("manager metadata")));
        assert!(matches!(items[4], Item::Comment(c) if c.contains("stray prose")));
        assert!(matches!(&items[5], Item::Entry(e) if e.key() == "a1"));
    }

    #[test]
    fn parenthesized_string_def() {
        let items = parse_document(r#"@string(ieee = "IEEE Transactions")"#).unwrap();
        assert!(matches!(items[0], Item::StringDef("ieee", _)));
    }

    #[test]
    fn trailing_text_without_at_is_a_comment() {
        let items = parse_document("@misc{m, note = \"x\"}\nlocal notes, no entries").unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Item::Comment(_)));
    }

    #[test]
    fn error_carries_position() {
        let input = "@article{ok, title = \"fine\"}\n@article{broken, title = \"unclosed}";
        let err = parse_document(input).unwrap_err();
        match err {
            Error::Parse { line, snippet, .. } => {
                assert_eq!(line, 2);
                assert!(snippet.is_some());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_entry_is_an_error_not_a_comment() {
        let err = parse_document("@article{broken,\n  title = \n}").unwrap_err();
        match err {
            Error::Parse { line, column, .. } => assert_eq!((line, column), (1, 1)),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn position_counts_multibyte_input_correctly() {
        // Byte offset 2 is the second character, not the third
        let (line, column) = position_of("é@", 2);
        assert_eq!((line, column), (1, 2));
    }

    #[test]
    fn entry_types_may_contain_multibyte_characters() {
        // The é overlaps the byte lengths of the item keywords
        let items = parse_document("@aaaaaé{k, title = {t}}").unwrap();
        assert_eq!(items.len(), 1);
        match &items[0] {
            Item::Entry(entry) => {
                assert_eq!(entry.entry_type(), &EntryType::Custom("aaaaaé".into()));
                assert_eq!(entry.key(), "k");
            }
            other => panic!("expected an entry, got {other:?}"),
        }
    }
}
