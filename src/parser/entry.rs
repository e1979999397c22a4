//! Parsing of `@type{key, name = value, ...}` entries

use super::{lexer, value, PResult};
use crate::model::{Entry, EntryType, Field};
use winnow::ascii::multispace0;
use winnow::combinator::preceded;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;

/// Parse one bibliography entry
pub fn parse_entry<'a>(input: &mut &'a str) -> PResult<Entry<'a>> {
    preceded((multispace0, '@'), entry_after_at).parse_next(input)
}

fn entry_after_at<'a>(input: &mut &'a str) -> PResult<Entry<'a>> {
    let ty = EntryType::parse(lexer::identifier.parse_next(input)?);
    lexer::skip_whitespace(input);

    // Bodies come braced or, in the older dialect, parenthesized
    let closer = match input.chars().next() {
        Some('{') => '}',
        Some('(') => ')',
        _ => return Err(ErrMode::Backtrack(ContextError::default())),
    };
    *input = &input[1..];

    let entry = entry_body(input, ty)?;
    lexer::ws(closer).parse_next(input)?;
    Ok(entry)
}

fn entry_body<'a>(input: &mut &'a str, ty: EntryType<'a>) -> PResult<Entry<'a>> {
    let key = lexer::ws(lexer::identifier).parse_next(input)?;
    let mut entry = Entry::new(ty, key);

    // `@misc{key}` with no fields is legal; the comma only appears when
    // fields follow
    lexer::skip_whitespace(input);
    if input.starts_with(',') {
        *input = &input[1..];
        entry.fields = parse_fields(input)?;
    }

    Ok(entry)
}

fn parse_fields<'a>(input: &mut &'a str) -> PResult<Vec<Field<'a>>> {
    let mut fields = Vec::new();

    loop {
        lexer::skip_whitespace(input);
        if input.is_empty() || input.starts_with('}') || input.starts_with(')') {
            break;
        }

        fields.push(parse_field(input)?);

        lexer::skip_whitespace(input);
        if input.starts_with(',') {
            // Covers trailing commas before the closer too
            *input = &input[1..];
        } else if !(input.starts_with('}') || input.starts_with(')')) {
            return Err(ErrMode::Backtrack(ContextError::default()));
        }
    }

    Ok(fields)
}

fn parse_field<'a>(input: &mut &'a str) -> PResult<Field<'a>> {
    let name = lexer::ws(lexer::identifier).parse_next(input)?;
    lexer::ws('=').parse_next(input)?;
    let value = lexer::ws(value::parse_value).parse_next(input)?;

    Ok(Field {
        name: std::borrow::Cow::Borrowed(name),
        value,
    })
}
