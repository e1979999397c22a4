//! Low-level lexing for BibTeX input

use super::PResult;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse an identifier: citation keys, field names, `@string` names
///
/// BibTeX keys in the wild carry hyphens, colons, and dots
/// (`doss-gollin:2024a`), so those are all identifier characters here.
pub fn identifier<'a>(input: &mut &'a str) -> PResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+')
    })
    .parse_next(input)
}

/// Wrap a parser so it tolerates surrounding whitespace
pub fn ws<'a, F, O>(mut parser: F) -> impl Parser<&'a str, O, ContextError>
where
    F: Parser<&'a str, O, ContextError>,
{
    move |input: &mut &'a str| {
        let _ = multispace0.parse_next(input)?;
        let output = parser.parse_next(input)?;
        let _ = multispace0.parse_next(input)?;
        Ok(output)
    }
}

/// Match a keyword regardless of case (`@STRING`, `@String`, ...)
#[must_use]
pub fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, &'a str, ContextError> {
    move |input: &mut &'a str| {
        // Keywords are ASCII, so a cut inside a multibyte char can never match
        if input.len() < word.len() || !input.is_char_boundary(word.len()) {
            return Err(backtrack());
        }
        let head = &input[..word.len()];
        if head.eq_ignore_ascii_case(word) {
            *input = &input[word.len()..];
            Ok(head)
        } else {
            Err(backtrack())
        }
    }
}

/// Consume the content of a braced group, leaving the closing `}` unread
///
/// Nesting is respected and a backslash escapes the byte after it. The
/// returned slice is everything up to the unbalanced closing brace.
pub fn balanced_braces<'a>(input: &mut &'a str) -> PResult<&'a str> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0usize;

    while pos < bytes.len() {
        match memchr::memchr3(b'{', b'}', b'\\', &bytes[pos..]) {
            Some(offset) => pos += offset,
            None => break,
        }
        match bytes[pos] {
            b'{' => {
                depth += 1;
                pos += 1;
            }
            b'}' => {
                if depth == 0 {
                    let content = &input[..pos];
                    *input = &input[pos..];
                    return Ok(content);
                }
                depth -= 1;
                pos += 1;
            }
            // Backslash: skip the escaped byte as well
            _ => pos += 2,
        }
    }

    Err(backtrack())
}

/// Parse a double-quoted string, honoring `\"` escapes and nested braces
///
/// A quote inside a braced group does not terminate the string, matching
/// classic BibTeX behavior for values like `"the {"}quoted{"} word"`.
pub fn quoted_string<'a>(input: &mut &'a str) -> PResult<&'a str> {
    let start = *input;
    let bytes = input.as_bytes();

    if bytes.first() != Some(&b'"') {
        return Err(backtrack());
    }

    let mut pos = 1;
    let mut depth = 0usize;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' if depth == 0 => {
                let content = &start[1..pos];
                *input = &start[pos + 1..];
                return Ok(content);
            }
            b'{' => {
                depth += 1;
                pos += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                pos += 1;
            }
            _ => pos += 1,
        }
    }

    Err(backtrack())
}

/// Parse an optionally signed integer
pub fn number(input: &mut &str) -> PResult<i64> {
    let sign = opt(alt(('+', '-'))).parse_next(input)?;
    let digits = digit1.parse_next(input)?;
    let magnitude: i64 = digits.parse().map_err(|_| backtrack())?;

    Ok(if sign == Some('-') {
        -magnitude
    } else {
        magnitude
    })
}

/// Skip ASCII whitespace without a parser round-trip
pub fn skip_whitespace(input: &mut &str) {
    let trimmed = input.trim_start_matches([' ', '\t', '\r', '\n']);
    *input = trimmed;
}

/// The parser failure every lexer primitive reports
fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::default())
}
