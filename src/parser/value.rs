//! Field value parsing: literals, numbers, variables, `#` concatenation

use super::{lexer, PResult};
use crate::model::Value;
use winnow::combinator::{alt, separated};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;

/// Parse any field value, including `a # b # c` concatenations
pub fn parse_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    let parts: Vec<Value<'a>> =
        separated(1.., single_value, lexer::ws('#')).parse_next(input)?;

    if parts.len() == 1 {
        // Taking from a just-checked one-element Vec
        return Ok(parts.into_iter().next().unwrap());
    }
    Ok(Value::Concat(Box::new(parts)))
}

fn single_value<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    alt((quoted, braced, numeric, variable)).parse_next(input)
}

fn quoted<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    lexer::quoted_string
        .map(Value::literal)
        .parse_next(input)
}

fn braced<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    if !input.starts_with('{') {
        return Err(ErrMode::Backtrack(ContextError::default()));
    }
    *input = &input[1..];

    let content = lexer::balanced_braces(input)?;

    // balanced_braces leaves the closing brace unread
    if !input.starts_with('}') {
        return Err(ErrMode::Backtrack(ContextError::default()));
    }
    *input = &input[1..];

    Ok(Value::literal(content))
}

fn numeric<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    lexer::number.map(Value::Number).parse_next(input)
}

fn variable<'a>(input: &mut &'a str) -> PResult<Value<'a>> {
    // A leading digit would have parsed as a number already
    if input.chars().next().map_or(true, char::is_numeric) {
        return Err(ErrMode::Backtrack(ContextError::default()));
    }
    lexer::identifier.map(Value::variable).parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn quoted_literal() {
        let mut input = r#""hello world", next"#;
        assert_eq!(
            parse_value(&mut input).unwrap(),
            Value::Literal(Cow::Borrowed("hello world"))
        );
        assert_eq!(input, ", next");
    }

    #[test]
    fn braced_literal_keeps_inner_braces() {
        let mut input = "{The {HBV} Model}, next";
        assert_eq!(
            parse_value(&mut input).unwrap(),
            Value::Literal(Cow::Borrowed("The {HBV} Model"))
        );
        assert_eq!(input, ", next");
    }

    #[test]
    fn bare_number() {
        let mut input = "1905}";
        assert_eq!(parse_value(&mut input).unwrap(), Value::Number(1905));
        assert_eq!(input, "}");
    }

    #[test]
    fn variable_reference() {
        let mut input = "ieee,";
        assert_eq!(parse_value(&mut input).unwrap(), Value::variable("ieee"));
        assert_eq!(input, ",");
    }

    #[test]
    fn concatenation_collects_parts() {
        let mut input = r#"jan # " " # 2024, next"#;
        match parse_value(&mut input).unwrap() {
            Value::Concat(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], Value::variable("jan"));
                assert_eq!(parts[1], Value::literal(" "));
                assert_eq!(parts[2], Value::Number(2024));
            }
            other => panic!("expected concat, got {other:?}"),
        }
        assert_eq!(input, ", next");
    }
}
