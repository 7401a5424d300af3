// ABOUTME: Byte-slice tokenizer - source text to a flat token stream

use crate::error::ReadError;
use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    sequence::pair,
    IResult, Parser,
};

/// A lexeme: a non-owning view into the original source, carrying no type
/// tag. The reader infers its syntactic role (paren vs. atom vs. string)
/// from the text itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
}

const PUNCTUATION: &[char] = &['[', ']', '{', '}', '(', ')', '\'', '`', '^', '@'];

/// Recognize a numeric lexeme using the same `nom` recognizer shape the
/// reference parser combinators use elsewhere in this codebase, so the
/// tokenizer and the rest of the front end lean on one shared number grammar:
/// optional `-`, then digits with an optional fractional part, or a leading
/// `.` followed by digits.
fn recognize_number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(char('-')),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), opt(digit1))))),
            recognize(pair(char('.'), digit1)),
        )),
    ))
    .parse(input)
}

/// Tokenize `source` into a flat stream of lexemes. Whitespace (including
/// commas) and `;`-comments are skipped silently; an unterminated string is
/// the only tokenizer-level failure.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ReadError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        rest = skip_atmosphere(rest);
        if rest.is_empty() {
            return Ok(tokens);
        }

        let mut chars = rest.char_indices();
        let (_, first) = chars.next().unwrap();

        if rest.starts_with("~@") {
            tokens.push(Token { text: &rest[..2] });
            rest = &rest[2..];
            continue;
        }

        if first == '~' || PUNCTUATION.contains(&first) {
            let len = first.len_utf8();
            tokens.push(Token { text: &rest[..len] });
            rest = &rest[len..];
            continue;
        }

        if first == '"' {
            let (text, remaining) = scan_string(rest)?;
            tokens.push(Token { text });
            rest = remaining;
            continue;
        }

        if let Ok((remaining, text)) = recognize_number(rest) {
            // Only treat this as a number token if it isn't immediately
            // followed by more non-whitespace, non-special bytes (otherwise
            // fall through to the generic atom scan, e.g. a symbol like
            // `-foo` or `1+`).
            let boundary_ok = remaining
                .chars()
                .next()
                .map(is_atmosphere_or_special)
                .unwrap_or(true);
            if boundary_ok {
                tokens.push(Token { text });
                rest = remaining;
                continue;
            }
        }

        let (text, remaining) = scan_atom(rest);
        tokens.push(Token { text });
        rest = remaining;
    }
}

fn is_atmosphere_or_special(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';' || PUNCTUATION.contains(&c) || c == '~' || c == '"'
}

fn skip_atmosphere(mut input: &str) -> &str {
    loop {
        let before = input;
        input = input.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if input.starts_with(';') {
            input = match input.find('\n') {
                Some(idx) => &input[idx..],
                None => "",
            };
        }
        if input == before {
            return input;
        }
    }
}

/// Scan a string literal, keeping the surrounding quotes and escape
/// sequences intact as raw source text; the reader re-interprets escapes.
fn scan_string(input: &str) -> Result<(&str, &str), ReadError> {
    let bytes = input.as_bytes();
    let mut i = 1; // skip opening quote
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                if i + 1 >= bytes.len() {
                    return Err(ReadError::UnterminatedString);
                }
                i += 2;
            }
            b'"' => {
                let end = i + 1;
                return Ok((&input[..end], &input[end..]));
            }
            _ => i += 1,
        }
    }
    Err(ReadError::UnterminatedString)
}

fn scan_atom(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| is_atmosphere_or_special(c))
        .unwrap_or(input.len());
    let end = end.max(1);
    (&input[..end], &input[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<&str> {
        tokenize(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn tokenizes_simple_list() {
        assert_eq!(texts("(+ 1 2)"), vec!["(", "+", "1", "2", ")"]);
    }

    #[test]
    fn skips_comments_and_commas() {
        assert_eq!(texts("(1, 2 ; trailing\n 3)"), vec!["(", "1", "2", "3", ")"]);
    }

    #[test]
    fn splice_unquote_is_one_token() {
        assert_eq!(texts("~@xs"), vec!["~@", "xs"]);
    }

    #[test]
    fn unquote_is_distinct_from_splice() {
        assert_eq!(texts("~x"), vec!["~", "x"]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert_eq!(tokenize("\"abc"), Err(ReadError::UnterminatedString));
    }

    #[test]
    fn string_token_keeps_escapes_raw() {
        assert_eq!(texts(r#""a\nb""#), vec![r#""a\nb""#]);
    }

    #[test]
    fn negative_number_is_one_token() {
        assert_eq!(texts("-5"), vec!["-5"]);
    }

    #[test]
    fn bare_minus_symbol_is_not_a_number() {
        assert_eq!(texts("-"), vec!["-"]);
        assert_eq!(texts("-foo"), vec!["-foo"]);
    }

    #[test]
    fn leading_dot_number() {
        assert_eq!(texts(".5"), vec![".5"]);
    }
}
