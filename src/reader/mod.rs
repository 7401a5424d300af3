// ABOUTME: Recursive-descent reader - token stream to AST Value

mod tokenizer;

use crate::error::ReadError;
use crate::types::{HashKey, MalMap, Value};
use tokenizer::{tokenize, Token};

struct Reader<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.position).copied();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

/// Read exactly one form from `source`. Tokenizes, reads one form, and
/// then requires EOF - nothing but trailing atmosphere is allowed after it.
pub fn read_str(source: &str) -> Result<Value, ReadError> {
    let tokens = tokenize(source)?;
    let mut reader = Reader { tokens, position: 0 };

    if reader.peek().is_none() {
        return Err(ReadError::Empty);
    }

    let form = read_form(&mut reader)?;

    if let Some(extra) = reader.peek() {
        return Err(ReadError::TrailingInput(extra.text.to_string()));
    }

    Ok(form)
}

fn read_form(reader: &mut Reader) -> Result<Value, ReadError> {
    let token = reader.peek().ok_or(ReadError::UnexpectedEof)?;

    match token.text {
        "(" => {
            reader.next();
            let items = read_sequence(reader, ")")?;
            Ok(Value::list(items))
        }
        "[" => {
            reader.next();
            let items = read_sequence(reader, "]")?;
            Ok(Value::vector(items))
        }
        "{" => {
            reader.next();
            read_hashmap(reader)
        }
        ")" | "]" | "}" => Err(ReadError::UnexpectedToken(token.text.to_string())),
        "'" => read_wrapped(reader, "quote"),
        "`" => read_wrapped(reader, "quasiquote"),
        "~" => read_wrapped(reader, "unquote"),
        "~@" => read_wrapped(reader, "splice-unquote"),
        "@" => read_wrapped(reader, "deref"),
        // Metadata isn't part of this value model (no builtin reads or
        // writes it), so `^m x` is rejected rather than silently accepted
        // and discarded.
        "^" => Err(ReadError::UnexpectedToken(token.text.to_string())),
        _ => {
            let text = token.text;
            reader.next();
            read_atom(text)
        }
    }
}

fn read_wrapped(reader: &mut Reader, special: &str) -> Result<Value, ReadError> {
    reader.next();
    let inner = read_form(reader)?;
    Ok(Value::list(vec![Value::symbol(special), inner]))
}

fn read_sequence(reader: &mut Reader, closing: &str) -> Result<Vec<Value>, ReadError> {
    let mut items = Vec::new();
    loop {
        match reader.peek() {
            None => return Err(ReadError::UnexpectedEof),
            Some(token) if token.text == closing => {
                reader.next();
                return Ok(items);
            }
            _ => items.push(read_form(reader)?),
        }
    }
}

fn read_hashmap(reader: &mut Reader) -> Result<Value, ReadError> {
    let mut map = MalMap::new();
    loop {
        match reader.peek() {
            None => return Err(ReadError::UnexpectedEof),
            Some(token) if token.text == "}" => {
                reader.next();
                return Ok(Value::Map(map));
            }
            _ => {
                let key_form = read_form(reader)?;
                let key = HashKey::from_value(&key_form).ok_or(ReadError::InvalidMapKey)?;

                match reader.peek() {
                    None => return Err(ReadError::UnexpectedEof),
                    Some(token) if token.text == "}" => return Err(ReadError::OddMapLiteral),
                    _ => {}
                }
                let value = read_form(reader)?;
                map.insert(key, value);
            }
        }
    }
}

fn read_atom(text: &str) -> Result<Value, ReadError> {
    match text {
        "nil" => return Ok(Value::Nil),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if is_number_lexeme(text) {
        let n: f64 = text
            .parse()
            .map_err(|_| ReadError::UnexpectedToken(text.to_string()))?;
        return Ok(Value::Number(n));
    }

    if let Some(rest) = text.strip_prefix('"') {
        let body = rest
            .strip_suffix('"')
            .ok_or_else(|| ReadError::UnexpectedToken(text.to_string()))?;
        return Ok(Value::string(unescape(body)));
    }

    if let Some(rest) = text.strip_prefix(':') {
        return Ok(Value::keyword(rest));
    }

    Ok(Value::symbol(text))
}

fn is_number_lexeme(text: &str) -> bool {
    let bytes = text.as_bytes();
    let start = if bytes.first() == Some(&b'-') { 1 } else { 0 };
    bytes.len() > start
        && bytes[start..]
            .iter()
            .any(|b| b.is_ascii_digit())
        && bytes[start..]
            .iter()
            .all(|b| b.is_ascii_digit() || *b == b'.')
}

/// Decode backslash escapes: `\n`→LF, `\t`→TAB, `\r`→CR, `\"`→`"`, `\\`→`\`,
/// any other `\x`→`x`.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
