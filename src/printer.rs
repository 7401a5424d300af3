// ABOUTME: AST to string renderer - readable vs. display mode

use crate::types::Value;

/// Render `value` as text. `readable=true` re-escapes string special bytes
/// (the inverse of the reader's decoding); `readable=false` emits a string's
/// raw bytes.
pub fn pr_str(value: &Value, readable: bool) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(n) => format_number(*n),
        Value::Symbol(s) => s.to_string(),
        Value::Keyword(s) => format!(":{s}"),
        Value::String(s) => {
            if readable {
                format!("\"{}\"", escape(s.as_str()))
            } else {
                s.to_string()
            }
        }
        Value::List(items) => {
            let inner: Vec<String> = items.iter().map(|v| pr_str(v, readable)).collect();
            format!("({})", inner.join(" "))
        }
        Value::Vector(items) => {
            let inner: Vec<String> = items.iter().map(|v| pr_str(v, readable)).collect();
            format!("[{}]", inner.join(" "))
        }
        Value::Map(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{} {}", pr_str(&k.to_value(), readable), pr_str(v, readable)))
                .collect();
            format!("{{{}}}", inner.join(" "))
        }
        Value::Lambda(_) => "#<function>".to_string(),
        Value::Builtin(b) => format!("#<builtin:{}>", b.name),
        Value::Atom(a) => format!("(atom {})", pr_str(&a.get(), readable)),
    }
}

/// Doubles that represent an integer print without a fractional part.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Atom, HashKey, LString, MalMap};
    use std::rc::Rc;

    #[test]
    fn integer_valued_double_has_no_fraction() {
        assert_eq!(pr_str(&Value::Number(15.0), true), "15");
    }

    #[test]
    fn fractional_double_keeps_its_digits() {
        assert_eq!(pr_str(&Value::Number(1.5), true), "1.5");
    }

    #[test]
    fn readable_string_is_requoted_and_escaped() {
        let v = Value::string("a\nb\"c");
        assert_eq!(pr_str(&v, true), "\"a\\nb\\\"c\"");
    }

    #[test]
    fn non_readable_string_is_raw() {
        let v = Value::string("a\nb");
        assert_eq!(pr_str(&v, false), "a\nb");
    }

    #[test]
    fn list_and_vector_brackets_differ() {
        let items = vec![Value::Number(1.0), Value::Number(2.0)];
        assert_eq!(pr_str(&Value::list(items.clone()), true), "(1 2)");
        assert_eq!(pr_str(&Value::vector(items), true), "[1 2]");
    }

    #[test]
    fn keyword_prints_with_colon() {
        assert_eq!(pr_str(&Value::keyword("foo"), true), ":foo");
    }

    #[test]
    fn hashmap_prints_key_value_pairs() {
        let mut map = MalMap::new();
        map.insert(HashKey::Keyword(LString::new("a")), Value::Number(1.0));
        assert_eq!(pr_str(&Value::Map(map), true), "{:a 1}");
    }

    #[test]
    fn atom_prints_wrapped_value() {
        let atom = Value::Atom(Rc::new(Atom::new(Value::Number(3.0))));
        assert_eq!(pr_str(&atom, true), "(atom 3)");
    }
}
