// ABOUTME: Host-error and language-exception types

use crate::types::Value;
use thiserror::Error;

// ===== Arity constant strings, to avoid re-allocating the same literals at every call site =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_ZERO_OR_ONE: &str = "0-1";
pub const ARITY_ONE_OR_TWO: &str = "1-2";

/// A read-time failure (tokenizer/reader), distinct from `EvalError`: bad
/// syntax, unterminated string, premature EOF, odd hashmap literal,
/// non-string-kind hashmap literal key.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    #[error("unterminated string")]
    UnterminatedString,

    #[error("unexpected EOF")]
    UnexpectedEof,

    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    #[error("trailing input after form: {0}")]
    TrailingInput(String),

    #[error("odd number of forms in hashmap literal")]
    OddMapLiteral,

    #[error("hashmap keys must be strings, symbols, or keywords")]
    InvalidMapKey,

    #[error("nothing to read")]
    Empty,
}

/// Host errors *and* the boxed language-exception channel: `Thrown` is what
/// `(throw v)` and the evaluator's synthesized exceptions carry; only
/// `catch*` inspects it, everything else propagates it with plain `?`.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("{function}: {message}")]
    RuntimeError { function: String, message: String },

    /// A language-level exception in flight: either thrown explicitly via
    /// `(throw v)` or synthesized by the evaluator (undefined symbol,
    /// `nth` out of range, non-string-kind map key).
    #[error("uncaught exception: {0:?}")]
    Thrown(Value),
}

impl EvalError {
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name(),
            position,
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn thrown(value: Value) -> Self {
        EvalError::Thrown(value)
    }

    pub fn thrown_str(message: impl Into<String>) -> Self {
        EvalError::Thrown(Value::string(message.into()))
    }

    /// The carried value, if this is a language exception rather than a
    /// host error - this is the only seam `catch*` reaches through.
    pub fn as_thrown(&self) -> Option<&Value> {
        match self {
            EvalError::Thrown(v) => Some(v),
            _ => None,
        }
    }
}
