// ABOUTME: Value types representing Lisp data structures and expressions

use super::atom::Atom;
use super::hashmap::MalMap;
use super::list::MalList;
use super::lstring::LString;
use crate::env::Environment;
use crate::error::EvalError;
use std::rc::Rc;

/// A user-defined closure: captured environment, parameter list, body AST.
///
/// `is_macro` is a `Cell` rather than a plain `bool` because `defmacro!`
/// evaluates an ordinary `fn*` expression and then flips the macro flag on
/// the resulting function value in place; wrapping the whole struct in
/// `Rc` means that flip is visible to every binding that already aliases
/// the closure.
#[derive(Debug)]
pub struct Lambda {
    pub params: Vec<LString>,
    pub is_variadic: bool,
    pub is_macro: std::cell::Cell<bool>,
    pub body: Value,
    pub env: Rc<Environment>,
}

/// A native function pointer. Every builtin receives the environment it was
/// called from, not because most of them need it, but because `eval`
/// resolves the root environment by walking outward from *this* env, and
/// `apply`/`map`/`swap!` call back into arbitrary callables from inside
/// another builtin - threading the calling env through uniformly means
/// neither of those is a special case.
pub type BuiltinFn = fn(&[Value], &Rc<Environment>) -> Result<Value, EvalError>;

/// A native function: its pointer plus the name it was installed under, so
/// printing and error messages can name it.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Symbol(LString),
    Keyword(LString),
    String(LString),
    List(MalList),
    Vector(MalList),
    Map(MalMap),
    Lambda(Rc<Lambda>),
    Builtin(Builtin),
    Atom(Rc<Atom>),
}

impl Value {
    pub fn symbol(s: impl Into<LString>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn keyword(s: impl Into<LString>) -> Value {
        Value::Keyword(s.into())
    }

    pub fn string(s: impl Into<LString>) -> Value {
        Value::String(s.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(MalList::from_vec(items))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(MalList::from_vec(items))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// True for both List and Vector, empty or not.
    pub fn is_list_kind(&self) -> bool {
        matches!(self, Value::List(_) | Value::Vector(_))
    }

    /// The underlying items if this is a List or Vector.
    pub fn as_seq(&self) -> Option<&MalList> {
        match self {
            Value::List(l) | Value::Vector(l) => Some(l),
            _ => None,
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Lambda(_) => "function",
            Value::Builtin(_) => "function",
            Value::Atom(_) => "atom",
        }
        .to_string()
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Lambda(_) | Value::Builtin(_))
    }
}

/// Structural equality: tag-equal (List ≡ Vector) with recursive/by-identity
/// payload comparison.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => Rc::ptr_eq(a, b),
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => {
                a.func as usize == b.func as usize
            }
            _ => match (self.as_seq(), other.as_seq()) {
                (Some(a), Some(b)) => {
                    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
                }
                _ => false,
            },
        }
    }
}
