// ABOUTME: symbol/keyword/hash-map constructors

use crate::env::Environment;
use crate::error::EvalError;
use crate::types::{HashKey, MalMap, Value};
use std::rc::Rc;

fn symbol(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("symbol", "1", args.len()));
    }
    match &args[0] {
        Value::String(s) => Ok(Value::Symbol(s.clone())),
        other => Err(EvalError::type_error("symbol", "string", other, 0)),
    }
}

fn keyword(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keyword", "1", args.len()));
    }
    match &args[0] {
        Value::Keyword(s) => Ok(Value::Keyword(s.clone())),
        Value::String(s) => Ok(Value::Keyword(s.clone())),
        other => Err(EvalError::type_error("keyword", "string or keyword", other, 0)),
    }
}

fn hash_map(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() % 2 != 0 {
        return Err(EvalError::arity_error("hash-map", "an even number of", args.len()));
    }
    let mut map = MalMap::new();
    for pair in args.chunks(2) {
        let key = HashKey::from_value(&pair[0])
            .ok_or_else(|| EvalError::thrown_str("hash-map: key must be a string, symbol, or keyword"))?;
        map.insert(key, pair[1].clone());
    }
    Ok(Value::Map(map))
}

pub fn register(env: &Rc<Environment>) {
    env.define("symbol".into(), Value::Builtin(crate::types::Builtin { name: "symbol", func: symbol }));
    env.define("keyword".into(), Value::Builtin(crate::types::Builtin { name: "keyword", func: keyword }));
    env.define(
        "hash-map".into(),
        Value::Builtin(crate::types::Builtin { name: "hash-map", func: hash_map }),
    );
}
