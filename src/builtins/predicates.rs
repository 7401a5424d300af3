// ABOUTME: Type predicates - list?/nil?/true?/false?/symbol?/keyword?/vector?/map?/sequential?/string?/fn?/macro?

use crate::env::Environment;
use crate::error::EvalError;
use crate::types::Value;
use std::rc::Rc;

fn one_arg<'a>(args: &'a [Value], name: &str) -> Result<&'a Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error(name, "1", args.len()));
    }
    Ok(&args[0])
}

fn is_list(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "list?")?, Value::List(_))))
}

fn is_nil(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "nil?")?, Value::Nil)))
}

fn is_true(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "true?")?, Value::Bool(true))))
}

fn is_false(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "false?")?, Value::Bool(false))))
}

fn is_symbol(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "symbol?")?, Value::Symbol(_))))
}

fn is_keyword(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "keyword?")?, Value::Keyword(_))))
}

fn is_vector(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "vector?")?, Value::Vector(_))))
}

fn is_map(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "map?")?, Value::Map(_))))
}

fn is_sequential(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(one_arg(args, "sequential?")?.is_list_kind()))
}

fn is_string(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg(args, "string?")?, Value::String(_))))
}

fn is_fn(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let truth = match one_arg(args, "fn?")? {
        Value::Builtin(_) => true,
        Value::Lambda(l) => !l.is_macro.get(),
        _ => false,
    };
    Ok(Value::Bool(truth))
}

fn is_macro(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let truth = match one_arg(args, "macro?")? {
        Value::Lambda(l) => l.is_macro.get(),
        _ => false,
    };
    Ok(Value::Bool(truth))
}

pub fn register(env: &Rc<Environment>) {
    macro_rules! define {
        ($name:literal, $func:ident) => {
            env.define($name.into(), Value::Builtin(crate::types::Builtin { name: $name, func: $func }));
        };
    }
    define!("list?", is_list);
    define!("nil?", is_nil);
    define!("true?", is_true);
    define!("false?", is_false);
    define!("symbol?", is_symbol);
    define!("keyword?", is_keyword);
    define!("vector?", is_vector);
    define!("map?", is_map);
    define!("sequential?", is_sequential);
    define!("string?", is_string);
    define!("fn?", is_fn);
    define!("macro?", is_macro);
}
