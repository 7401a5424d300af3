// ABOUTME: atom/atom?/deref/reset!/swap! - mutable reference cell builtins

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval;
use crate::types::{Atom, Value};
use std::rc::Rc;

fn atom(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom", "1", args.len()));
    }
    Ok(Value::Atom(Rc::new(Atom::new(args[0].clone()))))
}

fn is_atom(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Atom(_))))
}

fn deref(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("deref", "1", args.len()));
    }
    match &args[0] {
        Value::Atom(a) => Ok(a.get()),
        other => Err(EvalError::type_error("deref", "atom", other, 0)),
    }
}

fn reset(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("reset!", "2", args.len()));
    }
    match &args[0] {
        Value::Atom(a) => {
            a.set(args[1].clone());
            Ok(args[1].clone())
        }
        other => Err(EvalError::type_error("reset!", "atom", other, 0)),
    }
}

fn swap(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("swap!", "at least 2", args.len()));
    }
    let atom = match &args[0] {
        Value::Atom(a) => a,
        other => return Err(EvalError::type_error("swap!", "atom", other, 0)),
    };
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(atom.get());
    call_args.extend_from_slice(&args[2..]);
    let new_value = eval::apply(&args[1], &call_args, env)?;
    atom.set(new_value.clone());
    Ok(new_value)
}

pub fn register(env: &Rc<Environment>) {
    macro_rules! define {
        ($name:literal, $func:ident) => {
            env.define($name.into(), Value::Builtin(crate::types::Builtin { name: $name, func: $func }));
        };
    }
    define!("atom", atom);
    define!("atom?", is_atom);
    define!("deref", deref);
    define!("reset!", reset);
    define!("swap!", swap);
}
