// ABOUTME: Numeric arithmetic builtins: +, -, *, /

use crate::env::Environment;
use crate::error::EvalError;
use crate::types::Value;
use std::rc::Rc;

fn number_at(args: &[Value], index: usize, function: &str) -> Result<f64, EvalError> {
    match &args[index] {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "number", other, index)),
    }
}

fn add(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut sum = 0.0;
    for i in 0..args.len() {
        sum += number_at(args, i, "+")?;
    }
    Ok(Value::Number(sum))
}

fn sub(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("-", "at least 1", 0));
    }
    let first = number_at(args, 0, "-")?;
    if args.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let mut result = first;
    for i in 1..args.len() {
        result -= number_at(args, i, "-")?;
    }
    Ok(Value::Number(result))
}

fn mul(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut product = 1.0;
    for i in 0..args.len() {
        product *= number_at(args, i, "*")?;
    }
    Ok(Value::Number(product))
}

fn div(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("/", "at least 1", 0));
    }
    let first = number_at(args, 0, "/")?;
    if args.len() == 1 {
        return Ok(Value::Number(1.0 / first));
    }
    let mut result = first;
    for i in 1..args.len() {
        result /= number_at(args, i, "/")?;
    }
    Ok(Value::Number(result))
}

pub fn register(env: &Rc<Environment>) {
    env.define("+".into(), Value::Builtin(crate::types::Builtin { name: "+", func: add }));
    env.define("-".into(), Value::Builtin(crate::types::Builtin { name: "-", func: sub }));
    env.define("*".into(), Value::Builtin(crate::types::Builtin { name: "*", func: mul }));
    env.define("/".into(), Value::Builtin(crate::types::Builtin { name: "/", func: div }));
}
