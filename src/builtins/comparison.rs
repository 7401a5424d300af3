// ABOUTME: Equality and numeric ordering builtins: =, <, <=, >, >=

use crate::env::Environment;
use crate::error::EvalError;
use crate::types::Value;
use std::rc::Rc;

fn equals(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("=", "2", args.len()));
    }
    Ok(Value::Bool(args[0] == args[1]))
}

fn binary_compare(
    name: &'static str,
    args: &[Value],
    op: fn(f64, f64) -> bool,
) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(name, "2", args.len()));
    }
    let a = match &args[0] {
        Value::Number(n) => *n,
        other => return Err(EvalError::type_error(name, "number", other, 0)),
    };
    let b = match &args[1] {
        Value::Number(n) => *n,
        other => return Err(EvalError::type_error(name, "number", other, 1)),
    };
    Ok(Value::Bool(op(a, b)))
}

fn lt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    binary_compare("<", args, |a, b| a < b)
}

fn le(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    binary_compare("<=", args, |a, b| a <= b)
}

fn gt(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    binary_compare(">", args, |a, b| a > b)
}

fn ge(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    binary_compare(">=", args, |a, b| a >= b)
}

pub fn register(env: &Rc<Environment>) {
    env.define("=".into(), Value::Builtin(crate::types::Builtin { name: "=", func: equals }));
    env.define("<".into(), Value::Builtin(crate::types::Builtin { name: "<", func: lt }));
    env.define("<=".into(), Value::Builtin(crate::types::Builtin { name: "<=", func: le }));
    env.define(">".into(), Value::Builtin(crate::types::Builtin { name: ">", func: gt }));
    env.define(">=".into(), Value::Builtin(crate::types::Builtin { name: ">=", func: ge }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_is_structural_and_list_vector_blind() {
        let env = Environment::new();
        let list = Value::list(vec![Value::Number(1.0)]);
        let vector = Value::vector(vec![Value::Number(1.0)]);
        assert_eq!(equals(&[list, vector], &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn lt_rejects_more_than_two_args() {
        let env = Environment::new();
        let args = vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)];
        assert!(lt(&args, &env).is_err());
    }

    #[test]
    fn ge_is_false_when_first_is_smaller() {
        let env = Environment::new();
        let args = vec![Value::Number(2.0), Value::Number(3.0)];
        assert_eq!(ge(&args, &env).unwrap(), Value::Bool(false));
    }
}
