// ABOUTME: eval/throw/apply/map - control-flow and callback builtins

use crate::env::{root_of, Environment};
use crate::error::EvalError;
use crate::eval;
use crate::types::Value;
use std::rc::Rc;

/// Evaluates in the root environment, walked from `env`, so that top-level
/// definitions made by evaluated code are visible afterward regardless of
/// what local scope `eval` was called from.
fn eval_builtin(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("eval", "1", args.len()));
    }
    eval::eval(args[0].clone(), root_of(env))
}

fn throw(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("throw", "1", args.len()));
    }
    Err(EvalError::thrown(args[0].clone()))
}

/// `(apply f a1 a2 ... last)` - every arg but the last passes through as-is;
/// the last must be a List/Vector whose elements are spliced onto the end.
fn apply(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("apply", "at least 2", args.len()));
    }
    let last = args
        .last()
        .unwrap()
        .as_seq()
        .ok_or_else(|| EvalError::type_error("apply", "list or vector", args.last().unwrap(), args.len() - 1))?;

    let mut call_args = Vec::with_capacity(args.len() - 2 + last.len());
    call_args.extend_from_slice(&args[1..args.len() - 1]);
    call_args.extend(last.iter().cloned());

    eval::apply(&args[0], &call_args, env)
}

fn map(args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("map", "2", args.len()));
    }
    let seq = args[1]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("map", "list or vector", &args[1], 1))?;

    let mut results = Vec::with_capacity(seq.len());
    for item in seq.iter() {
        results.push(eval::apply(&args[0], std::slice::from_ref(item), env)?);
    }
    Ok(Value::list(results))
}

pub fn register(env: &Rc<Environment>) {
    env.define("eval".into(), Value::Builtin(crate::types::Builtin { name: "eval", func: eval_builtin }));
    env.define("throw".into(), Value::Builtin(crate::types::Builtin { name: "throw", func: throw }));
    env.define("apply".into(), Value::Builtin(crate::types::Builtin { name: "apply", func: apply }));
    env.define("map".into(), Value::Builtin(crate::types::Builtin { name: "map", func: map }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throw_carries_the_value_through_eval_error() {
        let env = Environment::new();
        let err = throw(&[Value::string("boom")], &env).unwrap_err();
        assert_eq!(err.as_thrown(), Some(&Value::string("boom")));
    }

    #[test]
    fn apply_splices_the_trailing_list_onto_the_call() {
        let env = Environment::new();
        crate::builtins::arithmetic::register(&env);
        let plus = env.get(&crate::types::LString::new("+")).unwrap();
        let result = apply(
            &[plus, Value::Number(1.0), Value::list(vec![Value::Number(2.0), Value::Number(3.0)])],
            &env,
        )
        .unwrap();
        assert_eq!(result, Value::Number(6.0));
    }

    #[test]
    fn map_applies_function_to_every_element() {
        let env = Environment::new();
        env.define(
            crate::types::LString::new("inc"),
            Value::Builtin(crate::types::Builtin {
                name: "inc",
                func: |args, _env| match args[0] {
                    Value::Number(n) => Ok(Value::Number(n + 1.0)),
                    _ => unreachable!(),
                },
            }),
        );
        let inc = env.get(&crate::types::LString::new("inc")).unwrap();
        let result = map(&[inc, Value::list(vec![Value::Number(1.0), Value::Number(2.0)])], &env).unwrap();
        assert_eq!(result, Value::list(vec![Value::Number(2.0), Value::Number(3.0)]));
    }
}
