// ABOUTME: Tree-walking evaluator with a TCO trampoline, special forms, macro expansion, quasiquote

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE, ARITY_ONE_OR_TWO, ARITY_TWO};
use crate::types::{HashKey, LString, Lambda, MalList, MalMap, Value};
use std::cell::Cell;
use std::rc::Rc;

/// Evaluate `expr` in `env`. Implemented as a loop over `(value, env)`
/// rather than a recursive function so that `let*`, `do`, `if`, and
/// function application can continue the loop instead of growing the host
/// stack.
pub fn eval(mut expr: Value, mut env: Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        expr = macro_expand(expr, &env)?;

        let items = match &expr {
            Value::List(list) => list.clone(),
            other => return eval_atom(other.clone(), &env),
        };

        if items.is_empty() {
            return Ok(Value::List(items));
        }

        if let Some(Value::Symbol(sym)) = items.first() {
            match sym.as_str() {
                "def!" => return eval_def(items.as_slice(), &env),
                "defmacro!" => return eval_defmacro(items.as_slice(), &env),
                "let*" => {
                    let (next_expr, next_env) = eval_let(items.as_slice(), env)?;
                    expr = next_expr;
                    env = next_env;
                    continue;
                }
                "do" => {
                    expr = eval_do(items.as_slice(), &env)?;
                    continue;
                }
                "if" => {
                    expr = eval_if(items.as_slice(), &env)?;
                    continue;
                }
                "fn*" => return eval_fn_star(items.as_slice(), &env),
                "quote" => return eval_quote(items.as_slice()),
                "quasiquote" => {
                    expr = eval_quasiquote_form(items.as_slice())?;
                    continue;
                }
                "quasiquoteexpand" => return eval_quasiquoteexpand(items.as_slice()),
                "macroexpand" => return eval_macroexpand_form(items.as_slice(), &env),
                "try*" => return eval_try(items.as_slice(), &env),
                _ => {}
            }
        }

        let callee = eval(items.as_slice()[0].clone(), env.clone())?;
        let mut args = Vec::with_capacity(items.len() - 1);
        for item in &items.as_slice()[1..] {
            args.push(eval(item.clone(), env.clone())?);
        }

        match callee {
            Value::Builtin(b) => return (b.func)(&args, &env),
            Value::Lambda(lambda) => {
                let new_env =
                    Environment::bind(lambda.env.clone(), &lambda.params, lambda.is_variadic, &args)?;
                expr = lambda.body.clone();
                env = new_env;
            }
            _ => return Err(EvalError::thrown_str("can't call non-function value")),
        }
    }
}

/// Apply an already-evaluated callable to already-evaluated args, for
/// builtins that take a callback (`apply`, `map`, `swap!`). `env` is only
/// consulted if `callee` turns out to be a builtin that itself needs the
/// calling environment (e.g. `eval`) - a `Lambda` carries its own closure
/// environment and never touches `env`.
pub fn apply(callee: &Value, args: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    match callee {
        Value::Builtin(b) => (b.func)(args, env),
        Value::Lambda(lambda) => {
            let new_env =
                Environment::bind(lambda.env.clone(), &lambda.params, lambda.is_variadic, args)?;
            eval(lambda.body.clone(), new_env)
        }
        _ => Err(EvalError::thrown_str("can't call non-function value")),
    }
}

/// Atom-form evaluation: symbol lookup, element-wise evaluation of
/// Vector/Map, self-evaluation of everything else.
fn eval_atom(value: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match value {
        Value::Symbol(name) => env
            .get(&name)
            .ok_or_else(|| EvalError::thrown_str(format!("'{name}' not found"))),
        Value::Vector(items) => {
            let evaluated: Result<Vec<Value>, EvalError> =
                items.iter().map(|v| eval(v.clone(), env.clone())).collect();
            Ok(Value::Vector(MalList::from_vec(evaluated?)))
        }
        Value::Map(map) => {
            let mut built = MalMap::new();
            for (key, val) in map.iter() {
                let evaluated_key = eval(key.to_value(), env.clone())?;
                let key = HashKey::from_value(&evaluated_key)
                    .ok_or_else(|| EvalError::thrown_str("map key must be a string, symbol, or keyword"))?;
                let evaluated_val = eval(val.clone(), env.clone())?;
                built.insert(key, evaluated_val);
            }
            Ok(Value::Map(built))
        }
        other => Ok(other),
    }
}

/// Macro-expand pre-pass: while `value` is a non-empty list whose head
/// resolves to a macro-flagged function, apply it to the unevaluated tail
/// and repeat. The expansion is evaluated in a child of the macro's
/// *closure* environment, but the resulting code is handed back for
/// evaluation in the original caller's environment.
fn macro_expand(mut value: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        let items = match &value {
            Value::List(list) if !list.is_empty() => list.clone(),
            _ => return Ok(value),
        };

        let head = match items.first() {
            Some(Value::Symbol(s)) => s.clone(),
            _ => return Ok(value),
        };

        let lambda = match env.get(&head) {
            Some(Value::Lambda(l)) if l.is_macro.get() => l,
            _ => return Ok(value),
        };

        let args = items.as_slice()[1..].to_vec();
        let call_env = Environment::bind(lambda.env.clone(), &lambda.params, lambda.is_variadic, &args)?;
        value = eval(lambda.body.clone(), call_env)?;
    }
}

fn eval_def(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() != 3 {
        return Err(EvalError::arity_error("def!", ARITY_TWO, items.len() - 1));
    }
    let name = symbol_at(items, 1, "def!")?;
    let value = eval(items[2].clone(), env.clone())?;
    env.define(name, value.clone());
    Ok(value)
}

fn eval_defmacro(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() != 3 {
        return Err(EvalError::arity_error("defmacro!", ARITY_TWO, items.len() - 1));
    }
    let name = symbol_at(items, 1, "defmacro!")?;
    let value = eval(items[2].clone(), env.clone())?;
    let lambda = match &value {
        Value::Lambda(l) => l.clone(),
        other => return Err(EvalError::type_error("defmacro!", "function", other, 2)),
    };
    lambda.is_macro.set(true);
    env.define(name, value.clone());
    Ok(value)
}

fn eval_let(items: &[Value], env: Rc<Environment>) -> Result<(Value, Rc<Environment>), EvalError> {
    if items.len() != 3 {
        return Err(EvalError::arity_error("let*", ARITY_TWO, items.len() - 1));
    }
    let bindings = items[1]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("let*", "list or vector", &items[1], 1))?;

    if bindings.len() % 2 != 0 {
        return Err(EvalError::runtime_error("let*", "odd number of binding forms"));
    }

    let child = Environment::with_outer(env);
    let pairs = bindings.as_slice();
    let mut i = 0;
    while i < pairs.len() {
        let name = match &pairs[i] {
            Value::Symbol(s) => s.clone(),
            other => return Err(EvalError::type_error("let*", "symbol", other, i)),
        };
        let value = eval(pairs[i + 1].clone(), child.clone())?;
        child.define(name, value);
        i += 2;
    }

    Ok((items[2].clone(), child))
}

fn eval_do(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() < 2 {
        return Err(EvalError::runtime_error("do", "requires at least 1 form"));
    }
    for item in &items[1..items.len() - 1] {
        eval(item.clone(), env.clone())?;
    }
    Ok(items[items.len() - 1].clone())
}

fn eval_if(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() < 3 || items.len() > 4 {
        return Err(EvalError::arity_error("if", "2-3", items.len() - 1));
    }
    let condition = eval(items[1].clone(), env.clone())?;
    if condition.is_truthy() {
        Ok(items[2].clone())
    } else if items.len() > 3 {
        Ok(items[3].clone())
    } else {
        Ok(Value::Nil)
    }
}

fn eval_fn_star(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() != 3 {
        return Err(EvalError::arity_error("fn*", ARITY_TWO, items.len() - 1));
    }
    let raw_params = items[1]
        .as_seq()
        .ok_or_else(|| EvalError::type_error("fn*", "list or vector", &items[1], 1))?
        .as_slice();

    let mut params: Vec<LString> = Vec::new();
    let mut is_variadic = false;
    let mut idx = 0;
    while idx < raw_params.len() {
        let name = match &raw_params[idx] {
            Value::Symbol(s) => s.clone(),
            other => return Err(EvalError::type_error("fn*", "symbol", other, idx)),
        };
        if name.as_str() == "&" {
            idx += 1;
            let rest_name = match raw_params.get(idx) {
                Some(Value::Symbol(s)) => s.clone(),
                Some(other) => return Err(EvalError::type_error("fn*", "symbol", other, idx)),
                None => return Err(EvalError::runtime_error("fn*", "expected a name after '&'")),
            };
            params.push(rest_name);
            is_variadic = true;
            idx += 1;
            break;
        }
        params.push(name);
        idx += 1;
    }

    Ok(Value::Lambda(Rc::new(Lambda {
        params,
        is_variadic,
        is_macro: Cell::new(false),
        body: items[2].clone(),
        env: env.clone(),
    })))
}

fn eval_quote(items: &[Value]) -> Result<Value, EvalError> {
    if items.len() != 2 {
        return Err(EvalError::arity_error("quote", ARITY_ONE, items.len() - 1));
    }
    Ok(items[1].clone())
}

fn eval_quasiquote_form(items: &[Value]) -> Result<Value, EvalError> {
    if items.len() != 2 {
        return Err(EvalError::arity_error("quasiquote", ARITY_ONE, items.len() - 1));
    }
    Ok(quasiquote(&items[1]))
}

fn eval_quasiquoteexpand(items: &[Value]) -> Result<Value, EvalError> {
    if items.len() != 2 {
        return Err(EvalError::arity_error("quasiquoteexpand", ARITY_ONE, items.len() - 1));
    }
    Ok(quasiquote(&items[1]))
}

fn eval_macroexpand_form(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() != 2 {
        return Err(EvalError::arity_error("macroexpand", ARITY_ONE, items.len() - 1));
    }
    macro_expand(items[1].clone(), env)
}

fn eval_try(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    match items.len() {
        2 => eval(items[1].clone(), env.clone()),
        3 => {
            let (catch_sym, handler) = parse_catch_clause(&items[2])?;
            match eval(items[1].clone(), env.clone()) {
                Ok(value) => Ok(value),
                Err(err) => match err.as_thrown() {
                    Some(thrown) => {
                        let child = Environment::with_outer(env.clone());
                        child.define(catch_sym, thrown.clone());
                        eval(handler, child)
                    }
                    None => Err(err),
                },
            }
        }
        _ => Err(EvalError::arity_error("try*", ARITY_ONE_OR_TWO, items.len() - 1)),
    }
}

fn parse_catch_clause(form: &Value) -> Result<(LString, Value), EvalError> {
    let items = match form {
        Value::List(list) => list.as_slice(),
        other => return Err(EvalError::type_error("try*", "(catch* sym handler)", other, 2)),
    };
    if items.len() != 3 {
        return Err(EvalError::runtime_error("try*", "catch* clause must have exactly 2 forms"));
    }
    match &items[0] {
        Value::Symbol(s) if s.as_str() == "catch*" => {}
        other => return Err(EvalError::type_error("try*", "catch*", other, 0)),
    }
    let sym = match &items[1] {
        Value::Symbol(s) => s.clone(),
        other => return Err(EvalError::type_error("try*", "symbol", other, 1)),
    };
    Ok((sym, items[2].clone()))
}

fn symbol_at(items: &[Value], index: usize, function: &str) -> Result<LString, EvalError> {
    match &items[index] {
        Value::Symbol(s) => Ok(s.clone()),
        other => Err(EvalError::type_error(function, "symbol", other, index)),
    }
}

/// Structural quasiquote rewrite: folds a list's elements right-to-left
/// into a `cons`/`concat` expression tree that, once evaluated,
/// reconstructs the template with `unquote` holes filled in and
/// `splice-unquote` lists spliced.
fn quasiquote(value: &Value) -> Value {
    if let Value::List(items) = value {
        let slice = items.as_slice();
        if slice.len() == 2 {
            if let Value::Symbol(s) = &slice[0] {
                if s.as_str() == "unquote" {
                    return slice[1].clone();
                }
            }
        }
        return fold_quasiquote(slice);
    }

    if let Value::Vector(items) = value {
        let list_form = fold_quasiquote(items.as_slice());
        return Value::list(vec![Value::symbol("vec"), list_form]);
    }

    match value {
        Value::Symbol(_) | Value::Map(_) => Value::list(vec![Value::symbol("quote"), value.clone()]),
        _ => value.clone(),
    }
}

fn fold_quasiquote(items: &[Value]) -> Value {
    let mut acc = Value::list(vec![]);
    for item in items.iter().rev() {
        if let Value::List(inner) = item {
            let inner = inner.as_slice();
            if inner.len() == 2 {
                if let Value::Symbol(s) = &inner[0] {
                    if s.as_str() == "splice-unquote" {
                        acc = Value::list(vec![Value::symbol("concat"), inner[1].clone(), acc]);
                        continue;
                    }
                }
            }
        }
        acc = Value::list(vec![Value::symbol("cons"), quasiquote(item), acc]);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn eval_source(source: &str, env: &Rc<Environment>) -> Result<Value, EvalError> {
        eval(read_str(source).unwrap(), env.clone())
    }

    #[test]
    fn self_evaluating_values_return_themselves() {
        let env = Environment::new();
        assert_eq!(eval(Value::Number(42.0), env.clone()).unwrap(), Value::Number(42.0));
        assert_eq!(eval(Value::Nil, env).unwrap(), Value::Nil);
    }

    #[test]
    fn undefined_symbol_is_a_thrown_exception() {
        let env = Environment::new();
        let err = eval(Value::symbol("nope"), env).unwrap_err();
        assert_eq!(err.as_thrown(), Some(&Value::string("'nope' not found")));
    }

    #[test]
    fn def_binds_and_returns_the_value() {
        let env = Environment::new();
        let result = eval_source("(def! x 10)", &env).unwrap();
        assert_eq!(result, Value::Number(10.0));
        assert_eq!(env.get(&LString::new("x")), Some(Value::Number(10.0)));
    }

    #[test]
    fn if_is_tail_called_through_both_branches() {
        let env = Environment::new();
        assert_eq!(eval_source("(if true 1 2)", &env).unwrap(), Value::Number(1.0));
        assert_eq!(eval_source("(if false 1 2)", &env).unwrap(), Value::Number(2.0));
        assert_eq!(eval_source("(if false 1)", &env).unwrap(), Value::Nil);
    }

    #[test]
    fn let_star_shadows_without_mutating_outer() {
        let env = Environment::new();
        eval_source("(def! x 100)", &env).unwrap();
        let result = eval_source("(let* (x 1 y 2) y)", &env).unwrap();
        assert_eq!(result, Value::Number(2.0));
        assert_eq!(env.get(&LString::new("x")), Some(Value::Number(100.0)));
    }

    #[test]
    fn fn_star_and_application_with_closures() {
        let env = Environment::new();
        let result = eval_source("(let* (a 10 b (fn* (x) (+ x a))) (b 5))", &env);
        // `+` isn't registered on a bare environment, so this should fail to
        // find the builtin symbol, not crash on the evaluator shape.
        assert!(matches!(result.unwrap_err().as_thrown(), Some(Value::String(_))));
    }

    #[test]
    fn variadic_rest_parameter_collects_trailing_args() {
        let env = Environment::new();
        let result = eval_source("((fn* (a & rest) rest) 1 2 3 4)", &env).unwrap();
        assert_eq!(
            result,
            Value::list(vec![Value::Number(2.0), Value::Number(3.0), Value::Number(4.0)])
        );
    }

    #[test]
    fn quote_returns_its_argument_unevaluated() {
        let env = Environment::new();
        let result = eval_source("(quote (a b c))", &env).unwrap();
        assert_eq!(
            result,
            Value::list(vec![Value::symbol("a"), Value::symbol("b"), Value::symbol("c")])
        );
    }

    #[test]
    fn quasiquote_unquote_roundtrips_to_plain_eval() {
        let env = Environment::new();
        eval_source("(def! e 5)", &env).unwrap();
        let direct = eval_source("e", &env).unwrap();
        let via_qq = eval_source("(quasiquote (unquote e))", &env).unwrap();
        assert_eq!(direct, via_qq);
    }

    #[test]
    fn try_without_catch_propagates_the_thrown_value() {
        let env = Environment::new();
        let err = eval_source("(try* nope)", &env).unwrap_err();
        assert_eq!(err.as_thrown(), Some(&Value::string("'nope' not found")));
    }

    #[test]
    fn try_catch_binds_the_thrown_value() {
        let env = Environment::new();
        let result = eval_source("(try* nope (catch* e e))", &env).unwrap();
        assert_eq!(result, Value::string("'nope' not found"));
    }

    #[test]
    fn macroexpand_does_not_evaluate_the_expansion() {
        let env = Environment::new();
        eval_source("(defmacro! ignore-it (fn* (a) (quote 7)))", &env).unwrap();
        let expanded = eval_source("(macroexpand (ignore-it nope))", &env).unwrap();
        assert_eq!(expanded, Value::Number(7.0));
    }

    #[test]
    fn defmacro_flips_the_macro_flag_on_an_existing_function() {
        let env = Environment::new();
        eval_source("(def! id (fn* (x) x))", &env).unwrap();
        eval_source("(defmacro! idm id)", &env).unwrap();
        match env.get(&LString::new("id")).unwrap() {
            Value::Lambda(l) => assert!(l.is_macro.get()),
            other => panic!("expected lambda, got {other:?}"),
        }
    }

    #[test]
    fn self_recursive_fn_star_definition_is_accepted() {
        let env = Environment::new();
        eval_source(
            "(def! sum (fn* (n acc) (if (<= n 0) acc (sum (- n 1) (+ acc n)))))",
            &env,
        )
        .unwrap();
        // `<=`/`-`/`+` aren't bound on a bare env; the bounded-stack-depth
        // property (N >= 10,000) is exercised in the integration tests
        // where the full root environment is assembled.
        assert!(env.get(&LString::new("sum")).is_some());
    }
}
