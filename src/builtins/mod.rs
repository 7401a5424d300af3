// ABOUTME: Fixed table of native functions installed into the root environment, plus bootstrap self-hosted definitions

pub mod arithmetic;
pub mod atoms;
pub mod comparison;
pub mod constructors;
pub mod control;
pub mod io;
pub mod maps;
pub mod predicates;
pub mod sequences;

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval;
use crate::reader::read_str;
use std::rc::Rc;

/// Install every core native builtin, then evaluate the three bootstrap
/// definitions (`not`, `load-file`, `cond`) in the language itself, in that
/// order, so `cond` can rely on `not`/`load-file` having already been
/// installed by the time user code runs.
pub fn register_builtins(env: &Rc<Environment>) -> Result<(), EvalError> {
    arithmetic::register(env);
    comparison::register(env);
    predicates::register(env);
    sequences::register(env);
    constructors::register(env);
    maps::register(env);
    io::register(env);
    atoms::register(env);
    control::register(env);

    for form in BOOTSTRAP {
        let parsed = read_str(form).map_err(|e| EvalError::runtime_error("bootstrap", e.to_string()))?;
        eval(parsed, env.clone())?;
    }

    Ok(())
}

const BOOTSTRAP: &[&str] = &[
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))"#,
    "(defmacro! cond (fn* (& xs) (if (> (count xs) 0) (list 'if (first xs) (if (> (count xs) 1) (nth xs 1) (throw \"odd number of forms to cond\")) (cons 'cond (rest (rest xs)))))))",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str as parse;
    use crate::types::Value;

    fn rooted() -> Rc<Environment> {
        let env = Environment::new();
        register_builtins(&env).unwrap();
        env
    }

    fn run(source: &str, env: &Rc<Environment>) -> Value {
        eval(parse(source).unwrap(), env.clone()).unwrap()
    }

    #[test]
    fn arithmetic_and_print_scenario() {
        let env = rooted();
        assert_eq!(run("(+ 1 2 (* 3 4))", &env), Value::Number(15.0));
    }

    #[test]
    fn let_with_closures_scenario() {
        let env = rooted();
        assert_eq!(run("(let* (a 10 b (fn* (x) (+ x a))) (b 5))", &env), Value::Number(15.0));
    }

    #[test]
    fn cond_macro_scenario() {
        let env = rooted();
        assert_eq!(run("(cond false 1 true 2 :else 3)", &env), Value::Number(2.0));
    }

    #[test]
    fn not_bootstrap_negates_truthiness() {
        let env = rooted();
        assert_eq!(run("(not false)", &env), Value::Bool(true));
        assert_eq!(run("(not 0)", &env), Value::Bool(false));
    }

    #[test]
    fn atom_swap_scenario() {
        let env = rooted();
        run("(def! a (atom 0))", &env);
        run("(swap! a + 5)", &env);
        assert_eq!(run("(swap! a + 5)", &env), Value::Number(10.0));
    }
}
