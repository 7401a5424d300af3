// ABOUTME: End-to-end read-eval-print scenarios and cross-module invariants/laws

use mal::env::Environment;
use mal::eval::eval;
use mal::printer::pr_str;
use mal::reader::read_str;
use mal::types::Value;
use std::rc::Rc;

fn setup() -> Rc<Environment> {
    mal::root_environment().expect("builtins and bootstrap definitions should install cleanly")
}

fn run(source: &str, env: &Rc<Environment>) -> Value {
    eval(read_str(source).unwrap(), env.clone()).unwrap()
}

fn rep(source: &str, env: &Rc<Environment>) -> String {
    pr_str(&run(source, env), true)
}

// ===== End-to-end scenarios =====

#[test]
fn arithmetic_and_print() {
    let env = setup();
    assert_eq!(rep("(+ 1 2 (* 3 4))", &env), "15");
}

#[test]
fn let_with_closures() {
    let env = setup();
    assert_eq!(rep("(let* (a 10 b (fn* (x) (+ x a))) (b 5))", &env), "15");
}

#[test]
fn variadic_capture() {
    let env = setup();
    assert_eq!(rep("((fn* (a & rest) rest) 1 2 3 4)", &env), "(2 3 4)");
}

#[test]
fn macro_via_cond() {
    let env = setup();
    assert_eq!(rep("(cond false 1 true 2 :else 3)", &env), "2");
}

#[test]
fn exception_catch() {
    let env = setup();
    assert_eq!(
        rep(r#"(try* (throw "boom") (catch* e (str "caught: " e)))"#, &env),
        r#""caught: boom""#
    );
}

#[test]
fn quasiquote_with_splice() {
    let env = setup();
    run("(def! xs (list 2 3))", &env);
    assert_eq!(rep("`(1 ~@xs 4)", &env), "(1 2 3 4)");
}

#[test]
fn atom_swap() {
    let env = setup();
    run("(def! a (atom 0))", &env);
    run("(swap! a + 5)", &env);
    assert_eq!(rep("(swap! a + 5)", &env), "10");
}

#[test]
fn undefined_symbol_inside_try_star() {
    let env = setup();
    assert_eq!(rep("(try* nope (catch* e e))", &env), "\"'nope' not found\"");
}

// ===== Invariants / laws =====

#[test]
fn print_then_read_roundtrips_for_simple_forms() {
    let env = setup();
    for source in ["(1 2 3)", "[:a :b \"c\"]", "42", "-3.5", "nil", "true"] {
        let value = run(source, &env);
        let printed = pr_str(&value, true);
        let reparsed = read_str(&printed).unwrap();
        assert_eq!(value, reparsed, "roundtrip failed for {source}");
    }
}

#[test]
fn quote_returns_the_value_unevaluated() {
    let env = setup();
    let form = read_str("(1 2 3)").unwrap();
    let quoted = Value::list(vec![Value::symbol("quote"), form.clone()]);
    assert_eq!(eval(quoted, env).unwrap(), form);
}

#[test]
fn quasiquote_unquote_matches_plain_eval() {
    let env = setup();
    run("(def! e (+ 1 2))", &env);
    assert_eq!(rep("e", &env), rep("(quasiquote (unquote e))", &env));
}

#[test]
fn cons_of_evaluated_args_builds_a_three_element_list() {
    let env = setup();
    run("(def! a 1)", &env);
    run("(def! b 2)", &env);
    run("(def! c 3)", &env);
    assert_eq!(rep("(cons a (list b c))", &env), "(1 2 3)");
}

#[test]
fn equality_is_reflexive_symmetric_and_list_vector_blind() {
    let env = setup();
    let list = run("(list 1 2 3)", &env);
    let vector = run("(vector 1 2 3)", &env);
    assert_eq!(list, list);
    assert_eq!(list, vector);
    assert_eq!(vector, list);
}

#[test]
fn macro_expansion_is_a_fixed_point() {
    let env = setup();
    run("(defmacro! double (fn* (x) (list '+ x x)))", &env);
    let once = rep("(macroexpand (double 5))", &env);
    let twice_source = format!("(macroexpand (quote {once}))");
    assert_eq!(rep(&twice_source, &env), once);
}

#[test]
fn self_recursive_tail_call_does_not_grow_the_stack() {
    let env = setup();
    run(
        "(def! sum (fn* (n acc) (if (<= n 0) acc (sum (- n 1) (+ acc n)))))",
        &env,
    );
    assert_eq!(rep("(sum 10000 0)", &env), "50005000");
}
