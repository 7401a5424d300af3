// ABOUTME: pr-str/str/prn/println/read-string/slurp - printing and text I/O builtins

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer::pr_str;
use crate::reader::read_str;
use crate::types::Value;
use std::rc::Rc;

fn pr_str_builtin(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let joined = args.iter().map(|v| pr_str(v, true)).collect::<Vec<_>>().join(" ");
    Ok(Value::string(joined))
}

fn str_builtin(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let joined = args.iter().map(|v| pr_str(v, false)).collect::<Vec<_>>().join("");
    Ok(Value::string(joined))
}

fn prn(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let joined = args.iter().map(|v| pr_str(v, true)).collect::<Vec<_>>().join(" ");
    println!("{joined}");
    Ok(Value::Nil)
}

fn println_builtin(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    let joined = args.iter().map(|v| pr_str(v, false)).collect::<Vec<_>>().join(" ");
    println!("{joined}");
    Ok(Value::Nil)
}

fn read_string(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("read-string", "1", args.len()));
    }
    let source = match &args[0] {
        Value::String(s) => s.as_str().to_string(),
        other => return Err(EvalError::type_error("read-string", "string", other, 0)),
    };
    read_str(&source).map_err(|e| EvalError::runtime_error("read-string", e.to_string()))
}

fn slurp(args: &[Value], _env: &Rc<Environment>) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("slurp", "1", args.len()));
    }
    let path = match &args[0] {
        Value::String(s) => s.as_str().to_string(),
        other => return Err(EvalError::type_error("slurp", "string", other, 0)),
    };
    std::fs::read_to_string(&path)
        .map(Value::string)
        .map_err(|e| EvalError::runtime_error("slurp", format!("{path}: {e}")))
}

pub fn register(env: &Rc<Environment>) {
    env.define("pr-str".into(), Value::Builtin(crate::types::Builtin { name: "pr-str", func: pr_str_builtin }));
    env.define("str".into(), Value::Builtin(crate::types::Builtin { name: "str", func: str_builtin }));
    env.define("prn".into(), Value::Builtin(crate::types::Builtin { name: "prn", func: prn }));
    env.define(
        "println".into(),
        Value::Builtin(crate::types::Builtin { name: "println", func: println_builtin }),
    );
    env.define(
        "read-string".into(),
        Value::Builtin(crate::types::Builtin { name: "read-string", func: read_string }),
    );
    env.define("slurp".into(), Value::Builtin(crate::types::Builtin { name: "slurp", func: slurp }));
}
