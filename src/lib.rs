// ABOUTME: Module wiring and public re-exports, so integration tests can drive the interpreter without going through main.rs

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod printer;
pub mod reader;
pub mod types;

use std::rc::Rc;

/// Build a root environment with every core builtin and bootstrap
/// definition installed - the standard starting point for both the
/// REPL/script driver and the integration tests.
pub fn root_environment() -> Result<Rc<env::Environment>, error::EvalError> {
    let env = env::Environment::new();
    builtins::register_builtins(&env)?;
    Ok(env)
}
