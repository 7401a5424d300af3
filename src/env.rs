// ABOUTME: Symbol environment chain with outer pointer and variadic bind-list installation

use crate::error::EvalError;
use crate::types::{LString, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<LString, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// A fresh root environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// A fresh child environment extending `outer`.
    pub fn with_outer(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Build a child environment from a function's parameter list and the
    /// evaluated argument list, honoring a trailing variadic rest-parameter.
    /// `params` never contains the literal `&` symbol; the reader/`fn*` form
    /// strips it and records `is_variadic` along with folding the
    /// rest-parameter name into the last slot of `params`.
    pub fn bind(
        outer: Rc<Environment>,
        params: &[LString],
        is_variadic: bool,
        args: &[Value],
    ) -> Result<Rc<Environment>, EvalError> {
        let env = Environment::with_outer(outer);

        if is_variadic {
            let fixed = &params[..params.len() - 1];
            let rest_name = &params[params.len() - 1];

            if args.len() < fixed.len() {
                return Err(EvalError::arity_error(
                    "#<function>",
                    format!("at least {}", fixed.len()),
                    args.len(),
                ));
            }

            for (param, arg) in fixed.iter().zip(args.iter()) {
                env.define(param.clone(), arg.clone());
            }

            let rest_items: Vec<Value> = args[fixed.len()..].to_vec();
            env.define(rest_name.clone(), Value::list(rest_items));
        } else {
            if params.len() != args.len() {
                return Err(EvalError::arity_error(
                    "#<function>",
                    params.len().to_string(),
                    args.len(),
                ));
            }
            for (param, arg) in params.iter().zip(args.iter()) {
                env.define(param.clone(), arg.clone());
            }
        }

        Ok(env)
    }

    /// Define a binding in THIS scope only (doesn't walk the outer chain).
    pub fn define(&self, name: LString, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Look up a symbol, walking the outer chain.
    pub fn get(&self, name: &LString) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Update an existing binding wherever it lives in the chain. An
    /// undefined target raises a catchable exception rather than a host
    /// error, matching how a bare undefined-symbol lookup is reported.
    pub fn set(&self, name: &LString, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.clone(), value);
            return Ok(());
        }
        match &self.outer {
            Some(outer) => outer.set(name, value),
            None => Err(EvalError::thrown_str(format!("'{name}' not found"))),
        }
    }
}

/// Walk from any environment (held by `Rc`) up to its root.
pub fn root_of(env: &Rc<Environment>) -> Rc<Environment> {
    let mut current = env.clone();
    loop {
        let next = match &current.outer {
            Some(outer) => outer.clone(),
            None => return current,
        };
        current = next;
    }
}
