// ABOUTME: First-class mutable reference cell

use super::value::Value;
use std::cell::RefCell;

#[derive(Debug)]
pub struct Atom(RefCell<Value>);

impl Atom {
    pub fn new(value: Value) -> Self {
        Atom(RefCell::new(value))
    }

    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_the_held_value() {
        let atom = Atom::new(Value::Number(1.0));
        atom.set(Value::Number(2.0));
        assert_eq!(atom.get(), Value::Number(2.0));
    }
}
