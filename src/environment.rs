//! The global function namespace

use std::rc::Rc;

use crate::function::{Function, NativeHandler};

/// Top-level functions of one loaded program, searched linearly by name
#[derive(Debug, Default)]
pub struct Environment {
    functions: Vec<Rc<Function>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_function(&self, name: &str) -> Option<Rc<Function>> {
        self.functions
            .iter()
            .find(|f| f.name() == Some(name))
            .cloned()
    }

    pub fn add_function(&mut self, function: Rc<Function>) {
        self.functions.push(function);
    }

    /// Register a host function
    pub fn add_native(&mut self, name: &str, handler: NativeHandler) {
        self.add_function(Rc::new(Function::native(name, handler)));
    }

    /// The soft function called `name`, created on first use
    ///
    /// Returns `None` when the name belongs to a native function.
    pub fn find_or_create(&mut self, name: &str) -> Option<Rc<Function>> {
        if let Some(existing) = self.find_function(name) {
            return (!existing.is_native()).then_some(existing);
        }
        let function = Rc::new(Function::soft(name));
        self.add_function(Rc::clone(&function));
        Some(function)
    }

    pub fn functions(&self) -> &[Rc<Function>] {
        &self.functions
    }

    /// Forget every function registered after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.functions.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::function::ArgumentList;
    use crate::value::Value;

    fn nothing(_: &ArgumentList, _: &Environment) -> Result<Value> {
        Ok(Value::Void)
    }

    #[test]
    fn test_find_or_create_is_idempotent() {
        let mut env = Environment::new();
        let a = env.find_or_create("f").unwrap();
        let b = env.find_or_create("f").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(env.functions().len(), 1);
    }

    #[test]
    fn test_natives_are_not_redeclared() {
        let mut env = Environment::new();
        env.add_native("sqrt", nothing);
        assert!(env.find_or_create("sqrt").is_none());
        assert!(env.find_function("sqrt").unwrap().is_native());
        assert!(env.find_function("missing").is_none());
    }

    #[test]
    fn test_truncate_forgets_later_functions() {
        let mut env = Environment::new();
        env.add_native("sqrt", nothing);
        let mark = env.functions().len();
        env.find_or_create("f");
        env.find_or_create("g");
        env.truncate(mark);
        assert!(env.find_function("f").is_none());
        assert!(env.find_function("g").is_none());
        assert!(env.find_function("sqrt").is_some());
    }
}
