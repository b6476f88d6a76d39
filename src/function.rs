//! Callable values and call-site argument vectors

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::ast::Clause;
use crate::closure::Closure;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::value::{Value, ValueType};

/// Signature of a host-supplied function
pub type NativeHandler = fn(&ArgumentList, &Environment) -> Result<Value>;

pub enum Function {
    Native {
        name: String,
        handler: NativeHandler,
    },
    /// A function defined in source: top-level `let`s or a lambda
    Soft {
        name: Option<String>,
        overloads: RefCell<Vec<Rc<Clause>>>,
        captured: Option<Rc<Closure>>,
    },
}

impl Function {
    pub fn native(name: impl Into<String>, handler: NativeHandler) -> Self {
        Function::Native {
            name: name.into(),
            handler,
        }
    }

    /// An empty top-level function that `let` declarations add overloads to
    pub fn soft(name: impl Into<String>) -> Self {
        Function::Soft {
            name: Some(name.into()),
            overloads: RefCell::new(Vec::new()),
            captured: None,
        }
    }

    pub fn lambda(clauses: Vec<Rc<Clause>>, captured: Rc<Closure>) -> Self {
        Function::Soft {
            name: None,
            overloads: RefCell::new(clauses),
            captured: Some(captured),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Function::Native { name, .. } => Some(name.as_str()),
            Function::Soft { name, .. } => name.as_deref(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Function::Native { .. })
    }

    pub fn add_overload(&self, clause: Rc<Clause>) -> Result<()> {
        match self {
            Function::Native { name, .. } => Err(Error::runtime(format!(
                "Cannot overload native function '{}'",
                name
            ))),
            Function::Soft { overloads, .. } => {
                overloads.borrow_mut().push(clause);
                Ok(())
            }
        }
    }

    /// Overloads in declaration order, or `None` for natives
    pub fn overloads(&self) -> Option<Ref<'_, Vec<Rc<Clause>>>> {
        match self {
            Function::Native { .. } => None,
            Function::Soft { overloads, .. } => Some(overloads.borrow()),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Native { name, .. } => f.debug_tuple("Native").field(name).finish(),
            Function::Soft { name, overloads, .. } => f
                .debug_struct("Soft")
                .field("name", name)
                .field("overloads", &overloads.borrow().len())
                .finish(),
        }
    }
}

/// Evaluated arguments of one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    values: Vec<Value>,
}

impl ArgumentList {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> &Value {
        const VOID: &Value = &Value::Void;
        self.values.get(index).unwrap_or(VOID)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Check arity and positional types for the function `name`
    ///
    /// ```
    /// use xy::function::ArgumentList;
    /// use xy::value::{Value, ValueType};
    ///
    /// let args = ArgumentList::new(vec![Value::Number(1.0)]);
    /// assert!(args.check("sqrt", &[ValueType::Number]).is_ok());
    /// let err = args.check("len", &[ValueType::List]).unwrap_err();
    /// assert_eq!(err.message, "Invalid argument #1 to 'len', expected list");
    /// ```
    pub fn check(&self, name: &str, expected: &[ValueType]) -> Result<()> {
        match self.mismatch(expected) {
            None => Ok(()),
            Some(i) => {
                let expected = expected
                    .get(i)
                    .map(ValueType::to_string)
                    .unwrap_or_else(|| "no argument".to_string());
                Err(Error::type_error(format!(
                    "Invalid argument #{} to '{}', expected {}",
                    i + 1,
                    name,
                    expected
                )))
            }
        }
    }

    /// Like [`ArgumentList::check`], without producing an error
    pub fn matches(&self, expected: &[ValueType]) -> bool {
        self.mismatch(expected).is_none()
    }

    fn mismatch(&self, expected: &[ValueType]) -> Option<usize> {
        (0..self.values.len().max(expected.len())).find(|&i| {
            match (expected.get(i), self.values.get(i)) {
                (Some(ty), Some(value)) => !ty.accepts(value),
                _ => true,
            }
        })
    }
}
