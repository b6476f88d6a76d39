//! Runtime values and their operator semantics

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::error::{Error, Result};
use crate::function::Function;
use crate::list::List;
use crate::map::Map;

/// Cap on the up-front allocation for a numeric range
const RANGE_PREALLOCATION: usize = 1 << 16;

/// A dynamically typed value
///
/// Strings are copied by content. Lists, maps and functions are shared by
/// reference count.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Void,
    Number(f64),
    Bool(bool),
    String(String),
    Function(Rc<Function>),
    List(Rc<List>),
    Map(Rc<Map>),
}

/// Type tags, used for diagnostics and argument checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Void,
    Number,
    Bool,
    String,
    Function,
    List,
    Map,
    /// Matches every value; only meaningful in argument checks
    Any,
}

impl ValueType {
    pub fn accepts(self, value: &Value) -> bool {
        self == ValueType::Any || self == value.value_type()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Void => "void",
            ValueType::Number => "number",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Function => "function",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Any => "any",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Void => ValueType::Void,
            Value::Number(_) => ValueType::Number,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Function(_) => ValueType::Function,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
        }
    }

    pub fn list(values: Vec<Value>) -> Value {
        Value::List(List::from_values(values))
    }

    pub fn string(text: impl Into<String>) -> Value {
        Value::String(text.into())
    }

    /// Truthiness
    pub fn condition(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Function(_) | Value::Map(_) => true,
        }
    }

    /// Compare two values of the same type
    ///
    /// `None` means the values are incomparable: they differ in type, or they
    /// are unequal values of a type with no ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let equal_or_none = |equal: bool| equal.then_some(Ordering::Equal);

        match (self, other) {
            (Value::Void, Value::Void) => Some(Ordering::Equal),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => equal_or_none(a == b),
            (Value::Function(a), Value::Function(b)) => equal_or_none(Rc::ptr_eq(a, b)),
            (Value::List(a), Value::List(b)) => equal_or_none(
                Rc::ptr_eq(a, b)
                    || (a.size() == b.size() && a.iter().zip(b.iter()).all(|(x, y)| x == y)),
            ),
            (Value::Map(a), Value::Map(b)) => equal_or_none(
                Rc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.entries().all(|(key, value)| b.contains(key) && b.get(key) == *value)),
            ),
            _ => None,
        }
    }

    pub fn apply_unary(&self, op: UnaryOperator) -> Result<Value> {
        match (op, self) {
            (UnaryOperator::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOperator::Negate, other) => Err(Error::type_error(format!(
                "Invalid operand type for unary '-': {}",
                other.value_type()
            ))),
            (UnaryOperator::Not, value) => Ok(Value::Bool(!value.condition())),
        }
    }

    pub fn apply_operator(&self, op: BinaryOperator, rhs: &Value) -> Result<Value> {
        use BinaryOperator::*;

        match op {
            Add => self.add(rhs),
            Subtract | Multiply | Divide | Power => {
                let (Value::Number(a), Value::Number(b)) = (self, rhs) else {
                    return Err(self.operand_error(op, rhs));
                };
                let result = match op {
                    Subtract => a - b,
                    Multiply => a * b,
                    Divide if *b == 0.0 => return Err(Error::runtime("Division by zero")),
                    Divide => a / b,
                    _ => a.powf(*b),
                };
                Ok(Value::Number(result))
            }
            Index => self.index(rhs).ok_or_else(|| self.operand_error(op, rhs)),
            Range => self.range(rhs).ok_or_else(|| self.operand_error(op, rhs)),
            Equal => Ok(Value::Bool(self == rhs)),
            NotEqual => Ok(Value::Bool(self != rhs)),
            Less | Greater | LessEqual | GreaterEqual => {
                let orderable = matches!(
                    (self, rhs),
                    (Value::Number(_), Value::Number(_)) | (Value::String(_), Value::String(_))
                );
                if !orderable {
                    return Err(self.operand_error(op, rhs));
                }
                let result = match self.compare(rhs) {
                    None => false,
                    Some(ordering) => match op {
                        Less => ordering == Ordering::Less,
                        Greater => ordering == Ordering::Greater,
                        LessEqual => ordering != Ordering::Greater,
                        _ => ordering != Ordering::Less,
                    },
                };
                Ok(Value::Bool(result))
            }
            And => Ok(if self.condition() { rhs.clone() } else { self.clone() }),
            Or => Ok(if self.condition() { self.clone() } else { rhs.clone() }),
        }
    }

    fn operand_error(&self, op: BinaryOperator, rhs: &Value) -> Error {
        Error::type_error(format!(
            "Invalid operand types for '{}': {} and {}",
            op.symbol(),
            self.value_type(),
            rhs.value_type()
        ))
    }

    fn add(&self, rhs: &Value) -> Result<Value> {
        let value = match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Value::List(a), Value::List(b)) => Value::List(List::concat(a, b)),
            (Value::Map(a), Value::Map(b)) => Value::Map(Map::concat(a, b)),
            (Value::String(a), Value::String(b)) => Value::String(format!("{}{}", a, b)),
            (Value::String(a), b @ (Value::Number(_) | Value::Bool(_))) => {
                Value::String(format!("{}{}", a, b))
            }
            (a @ (Value::Number(_) | Value::Bool(_)), Value::String(b)) => {
                Value::String(format!("{}{}", a, b))
            }
            _ => return Err(self.operand_error(BinaryOperator::Add, rhs)),
        };
        Ok(value)
    }

    /// `list.i`, `string.i` and `map."key"`
    fn index(&self, rhs: &Value) -> Option<Value> {
        match (self, rhs) {
            (Value::List(list), Value::Number(n)) => Some(match to_index(*n) {
                Some(i) => list.get(i),
                None => Value::Void,
            }),
            (Value::String(s), Value::Number(n)) => Some(
                to_index(*n)
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Void),
            ),
            (Value::Map(map), Value::String(key)) => Some(map.get_str(key)),
            _ => None,
        }
    }

    /// `a..b` ranges, `xs..n` suffixes and `xs..[start, end]` slices
    fn range(&self, rhs: &Value) -> Option<Value> {
        match (self, rhs) {
            (Value::Number(start), Value::Number(end)) => {
                if !start.is_finite() || !end.is_finite() || end <= start {
                    return Some(Value::list(Vec::new()));
                }
                // Counting from an integer keeps large bounds from stalling
                let count = (end - start).ceil() as usize;
                let mut values = Vec::with_capacity(count.min(RANGE_PREALLOCATION));
                let mut last = f64::NEG_INFINITY;
                for i in 0..count {
                    let n = start + i as f64;
                    if n >= *end || n <= last {
                        break;
                    }
                    values.push(Value::Number(n));
                    last = n;
                }
                Some(Value::list(values))
            }
            (Value::List(list), Value::Number(start)) => {
                let start = to_index(*start).unwrap_or(0);
                Some(Value::List(List::sublist(list, start, list.size())))
            }
            (Value::String(s), Value::Number(start)) => {
                let start = to_index(*start).unwrap_or(0);
                Some(Value::String(s.chars().skip(start).collect()))
            }
            (Value::List(list), Value::List(bounds)) => {
                let (start, end) = slice_bounds(bounds)?;
                Some(Value::List(List::sublist(list, start, end)))
            }
            (Value::String(s), Value::List(bounds)) => {
                let (start, end) = slice_bounds(bounds)?;
                let len = end.saturating_sub(start);
                Some(Value::String(s.chars().skip(start).take(len).collect()))
            }
            _ => None,
        }
    }
}

fn to_index(n: f64) -> Option<usize> {
    (n >= 0.0 && n.is_finite()).then(|| n as usize)
}

fn slice_bounds(bounds: &List) -> Option<(usize, usize)> {
    match (bounds.size(), bounds.get(0), bounds.get(1)) {
        (2, Value::Number(start), Value::Number(end)) => {
            Some((to_index(start).unwrap_or(0), to_index(end).unwrap_or(0)))
        }
        _ => None,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("()"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Function(function) => match function.name() {
                Some(name) => write!(f, "<function {}>", name),
                None => f.write_str("<lambda>"),
            },
            Value::List(list) => {
                f.write_str("[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match &item {
                        Value::String(s) => write!(f, "{:?}", s)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                f.write_str("]")
            }
            Value::Map(map) => write!(f, "<map of {}>", map.len()),
        }
    }
}
