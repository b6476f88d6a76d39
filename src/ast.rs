//! Abstract Syntax Tree definitions for XY
//!
//! The tree is owned top-down. Symbol nodes start out [`Resolution::Unresolved`]
//! and are rewritten by the resolver pass in [`crate::resolver`]. Clauses are
//! reference counted because both a lambda node and every function value it
//! creates at runtime share them.

use std::rc::Rc;

use crate::lexer::TokenKind;
use crate::value::Value;

/// How a symbol reference was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Not bound yet; evaluating it is an error
    Unresolved,
    /// A slot `index` in the frame `depth` levels up the closure chain
    Local { index: usize, depth: usize },
    /// A top-level function in the environment
    Global,
}

/// Expression nodes
#[derive(Debug, Clone)]
pub enum Expression {
    Constant(Value),

    Symbol {
        name: String,
        resolution: Resolution,
    },

    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Function application: `callee(args...)`
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
    },

    /// List literal: `[a, b, c]`
    List(Vec<Expression>),

    /// Map literal: `{ key: value, "other key": value }`
    Map {
        keys: Vec<String>,
        values: Vec<Expression>,
    },

    /// List comprehension: `source $ name : filter = map`
    Comprehension {
        source: Box<Expression>,
        name: String,
        filter: Option<Box<Expression>>,
        map: Option<Box<Expression>>,
    },

    /// Local bindings: `with (a = x, [h, t..] = xs) = body`
    With {
        bindings: Vec<WithBinding>,
        body: Box<Expression>,
    },

    /// Anonymous overload set: `@(x) = body` or `@{ let (x) = ... }`
    Lambda(Vec<Rc<Clause>>),
}

impl Expression {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expression::Symbol {
            name: name.into(),
            resolution: Resolution::Unresolved,
        }
    }

    /// Reference to a parameter slot of the innermost clause
    pub fn local(index: usize) -> Self {
        Expression::Symbol {
            name: String::new(),
            resolution: Resolution::Local { index, depth: 0 },
        }
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Whether the expression could be folded to a constant
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Constant(_) => true,
            Expression::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
            Expression::Unary { operand, .. } => operand.is_constant(),
            Expression::List(items) => items.iter().all(Expression::is_constant),
            Expression::Map { values, .. } => values.iter().all(Expression::is_constant),
            Expression::Symbol { .. }
            | Expression::Call { .. }
            | Expression::Comprehension { .. }
            | Expression::With { .. }
            | Expression::Lambda(_) => false,
        }
    }
}

/// One binding of a `with` block
#[derive(Debug, Clone)]
pub struct WithBinding {
    pub target: BindingTarget,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindingTarget {
    /// `name = value`
    Name(String),
    /// `[a, b, rest..] = value`; a variadic last name takes the remaining tail
    Destructure { names: Vec<String>, variadic: bool },
}

impl BindingTarget {
    pub fn names(&self) -> Vec<&str> {
        match self {
            BindingTarget::Name(name) => vec![name.as_str()],
            BindingTarget::Destructure { names, .. } => names.iter().map(String::as_str).collect(),
        }
    }
}

/// A parameter; anonymous parameters come from patterns
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Option<String>,
    pub guard: Option<Expression>,
}

#[derive(Debug, Clone, Default)]
pub struct ParamList {
    pub params: Vec<Param>,
}

impl ParamList {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Scope names, with anonymous slots as empty strings
    pub fn names(&self) -> Vec<String> {
        self.params
            .iter()
            .map(|p| p.name.clone().unwrap_or_default())
            .collect()
    }

    pub fn guards(&self) -> impl Iterator<Item = &Expression> {
        self.params.iter().filter_map(|p| p.guard.as_ref())
    }
}

/// One overload: a guarded parameter list and a body
#[derive(Debug, Clone)]
pub struct Clause {
    pub params: ParamList,
    pub body: Expression,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Power,    // ^

    // Access
    Index, // .
    Range, // ..

    // Comparison
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=

    // Logical
    And, // and
    Or,  // or
}

impl BinaryOperator {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Subtract,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Caret => BinaryOperator::Power,
            TokenKind::Dot => BinaryOperator::Index,
            TokenKind::DotDot => BinaryOperator::Range,
            TokenKind::EqualEqual => BinaryOperator::Equal,
            TokenKind::NotEqual => BinaryOperator::NotEqual,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::LessEqual => BinaryOperator::LessEqual,
            TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Or => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Power => 6,
            BinaryOperator::Index | BinaryOperator::Range => 5,
            BinaryOperator::Multiply | BinaryOperator::Divide => 4,
            BinaryOperator::Add | BinaryOperator::Subtract => 3,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => 2,
            BinaryOperator::And | BinaryOperator::Or => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Index => ".",
            BinaryOperator::Range => "..",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate, // -
    Not,    // !
}
