//! XY - a small functional language with guarded overloads
//!
//! Programs are sets of top-level function declarations. A function may be
//! declared many times; each declaration adds an overload whose parameter
//! guards decide, in declaration order, which body runs for a call.
//!
//! ```
//! use xy::{State, Value};
//!
//! let mut state = State::new();
//! state.load_str("let fib(n <= 1) = n\nlet fib(n) = fib(n - 1) + fib(n - 2)")?;
//! assert_eq!(state.eval_str("fib(10)")?, Value::Number(55.0));
//! # Ok::<(), xy::Error>(())
//! ```

pub mod ast;
pub mod closure;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod function;
pub mod functions;
pub mod lexer;
pub mod list;
pub mod map;
pub mod parser;
pub mod resolver;
pub mod state;
pub mod value;

// CLI-only modules
#[cfg(feature = "cli")]
pub mod repl;

// Re-export commonly used types
pub use ast::Expression;
pub use environment::Environment;
pub use error::{Error, ErrorKind, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use state::State;
pub use value::Value;
