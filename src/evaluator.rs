//! Evaluator for XY expressions
//!
//! Expressions are evaluated against a frame ([`Closure`]) and the global
//! [`Environment`]. Soft functions are applied by [`Evaluator::invoke`],
//! which selects the first overload whose arity and guards accept the
//! arguments. A call in tail position whose callee is the function being
//! applied does not recurse: it hands its arguments back to the dispatch
//! loop, which rebinds a fresh frame and tries the overloads again.

use std::rc::Rc;

use tracing::trace;

use crate::ast::{BinaryOperator, BindingTarget, Clause, Expression, Resolution, WithBinding};
use crate::closure::Closure;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::function::{ArgumentList, Function};
use crate::list::List;
use crate::map::{hash_key, Map};
use crate::value::Value;

/// Outcome of evaluating an expression in tail position
enum Flow {
    Value(Value),
    /// Re-enter the current function with these arguments
    Tail(ArgumentList),
}

pub struct Evaluator<'env> {
    env: &'env Environment,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env Environment) -> Self {
        Self { env }
    }

    pub fn eval(&self, expr: &Expression, frame: &Rc<Closure>) -> Result<Value> {
        match expr {
            Expression::Constant(value) => Ok(value.clone()),

            Expression::Symbol { name, resolution } => match resolution {
                Resolution::Local { index, depth } => Ok(frame.get(*index, *depth)),
                Resolution::Global => Ok(self
                    .env
                    .find_function(name)
                    .map(Value::Function)
                    .unwrap_or(Value::Void)),
                Resolution::Unresolved => Err(Error::resolution(format!(
                    "Use of unresolved symbol '{}'",
                    name
                ))),
            },

            Expression::Binary { op, left, right } => {
                let left = self.eval(left, frame)?;
                match op {
                    BinaryOperator::And if !left.condition() => Ok(left),
                    BinaryOperator::Or if left.condition() => Ok(left),
                    BinaryOperator::And | BinaryOperator::Or => self.eval(right, frame),
                    _ => {
                        let right = self.eval(right, frame)?;
                        left.apply_operator(*op, &right)
                    }
                }
            }

            Expression::Unary { op, operand } => self.eval(operand, frame)?.apply_unary(*op),

            Expression::Call { callee, args } => {
                let callee = self.eval(callee, frame)?;
                let args = self.eval_args(args, frame)?;
                self.call(&callee, args)
            }

            Expression::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, frame))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::list(values))
            }

            Expression::Map { keys, values } => {
                let mut hashes: Vec<u64> = Vec::with_capacity(keys.len());
                let mut evaluated: Vec<Value> = Vec::with_capacity(values.len());
                for (key, expr) in keys.iter().zip(values) {
                    let hash = hash_key(key);
                    let value = self.eval(expr, frame)?;
                    match hashes.iter().position(|h| *h == hash) {
                        Some(i) => evaluated[i] = value,
                        None => {
                            hashes.push(hash);
                            evaluated.push(value);
                        }
                    }
                }
                Ok(Value::Map(Map::create(hashes, evaluated)))
            }

            Expression::Comprehension {
                source,
                filter,
                map,
                ..
            } => {
                let source = match self.eval(source, frame)? {
                    Value::List(list) => list,
                    other => {
                        return Err(Error::type_error(format!(
                            "Cannot iterate over value of type {}",
                            other.value_type()
                        )))
                    }
                };

                // One frame, rebound for every element
                let inner = Closure::with_size(1, Some(Rc::clone(frame)));
                let mut results = Vec::new();
                for item in source.iter() {
                    inner.set(0, item.clone());
                    if let Some(filter) = filter {
                        if !self.eval(filter, &inner)?.condition() {
                            continue;
                        }
                    }
                    results.push(match map {
                        Some(map) => self.eval(map, &inner)?,
                        None => item,
                    });
                }
                Ok(Value::list(results))
            }

            Expression::With { bindings, body } => {
                let inner = self.bind(bindings, frame)?;
                self.eval(body, &inner)
            }

            Expression::Lambda(clauses) => Ok(Value::Function(Rc::new(Function::lambda(
                clauses.clone(),
                Rc::clone(frame),
            )))),
        }
    }

    /// Evaluate the body of `current`, turning self calls into [`Flow::Tail`]
    fn eval_tail(
        &self,
        expr: &Expression,
        frame: &Rc<Closure>,
        current: &Rc<Function>,
    ) -> Result<Flow> {
        match expr {
            Expression::Call { callee, args } => {
                let callee = self.eval(callee, frame)?;
                let args = self.eval_args(args, frame)?;
                if let Value::Function(function) = &callee {
                    if Rc::ptr_eq(function, current) {
                        return Ok(Flow::Tail(args));
                    }
                }
                self.call(&callee, args).map(Flow::Value)
            }

            Expression::Binary {
                op: op @ (BinaryOperator::And | BinaryOperator::Or),
                left,
                right,
            } => {
                let left = self.eval(left, frame)?;
                let decided = match op {
                    BinaryOperator::And => !left.condition(),
                    _ => left.condition(),
                };
                if decided {
                    Ok(Flow::Value(left))
                } else {
                    self.eval_tail(right, frame, current)
                }
            }

            Expression::With { bindings, body } => {
                let inner = self.bind(bindings, frame)?;
                self.eval_tail(body, &inner, current)
            }

            other => self.eval(other, frame).map(Flow::Value),
        }
    }

    fn eval_args(&self, args: &[Expression], frame: &Rc<Closure>) -> Result<ArgumentList> {
        let values = args
            .iter()
            .map(|arg| self.eval(arg, frame))
            .collect::<Result<Vec<_>>>()?;
        Ok(ArgumentList::new(values))
    }

    /// Build the frame of a `with` block
    fn bind(&self, bindings: &[WithBinding], frame: &Rc<Closure>) -> Result<Rc<Closure>> {
        let size = bindings.iter().map(|b| b.target.names().len()).sum();
        let inner = Closure::with_size(size, Some(Rc::clone(frame)));

        let mut slot = 0;
        for binding in bindings {
            let value = self.eval(&binding.value, &inner)?;
            match &binding.target {
                BindingTarget::Name(_) => {
                    inner.set(slot, value);
                    slot += 1;
                }
                BindingTarget::Destructure { names, variadic } => {
                    let Value::List(list) = value else {
                        return Err(Error::type_error(format!(
                            "Cannot destructure value of type {}",
                            value.value_type()
                        )));
                    };
                    let fixed = if *variadic { names.len() - 1 } else { names.len() };
                    for i in 0..fixed {
                        inner.set(slot, list.get(i));
                        slot += 1;
                    }
                    if *variadic {
                        let rest = List::sublist(&list, fixed, list.size());
                        inner.set(slot, Value::List(rest));
                        slot += 1;
                    }
                }
            }
        }
        Ok(inner)
    }

    /// Apply any callable value
    pub fn call(&self, callee: &Value, args: ArgumentList) -> Result<Value> {
        match callee {
            Value::Function(function) => self.invoke(function, args),
            Value::Number(n) => match args.values() {
                [Value::Number(m)] => Ok(Value::Number(n * m)),
                _ => Err(Error::type_error(
                    "A number can only be applied to a single number",
                )),
            },
            other => Err(Error::runtime(format!(
                "Value of type {} is not callable",
                other.value_type()
            ))),
        }
    }

    /// Apply a function, looping on tail calls
    pub fn invoke(&self, function: &Rc<Function>, args: ArgumentList) -> Result<Value> {
        let (overloads, captured) = match &**function {
            Function::Native { handler, .. } => return handler(&args, self.env),
            Function::Soft {
                overloads,
                captured,
                ..
            } => (overloads, captured),
        };

        let mut args = args;
        loop {
            let frame = Closure::new(args.into_values(), captured.clone());
            let clause = self.select(function, &overloads.borrow(), &frame)?;

            match self.eval_tail(&clause.body, &frame, function)? {
                Flow::Value(value) => return Ok(value),
                Flow::Tail(next) => {
                    trace!("tail call into {}", describe(function));
                    args = next;
                }
            }
        }
    }

    /// First overload whose arity matches and whose guards all hold
    fn select(
        &self,
        function: &Function,
        overloads: &[Rc<Clause>],
        frame: &Rc<Closure>,
    ) -> Result<Rc<Clause>> {
        let arity = frame.len();
        for (i, clause) in overloads.iter().enumerate() {
            if clause.params.len() != arity {
                continue;
            }
            let mut accepted = true;
            for guard in clause.params.guards() {
                if !self.eval(guard, frame)?.condition() {
                    accepted = false;
                    break;
                }
            }
            if accepted {
                trace!("{} selected overload #{}", describe(function), i + 1);
                return Ok(Rc::clone(clause));
            }
        }

        Err(Error::dispatch(format!(
            "No suitable overload for {} found",
            describe(function)
        )))
    }
}

fn describe(function: &Function) -> String {
    match function.name() {
        Some(name) => format!("function '{}'", name),
        None => "lambda function".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::Parser;

    fn env_with(source: &str) -> Environment {
        let mut env = Environment::new();
        let mut parser = Parser::new(source, None).unwrap();
        while parser.parse_statement(&mut env).unwrap().is_some() {}
        env
    }

    fn eval_in(env: &Environment, source: &str) -> Result<Value> {
        let expr = Parser::new(source, None)?.parse_standalone(env)?;
        Evaluator::new(env).eval(&expr, &Closure::with_size(0, None))
    }

    fn eval(source: &str) -> Result<Value> {
        eval_in(&Environment::new(), source)
    }

    fn number(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), number(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), number(9.0));
        assert_eq!(eval("2 ^ 10").unwrap(), number(1024.0));
        assert_eq!(eval("-3 + 1").unwrap(), number(-2.0));
    }

    #[test]
    fn test_short_circuit() {
        // the right operand would fail if evaluated
        assert_eq!(eval("false and missing").unwrap(), Value::Bool(false));
        assert_eq!(eval("1 or missing").unwrap(), number(1.0));
        assert_eq!(eval("0 or 5").unwrap(), number(5.0));

        let err = eval("true and missing").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Resolution);
        assert_eq!(err.message, "Use of unresolved symbol 'missing'");
    }

    #[test]
    fn test_numbers_are_callable() {
        assert_eq!(eval("3(4)").unwrap(), number(12.0));
        let err = eval("\"s\"(1)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Runtime);
        assert_eq!(err.message, "Value of type string is not callable");
    }

    #[test]
    fn test_lambdas_capture_their_frame() {
        assert_eq!(eval("(@(x) = @(y) = x - y)(10)(3)").unwrap(), number(7.0));
        assert_eq!(eval("`*(6, 7)").unwrap(), number(42.0));
        assert_eq!(eval("(&- 1)(5)").unwrap(), number(4.0));
        assert_eq!(eval("4 -> @(x) = x * x").unwrap(), number(16.0));
    }

    #[test]
    fn test_with_blocks() {
        assert_eq!(eval("with (a = 2, b = a * 3) = a + b").unwrap(), number(8.0));
        assert_eq!(
            eval("with ([h, t..] = [1, 2, 3]) = t").unwrap(),
            Value::list(vec![number(2.0), number(3.0)])
        );
        assert_eq!(eval("with ([a, b] = [1]) = b").unwrap(), Value::Void);
        assert!(eval("with ([a] = 1) = a").is_err());
    }

    #[test]
    fn test_comprehension() {
        let result = eval("[-1, 2, -3, 4] $ x : x > 0 = x * x").unwrap();
        assert_eq!(result, Value::list(vec![number(4.0), number(16.0)]));
        assert_eq!(eval("(0..4) $ i").unwrap(), eval("[0, 1, 2, 3]").unwrap());
        assert!(eval("5 $ x").is_err());
    }

    #[test]
    fn test_map_literal_and_index() {
        assert_eq!(eval("{ a: 1, b: 2 }.\"b\"").unwrap(), number(2.0));
        assert_eq!(eval("{ a: 1, a: 3 }.\"a\"").unwrap(), number(3.0));
        assert_eq!(eval("({ a: 1 } + { a: 5 }).\"a\"").unwrap(), number(5.0));
        assert_eq!(eval("{ a: 1 }.\"zzz\"").unwrap(), Value::Void);
    }

    #[test]
    fn test_dispatch_order() {
        let env = env_with("let f(x: x > 0) = \"positive\"\nlet f(x) = \"other\"");
        assert_eq!(eval_in(&env, "f(1)").unwrap(), Value::string("positive"));
        assert_eq!(eval_in(&env, "f(0)").unwrap(), Value::string("other"));

        let reordered = env_with("let f(x) = \"other\"\nlet f(x: x > 0) = \"positive\"");
        assert_eq!(eval_in(&reordered, "f(1)").unwrap(), Value::string("other"));
    }

    #[test]
    fn test_dispatch_by_arity_and_pattern() {
        let env = env_with("let g(0) = \"zero\"\nlet g(x) = \"one\"\nlet g(x, y) = \"two\"");
        assert_eq!(eval_in(&env, "g(0)").unwrap(), Value::string("zero"));
        assert_eq!(eval_in(&env, "g(5)").unwrap(), Value::string("one"));
        assert_eq!(eval_in(&env, "g(5, 6)").unwrap(), Value::string("two"));

        let err = eval_in(&env, "g(1, 2, 3)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Dispatch);
        assert_eq!(err.message, "No suitable overload for function 'g' found");

        let err = eval("(@(x: x > 1) = x)(0)").unwrap_err();
        assert_eq!(err.message, "No suitable overload for lambda function found");
    }

    #[test]
    fn test_guard_error_aborts_dispatch() {
        let env = env_with("let h(x: x < 3) = 1\nlet h(x) = 2");
        let err = eval_in(&env, "h(\"a\")").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_tail_calls_do_not_grow_the_stack() {
        let env = env_with(
            "let count(0, acc) = acc\nlet count(n, acc) = count(n - 1, acc + 1)",
        );
        assert_eq!(eval_in(&env, "count(200000, 0)").unwrap(), number(200000.0));

        let env = env_with(
            "let loop(n) = n <= 0 or with (m = n - 1) = loop(m)",
        );
        assert_eq!(eval_in(&env, "loop(200000)").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_recursion() {
        let env = env_with("let fib(n: n <= 1) = n\nlet fib(n) = fib(n - 1) + fib(n - 2)");
        assert_eq!(eval_in(&env, "fib(10)").unwrap(), number(55.0));
    }
}
