//! Static symbol resolution
//!
//! After a group of declarations is parsed, every clause is folded through a
//! [`SymbolLocator`]. Each parameter list, `with` block and comprehension
//! opens one scope, mirroring the frames the evaluator creates, so a name
//! found in the scope stack becomes a `(index, depth)` closure coordinate.
//! Names not found locally are bound to the global environment if a function
//! of that name exists, or left unresolved to fail when evaluated.

use std::rc::Rc;

use tracing::trace;

use crate::ast::{Clause, Expression, Param, ParamList, Resolution, WithBinding};
use crate::environment::Environment;

pub struct SymbolLocator<'env> {
    env: &'env Environment,
    scopes: Vec<Vec<String>>,
}

impl<'env> SymbolLocator<'env> {
    pub fn new(env: &'env Environment) -> Self {
        Self {
            env,
            scopes: Vec::new(),
        }
    }

    /// Find a local name, innermost scope first
    ///
    /// Within one scope the latest binding of a name wins.
    pub fn locate(&self, name: &str) -> Option<(usize, usize)> {
        if name.is_empty() {
            return None;
        }
        self.scopes
            .iter()
            .rev()
            .enumerate()
            .find_map(|(depth, scope)| {
                scope
                    .iter()
                    .rposition(|n| n == name)
                    .map(|index| (index, depth))
            })
    }

    pub fn push_param_list(&mut self, params: &ParamList) {
        self.scopes.push(params.names());
    }

    pub fn push_scope(&mut self, names: Vec<String>) {
        self.scopes.push(names);
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn resolve_clause(&mut self, clause: Clause) -> Clause {
        self.push_param_list(&clause.params);

        let params = clause
            .params
            .params
            .into_iter()
            .map(|param| Param {
                name: param.name,
                guard: param.guard.map(|guard| self.resolve(guard)),
            })
            .collect();
        let body = self.resolve(clause.body);

        self.pop();
        Clause {
            params: ParamList { params },
            body,
        }
    }

    pub fn resolve(&mut self, expr: Expression) -> Expression {
        match expr {
            Expression::Symbol {
                name,
                resolution: Resolution::Unresolved,
            } => {
                let resolution = if let Some((index, depth)) = self.locate(&name) {
                    Resolution::Local { index, depth }
                } else if self.env.find_function(&name).is_some() {
                    Resolution::Global
                } else {
                    trace!("leaving '{}' unresolved", name);
                    Resolution::Unresolved
                };
                Expression::Symbol { name, resolution }
            }
            symbol @ Expression::Symbol { .. } => symbol,
            constant @ Expression::Constant(_) => constant,

            Expression::Binary { op, left, right } => Expression::Binary {
                op,
                left: Box::new(self.resolve(*left)),
                right: Box::new(self.resolve(*right)),
            },

            Expression::Unary { op, operand } => Expression::Unary {
                op,
                operand: Box::new(self.resolve(*operand)),
            },

            Expression::Call { callee, args } => Expression::Call {
                callee: Box::new(self.resolve(*callee)),
                args: args.into_iter().map(|arg| self.resolve(arg)).collect(),
            },

            Expression::List(items) => {
                Expression::List(items.into_iter().map(|item| self.resolve(item)).collect())
            }

            Expression::Map { keys, values } => Expression::Map {
                keys,
                values: values.into_iter().map(|v| self.resolve(v)).collect(),
            },

            Expression::Comprehension {
                source,
                name,
                filter,
                map,
            } => {
                let source = Box::new(self.resolve(*source));
                self.push_scope(vec![name.clone()]);
                let filter = filter.map(|f| Box::new(self.resolve(*f)));
                let map = map.map(|m| Box::new(self.resolve(*m)));
                self.pop();
                Expression::Comprehension {
                    source,
                    name,
                    filter,
                    map,
                }
            }

            Expression::With { bindings, body } => {
                // Each binding sees the names bound before it
                self.push_scope(Vec::new());
                let mut resolved = Vec::with_capacity(bindings.len());
                for binding in bindings {
                    let value = self.resolve(binding.value);
                    if let Some(scope) = self.scopes.last_mut() {
                        scope.extend(binding.target.names().into_iter().map(String::from));
                    }
                    resolved.push(WithBinding {
                        target: binding.target,
                        value,
                    });
                }
                let body = Box::new(self.resolve(*body));
                self.pop();
                Expression::With {
                    bindings: resolved,
                    body,
                }
            }

            Expression::Lambda(clauses) => Expression::Lambda(
                clauses
                    .into_iter()
                    .map(|clause| Rc::new(self.resolve_clause(Rc::unwrap_or_clone(clause))))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;
    use crate::value::Value;

    fn param(name: &str) -> Param {
        Param {
            name: Some(name.to_string()),
            guard: None,
        }
    }

    fn resolution(expr: &Expression) -> Resolution {
        match expr {
            Expression::Symbol { resolution, .. } => *resolution,
            other => panic!("expected symbol, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_innermost_first() {
        let env = Environment::new();
        let mut locator = SymbolLocator::new(&env);
        locator.push_scope(vec!["a".into(), "b".into()]);
        locator.push_scope(vec!["b".into()]);

        assert_eq!(locator.locate("b"), Some((0, 0)));
        assert_eq!(locator.locate("a"), Some((0, 1)));
        assert_eq!(locator.locate("c"), None);
        assert_eq!(locator.locate(""), None);

        locator.pop();
        assert_eq!(locator.locate("b"), Some((1, 0)));
    }

    #[test]
    fn test_resolve_clause() {
        let mut env = Environment::new();
        env.find_or_create("g");
        let mut locator = SymbolLocator::new(&env);

        let clause = Clause {
            params: ParamList {
                params: vec![param("x"), param("y")],
            },
            body: Expression::Call {
                callee: Box::new(Expression::symbol("g")),
                args: vec![Expression::symbol("y"), Expression::symbol("z")],
            },
        };

        let resolved = locator.resolve_clause(clause);
        let Expression::Call { callee, args } = &resolved.body else {
            panic!("expected call");
        };
        assert_eq!(resolution(callee), Resolution::Global);
        assert_eq!(resolution(&args[0]), Resolution::Local { index: 1, depth: 0 });
        assert_eq!(resolution(&args[1]), Resolution::Unresolved);
        assert_eq!(locator.depth(), 0);
    }

    #[test]
    fn test_with_bindings_are_sequential() {
        let env = Environment::new();
        let mut locator = SymbolLocator::new(&env);
        locator.push_scope(vec!["n".into()]);

        let expr = Expression::With {
            bindings: vec![
                WithBinding {
                    target: crate::ast::BindingTarget::Name("a".into()),
                    value: Expression::symbol("a"),
                },
                WithBinding {
                    target: crate::ast::BindingTarget::Name("b".into()),
                    value: Expression::symbol("a"),
                },
            ],
            body: Box::new(Expression::binary(
                BinaryOperator::Add,
                Expression::symbol("b"),
                Expression::symbol("n"),
            )),
        };

        let Expression::With { bindings, body } = locator.resolve(expr) else {
            panic!("expected with");
        };
        // `a` is not visible in its own binding
        assert_eq!(resolution(&bindings[0].value), Resolution::Unresolved);
        assert_eq!(resolution(&bindings[1].value), Resolution::Local { index: 0, depth: 0 });
        let Expression::Binary { left, right, .. } = *body else {
            panic!("expected binary");
        };
        assert_eq!(resolution(&left), Resolution::Local { index: 1, depth: 0 });
        assert_eq!(resolution(&right), Resolution::Local { index: 0, depth: 1 });
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let env = Environment::new();
        let mut locator = SymbolLocator::new(&env);
        locator.push_scope(vec!["x".into()]);

        let once = locator.resolve(Expression::List(vec![
            Expression::symbol("x"),
            Expression::Constant(Value::Number(1.0)),
        ]));
        locator.push_scope(vec!["x".into()]);
        let twice = locator.resolve(once.clone());

        let (Expression::List(a), Expression::List(b)) = (once, twice) else {
            panic!("expected lists");
        };
        assert_eq!(resolution(&a[0]), resolution(&b[0]));
        assert_eq!(resolution(&b[0]), Resolution::Local { index: 0, depth: 0 });
    }
}
