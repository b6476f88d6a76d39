//! Recursive descent parser for XY
//!
//! The parser pulls tokens from the [`Lexer`] with one token of lookahead.
//! Top-level input is a sequence of declaration groups separated by `use`
//! statements. Each `let` registers its function in the [`Environment`] as
//! soon as its name is read, so that every clause of a group can refer to
//! every function of the group. When the group ends its clauses are resolved
//! and committed as overloads.
//!
//! Binary expressions are parsed with a shunting-yard over the precedence
//! table in [`BinaryOperator::precedence`]; all operators are
//! left-associative.

use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{
    BinaryOperator, BindingTarget, Clause, Expression, Param, ParamList, UnaryOperator,
    WithBinding,
};
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::function::Function;
use crate::lexer::{Lexer, SourcePosition, Token, TokenKind};
use crate::resolver::SymbolLocator;
use crate::value::Value;

/// A parsed, not yet resolved `let` declaration
struct Declaration {
    function: Rc<Function>,
    clause: Clause,
}

/// One top-level step of a program
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A group of `let` declarations, already resolved and committed
    Declarations { count: usize },
    /// `use "path"`
    Use {
        path: String,
        position: SourcePosition,
    },
}

pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(source: &str, file: Option<Arc<str>>) -> Result<Self> {
        Ok(Self {
            lexer: Lexer::new(source, file)?,
        })
    }

    /// Parse the next top-level statement, or `None` at end of input
    pub fn parse_statement(&mut self, env: &mut Environment) -> Result<Option<Statement>> {
        match self.current().kind {
            TokenKind::Eof => Ok(None),
            TokenKind::Use => self.parse_use().map(Some),
            TokenKind::Let => self.parse_group(env).map(Some),
            _ => Err(self.unexpected("'let' or 'use'")),
        }
    }

    /// Parse a single expression spanning the whole input
    pub fn parse_standalone(&mut self, env: &Environment) -> Result<Expression> {
        let expr = self.parse_expression()?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.unexpected("end of input"));
        }
        Ok(SymbolLocator::new(env).resolve(expr))
    }

    fn parse_use(&mut self) -> Result<Statement> {
        let position = self.current().position.clone();
        self.expect(&TokenKind::Use)?;
        match self.advance()?.kind {
            TokenKind::String(path) => Ok(Statement::Use { path, position }),
            other => Err(Error::syntax(
                position,
                format!("Expected file name after 'use', got {}", other),
            )),
        }
    }

    fn parse_group(&mut self, env: &mut Environment) -> Result<Statement> {
        // Functions first named by a group that fails to parse are forgotten
        let mark = env.functions().len();
        let mut declarations = Vec::new();
        while self.check(&TokenKind::Let) {
            match self.parse_declaration(env) {
                Ok(declaration) => declarations.push(declaration),
                Err(error) => {
                    env.truncate(mark);
                    return Err(error);
                }
            }
        }

        let count = declarations.len();
        let mut locator = SymbolLocator::new(env);
        let resolved: Vec<_> = declarations
            .into_iter()
            .map(|d| (d.function, locator.resolve_clause(d.clause)))
            .collect();
        for (function, clause) in resolved {
            function.add_overload(Rc::new(clause))?;
        }

        debug!("resolved declaration group of {} clause(s)", count);
        Ok(Statement::Declarations { count })
    }

    fn parse_declaration(&mut self, env: &mut Environment) -> Result<Declaration> {
        self.expect(&TokenKind::Let)?;
        let position = self.current().position.clone();
        let name = self.expect_symbol()?;

        let function = env.find_or_create(&name).ok_or_else(|| {
            Error::syntax(
                position,
                format!("Cannot overload native function '{}'", name),
            )
        })?;

        let clause = self.parse_function()?;
        Ok(Declaration { function, clause })
    }

    /// `(params) = body`
    fn parse_function(&mut self) -> Result<Clause> {
        self.expect(&TokenKind::LeftParen)?;
        let mut params = ParamList::default();

        while !self.check(&TokenKind::RightParen) {
            let position = self.current().position.clone();
            let param = self.parse_param(params.len())?;

            if let Some(name) = &param.name {
                if params.params.iter().any(|p| p.name.as_ref() == Some(name)) {
                    return Err(Error::syntax(
                        position,
                        format!("Parameter '{}' already declared", name),
                    ));
                }
            }
            params.params.push(param);

            match self.current().kind {
                TokenKind::Comma => {
                    self.advance()?;
                }
                TokenKind::RightParen => break,
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }

        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::Equal)?;
        let body = self.parse_expression()?;
        Ok(Clause { params, body })
    }

    fn parse_param(&mut self, index: usize) -> Result<Param> {
        if let TokenKind::Symbol(name) = &self.current().kind {
            let name = name.clone();
            self.advance()?;

            // name: guard
            if self.check(&TokenKind::Colon) {
                self.advance()?;
                let guard = self.parse_expression()?;
                return Ok(Param {
                    name: Some(name),
                    guard: Some(guard),
                });
            }

            // name <op> operand
            if let Some(op) = BinaryOperator::from_token(&self.current().kind) {
                self.advance()?;
                let operand = self.parse_single_expression()?;
                let guard = Expression::binary(op, Expression::symbol(name.clone()), operand);
                return Ok(Param {
                    name: Some(name),
                    guard: Some(guard),
                });
            }

            return Ok(Param {
                name: Some(name),
                guard: None,
            });
        }

        // A pattern matches by equality against an anonymous slot
        let pattern = self.parse_expression()?;
        Ok(Param {
            name: None,
            guard: Some(Expression::binary(
                BinaryOperator::Equal,
                Expression::local(index),
                pattern,
            )),
        })
    }

    /// A full expression: operands joined by binary operators, optionally
    /// followed by a comprehension
    pub fn parse_expression(&mut self) -> Result<Expression> {
        let first = self.parse_single_expression()?;

        let mut operands = vec![first];
        let mut operators: Vec<BinaryOperator> = Vec::new();

        while let Some(op) = BinaryOperator::from_token(&self.current().kind) {
            self.advance()?;
            while operators
                .last()
                .is_some_and(|top| top.precedence() >= op.precedence())
            {
                reduce(&mut operands, &mut operators);
            }
            operators.push(op);
            operands.push(self.parse_single_expression()?);
        }
        while !operators.is_empty() {
            reduce(&mut operands, &mut operators);
        }

        let expr = operands.pop().unwrap_or(Expression::Constant(Value::Void));
        if self.check(&TokenKind::Dollar) {
            return self.parse_comprehension(expr);
        }
        Ok(expr)
    }

    /// `source $ name : filter = map`
    fn parse_comprehension(&mut self, source: Expression) -> Result<Expression> {
        self.expect(&TokenKind::Dollar)?;
        let name = self.expect_symbol()?;

        let filter = if self.check(&TokenKind::Colon) {
            self.advance()?;
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        let map = if self.check(&TokenKind::Equal) {
            self.advance()?;
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(Expression::Comprehension {
            source: Box::new(source),
            name,
            filter,
            map,
        })
    }

    /// A primary expression followed by any call or pipe suffixes
    fn parse_single_expression(&mut self) -> Result<Expression> {
        let primary = self.parse_primary()?;
        self.parse_prologue(primary)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let expr = match self.current().kind.clone() {
            TokenKind::Number(n) => {
                self.advance()?;
                Expression::Constant(Value::Number(n))
            }
            TokenKind::String(s) => {
                self.advance()?;
                Expression::Constant(Value::String(s))
            }
            TokenKind::True => {
                self.advance()?;
                Expression::Constant(Value::Bool(true))
            }
            TokenKind::False => {
                self.advance()?;
                Expression::Constant(Value::Bool(false))
            }
            TokenKind::Symbol(name) => {
                self.advance()?;
                Expression::symbol(name)
            }
            TokenKind::LeftParen => {
                self.advance()?;
                if self.check(&TokenKind::RightParen) {
                    self.advance()?;
                    return Ok(Expression::Constant(Value::Void));
                }
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RightParen)?;
                inner
            }
            TokenKind::LeftBracket => self.parse_list()?,
            TokenKind::LeftBrace => self.parse_map()?,
            TokenKind::At => self.parse_lambda()?,
            TokenKind::Backtick => self.parse_operator_lambda()?,
            TokenKind::Ampersand => self.parse_partial_lambda()?,
            TokenKind::With => self.parse_with()?,
            TokenKind::Minus => self.parse_unary(UnaryOperator::Negate)?,
            TokenKind::Bang => self.parse_unary(UnaryOperator::Not)?,
            _ => return Err(self.unexpected("expression")),
        };
        Ok(expr)
    }

    fn parse_unary(&mut self, op: UnaryOperator) -> Result<Expression> {
        self.advance()?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(self.parse_single_expression()?),
        })
    }

    /// Call arguments `(a, b)` and pipes `x -> f`, repeated
    fn parse_prologue(&mut self, mut expr: Expression) -> Result<Expression> {
        loop {
            match self.current().kind {
                TokenKind::LeftParen => {
                    self.advance()?;
                    let args = self.parse_sequence(&TokenKind::RightParen)?;
                    expr = Expression::Call {
                        callee: Box::new(expr),
                        args,
                    };
                }
                TokenKind::Arrow => {
                    self.advance()?;
                    let callee = self.parse_primary()?;
                    expr = Expression::Call {
                        callee: Box::new(callee),
                        args: vec![expr],
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to and including `close`
    fn parse_sequence(&mut self, close: &TokenKind) -> Result<Vec<Expression>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.parse_expression()?);
            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else if !self.check(close) {
                return Err(self.unexpected(&format!("',' or {}", close)));
            }
        }
        self.advance()?;
        Ok(items)
    }

    fn parse_list(&mut self) -> Result<Expression> {
        self.expect(&TokenKind::LeftBracket)?;
        let items = self.parse_sequence(&TokenKind::RightBracket)?;
        Ok(Expression::List(items))
    }

    /// `{ key: value, "key": value }`
    fn parse_map(&mut self) -> Result<Expression> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut keys = Vec::new();
        let mut values = Vec::new();

        while !self.check(&TokenKind::RightBrace) {
            let key = match &self.current().kind {
                TokenKind::Symbol(key) | TokenKind::String(key) => key.clone(),
                _ => return Err(self.unexpected("map key")),
            };
            self.advance()?;
            self.expect(&TokenKind::Colon)?;
            keys.push(key);
            values.push(self.parse_expression()?);

            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else if !self.check(&TokenKind::RightBrace) {
                return Err(self.unexpected("',' or '}'"));
            }
        }
        self.advance()?;
        Ok(Expression::Map { keys, values })
    }

    /// `@(params) = body` or `@{ let (params) = body ... }`
    fn parse_lambda(&mut self) -> Result<Expression> {
        self.expect(&TokenKind::At)?;
        let mut clauses = Vec::new();

        if self.check(&TokenKind::LeftParen) {
            clauses.push(Rc::new(self.parse_function()?));
        } else {
            self.expect(&TokenKind::LeftBrace)?;
            while !self.check(&TokenKind::RightBrace) {
                self.expect(&TokenKind::Let)?;
                clauses.push(Rc::new(self.parse_function()?));
            }
            self.advance()?;
        }

        Ok(Expression::Lambda(clauses))
    }

    /// `` `op `` is the two-argument lambda applying `op`
    fn parse_operator_lambda(&mut self) -> Result<Expression> {
        self.expect(&TokenKind::Backtick)?;
        let op = self.expect_operator()?;

        let anonymous = || Param {
            name: None,
            guard: None,
        };
        Ok(Expression::Lambda(vec![Rc::new(Clause {
            params: ParamList {
                params: vec![anonymous(), anonymous()],
            },
            body: Expression::binary(op, Expression::local(0), Expression::local(1)),
        })]))
    }

    /// `&op operand` is the one-argument lambda `arg op operand`
    fn parse_partial_lambda(&mut self) -> Result<Expression> {
        self.expect(&TokenKind::Ampersand)?;
        let op = self.expect_operator()?;
        let operand = self.parse_single_expression()?;

        Ok(Expression::Lambda(vec![Rc::new(Clause {
            params: ParamList {
                params: vec![Param {
                    name: None,
                    guard: None,
                }],
            },
            body: Expression::binary(op, Expression::local(0), operand),
        })]))
    }

    /// `with (a = x, [h, t..] = xs) = body`
    fn parse_with(&mut self) -> Result<Expression> {
        self.expect(&TokenKind::With)?;
        self.expect(&TokenKind::LeftParen)?;

        let mut bindings = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            let target = self.parse_binding_target()?;
            self.expect(&TokenKind::Equal)?;
            let value = self.parse_expression()?;
            bindings.push(WithBinding { target, value });

            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else if !self.check(&TokenKind::RightParen) {
                return Err(self.unexpected("',' or ')'"));
            }
        }
        self.advance()?;

        self.expect(&TokenKind::Equal)?;
        let body = self.parse_expression()?;
        Ok(Expression::With {
            bindings,
            body: Box::new(body),
        })
    }

    fn parse_binding_target(&mut self) -> Result<BindingTarget> {
        if !self.check(&TokenKind::LeftBracket) {
            return Ok(BindingTarget::Name(self.expect_symbol()?));
        }

        self.advance()?;
        let mut names = Vec::new();
        let mut variadic = false;
        while !self.check(&TokenKind::RightBracket) {
            if variadic {
                return Err(self.unexpected("']' after variadic binding"));
            }
            names.push(self.expect_symbol()?);
            if self.check(&TokenKind::DotDot) {
                self.advance()?;
                variadic = true;
            }

            if self.check(&TokenKind::Comma) {
                self.advance()?;
            } else if !self.check(&TokenKind::RightBracket) {
                return Err(self.unexpected("',' or ']'"));
            }
        }
        self.advance()?;
        Ok(BindingTarget::Destructure { names, variadic })
    }

    // Token helpers

    fn current(&self) -> &Token {
        self.lexer.current()
    }

    /// Consume the current token and return it
    fn advance(&mut self) -> Result<Token> {
        let token = self.lexer.current().clone();
        self.lexer.advance()?;
        Ok(token)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn expect_symbol(&mut self) -> Result<String> {
        match &self.current().kind {
            TokenKind::Symbol(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.unexpected("symbol")),
        }
    }

    fn expect_operator(&mut self) -> Result<BinaryOperator> {
        match BinaryOperator::from_token(&self.current().kind) {
            Some(op) => {
                self.advance()?;
                Ok(op)
            }
            None => Err(self.unexpected("binary operator")),
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        let token = self.current();
        Error::syntax(
            token.position.clone(),
            format!("Expected {}, got {}", expected, token.kind),
        )
    }
}

fn reduce(operands: &mut Vec<Expression>, operators: &mut Vec<BinaryOperator>) {
    if let (Some(op), Some(right), Some(left)) = (operators.pop(), operands.pop(), operands.pop()) {
        operands.push(Expression::binary(op, left, right));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Resolution;
    use crate::error::ErrorKind;

    fn parse(source: &str) -> Expression {
        let env = Environment::new();
        Parser::new(source, None)
            .unwrap()
            .parse_standalone(&env)
            .unwrap()
    }

    fn parse_err(source: &str) -> Error {
        let env = Environment::new();
        match Parser::new(source, None) {
            Ok(mut parser) => parser.parse_standalone(&env).unwrap_err(),
            Err(e) => e,
        }
    }

    fn program(source: &str) -> Result<Environment> {
        let mut env = Environment::new();
        let mut parser = Parser::new(source, None)?;
        while parser.parse_statement(&mut env)?.is_some() {}
        Ok(env)
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 ^ 2  ==  1 + (2 * (3 ^ 2))
        let Expression::Binary { op, right, .. } = parse("1 + 2 * 3 ^ 2") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Add);
        let Expression::Binary { op, right, .. } = *right else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOperator::Multiply);
        assert!(matches!(*right, Expression::Binary { op: BinaryOperator::Power, .. }));
    }

    #[test]
    fn test_left_associative() {
        // 10 - 4 - 3  ==  (10 - 4) - 3
        let Expression::Binary { left, right, .. } = parse("10 - 4 - 3") else {
            panic!("expected binary");
        };
        assert!(matches!(*left, Expression::Binary { op: BinaryOperator::Subtract, .. }));
        assert!(matches!(*right, Expression::Constant(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn test_chained_calls_and_pipe() {
        let Expression::Call { callee, args } = parse("f(1)(2, 3)") else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(*callee, Expression::Call { .. }));

        let Expression::Call { callee, args } = parse("x -> g") else {
            panic!("expected call");
        };
        assert!(matches!(&*callee, Expression::Symbol { name, .. } if name == "g"));
        assert!(matches!(&args[0], Expression::Symbol { name, .. } if name == "x"));
    }

    #[test]
    fn test_comprehension() {
        let Expression::Comprehension { name, filter, map, .. } = parse("xs $ x : x > 0 = x * x")
        else {
            panic!("expected comprehension");
        };
        assert_eq!(name, "x");
        assert!(filter.is_some());
        let Some(map) = map else {
            panic!("expected map");
        };
        let Expression::Binary { left, .. } = *map else {
            panic!("expected binary");
        };
        assert!(matches!(
            *left,
            Expression::Symbol { resolution: Resolution::Local { index: 0, depth: 0 }, .. }
        ));
    }

    #[test]
    fn test_lambda_forms() {
        let Expression::Lambda(clauses) = parse("@(x, y) = x + y") else {
            panic!("expected lambda");
        };
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].params.len(), 2);

        let Expression::Lambda(clauses) = parse("@{ let (0) = 1 let (n) = n }") else {
            panic!("expected lambda");
        };
        assert_eq!(clauses.len(), 2);
        assert!(clauses[0].params.params[0].name.is_none());

        let Expression::Lambda(clauses) = parse("`+") else {
            panic!("expected lambda");
        };
        assert_eq!(clauses[0].params.len(), 2);

        let Expression::Lambda(clauses) = parse("&* 2") else {
            panic!("expected lambda");
        };
        assert_eq!(clauses[0].params.len(), 1);
    }

    #[test]
    fn test_with_and_map_literals() {
        let Expression::With { bindings, .. } = parse("with (a = 1, [h, t..] = [1, 2]) = h + a")
        else {
            panic!("expected with");
        };
        assert_eq!(bindings.len(), 2);
        assert_eq!(
            bindings[1].target,
            BindingTarget::Destructure {
                names: vec!["h".into(), "t".into()],
                variadic: true
            }
        );

        let Expression::Map { keys, values } = parse("{ a: 1, \"b c\": 2 }") else {
            panic!("expected map");
        };
        assert_eq!(keys, vec!["a".to_string(), "b c".to_string()]);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_void_and_unary() {
        assert!(matches!(parse("()"), Expression::Constant(Value::Void)));
        assert!(matches!(
            parse("-x"),
            Expression::Unary { op: UnaryOperator::Negate, .. }
        ));
        assert!(matches!(
            parse("!x"),
            Expression::Unary { op: UnaryOperator::Not, .. }
        ));
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse_err("[1, 2");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.message, "Expected ',' or ']', got end of input");

        let err = parse_err("f(1 2)");
        assert_eq!(err.message, "Expected ',' or ')', got number 2");
        assert_eq!(err.position.map(|p| p.column), Some(5));

        let err = parse_err("1 +");
        assert_eq!(err.message, "Expected expression, got end of input");
    }

    #[test]
    fn test_declarations_accumulate_overloads() {
        let env = program("let f(0) = 1\nlet f(n) = n * f(n - 1)\nlet g() = f(3)").unwrap();
        let f = env.find_function("f").unwrap();
        assert_eq!(f.overloads().map(|o| o.len()), Some(2));
        assert!(env.find_function("g").is_some());
    }

    #[test]
    fn test_failed_group_forgets_new_functions() {
        let mut env = Environment::new();
        let mut parser = Parser::new("let kept(x) = x", None).unwrap();
        while parser.parse_statement(&mut env).unwrap().is_some() {}

        let mut parser = Parser::new("let kept(0) = 0\nlet helper(x) = x\nlet oops(", None).unwrap();
        assert!(parser.parse_statement(&mut env).is_err());

        assert!(env.find_function("helper").is_none());
        assert!(env.find_function("oops").is_none());
        let kept = env.find_function("kept").unwrap();
        assert_eq!(kept.overloads().map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = program("let f(x, x) = x").err().unwrap();
        assert_eq!(err.message, "Parameter 'x' already declared");
    }

    #[test]
    fn test_param_forms() {
        let env = program("let f(a, b: b > 0, c >= 2, 7) = a").unwrap();
        let f = env.find_function("f").unwrap();
        let overloads = f.overloads().unwrap();
        let params = &overloads[0].params.params;
        assert!(params[0].guard.is_none());
        assert!(params[1].guard.is_some());
        assert!(matches!(
            &params[2].guard,
            Some(Expression::Binary { op: BinaryOperator::GreaterEqual, .. })
        ));
        assert!(params[3].name.is_none());
    }

    #[test]
    fn test_param_shorthand_takes_any_operator() {
        let env = program("let odd(n - 1) = n\nlet first(xs . 0) = xs").unwrap();
        for (name, expected) in [("odd", BinaryOperator::Subtract), ("first", BinaryOperator::Index)] {
            let f = env.find_function(name).unwrap();
            let overloads = f.overloads().unwrap();
            assert!(matches!(
                &overloads[0].params.params[0].guard,
                Some(Expression::Binary { op, .. }) if *op == expected
            ));
        }
    }

    #[test]
    fn test_statements() {
        let mut env = Environment::new();
        let mut parser = Parser::new("let a() = 1 let b() = 2 use \"lib.xy\" let c() = 3", None).unwrap();

        assert_eq!(
            parser.parse_statement(&mut env).unwrap(),
            Some(Statement::Declarations { count: 2 })
        );
        assert!(matches!(
            parser.parse_statement(&mut env).unwrap(),
            Some(Statement::Use { path, .. }) if path == "lib.xy"
        ));
        assert_eq!(
            parser.parse_statement(&mut env).unwrap(),
            Some(Statement::Declarations { count: 1 })
        );
        assert_eq!(parser.parse_statement(&mut env).unwrap(), None);
    }

    #[test]
    fn test_top_level_rejects_expressions() {
        let err = program("1 + 2").err().unwrap();
        assert_eq!(err.message, "Expected 'let' or 'use', got number 1");
    }
}
