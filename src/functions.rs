//! Built-in functions for XY
//!
//! Natives are plain `fn` handlers registered by name into an
//! [`Environment`]. Each handler validates its arguments with
//! [`ArgumentList::check`] before touching them.

use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::function::ArgumentList;
use crate::value::{Value, ValueType};

/// Register every built-in function
pub fn register_natives(env: &mut Environment) {
    // Math
    env.add_native("sqrt", fn_sqrt);
    env.add_native("log", fn_log);
    env.add_native("sin", fn_sin);
    env.add_native("cos", fn_cos);
    env.add_native("tan", fn_tan);
    env.add_native("floor", fn_floor);

    // Collections
    env.add_native("foldl", fn_foldl);
    env.add_native("map", fn_map);
    env.add_native("filter", fn_filter);
    env.add_native("len", fn_len);

    // Strings and diagnostics
    env.add_native("str", fn_str);
    env.add_native("print", fn_print);
    env.add_native("die", fn_die);
    env.add_native("catch", fn_catch);
}

fn number_arg(args: &ArgumentList, name: &str) -> Result<f64> {
    args.check(name, &[ValueType::Number])?;
    match args.get(0) {
        Value::Number(n) => Ok(*n),
        _ => Ok(f64::NAN),
    }
}

fn fn_sqrt(args: &ArgumentList, _: &Environment) -> Result<Value> {
    Ok(Value::Number(number_arg(args, "sqrt")?.sqrt()))
}

fn fn_log(args: &ArgumentList, _: &Environment) -> Result<Value> {
    Ok(Value::Number(number_arg(args, "log")?.ln()))
}

fn fn_sin(args: &ArgumentList, _: &Environment) -> Result<Value> {
    Ok(Value::Number(number_arg(args, "sin")?.sin()))
}

fn fn_cos(args: &ArgumentList, _: &Environment) -> Result<Value> {
    Ok(Value::Number(number_arg(args, "cos")?.cos()))
}

fn fn_tan(args: &ArgumentList, _: &Environment) -> Result<Value> {
    Ok(Value::Number(number_arg(args, "tan")?.tan()))
}

fn fn_floor(args: &ArgumentList, _: &Environment) -> Result<Value> {
    Ok(Value::Number(number_arg(args, "floor")?.floor()))
}

/// `foldl(f, z, xs)` is `f(...f(f(z, x0), x1)..., xn)`
///
/// A string folds over its characters as one-character strings.
fn fn_foldl(args: &ArgumentList, env: &Environment) -> Result<Value> {
    let over_string = [ValueType::Function, ValueType::Any, ValueType::String];
    let items: Vec<Value> = match args.get(2) {
        Value::String(s) if args.matches(&over_string) => {
            s.chars().map(|c| Value::String(c.to_string())).collect()
        }
        _ => {
            args.check("foldl", &[ValueType::Function, ValueType::Any, ValueType::List])?;
            match args.get(2) {
                Value::List(xs) => xs.to_vec(),
                _ => Vec::new(),
            }
        }
    };
    let Value::Function(f) = args.get(0) else {
        return Ok(Value::Void);
    };

    let evaluator = Evaluator::new(env);
    let mut acc = args.get(1).clone();
    for x in items {
        acc = evaluator.invoke(f, ArgumentList::new(vec![acc, x]))?;
    }
    Ok(acc)
}

fn fn_map(args: &ArgumentList, env: &Environment) -> Result<Value> {
    args.check("map", &[ValueType::Function, ValueType::List])?;
    let (Value::Function(f), Value::List(xs)) = (args.get(0), args.get(1)) else {
        return Ok(Value::Void);
    };

    let evaluator = Evaluator::new(env);
    let values = xs
        .iter()
        .map(|x| evaluator.invoke(f, ArgumentList::new(vec![x])))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::list(values))
}

fn fn_filter(args: &ArgumentList, env: &Environment) -> Result<Value> {
    args.check("filter", &[ValueType::Function, ValueType::List])?;
    let (Value::Function(f), Value::List(xs)) = (args.get(0), args.get(1)) else {
        return Ok(Value::Void);
    };

    let evaluator = Evaluator::new(env);
    let mut values = Vec::new();
    for x in xs.iter() {
        if evaluator
            .invoke(f, ArgumentList::new(vec![x.clone()]))?
            .condition()
        {
            values.push(x);
        }
    }
    Ok(Value::list(values))
}

fn fn_len(args: &ArgumentList, _: &Environment) -> Result<Value> {
    let len = match args.values() {
        [Value::List(list)] => list.size(),
        [Value::String(s)] => s.chars().count(),
        [Value::Map(map)] => map.len(),
        _ => {
            args.check("len", &[ValueType::List])?;
            0
        }
    };
    Ok(Value::Number(len as f64))
}

fn fn_str(args: &ArgumentList, _: &Environment) -> Result<Value> {
    args.check("str", &[ValueType::Any])?;
    Ok(Value::String(args.get(0).to_string()))
}

/// Print every argument on one line; evaluates to its last argument
fn fn_print(args: &ArgumentList, _: &Environment) -> Result<Value> {
    let line: Vec<String> = args.values().iter().map(Value::to_string).collect();
    println!("{}", line.join(" "));
    Ok(args.values().last().cloned().unwrap_or_default())
}

fn fn_die(args: &ArgumentList, _: &Environment) -> Result<Value> {
    args.check("die", &[ValueType::Any])?;
    Err(Error::runtime(args.get(0).to_string()))
}

/// `catch(f, handler)` calls `f()`; if it fails, `handler(message)` instead
fn fn_catch(args: &ArgumentList, env: &Environment) -> Result<Value> {
    args.check("catch", &[ValueType::Function, ValueType::Function])?;
    let (Value::Function(body), Value::Function(handler)) = (args.get(0), args.get(1)) else {
        return Ok(Value::Void);
    };

    let evaluator = Evaluator::new(env);
    match evaluator.invoke(body, ArgumentList::default()) {
        Ok(value) => Ok(value),
        Err(error) => {
            let message = Value::String(error.message);
            evaluator.invoke(handler, ArgumentList::new(vec![message]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closure::Closure;
    use crate::error::ErrorKind;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn eval(source: &str) -> Result<Value> {
        let mut env = Environment::new();
        register_natives(&mut env);
        let expr = Parser::new(source, None)?.parse_standalone(&env)?;
        Evaluator::new(&env).eval(&expr, &Closure::with_size(0, None))
    }

    #[test]
    fn test_math() {
        assert_eq!(eval("sqrt(16)").unwrap(), Value::Number(4.0));
        assert_eq!(eval("floor(2.7)").unwrap(), Value::Number(2.0));
        assert_eq!(eval("log(1)").unwrap(), Value::Number(0.0));
        assert_eq!(eval("sin(0) + cos(0) + tan(0)").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_argument_errors() {
        let err = eval("sqrt(\"x\")").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert_eq!(err.message, "Invalid argument #1 to 'sqrt', expected number");

        let err = eval("foldl(`+, 0)").unwrap_err();
        assert_eq!(err.message, "Invalid argument #3 to 'foldl', expected list");
    }

    #[test]
    fn test_foldl() {
        assert_eq!(eval("foldl(`+, 0, [1, 2, 3, 4])").unwrap(), Value::Number(10.0));
        assert_eq!(
            eval("foldl(@(acc, x) = [x] + acc, [], [1, 2, 3])").unwrap().to_string(),
            "[3, 2, 1]"
        );
    }

    #[test]
    fn test_foldl_over_strings() {
        assert_eq!(
            eval("foldl(@(acc, c) = c + acc, \"\", \"abc\")").unwrap(),
            Value::string("cba")
        );
        assert_eq!(eval("foldl(`+, 0, \"\")").unwrap(), Value::Number(0.0));
        let err = eval("foldl(`+, 0, 5)").unwrap_err();
        assert_eq!(err.message, "Invalid argument #3 to 'foldl', expected list");
    }

    #[test]
    fn test_map_filter_len() {
        assert_eq!(eval("map(&* 2, [1, 2, 3])").unwrap().to_string(), "[2, 4, 6]");
        assert_eq!(eval("filter(&> 1, [1, 2, 3])").unwrap().to_string(), "[2, 3]");
        assert_eq!(eval("len([1, 2, 3])").unwrap(), Value::Number(3.0));
        assert_eq!(eval("len(\"four\")").unwrap(), Value::Number(4.0));
        assert!(eval("len(1)").is_err());
    }

    #[test]
    fn test_catch_turns_errors_into_strings() {
        assert_eq!(
            eval("catch(@() = 1 / 0, @(message) = message)").unwrap(),
            Value::string("Division by zero")
        );
        assert_eq!(
            eval("catch(@() = die(\"boom\"), @(m) = \"caught \" + m)").unwrap(),
            Value::string("caught boom")
        );
        assert_eq!(eval("catch(@() = 7, @(m) = 0)").unwrap(), Value::Number(7.0));
    }

    #[test]
    fn test_str() {
        assert_eq!(eval("str([1, true])").unwrap(), Value::string("[1, true]"));
    }
}
