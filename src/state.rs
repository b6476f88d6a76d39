//! Interpreter session state
//!
//! A [`State`] owns the global [`Environment`] of one program and the
//! [`ErrorHandler`] that keeps its first unrecovered error. It drives file
//! loading, including `use` resolution, and runs the program's `main`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::closure::Closure;
use crate::environment::Environment;
use crate::error::{Error, ErrorHandler, Result};
use crate::evaluator::Evaluator;
use crate::function::ArgumentList;
use crate::functions::register_natives;
use crate::parser::{Parser, Statement};
use crate::value::Value;

pub struct State {
    env: Environment,
    errors: ErrorHandler,
    included: HashSet<PathBuf>,
    sources: Vec<(Option<Arc<str>>, String)>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// A session with the built-in functions registered
    pub fn new() -> Self {
        let mut state = Self::bare();
        register_natives(&mut state.env);
        state
    }

    /// A session with an empty environment
    pub fn bare() -> Self {
        Self {
            env: Environment::new(),
            errors: ErrorHandler::new(),
            included: HashSet::new(),
            sources: Vec::new(),
        }
    }

    pub fn global(&self) -> &Environment {
        &self.env
    }

    pub fn global_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn error(&self) -> &ErrorHandler {
        &self.errors
    }

    pub fn error_mut(&mut self) -> &mut ErrorHandler {
        &mut self.errors
    }

    /// Load a source file and everything it `use`s
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let result = self.include(path);
        self.record(result)
    }

    /// Load program text that did not come from a file
    ///
    /// `use` paths are resolved against the current directory.
    pub fn load_str(&mut self, source: &str) -> Result<()> {
        let result = self.load_source(source, None, Path::new("."));
        self.record(result)
    }

    /// Evaluate one expression against the loaded program
    pub fn eval_str(&mut self, source: &str) -> Result<Value> {
        self.remember_source(None, source);
        let result = Parser::new(source, None)
            .and_then(|mut parser| parser.parse_standalone(&self.env))
            .and_then(|expr| Evaluator::new(&self.env).eval(&expr, &root_frame()));
        self.record(result)
    }

    /// Call the top-level function `name`
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value> {
        let result = match self.env.find_function(name) {
            Some(function) => Evaluator::new(&self.env).invoke(&function, ArgumentList::new(args)),
            None => Err(Error::resolution(format!("No function named '{}'", name))),
        };
        self.record(result)
    }

    /// Run `main`, if the program defines one
    ///
    /// `main` receives the script arguments as one list of strings when any
    /// are given, or when it has no zero-argument overload.
    pub fn run_main(&mut self, script_args: &[String]) -> Result<Option<Value>> {
        let Some(main) = self.env.find_function("main") else {
            return Ok(None);
        };

        let takes_nothing = main
            .overloads()
            .is_some_and(|overloads| overloads.iter().any(|c| c.params.is_empty()));

        let args = if script_args.is_empty() && takes_nothing {
            Vec::new()
        } else {
            let list = script_args.iter().map(|a| Value::string(a.as_str())).collect();
            vec![Value::list(list)]
        };

        self.call("main", args).map(Some)
    }

    /// Print the pending error, with a source excerpt when available
    pub fn dump_error(&mut self) {
        let file = self
            .errors
            .pending()
            .and_then(|e| e.position.as_ref())
            .map(|p| p.file.clone());
        let source = file.and_then(|file| {
            self.sources
                .iter()
                .rev()
                .find(|(name, _)| *name == file)
                .map(|(_, source)| source.clone())
        });
        self.errors.dump(source.as_deref());
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.errors.die(error.clone());
        }
        result
    }

    fn include(&mut self, path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            Error::runtime(format!("Cannot open file '{}': {}", path.display(), e))
        })?;
        if !self.included.insert(canonical.clone()) {
            debug!("skipping {}, already loaded", canonical.display());
            return Ok(());
        }

        let source = fs::read_to_string(&canonical).map_err(|e| {
            Error::runtime(format!("Cannot read file '{}': {}", path.display(), e))
        })?;
        debug!("loading {}", canonical.display());

        let name: Arc<str> = path.display().to_string().into();
        let base = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
        self.load_source(&source, Some(name), &base)
    }

    /// Keep a source for error excerpts; only the latest unnamed one is kept
    fn remember_source(&mut self, file: Option<Arc<str>>, source: &str) {
        if file.is_none() {
            self.sources.retain(|(name, _)| name.is_some());
        }
        self.sources.push((file, source.to_string()));
    }

    fn load_source(&mut self, source: &str, file: Option<Arc<str>>, base: &Path) -> Result<()> {
        self.remember_source(file.clone(), source);

        let mut parser = Parser::new(source, file)?;
        while let Some(statement) = parser.parse_statement(&mut self.env)? {
            if let Statement::Use { path, position } = statement {
                let target = base.join(&path);
                self.include(&target).map_err(|e| match e.position {
                    Some(_) => e,
                    None => e.at(position),
                })?;
            }
        }
        Ok(())
    }
}

/// A root frame for evaluating outside any function
pub fn root_frame() -> Rc<Closure> {
    Closure::with_size(0, None)
}
