//! REPL (Read-Eval-Print Loop) for XY
//!
//! Lines starting with `let` or `use` extend the session's program; anything
//! else is evaluated as an expression against it.

use crate::state::State;
use crate::value::Value;
use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{history::FileHistory, CompletionType, Config, Editor};
use std::env;
use std::path::PathBuf;

/// Run the interactive REPL
pub fn run_repl(mut state: State) -> Result<()> {
    println!("{}", format!("XY REPL v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
    println!("{}", "Type :help for help, :quit to exit".dimmed());
    println!();

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(true)
        .build();

    let mut rl: Editor<(), FileHistory> = Editor::with_config(config)?;

    let history_path = get_history_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    let mut line_number = 1;
    let mut multiline_buffer = String::new();

    loop {
        let prompt = if multiline_buffer.is_empty() {
            format!("xy:{} ", line_number).green().bold().to_string()
        } else {
            "   ... ".yellow().bold().to_string()
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                // Lines ending with \ continue onto the next one
                if let Some(head) = trimmed.strip_suffix('\\') {
                    multiline_buffer.push_str(head);
                    multiline_buffer.push('\n');
                    continue;
                }
                multiline_buffer.push_str(trimmed);
                let input = std::mem::take(&mut multiline_buffer);
                let input = input.trim();

                if input.is_empty() {
                    continue;
                }

                if input.starts_with(':') {
                    match input {
                        ":quit" | ":q" | ":exit" => {
                            println!("{}", "Goodbye!".cyan());
                            break;
                        }
                        ":help" | ":h" => print_help(),
                        ":clear" | ":c" => {
                            state = State::new();
                            println!("{}", "✓ State cleared".green());
                        }
                        ":functions" | ":f" => print_functions(&state),
                        _ => {
                            eprintln!("{} {}", "Unknown command:".red(), input);
                            println!("{}", "Type :help for available commands".dimmed());
                        }
                    }
                    continue;
                }

                let declares = input.starts_with("let ") || input.starts_with("use ");
                let outcome = if declares {
                    state.load_str(input).map(|()| None)
                } else {
                    state.eval_str(input).map(Some)
                };

                match outcome {
                    Ok(Some(value)) => {
                        println!("{}", format_value(&value));
                        line_number += 1;
                    }
                    Ok(None) => {
                        println!("{}", "✓".green());
                        line_number += 1;
                    }
                    Err(_) => state.dump_error(),
                }
            }
            Err(ReadlineError::Interrupted) => {
                multiline_buffer.clear();
                println!("{}", "^C".dimmed());
                println!("{}", "Use :quit to exit".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    if let Some(path) = history_path {
        let _ = rl.save_history(&path);
    }

    Ok(())
}

fn get_history_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".xy_history"))
}

fn print_help() {
    println!("{}", "XY REPL Commands:".cyan().bold());
    println!("  {}  - Show this help message", ":help, :h".green());
    println!("  {}  - Exit the REPL", ":quit, :q, :exit".green());
    println!("  {}  - Forget all declarations", ":clear, :c".green());
    println!("  {}  - List defined functions", ":functions, :f".green());
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  {}  - Evaluate an expression", "2 + 2".dimmed());
    println!("  {}  - Declare a function", "let double(x) = x * 2".dimmed());
    println!("  {}  - Add an overload", "let fact(0) = 1".dimmed());
    println!("  {}  - Call it", "double(21)".dimmed());
    println!("  {}  - Multi-line input", "let f(x) = \\".dimmed());
}

fn print_functions(state: &State) {
    let mut names: Vec<(&str, bool)> = state
        .global()
        .functions()
        .iter()
        .filter_map(|f| f.name().map(|name| (name, f.is_native())))
        .collect();
    names.sort();

    println!("{}", "Functions:".cyan().bold());
    for (name, native) in names {
        if native {
            println!("  {} {}", name.green(), "(native)".dimmed());
        } else {
            println!("  {}", name.green());
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s).yellow().to_string(),
        Value::Number(_) => value.to_string().cyan().to_string(),
        Value::Bool(_) => value.to_string().magenta().to_string(),
        Value::Void => value.to_string().dimmed().to_string(),
        Value::Function(_) => value.to_string().blue().to_string(),
        Value::List(_) | Value::Map(_) => value.to_string(),
    }
}
