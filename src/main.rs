//! XY CLI - run, evaluate and inspect XY programs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use xy::{State, Value};

#[derive(Parser)]
#[command(name = "xy")]
#[command(about = "XY - a small functional language with guarded overloads", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load source files and run their `main` function
    Run {
        /// Source files, loaded in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Arguments passed to `main` as a list of strings
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Evaluate a single expression
    Eval {
        /// Expression to evaluate
        expr: String,
    },

    /// Print the token stream of a source file
    Tokens {
        /// Path to source file
        file: PathBuf,
    },

    /// Start interactive REPL (Read-Eval-Print Loop)
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change directory to {}", dir.display()))?;
    }

    match cli.command {
        Commands::Run { files, args } => {
            let mut state = State::new();
            for file in &files {
                if state.load_file(file).is_err() {
                    fail(&mut state);
                }
            }
            match state.run_main(&args) {
                Ok(Some(Value::Void)) | Ok(None) => {}
                Ok(Some(value)) => println!("{}", value),
                Err(_) => fail(&mut state),
            }
        }

        Commands::Eval { expr } => {
            let mut state = State::new();
            match state.eval_str(&expr) {
                Ok(value) => println!("{}", value),
                Err(_) => fail(&mut state),
            }
        }

        Commands::Tokens { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let name = file.display().to_string();
            match xy::lexer::tokenize(&source, Some(name.into())) {
                Ok(tokens) => {
                    for token in tokens {
                        println!(
                            "{} {}",
                            format!("{:>4}:{:<3}", token.position.line, token.position.column)
                                .dimmed(),
                            token.kind
                        );
                    }
                }
                Err(e) => {
                    eprint!("{}", xy::error::format_error(&e, Some(&source)));
                    process::exit(1);
                }
            }
        }

        Commands::Repl => {
            xy::repl::run_repl(State::new())?;
        }
    }

    Ok(())
}

fn fail(state: &mut State) -> ! {
    state.dump_error();
    process::exit(1);
}
