//! dump_ast: print the SELECT tree of a SQLite query as JSON
//!
//! # Usage
//!
//! ```bash
//! dump_ast 'SELECT a, b FROM t WHERE a > 1'
//! ```
//!
//! The JSON document goes to stdout. Diagnostics go to stderr; set
//! `RUST_LOG=dump_ast=debug` for parser and capture tracing.

use std::process::ExitCode;

use clap::Parser;
use dump_ast::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dump_ast")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// The SQL query to dump
    #[arg(allow_hyphen_values = true, num_args = 0..)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => return usage(),
    };
    let [sql] = cli.args.as_slice() else {
        return usage();
    };

    match run(sql) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(sql: &str) -> Result<String, AstError> {
    let config = Config::load()?;
    dump_with(sql, &config)
}

fn usage() -> ExitCode {
    eprintln!("Usage: dump_ast 'SQL query'");
    eprintln!("Outputs the parsed AST as JSON to stdout.");
    ExitCode::FAILURE
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
