//! gen_fixture: write and check golden AST fixtures
//!
//! # Usage
//!
//! ```bash
//! # One fixture
//! gen_fixture simple_select 'SELECT 1'
//!
//! # Many, from JSON lines on stdin
//! echo '{"name": "star", "sql": "SELECT * FROM t"}' | gen_fixture --batch
//!
//! # Regenerate every fixture and compare
//! gen_fixture --check
//! ```

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use colored::*;
use dump_ast::fixture::{self, Fixture};
use dump_ast::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gen_fixture")]
#[command(about = "Generate golden AST fixtures for dump_ast", long_about = None)]
#[command(after_help = "EXAMPLES:
    gen_fixture simple_select 'SELECT 1'
    gen_fixture --batch < cases.jsonl
    gen_fixture --check --dir tests/fixtures")]
struct Cli {
    /// Fixture name (file stem)
    name: Option<String>,

    /// SQL statement to dump
    #[arg(allow_hyphen_values = true)]
    sql: Option<String>,

    /// Read `{"name": .., "sql": ..}` lines from stdin
    #[arg(long, conflicts_with = "check")]
    batch: bool,

    /// Verify every fixture in the directory
    #[arg(long)]
    check: bool,

    /// Fixture directory (defaults to `fixtures.dir` from the config)
    #[arg(short, long, env = "DUMP_AST_FIXTURES")]
    dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every fixture succeeded.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = Config::load().context("loading config")?;
    let dir = cli.dir.clone().unwrap_or_else(|| config.fixtures.dir.clone());

    if cli.check {
        return check(&dir, &config);
    }
    if cli.batch {
        return batch(&dir, &config);
    }
    match (&cli.name, &cli.sql) {
        (Some(name), Some(sql)) => Ok(generate(&dir, &config, name, sql)),
        _ => bail!("expected <NAME> <SQL>, --batch or --check"),
    }
}

fn generate(dir: &Path, config: &Config, name: &str, sql: &str) -> bool {
    match Fixture::generate(sql, config).and_then(|f| f.write(dir, name)) {
        Ok(_) => {
            println!("  {} {}: {}", "OK".green(), name, sql);
            true
        }
        Err(e) => {
            eprintln!("{} {}: {}", "FAIL".red().bold(), name, e);
            false
        }
    }
}

fn batch(dir: &Path, config: &Config) -> anyhow::Result<bool> {
    let mut ok = true;
    for (lineno, line) in io::stdin().lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        match fixture::parse_batch_line(&line) {
            Ok(Some(entry)) => ok &= generate(dir, config, &entry.name, &entry.sql),
            Ok(None) => {}
            Err(e) => {
                eprintln!("{} line {}: {}", "FAIL".red().bold(), lineno + 1, e);
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn check(dir: &Path, config: &Config) -> anyhow::Result<bool> {
    let fixtures = fixture::load_dir(dir)
        .with_context(|| format!("loading fixtures from {}", dir.display()))?;
    let mut failed = 0usize;
    for (name, fixture) in &fixtures {
        match fixture.verify(name, config) {
            Ok(()) => println!("  {} {}: {}", "OK".green(), name, fixture.sql),
            Err(AstError::FixtureMismatch {
                expected, actual, ..
            }) => {
                failed += 1;
                eprintln!("{} {}: AST differs", "FAIL".red().bold(), name);
                eprintln!("{}", "--- expected".dimmed());
                eprintln!("{expected}");
                eprintln!("{}", "+++ actual".dimmed());
                eprintln!("{actual}");
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "FAIL".red().bold(), name, e);
            }
        }
    }
    println!();
    println!("{} passed, {} failed", fixtures.len() - failed, failed);
    Ok(failed == 0)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
