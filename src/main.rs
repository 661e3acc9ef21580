use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stackcalc::Calculator;
use stackcalc::config::load_config;
use stackcalc::request::handle_request;

/// Evaluate arithmetic expressions with + - * / ^, parentheses, Pi and E.
#[derive(Parser, Debug)]
#[command(name = "stackcalc", version, about)]
struct Cli {
    /// Expression to evaluate. Read line by line from stdin when omitted.
    expression: Vec<String>,

    /// Only validate the expression.
    #[arg(long, conflicts_with = "json")]
    check: bool,

    /// Read a JSON request ({"data": "..."}) from stdin and print the JSON response.
    #[arg(long)]
    json: bool,

    /// Path to a TOML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let calculator = Calculator::with_config(config);
    debug!(config = ?calculator.config(), "calculator ready");

    if cli.json {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read request from stdin")?;
        println!("{}", handle_request(&calculator, &body));
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.expression.is_empty() {
        let expression = cli.expression.join(" ");
        return Ok(run_one(&calculator, &expression, cli.check));
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut status = ExitCode::SUCCESS;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let output = if cli.check {
            if calculator.check(&line) {
                "valid".to_string()
            } else {
                status = ExitCode::FAILURE;
                "invalid".to_string()
            }
        } else {
            calculator.calculate(&line)
        };
        writeln!(stdout, "{output}").context("Failed to write to stdout")?;
    }

    Ok(status)
}

fn run_one(calculator: &Calculator, expression: &str, check: bool) -> ExitCode {
    if check {
        return if calculator.check(expression) {
            println!("valid");
            ExitCode::SUCCESS
        } else {
            println!("invalid");
            ExitCode::FAILURE
        };
    }

    let result = calculator.evaluate_expression(expression);
    println!("{}", result.display());
    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
