use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::{event, Level};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod board;
mod cost;
#[cfg(test)]
mod fixtures;
mod layout;
mod moves;
mod parse;
mod search;

use parse::{ParseError, Puzzle};
use search::{solve, SearchLimits, SolveError};

/// Used when `RUST_LOG` is unset or unusable.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error, PartialEq, Eq)]
enum RunError {
    #[error("invalid burrow diagram: {0}")]
    Input(#[from] ParseError),
    #[error(transparent)]
    Search(#[from] SolveError),
}

fn log_filter() -> Result<EnvFilter, String> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .map_err(|e| e.to_string())
}

fn init_logging() {
    // Logs go to stderr; stdout carries nothing but the answer.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = match log_filter() {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Solves the burrow drawn in `input`, returning the text to print.
fn run(input: &str) -> Result<String, RunError> {
    let puzzle: Puzzle = input.parse()?;
    event!(
        Level::INFO,
        "starting position:\n{}",
        puzzle.board.diagram(&puzzle.layout)
    );
    let solution = solve(&puzzle.board, &puzzle.layout, &SearchLimits::default())?;
    event!(
        Level::INFO,
        "settled {} positions, queued {}",
        solution.stats.expanded,
        solution.stats.pushed
    );
    Ok(format!("{}\n", solution.cost))
}

fn main() {
    init_logging();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read input: {}", e);
        std::process::exit(1);
    }
    match run(&input) {
        Ok(output) => {
            print!("{}", output);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

#[test]
fn test_run_prints_the_cost() {
    assert_eq!(run(fixtures::SAMPLE), Ok("12521\n".to_string()));
}

#[test]
fn test_run_rejects_bad_diagrams() {
    let result = run("#############\n#...........#\n###B#C#B#D###\n");
    assert!(
        matches!(result, Err(RunError::Input(ParseError::MalformedInput { line: 3, .. }))),
        "unexpected result {:?}",
        result
    );
    let message = result.expect_err("diagram is too short").to_string();
    assert!(message.starts_with("invalid burrow diagram: line 3"), "{}", message);
}

#[test]
fn test_run_reports_unsolvable() {
    let result = run(fixtures::DEADLOCK);
    assert_eq!(
        result,
        Err(RunError::Search(SolveError::Unsolvable { expanded: 12 }))
    );
}

#[test]
fn test_log_filter_builds() {
    assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    assert!(log_filter().is_ok());
}
