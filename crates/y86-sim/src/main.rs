//! Batch runner for the Y86-64 simulator.
//!
//! Loads a textual hex image from a file (or stdin), steps the machine until
//! the status leaves `AOK` or a step budget is exhausted, and prints the
//! collected per-step snapshots as a JSON array on stdout.

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

#[cfg(test)]
use tempfile as _;

use y86_core::{load_image, LoadOptions, Snapshot, DEFAULT_BOUND_SLACK};

const HELP_TEXT: &str =
    "Usage: y86-sim [<image.yo>] [--bounded] [--slack <bytes>] [--limit <steps>] [--compact] [--help]";

/// Runaway guard for programs that never halt.
const DEFAULT_STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    input: Option<PathBuf>,
    bounded: bool,
    slack: u64,
    limit: usize,
    compact: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input: None,
            bounded: false,
            slack: DEFAULT_BOUND_SLACK,
            limit: DEFAULT_STEP_LIMIT,
            compact: false,
        }
    }
}

#[derive(Debug)]
enum ParseResult {
    Args(CliArgs),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        if arg == "--help" {
            return Ok(ParseResult::Help);
        }

        if arg == "--bounded" {
            parsed.bounded = true;
            continue;
        }

        if arg == "--compact" {
            parsed.compact = true;
            continue;
        }

        if arg == "--slack" {
            let value = args
                .next()
                .ok_or_else(|| String::from("missing value for --slack"))?;
            parsed.slack = value
                .to_string_lossy()
                .parse()
                .map_err(|_| format!("invalid --slack value: {}", value.to_string_lossy()))?;
            continue;
        }

        if arg == "--limit" {
            let value = args
                .next()
                .ok_or_else(|| String::from("missing value for --limit"))?;
            parsed.limit = value
                .to_string_lossy()
                .parse()
                .map_err(|_| format!("invalid --limit value: {}", value.to_string_lossy()))?;
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if parsed.input.is_some() {
            return Err(String::from("multiple input paths provided"));
        }
        parsed.input = Some(PathBuf::from(arg));
    }

    Ok(ParseResult::Args(parsed))
}

fn run(args: &CliArgs) -> io::Result<()> {
    let options = LoadOptions {
        bounded: args.bounded,
        slack: args.slack,
    };

    let mut machine = match &args.input {
        Some(path) => load_image(BufReader::new(File::open(path)?), &options)?,
        None => load_image(io::stdin().lock(), &options)?,
    };

    let trace: Vec<Snapshot> = machine.run(args.limit);

    let rendered = if args.compact {
        serde_json::to_string(&trace)
    } else {
        serde_json::to_string_pretty(&trace)
    }
    .map_err(io::Error::other)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn main() {
    match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{HELP_TEXT}");
        }
        Ok(ParseResult::Args(args)) => {
            if let Err(error) = run(&args) {
                eprintln!("error: {error}");
                std::process::exit(2);
            }
        }
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("{HELP_TEXT}");
            std::process::exit(1);
        }
    }
}
