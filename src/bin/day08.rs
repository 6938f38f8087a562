use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::PathBuf;

use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use sevenseg::{decode_batch, parse_input, BatchReport, Puzzle};

#[derive(Debug, Parser)]
#[command(author, version, about = "Decode scrambled seven-segment displays")]
struct Args {
    /// File of puzzles, one per line.  Standard input is read if this
    /// is omitted.
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Fail if any puzzle cannot be decoded.
    #[arg(long)]
    strict: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e)),
        None => {
            let mut input = String::new();
            match io::stdin().read_to_string(&mut input) {
                Ok(_) => Ok(input),
                Err(e) => Err(format!("failed to read input: {}", e)),
            }
        }
    }
}

fn part1(report: &BatchReport) {
    println!("Day 8 part 1: {}", report.easy_digits);
}

fn part2(report: &BatchReport) {
    println!("Day 8 part 2: {}", report.sum);
}

fn echo_puzzles(puzzles: &[Puzzle]) {
    // Only worth showing for the examples.
    if puzzles.len() < 20 {
        for puzzle in puzzles {
            event!(Level::INFO, "{}", puzzle);
        }
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
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

    let input = read_input(args.input.as_ref())?;
    let puzzles = parse_input(&input).map_err(|e| format!("failed to parse puzzle input: {}", e))?;
    echo_puzzles(&puzzles);

    let report = decode_batch(&puzzles);
    for (index, e) in report.failures.iter() {
        event!(
            Level::WARN,
            "could not decode puzzle {} ({}): {}",
            index + 1,
            puzzles[*index],
            e,
        );
    }
    part1(&report);
    part2(&report);

    if args.strict && !report.failures.is_empty() {
        return Err(format!(
            "{} of {} puzzles could not be decoded",
            report.failures.len(),
            puzzles.len()
        ));
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
