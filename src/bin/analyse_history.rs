//! Compare dice pattern frequencies in a recorded game with theory.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use left_right_centre::{default_patterns, HistoryError, Statistics};
use tracing_subscriber::EnvFilter;

/// Analyse a game history exported by `play_game --csv`.
#[derive(Parser, Debug)]
#[command(name = "analyse_history")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// History CSV file.
    #[arg(default_value = "results/history.csv")]
    history: PathBuf,

    /// Also list the most frequent three-dice rolls.
    #[arg(long, default_value = "0")]
    top: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error reading {}: {e}", args.history.display());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), HistoryError> {
    let file = File::open(&args.history)?;
    let stats = Statistics::from_csv(BufReader::new(file))?;

    println!("Pattern\t\t\tChance\tExpected");
    for report in stats.pattern_probability(&default_patterns()) {
        println!(
            "{}:\t{:.3}\t{:.3}",
            report.label(),
            report.observed,
            report.expected
        );
    }

    if args.top > 0 {
        let mut counts: Vec<_> = stats.triple_roll_counts().into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        println!("\nMost frequent rolls");
        for (pattern, count) in counts.into_iter().take(args.top) {
            let label = left_right_centre::DiceRoll::from(pattern).to_cell();
            println!("{label}:\t{count}");
        }
    }

    println!("\nGame length: {}", stats.game_length());
    if let Some(winner) = stats.winner() {
        println!("Winner: {winner}");
    }

    Ok(())
}
