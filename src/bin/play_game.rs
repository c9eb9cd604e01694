//! Play one game of Left, Right, Centre and optionally show its history.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use left_right_centre::{
    AggressionLevel, DiceSymbol, Game, GameRng, GameSetup, HistoryError, SetupError, Statistics,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play a game of Left, Right and Centre.
#[derive(Parser, Debug)]
#[command(name = "play_game")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of players.
    #[arg(short, long, default_value = "4")]
    players: usize,

    /// Number of chips, dealt evenly (remainder is not dealt).
    #[arg(short, long, default_value = "100")]
    chips: i64,

    /// Show game history.
    #[arg(short, long)]
    show: bool,

    /// Random seed (default: random)
    #[arg(long)]
    seed: Option<u64>,

    /// Aggression level for every player: 1 neighbours, 2 anyone, 3 non-neighbours.
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=3))]
    aggression: u8,

    /// Disable taking the centre pile on a triple `pd`.
    #[arg(long)]
    no_centre_steal: bool,

    /// Stop after this many turns even without a winner.
    #[arg(long)]
    max_turns: Option<usize>,

    /// Write the history to a CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the final summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let setup = GameSetup::even(args.players, args.chips)?
        .with_aggression(AggressionLevel::try_from(args.aggression)?)
        .with_centre_steal(!args.no_centre_steal);

    let rng = args.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    info!(seed = rng.seed(), players = args.players, chips = setup.total_chips(), "starting game");

    let mut game = Game::new(setup, rng);
    match args.max_turns {
        Some(limit) => {
            game.play_until(limit);
        }
        None => {
            game.play_game();
        }
    }

    if let Some(path) = &args.csv {
        let file = File::create(path).map_err(|source| CliError::Output {
            path: path.clone(),
            source,
        })?;
        game.history().write_csv(BufWriter::new(file))?;
        info!(path = %path.display(), "history written");
    }

    let stats = Statistics::new(game.history().clone())?;

    if args.show {
        println!("{}", game.history().to_table());
        println!("{}", "=".repeat(50));
        let triple_steals =
            stats.search_dice_pattern(DiceSymbol::PlusDot, DiceSymbol::PlusDot, DiceSymbol::PlusDot);
        println!("Triple pd turns: {triple_steals:?}\n");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats.final_stats())?);
        return Ok(());
    }

    match (game.winner(), stats.final_stats()) {
        (Some(winner), Some(summary)) => println!(
            "{winner} wins with {} chips ({} in the centre) after {} turns (seed {})",
            summary.winner_pile,
            summary.centre_pile,
            summary.game_length,
            game.rng().seed()
        ),
        _ => println!(
            "No winner after {} turns (seed {})",
            stats.game_length(),
            game.rng().seed()
        ),
    }

    Ok(())
}
