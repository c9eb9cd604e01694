//! # left-right-centre
//!
//! A simulation engine for the dice game Left, Right, Centre.
//!
//! N players sit around a table sharing a fixed pool of chips. On their turn
//! a player rolls one die per chip they hold, up to three, and each symbol
//! moves a chip: to the left or right neighbour, into the centre pile, or
//! (on `pd`) from an opponent back to the roller. The game ends when one
//! player holds every chip that is not in the centre.
//!
//! ## Design
//!
//! 1. **Immutable configuration**: `GameSetup` is validated once and never
//!    changes during play.
//! 2. **Seedable randomness**: every game owns a `GameRng`; the same seed
//!    replays the same game.
//! 3. **Append-only history**: every turn is recorded as a `TurnRecord`,
//!    exported as CSV for later analysis.
//!
//! ## Modules
//!
//! - `core`: players, dice, RNG, configuration, state
//! - `rules`: the `Game` engine
//! - `history`: turn records, CSV export and import
//! - `stats`: game length, winner, dice pattern frequencies
//! - `error`: setup and history errors

pub mod core;
pub mod error;
pub mod history;
pub mod rules;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    AggressionLevel, DiceRoll, DiceSymbol, Direction, GameRng, GameRngState, GameSetup, GameState,
    GameStatus, Player, PlayerId, PlayerMap, PlayerSetup, DIE_FACES,
};

pub use crate::error::{HistoryError, HistoryResult, SetupError};

pub use crate::history::{History, TurnRecord};

pub use crate::rules::{Game, GameSnapshot, TurnOutcome};

pub use crate::stats::{default_patterns, FinalStats, PatternReport, Statistics};
