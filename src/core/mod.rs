//! Core game types: players, dice, RNG, configuration and state.
//!
//! Everything here is independent of turn resolution. The engine in
//! `rules` drives these types; statistics in `stats` only read them.

pub mod player;
pub mod dice;
pub mod rng;
pub mod config;
pub mod state;

pub use player::{AggressionLevel, Direction, Player, PlayerId, PlayerMap};
pub use dice::{DiceRoll, DiceSymbol, DIE_FACES, MAX_DICE};
pub use rng::{GameRng, GameRngState};
pub use config::{GameSetup, PlayerSetup, MAX_PLAYERS};
pub use state::{ChipHolder, GameState, GameStatus};
