//! Turn resolution and win detection.
//!
//! `Game` is the only place chip state changes during play. It reads the
//! immutable `GameSetup`, mutates its own `GameState`, and appends to its
//! `History`.

pub mod engine;

pub use engine::{Game, GameSnapshot, TurnOutcome};
