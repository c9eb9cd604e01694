//! Statistics over a recorded game.

use std::io::Read;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{DiceRoll, DiceSymbol, PlayerId};
use crate::error::{HistoryError, HistoryResult};
use crate::history::{History, TurnRecord};

/// A three-dice roll to search for.
pub type Pattern = [DiceSymbol; 3];

/// Summary of how a game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStats {
    /// Winning player.
    pub winner: PlayerId,
    /// Winner's chips on the final turn.
    pub winner_pile: i64,
    /// Centre pile on the final turn.
    pub centre_pile: i64,
    /// Turns played, excluding the initial deal.
    pub game_length: usize,
}

/// Observed frequency of a pattern next to its theoretical probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    /// The searched roll.
    pub pattern: Pattern,
    /// Number of turns with exactly this roll.
    pub matches: usize,
    /// `matches / game_length`.
    pub observed: f64,
    /// Probability supplied by the caller.
    pub expected: f64,
}

impl PatternReport {
    /// The pattern formatted as a dice cell, e.g. `['L', 'L', 'R']`.
    #[must_use]
    pub fn label(&self) -> String {
        DiceRoll::from(self.pattern).to_cell()
    }
}

/// Theoretical probability of rolling exactly `pattern` with three dice.
#[must_use]
pub fn pattern_expectation(pattern: Pattern) -> f64 {
    pattern.iter().map(|s| s.probability()).product()
}

/// Patterns compared by default: `[L, L, R]`, `[pd, pd, pd]`, `[d, d, d]`.
#[must_use]
pub fn default_patterns() -> Vec<(Pattern, f64)> {
    use DiceSymbol::*;
    [[Left, Left, Right], [PlusDot, PlusDot, PlusDot], [Dot, Dot, Dot]]
        .into_iter()
        .map(|p| (p, pattern_expectation(p)))
        .collect()
}

/// Read-only statistics over a game history.
#[derive(Clone, Debug)]
pub struct Statistics {
    history: History,
}

impl Statistics {
    /// Wrap a recorded history.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Empty` if the history has no turns.
    pub fn new(history: History) -> HistoryResult<Self> {
        if history.is_empty() {
            return Err(HistoryError::Empty);
        }
        Ok(Self { history })
    }

    /// Load statistics from an exported CSV history.
    ///
    /// # Errors
    ///
    /// Fails with a data-format error on malformed input.
    pub fn from_csv<R: Read>(reader: R) -> HistoryResult<Self> {
        Self::new(History::read_csv(reader)?)
    }

    /// The underlying history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record at `turn`.
    #[must_use]
    pub fn turn(&self, turn: usize) -> Option<&TurnRecord> {
        self.history.get(turn)
    }

    /// Final recorded turn.
    #[must_use]
    pub fn last(&self) -> Option<&TurnRecord> {
        self.history.last()
    }

    /// Number of seats.
    #[must_use]
    pub fn no_of_players(&self) -> usize {
        self.history.player_count()
    }

    /// Turns played, excluding the initial deal.
    #[must_use]
    pub fn game_length(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// First player with chips on the final turn.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.last()?
            .chips
            .iter()
            .find(|&(_, &chips)| chips != 0)
            .map(|(id, _)| id)
    }

    /// Winner, winner's pile, centre pile and game length.
    ///
    /// `None` when nobody holds chips on the final turn.
    #[must_use]
    pub fn final_stats(&self) -> Option<FinalStats> {
        let winner = self.winner()?;
        let last = self.last()?;
        Some(FinalStats {
            winner,
            winner_pile: last.chips_of(winner),
            centre_pile: last.centre_pile,
            game_length: self.game_length(),
        })
    }

    /// Indices of turns whose roll is exactly `[first, second, third]`.
    #[must_use]
    pub fn search_dice_pattern(
        &self,
        first: DiceSymbol,
        second: DiceSymbol,
        third: DiceSymbol,
    ) -> Vec<usize> {
        let target = [first, second, third];
        self.history
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                record
                    .dice
                    .as_ref()
                    .is_some_and(|dice| dice.symbols() == target.as_slice())
            })
            .map(|(turn, _)| turn)
            .collect()
    }

    /// Compare observed pattern frequencies with expected probabilities.
    ///
    /// Observed frequency is `matches / game_length`, or 0 for a game with
    /// no turns played.
    #[must_use]
    pub fn pattern_probability(&self, patterns: &[(Pattern, f64)]) -> Vec<PatternReport> {
        let length = self.game_length();
        patterns
            .iter()
            .map(|&(pattern, expected)| {
                let [a, b, c] = pattern;
                let matches = self.search_dice_pattern(a, b, c).len();
                let observed = if length == 0 {
                    0.0
                } else {
                    matches as f64 / length as f64
                };
                PatternReport {
                    pattern,
                    matches,
                    observed,
                    expected,
                }
            })
            .collect()
    }

    /// How often each three-dice roll occurred.
    #[must_use]
    pub fn triple_roll_counts(&self) -> FxHashMap<Pattern, usize> {
        let mut counts = FxHashMap::default();
        for dice in self.history.iter().filter_map(|r| r.dice.as_ref()) {
            if let &[a, b, c] = dice.symbols() {
                *counts.entry([a, b, c]).or_insert(0) += 1;
            }
        }
        counts
    }
}
