//! Dice symbols and rolls.
//!
//! An LRC die has six faces: `L`, `R`, `C`, `d`, `d`, `pd`. The dot (`d`)
//! appears twice, so it is twice as likely as any other symbol. A roll is
//! at most three dice, stored inline without heap allocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::HistoryError;

/// Maximum number of dice a player rolls in one turn.
pub const MAX_DICE: usize = 3;

/// A single face of an LRC die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiceSymbol {
    /// `L`: pass a chip to the left neighbour.
    Left,
    /// `R`: pass a chip to the right neighbour.
    Right,
    /// `C`: put a chip in the centre pile.
    Centre,
    /// `d`: nothing happens.
    Dot,
    /// `pd`: take a chip from an eligible opponent.
    PlusDot,
}

/// The six faces of the die, in face order.
pub const DIE_FACES: [DiceSymbol; 6] = [
    DiceSymbol::Left,
    DiceSymbol::Right,
    DiceSymbol::Centre,
    DiceSymbol::Dot,
    DiceSymbol::Dot,
    DiceSymbol::PlusDot,
];

impl DiceSymbol {
    /// Short symbol as printed in histories.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DiceSymbol::Left => "L",
            DiceSymbol::Right => "R",
            DiceSymbol::Centre => "C",
            DiceSymbol::Dot => "d",
            DiceSymbol::PlusDot => "pd",
        }
    }

    /// Probability of rolling this symbol on one die.
    #[must_use]
    pub fn probability(self) -> f64 {
        let faces = DIE_FACES.iter().filter(|&&f| f == self).count();
        faces as f64 / DIE_FACES.len() as f64
    }
}

impl fmt::Display for DiceSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiceSymbol {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(DiceSymbol::Left),
            "R" => Ok(DiceSymbol::Right),
            "C" => Ok(DiceSymbol::Centre),
            "d" => Ok(DiceSymbol::Dot),
            "pd" => Ok(DiceSymbol::PlusDot),
            other => Err(HistoryError::UnknownSymbol(other.to_string())),
        }
    }
}

/// The dice rolled in one turn, in the order they are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    symbols: SmallVec<[DiceSymbol; MAX_DICE]>,
}

impl DiceRoll {
    /// An empty roll (a player with no chips).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a roll from symbols.
    #[must_use]
    pub fn from_symbols(symbols: &[DiceSymbol]) -> Self {
        Self {
            symbols: SmallVec::from_slice(symbols),
        }
    }

    /// Append one die.
    pub fn push(&mut self, symbol: DiceSymbol) {
        self.symbols.push(symbol);
    }

    /// Symbols in roll order.
    #[must_use]
    pub fn symbols(&self) -> &[DiceSymbol] {
        &self.symbols
    }

    /// Number of dice rolled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when no dice were rolled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Three dice, all `pd`.
    #[must_use]
    pub fn is_triple_steal(&self) -> bool {
        self.symbols.len() == MAX_DICE && self.symbols.iter().all(|&s| s == DiceSymbol::PlusDot)
    }

    /// Format as a bracketed list of quoted symbols: `['L', 'R', 'C']`.
    #[must_use]
    pub fn to_cell(&self) -> String {
        let quoted: Vec<String> = self.symbols.iter().map(|s| format!("'{s}'")).collect();
        format!("[{}]", quoted.join(", "))
    }

    /// Parse the bracketed form written by [`DiceRoll::to_cell`].
    ///
    /// `row` is only used to label errors.
    pub fn parse_cell(cell: &str, row: usize) -> Result<Self, HistoryError> {
        let malformed = || HistoryError::MalformedDice {
            row,
            cell: cell.to_string(),
        };

        let inner = cell
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(malformed)?
            .trim();

        let mut roll = DiceRoll::empty();
        if inner.is_empty() {
            return Ok(roll);
        }

        for part in inner.split(',') {
            let part = part.trim();
            let symbol = part
                .strip_prefix('\'')
                .and_then(|p| p.strip_suffix('\''))
                .or_else(|| part.strip_prefix('"').and_then(|p| p.strip_suffix('"')))
                .ok_or_else(malformed)?;
            if roll.len() == MAX_DICE {
                return Err(malformed());
            }
            roll.push(symbol.parse()?);
        }

        Ok(roll)
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl From<[DiceSymbol; 3]> for DiceRoll {
    fn from(symbols: [DiceSymbol; 3]) -> Self {
        Self::from_symbols(&symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DiceSymbol::*;

    #[test]
    fn test_die_faces_weighting() {
        assert_eq!(DIE_FACES.len(), 6);
        assert!((Dot.probability() - 2.0 / 6.0).abs() < 1e-12);
        for symbol in [Left, Right, Centre, PlusDot] {
            assert!((symbol.probability() - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_symbol_round_trip_strings() {
        for symbol in [Left, Right, Centre, Dot, PlusDot] {
            assert_eq!(symbol.as_str().parse::<DiceSymbol>().unwrap(), symbol);
        }
        assert!(matches!("X".parse::<DiceSymbol>(), Err(HistoryError::UnknownSymbol(_))));
    }

    #[test]
    fn test_triple_steal() {
        assert!(DiceRoll::from([PlusDot, PlusDot, PlusDot]).is_triple_steal());
        assert!(!DiceRoll::from([PlusDot, PlusDot, Dot]).is_triple_steal());
        assert!(!DiceRoll::from_symbols(&[PlusDot, PlusDot]).is_triple_steal());
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(DiceRoll::from([Left, Right, Centre]).to_cell(), "['L', 'R', 'C']");
        assert_eq!(DiceRoll::from_symbols(&[PlusDot]).to_cell(), "['pd']");
        assert_eq!(DiceRoll::empty().to_cell(), "[]");
    }

    #[test]
    fn test_parse_cell() {
        let roll = DiceRoll::parse_cell("['pd', 'd', 'L']", 0).unwrap();
        assert_eq!(roll.symbols(), &[PlusDot, Dot, Left]);

        assert!(DiceRoll::parse_cell("[]", 0).unwrap().is_empty());
        assert_eq!(
            DiceRoll::parse_cell("[\"C\"]", 0).unwrap().symbols(),
            &[Centre]
        );
    }

    #[test]
    fn test_parse_cell_rejects_garbage() {
        for bad in ["L, R", "['L', R]", "['L', 'R', 'C', 'd']", "['L',, 'R']"] {
            assert!(
                matches!(DiceRoll::parse_cell(bad, 4), Err(HistoryError::MalformedDice { row: 4, .. })),
                "{bad}"
            );
        }
        assert!(matches!(
            DiceRoll::parse_cell("['Q']", 1),
            Err(HistoryError::UnknownSymbol(_))
        ));
    }
}
