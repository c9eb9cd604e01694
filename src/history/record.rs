//! Turn records and the append-only game history.
//!
//! A `History` starts with a synthetic turn 0 holding the dealt chips, then
//! gains exactly one record per played turn. Records are never modified
//! after they are appended.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{DiceRoll, GameState, PlayerId, PlayerMap};
use crate::error::HistoryResult;

/// Snapshot of the table after one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Chips per player after the turn.
    pub chips: PlayerMap<i64>,

    /// Centre pile after the turn.
    pub centre_pile: i64,

    /// Who rolled. `None` for turn 0.
    pub active_player: Option<PlayerId>,

    /// What was rolled. `None` for turn 0; an empty roll for a player
    /// who had no chips.
    pub dice: Option<DiceRoll>,
}

impl TurnRecord {
    /// The synthetic turn 0 record for a freshly dealt table.
    #[must_use]
    pub fn initial(state: &GameState) -> Self {
        Self {
            chips: state.chip_counts(),
            centre_pile: state.centre_pile,
            active_player: None,
            dice: None,
        }
    }

    /// Record of `player` having rolled `dice`, capturing `state` afterwards.
    #[must_use]
    pub fn after_turn(state: &GameState, player: PlayerId, dice: DiceRoll) -> Self {
        Self {
            chips: state.chip_counts(),
            centre_pile: state.centre_pile,
            active_player: Some(player),
            dice: Some(dice),
        }
    }

    /// Chips held by `player` after this turn.
    #[must_use]
    pub fn chips_of(&self, player: PlayerId) -> i64 {
        self.chips[player]
    }

    /// Chips held by players plus the centre pile.
    #[must_use]
    pub fn chips_in_play(&self) -> i64 {
        self.chips.as_slice().iter().sum::<i64>() + self.centre_pile
    }
}

/// Append-only sequence of turn records.
///
/// Backed by a persistent vector, so cloning a finished game's history to
/// hand to statistics is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    player_count: usize,
    records: Vector<TurnRecord>,
}

impl History {
    /// Empty history for a table of `player_count` seats.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            records: Vector::new(),
        }
    }

    /// Append a record. Only the engine and history readers add turns.
    pub(crate) fn push(&mut self, record: TurnRecord) {
        debug_assert_eq!(record.chips.player_count(), self.player_count);
        self.records.push_back(record);
    }

    /// Number of seats the records describe.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Number of records, including turn 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True before turn 0 has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `turn` (turn 0 is the initial deal).
    #[must_use]
    pub fn get(&self, turn: usize) -> Option<&TurnRecord> {
        self.records.get(turn)
    }

    /// Most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    /// Iterate records in turn order.
    pub fn iter(&self) -> impl Iterator<Item = &TurnRecord> {
        self.records.iter()
    }

    /// Encode as a compact binary snapshot.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Encoding` if serialization fails.
    pub fn to_bytes(&self) -> HistoryResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a snapshot written by [`History::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Encoding` if the bytes are not a valid snapshot.
    pub fn from_bytes(bytes: &[u8]) -> HistoryResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a TurnRecord;
    type IntoIter = im::vector::Iter<'a, TurnRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
