//! Mutable game state: seated players, the centre pile and the outcome.
//!
//! Only the engine mutates a `GameState`. Every chip movement goes through
//! [`GameState::move_chip`] or [`GameState::take_centre_pile`], which keeps
//! `sum(player chips) + centre pile` constant.

use serde::{Deserialize, Serialize};

use super::config::GameSetup;
use super::player::{Player, PlayerId, PlayerMap};

/// Where a chip moves from or to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipHolder {
    /// A seated player.
    Player(PlayerId),
    /// The shared centre pile.
    Centre,
}

/// Lifecycle of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Turns are still being played.
    #[default]
    InProgress,
    /// A winner was found. Absorbing.
    Finished,
}

/// Full mutable state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seated players, indexed by id.
    players: PlayerMap<Player>,

    /// Chips parked in the centre.
    pub centre_pile: i64,

    /// Winning player, once found. The lifecycle status is derived from it.
    winner: Option<PlayerId>,
}

impl GameState {
    /// Seat the players described by `setup` with an empty centre pile.
    #[must_use]
    pub fn new(setup: &GameSetup) -> Self {
        let total = setup.player_count();
        let players = PlayerMap::new(total, |id| {
            let seat = setup.player(id);
            Player::new(id, seat.chips, total, seat.aggression).with_name(seat.name.clone())
        });

        Self {
            players,
            centre_pile: 0,
            winner: None,
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.players.player_count())
    }

    /// Get a seated player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// All seated players.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// A player's chip count.
    #[must_use]
    pub fn chips(&self, id: PlayerId) -> i64 {
        self.players[id].chips
    }

    /// Overwrite a player's chip count.
    ///
    /// Bypasses chip conservation.
    #[cfg(test)]
    pub(crate) fn set_chips(&mut self, id: PlayerId, chips: i64) {
        self.players[id].chips = chips;
    }

    /// Snapshot of every player's chips in seat order.
    #[must_use]
    pub fn chip_counts(&self) -> PlayerMap<i64> {
        self.players.map(|p| p.chips)
    }

    /// Chips held by players plus the centre pile.
    #[must_use]
    pub fn chips_in_play(&self) -> i64 {
        self.players.iter().map(|(_, p)| p.chips).sum::<i64>() + self.centre_pile
    }

    /// Move one chip. Counts are not clamped.
    pub fn move_chip(&mut self, from: ChipHolder, to: ChipHolder) {
        self.adjust(from, -1);
        self.adjust(to, 1);
    }

    /// Give the whole centre pile to `id`, returning how many chips moved.
    pub fn take_centre_pile(&mut self, id: PlayerId) -> i64 {
        let pile = std::mem::take(&mut self.centre_pile);
        self.players[id].chips += pile;
        pile
    }

    /// Winning player, once found.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// `Finished` exactly when a winner has been recorded.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(_) => GameStatus::Finished,
            None => GameStatus::InProgress,
        }
    }

    /// True once a winner has been recorded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Record the winner and enter the absorbing `Finished` state.
    pub(crate) fn finish(&mut self, winner: PlayerId) {
        self.winner = Some(winner);
    }

    fn adjust(&mut self, holder: ChipHolder, delta: i64) {
        match holder {
            ChipHolder::Player(id) => self.players[id].chips += delta,
            ChipHolder::Centre => self.centre_pile += delta,
        }
    }
}
