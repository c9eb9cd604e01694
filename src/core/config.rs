//! Game configuration.
//!
//! A `GameSetup` is built once before play and never changes:
//! - `PlayerSetup`: starting chips, name and aggression level per seat
//! - the triple-`pd` centre pile rule
//!
//! The chip pool is the sum of the players' starting chips; the centre pile
//! always starts empty.

use serde::{Deserialize, Serialize};

use super::player::{AggressionLevel, PlayerId, PlayerMap};
use crate::error::SetupError;

/// Largest table a `PlayerId` can address.
pub const MAX_PLAYERS: usize = u8::MAX as usize;

/// Starting configuration for one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Starting chips.
    pub chips: i64,

    /// Display name (may be empty).
    pub name: String,

    /// Steal-target policy.
    pub aggression: AggressionLevel,
}

impl PlayerSetup {
    /// A nameless player with the default aggression level.
    pub fn new(chips: i64) -> Self {
        Self {
            chips,
            name: String::new(),
            aggression: AggressionLevel::default(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the aggression level.
    #[must_use]
    pub fn with_aggression(mut self, aggression: AggressionLevel) -> Self {
        self.aggression = aggression;
        self
    }
}

/// Complete, validated game configuration.
///
/// ## Example
///
/// ```
/// use left_right_centre::core::{AggressionLevel, GameSetup, PlayerId};
///
/// let setup = GameSetup::even(4, 102)
///     .unwrap()
///     .with_aggression(AggressionLevel::Any);
///
/// assert_eq!(setup.player_count(), 4);
/// // 102 / 4 rounds down; the two leftover chips are not dealt.
/// assert_eq!(setup.player(PlayerId::new(1)).chips, 25);
/// assert_eq!(setup.total_chips(), 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    players: PlayerMap<PlayerSetup>,

    /// A roll of three `pd` takes the whole centre pile.
    take_centre_on_triple_steal: bool,
}

impl GameSetup {
    /// Create a setup from explicit per-seat configurations (seat 1 first).
    ///
    /// # Errors
    ///
    /// Fails with fewer than 2 or more than 255 players, or when any
    /// player starts with negative chips.
    pub fn new(players: Vec<PlayerSetup>) -> Result<Self, SetupError> {
        if players.len() < 2 {
            return Err(SetupError::TooFewPlayers(players.len()));
        }
        if players.len() > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers(players.len()));
        }
        if let Some((index, player)) = players.iter().enumerate().find(|(_, p)| p.chips < 0) {
            return Err(SetupError::NegativeChips {
                player: PlayerId::from_index(index).get(),
                chips: player.chips,
            });
        }

        Ok(Self {
            players: PlayerMap::from_vec(players),
            take_centre_on_triple_steal: true,
        })
    }

    /// Deal `total_chips` evenly across `total_players` seats.
    ///
    /// Uses integer division: remainder chips are not dealt and do not
    /// count towards the game's chip pool.
    ///
    /// # Errors
    ///
    /// Fails with fewer than 2 or more than 255 players, or fewer chips
    /// than players.
    pub fn even(total_players: usize, total_chips: i64) -> Result<Self, SetupError> {
        if total_players < 2 {
            return Err(SetupError::TooFewPlayers(total_players));
        }
        if total_players > MAX_PLAYERS {
            return Err(SetupError::TooManyPlayers(total_players));
        }
        if total_chips < total_players as i64 {
            return Err(SetupError::NotEnoughChips {
                chips: total_chips,
                players: total_players,
            });
        }

        let per_player = total_chips / total_players as i64;
        Self::new(vec![PlayerSetup::new(per_player); total_players])
    }

    /// Give every player the same aggression level.
    #[must_use]
    pub fn with_aggression(mut self, aggression: AggressionLevel) -> Self {
        for (_, player) in self.players.iter_mut() {
            player.aggression = aggression;
        }
        self
    }

    /// Set one player's aggression level.
    ///
    /// # Errors
    ///
    /// Fails if `player` is not seated at this table.
    pub fn with_player_aggression(
        mut self,
        player: PlayerId,
        aggression: AggressionLevel,
    ) -> Result<Self, SetupError> {
        self.check_player(player)?;
        self.players[player].aggression = aggression;
        Ok(self)
    }

    /// Name players in seat order. Extra names are ignored; seats without a
    /// name keep theirs.
    #[must_use]
    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for ((_, player), name) in self.players.iter_mut().zip(names) {
            player.name = name.into();
        }
        self
    }

    /// Enable or disable the triple-`pd` centre pile rule.
    #[must_use]
    pub fn with_centre_steal(mut self, enabled: bool) -> Self {
        self.take_centre_on_triple_steal = enabled;
        self
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Chips in play: the sum of every player's starting stack.
    #[must_use]
    pub fn total_chips(&self) -> i64 {
        self.players.iter().map(|(_, p)| p.chips).sum()
    }

    /// Whether three `pd` take the centre pile.
    #[must_use]
    pub fn take_centre_on_triple_steal(&self) -> bool {
        self.take_centre_on_triple_steal
    }

    /// Configuration for one seat.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerSetup {
        &self.players[player]
    }

    /// All seat configurations.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerSetup> {
        &self.players
    }

    fn check_player(&self, player: PlayerId) -> Result<(), SetupError> {
        let players = self.player_count();
        if player.get() == 0 || player.index() >= players {
            return Err(SetupError::UnknownPlayer {
                player: player.get(),
                players,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_distribution() {
        for (players, chips, expected) in [(5, 20, 4), (6, 19, 3), (3, 300, 100), (2, 3, 1)] {
            let setup = GameSetup::even(players, chips).unwrap();
            assert_eq!(setup.player_count(), players);
            for (_, player) in setup.players().iter() {
                assert_eq!(player.chips, expected);
            }
            assert!(setup.total_chips() <= chips);
            assert_eq!(setup.total_chips(), expected * players as i64);
        }
    }

    #[test]
    fn test_even_rejects_invalid() {
        assert_eq!(GameSetup::even(1, 10), Err(SetupError::TooFewPlayers(1)));
        assert_eq!(GameSetup::even(0, 10), Err(SetupError::TooFewPlayers(0)));
        assert_eq!(GameSetup::even(256, 1000), Err(SetupError::TooManyPlayers(256)));
        assert_eq!(
            GameSetup::even(4, 3),
            Err(SetupError::NotEnoughChips { chips: 3, players: 4 })
        );
    }

    #[test]
    fn test_explicit_setup() {
        let setup = GameSetup::new(vec![
            PlayerSetup::new(10).with_name("Ann"),
            PlayerSetup::new(0).with_aggression(AggressionLevel::NonNeighbours),
            PlayerSetup::new(5),
        ])
        .unwrap();

        assert_eq!(setup.total_chips(), 15);
        assert_eq!(setup.player(PlayerId::new(1)).name, "Ann");
        assert_eq!(
            setup.player(PlayerId::new(2)).aggression,
            AggressionLevel::NonNeighbours
        );
        assert!(setup.take_centre_on_triple_steal());
    }

    #[test]
    fn test_explicit_setup_rejects_negative() {
        let err = GameSetup::new(vec![PlayerSetup::new(3), PlayerSetup::new(-1)]).unwrap_err();
        assert_eq!(err, SetupError::NegativeChips { player: 2, chips: -1 });

        let err = GameSetup::new(vec![PlayerSetup::new(3)]).unwrap_err();
        assert_eq!(err, SetupError::TooFewPlayers(1));
    }

    #[test]
    fn test_builders() {
        let setup = GameSetup::even(3, 30)
            .unwrap()
            .with_aggression(AggressionLevel::Any)
            .with_player_aggression(PlayerId::new(3), AggressionLevel::NonNeighbours)
            .unwrap()
            .with_names(["a", "b"])
            .with_centre_steal(false);

        assert_eq!(setup.player(PlayerId::new(1)).aggression, AggressionLevel::Any);
        assert_eq!(
            setup.player(PlayerId::new(3)).aggression,
            AggressionLevel::NonNeighbours
        );
        assert_eq!(setup.player(PlayerId::new(2)).name, "b");
        assert_eq!(setup.player(PlayerId::new(3)).name, "");
        assert!(!setup.take_centre_on_triple_steal());
    }

    #[test]
    fn test_unknown_player_aggression() {
        let err = GameSetup::even(3, 30)
            .unwrap()
            .with_player_aggression(PlayerId::new(4), AggressionLevel::Any)
            .unwrap_err();
        assert_eq!(err, SetupError::UnknownPlayer { player: 4, players: 3 });
    }

    #[test]
    fn test_setup_serde() {
        let setup = GameSetup::even(3, 30).unwrap().with_centre_steal(false);
        let json = serde_json::to_string(&setup).unwrap();
        let back: GameSetup = serde_json::from_str(&json).unwrap();
        assert_eq!(setup, back);
    }
}
