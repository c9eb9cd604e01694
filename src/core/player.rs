//! Player identification, per-player storage and seating arithmetic.
//!
//! ## PlayerId
//!
//! Type-safe player identifier supporting 1-255 players. Ids are 1-based,
//! matching how players are numbered around the table.
//!
//! ## PlayerMap
//!
//! Dense per-player storage backed by `Vec`, indexed by `id - 1`.
//!
//! ## Player
//!
//! A seated player: chips, aggression level, and the left/right neighbour
//! arithmetic on the circular table.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::SetupError;

/// Player identifier supporting 1-255 players.
///
/// Player ids are 1-based: the first player is `PlayerId::new(1)`. Zero is
/// rejected both by [`PlayerId::new`] and when deserializing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// Create a new player ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is 0.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id > 0, "player ids are 1-based; 0 is not a seat");
        Self(id)
    }

    /// Get the raw 1-based id.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Get the dense storage index (`id - 1`).
    #[must_use]
    pub const fn index(self) -> usize {
        // Nonzero by construction.
        self.0 as usize - 1
    }

    /// Build an id from a dense storage index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use left_right_centre::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(1));
    /// assert_eq!(players[3], PlayerId::new(4));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..=player_count as u8).map(PlayerId)
    }

    /// The next player in turn order, wrapping from the last seat to the first.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        self.adjacent(Direction::Right, player_count)
    }

    /// Neighbouring seat in `direction` on a table of `player_count` seats.
    ///
    /// ```
    /// use left_right_centre::core::{Direction, PlayerId};
    ///
    /// assert_eq!(PlayerId::new(1).adjacent(Direction::Left, 5), PlayerId::new(5));
    /// assert_eq!(PlayerId::new(5).adjacent(Direction::Right, 5), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(3).adjacent(Direction::Right, 5), PlayerId::new(4));
    /// ```
    #[must_use]
    pub fn adjacent(self, direction: Direction, player_count: usize) -> Self {
        let n = player_count as i32;
        let zero_based = i32::from(self.0) - 1 + direction.offset();
        Self::from_index(zero_based.rem_euclid(n) as usize)
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if id == 0 {
            return Err("player ids are 1-based; 0 is not a seat".to_string());
        }
        Ok(Self(id))
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Direction around the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the next lower id (wraps 1 -> N).
    Left,
    /// Towards the next higher id (wraps N -> 1).
    Right,
}

impl Direction {
    /// Seat offset: -1 for left, +1 for right.
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Which opponents a player may take a chip from on a `pd` roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggressionLevel {
    /// Level 1: only the left and right neighbours.
    #[default]
    NeighboursOnly,
    /// Level 2: anyone else at the table.
    Any,
    /// Level 3: anyone except the two neighbours.
    NonNeighbours,
}

impl AggressionLevel {
    /// Numeric level (1, 2 or 3).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            AggressionLevel::NeighboursOnly => 1,
            AggressionLevel::Any => 2,
            AggressionLevel::NonNeighbours => 3,
        }
    }
}

impl TryFrom<u8> for AggressionLevel {
    type Error = SetupError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(AggressionLevel::NeighboursOnly),
            2 => Ok(AggressionLevel::Any),
            3 => Ok(AggressionLevel::NonNeighbours),
            other => Err(SetupError::InvalidAggression(other)),
        }
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per player, indexed by `id - 1`.
///
/// ## Example
///
/// ```
/// use left_right_centre::core::{PlayerId, PlayerMap};
///
/// let mut chips: PlayerMap<i64> = PlayerMap::new(4, |_| 25);
/// assert_eq!(chips[PlayerId::new(1)], 25);
///
/// chips[PlayerId::new(2)] -= 1;
/// assert_eq!(chips[PlayerId::new(2)], 24);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each player.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = PlayerId::all(player_count).map(factory).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Build from values listed in seat order (player 1 first).
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Values in seat order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId::from_index(i), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId::from_index(i), v))
    }

    /// Apply `f` to every entry, keeping seat order.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> PlayerMap<U> {
        PlayerMap {
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// A seated player.
///
/// Adjacency is derived from `id` and `total_players`, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat id, `1..=total_players`.
    pub id: PlayerId,

    /// Current chip count. Not clamped: may dip below zero while a roll
    /// is being applied.
    pub chips: i64,

    /// Number of seats at the table.
    pub total_players: usize,

    /// Steal-target policy.
    pub aggression: AggressionLevel,

    /// Display name (may be empty).
    pub name: String,
}

impl Player {
    /// Create a player with an empty name.
    #[must_use]
    pub fn new(id: PlayerId, chips: i64, total_players: usize, aggression: AggressionLevel) -> Self {
        Self {
            id,
            chips,
            total_players,
            aggression,
            name: String::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Seat id of the neighbour in `direction`.
    #[must_use]
    pub fn adjacent_id(&self, direction: Direction) -> PlayerId {
        self.id.adjacent(direction, self.total_players)
    }

    /// Left neighbour.
    #[must_use]
    pub fn left(&self) -> PlayerId {
        self.adjacent_id(Direction::Left)
    }

    /// Right neighbour.
    #[must_use]
    pub fn right(&self) -> PlayerId {
        self.adjacent_id(Direction::Right)
    }

    /// Players this player may take a chip from, in ascending id order.
    ///
    /// Self is never a candidate, nor is anyone without chips. The
    /// aggression level decides which of the rest qualify.
    #[must_use]
    pub fn steal_targets(&self, chips: &PlayerMap<i64>) -> Vec<PlayerId> {
        let left = self.left();
        let right = self.right();

        chips
            .iter()
            .filter(|&(id, &count)| {
                if id == self.id || count <= 0 {
                    return false;
                }
                let neighbour = id == left || id == right;
                match self.aggression {
                    AggressionLevel::NeighboursOnly => neighbour,
                    AggressionLevel::Any => true,
                    AggressionLevel::NonNeighbours => !neighbour,
                }
            })
            .map(|(id, _)| id)
            .collect()
    }
}
