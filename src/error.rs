//! Error types for game setup and history handling.
//!
//! Turn resolution itself never fails: every dice symbol has a defined
//! effect and an empty steal-target set is a no-op. Errors only arise from
//! invalid configuration and from malformed recorded histories.

use thiserror::Error;

/// Invalid game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Fewer than two players.
    #[error("too few players: {0} (minimum 2)")]
    TooFewPlayers(usize),

    /// More players than a `PlayerId` can address.
    #[error("too many players: {0} (maximum 255)")]
    TooManyPlayers(usize),

    /// The chip pool cannot give every player at least one chip.
    #[error("not enough chips: {chips} chips for {players} players")]
    NotEnoughChips {
        /// Requested chip pool.
        chips: i64,
        /// Requested player count.
        players: usize,
    },

    /// A player was configured with a negative starting stack.
    #[error("player {player} starts with negative chips ({chips})")]
    NegativeChips {
        /// 1-based player id.
        player: u8,
        /// Configured chips.
        chips: i64,
    },

    /// A player id outside `1..=player_count`.
    #[error("no player {player} in a {players}-player game")]
    UnknownPlayer {
        /// Requested 1-based player id.
        player: u8,
        /// Player count.
        players: usize,
    },

    /// A starting position with a negative centre pile.
    #[error("centre pile cannot start negative ({0})")]
    NegativeCentrePile(i64),

    /// Aggression level outside `1..=3`.
    #[error("invalid aggression level {0} (expected 1, 2 or 3)")]
    InvalidAggression(u8),
}

/// Failure reading or decoding a recorded history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV layer could not read or write a record.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row is missing or does not have the expected columns.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// A row has the wrong number of cells or an unparseable number.
    #[error("malformed row {row}: {reason}")]
    MalformedRow {
        /// 0-based data row index.
        row: usize,
        /// What was wrong.
        reason: String,
    },

    /// A `dices` cell is not a bracketed list of quoted symbols.
    #[error("malformed dice cell in row {row}: {cell:?}")]
    MalformedDice {
        /// 0-based data row index.
        row: usize,
        /// Raw cell contents.
        cell: String,
    },

    /// A dice symbol outside `L`, `R`, `C`, `d`, `pd`.
    #[error("unknown dice symbol {0:?}")]
    UnknownSymbol(String),

    /// The history contains no turns at all.
    #[error("history is empty")]
    Empty,

    /// Binary snapshot could not be encoded or decoded.
    #[error("binary encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Result alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
