//! The game engine: turn resolution, chip movement and win detection.
//!
//! A `Game` owns the table state, the history and the RNG. Each turn:
//!
//! 1. The active player rolls `min(chips, 3)` dice.
//! 2. Three `pd` with the centre rule enabled take the whole centre pile.
//! 3. Otherwise each symbol is applied in roll order against the current
//!    state, so a `pd` sees the chips an earlier `L` already moved.
//! 4. A record is appended and the win condition is checked.
//!
//! Turn order is round-robin by ascending id. Players without chips still
//! take their turn; they roll nothing and pass.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use crate::core::{
    ChipHolder, DiceRoll, DiceSymbol, Direction, GameRng, GameRngState, GameSetup, GameState,
    PlayerId, MAX_DICE,
};
use crate::error::SetupError;
use crate::history::{History, TurnRecord};

/// What happened on one played turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Index of the new record in the history (turn 0 is the deal).
    pub turn: usize,
    /// Who rolled.
    pub player: PlayerId,
    /// What they rolled.
    pub dice: DiceRoll,
    /// Winner, if this turn ended the game.
    pub winner: Option<PlayerId>,
}

/// Serializable checkpoint of a game in progress.
///
/// Captures the table, the history, the turn order and the RNG position, so
/// a resumed game plays out exactly as the original would have.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    setup: GameSetup,
    state: GameState,
    history: History,
    rng: GameRngState,
    total_chips: i64,
    next_player: PlayerId,
}

/// A single game of Left, Right, Centre.
///
/// ## Example
///
/// ```
/// use left_right_centre::{Game, GameSetup};
///
/// let setup = GameSetup::even(3, 30).unwrap();
/// let mut game = Game::with_seed(setup, 7);
/// let winner = game.play_game();
///
/// assert!(game.is_finished());
/// assert_eq!(game.winner(), Some(winner));
/// assert_eq!(game.state().chips_in_play(), 30);
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    setup: GameSetup,
    state: GameState,
    history: History,
    rng: GameRng,
    total_chips: i64,
    next_player: PlayerId,
}

impl Game {
    /// Seat the players and record turn 0.
    #[must_use]
    pub fn new(setup: GameSetup, rng: GameRng) -> Self {
        let state = GameState::new(&setup);
        let mut history = History::new(state.player_count());
        history.push(TurnRecord::initial(&state));

        Self {
            total_chips: setup.total_chips(),
            setup,
            state,
            history,
            rng,
            next_player: PlayerId::new(1),
        }
    }

    /// Create a game driven by a `GameRng` seeded with `seed`.
    #[must_use]
    pub fn with_seed(setup: GameSetup, seed: u64) -> Self {
        Self::new(setup, GameRng::new(seed))
    }

    /// Start from a table that already has chips in the centre.
    ///
    /// Players hold the chips their `PlayerSetup` gives them; the chip pool
    /// is the dealt chips plus `centre_pile`. Turn 0 records this position,
    /// and a position that is already won starts finished.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::NegativeCentrePile` if `centre_pile < 0`.
    pub fn from_position(
        setup: GameSetup,
        rng: GameRng,
        centre_pile: i64,
    ) -> Result<Self, SetupError> {
        if centre_pile < 0 {
            return Err(SetupError::NegativeCentrePile(centre_pile));
        }

        let mut state = GameState::new(&setup);
        state.centre_pile = centre_pile;
        let mut history = History::new(state.player_count());
        history.push(TurnRecord::initial(&state));

        let mut game = Self {
            total_chips: setup.total_chips() + centre_pile,
            setup,
            state,
            history,
            rng,
            next_player: PlayerId::new(1),
        };
        game.check_for_winner();
        Ok(game)
    }

    /// Capture everything needed to continue this game later.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            setup: self.setup.clone(),
            state: self.state.clone(),
            history: self.history.clone(),
            rng: self.rng.state(),
            total_chips: self.total_chips,
            next_player: self.next_player,
        }
    }

    /// Continue a game from a snapshot.
    #[must_use]
    pub fn resume(snapshot: GameSnapshot) -> Self {
        Self {
            setup: snapshot.setup,
            state: snapshot.state,
            history: snapshot.history,
            rng: GameRng::from_state(&snapshot.rng),
            total_chips: snapshot.total_chips,
            next_player: snapshot.next_player,
        }
    }

    /// The configuration this game was created with.
    #[must_use]
    pub fn setup(&self) -> &GameSetup {
        &self.setup
    }

    /// Current table state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Every recorded turn so far.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Consume the game, keeping its history.
    #[must_use]
    pub fn into_history(self) -> History {
        self.history
    }

    /// The RNG driving dice and steals.
    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// Chips dealt at the start of the game.
    #[must_use]
    pub fn total_chips(&self) -> i64 {
        self.total_chips
    }

    /// Winner, once the game has finished.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }

    /// True once a winner has been found.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Whose turn `play_next_turn` will play.
    #[must_use]
    pub fn next_player(&self) -> PlayerId {
        self.next_player
    }

    /// Roll `count` dice.
    pub fn roll_dice(&mut self, count: usize) -> DiceRoll {
        let mut roll = DiceRoll::empty();
        for _ in 0..count {
            roll.push(self.rng.roll_die());
        }
        roll
    }

    /// Play one turn for `player`.
    ///
    /// Returns `None` without recording anything once the game is finished.
    pub fn play_turn(&mut self, player: PlayerId) -> Option<TurnOutcome> {
        if self.is_finished() {
            return None;
        }

        let chips = self.state.chips(player);
        let count = chips.clamp(0, MAX_DICE as i64) as usize;
        let dice = self.roll_dice(count);

        self.distribute_chips(&dice, player);
        self.history
            .push(TurnRecord::after_turn(&self.state, player, dice.clone()));
        let winner = self.check_for_winner();

        let turn = self.history.len() - 1;
        debug!(
            turn,
            %player,
            dice = %dice,
            centre_pile = self.state.centre_pile,
            "turn resolved"
        );

        Some(TurnOutcome {
            turn,
            player,
            dice,
            winner,
        })
    }

    /// Play the next player's turn and advance the turn order.
    pub fn play_next_turn(&mut self) -> Option<TurnOutcome> {
        let player = self.next_player;
        let outcome = self.play_turn(player)?;
        self.next_player = player.next(self.state.player_count());
        Some(outcome)
    }

    /// Play until someone wins and return the winner.
    #[instrument(skip(self), fields(players = self.state.player_count(), chips = self.total_chips))]
    pub fn play_game(&mut self) -> PlayerId {
        loop {
            if let Some(winner) = self.state.winner() {
                return winner;
            }
            self.play_next_turn();
        }
    }

    /// Play at most `max_turns` more turns.
    ///
    /// Returns the winner if the game finished within the limit.
    #[instrument(skip(self), fields(players = self.state.player_count()))]
    pub fn play_until(&mut self, max_turns: usize) -> Option<PlayerId> {
        for _ in 0..max_turns {
            if self.is_finished() {
                break;
            }
            self.play_next_turn();
        }
        self.state.winner()
    }

    /// Apply a roll for `player` without recording it.
    ///
    /// Counts are not clamped: with enough `L`/`R`/`C` a player can go
    /// below zero before a later `pd` restores them.
    pub fn distribute_chips(&mut self, dice: &DiceRoll, player: PlayerId) {
        if self.setup.take_centre_on_triple_steal() && dice.is_triple_steal() {
            let taken = self.state.take_centre_pile(player);
            trace!(%player, taken, "triple steal takes the centre pile");
            return;
        }

        for &symbol in dice.symbols() {
            self.apply_symbol(symbol, player);
        }
    }

    /// Check whether one player holds every chip outside the centre pile.
    ///
    /// Players are checked in seat order; the first match wins and the
    /// game moves to the finished state.
    pub fn check_for_winner(&mut self) -> Option<PlayerId> {
        if let Some(winner) = self.state.winner() {
            return Some(winner);
        }

        let outside_centre = self.total_chips - self.state.centre_pile;
        let winner = self
            .state
            .player_ids()
            .find(|&id| self.state.chips(id) == outside_centre)?;

        self.state.finish(winner);
        info!(
            %winner,
            chips = outside_centre,
            centre_pile = self.state.centre_pile,
            turns = self.history.len().saturating_sub(1),
            "game won"
        );
        Some(winner)
    }

    fn apply_symbol(&mut self, symbol: DiceSymbol, player: PlayerId) {
        let me = ChipHolder::Player(player);
        let n = self.state.player_count();

        match symbol {
            DiceSymbol::Left => {
                let left = player.adjacent(Direction::Left, n);
                self.state.move_chip(me, ChipHolder::Player(left));
            }
            DiceSymbol::Right => {
                let right = player.adjacent(Direction::Right, n);
                self.state.move_chip(me, ChipHolder::Player(right));
            }
            DiceSymbol::Centre => self.state.move_chip(me, ChipHolder::Centre),
            DiceSymbol::Dot => {}
            DiceSymbol::PlusDot => {
                let stealer = self.state.player(player);
                let level = stealer.aggression.level();
                let targets = stealer.steal_targets(&self.state.chip_counts());
                if let Some(&target) = self.rng.choose(&targets) {
                    trace!(%player, %target, level, "steal");
                    self.state.move_chip(ChipHolder::Player(target), me);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AggressionLevel, DiceSymbol::*, GameStatus, PlayerSetup};

    fn game(players: usize, chips: i64) -> Game {
        Game::with_seed(GameSetup::even(players, chips).unwrap(), 42)
    }

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_new_game() {
        let g = game(5, 20);

        assert!(!g.is_finished());
        assert_eq!(g.state().centre_pile, 0);
        assert_eq!(g.total_chips(), 20);
        assert_eq!(g.history().len(), 1);
        assert_eq!(g.next_player(), p(1));
        for id in g.state().player_ids() {
            assert_eq!(g.state().chips(id), 4);
        }
    }

    #[test]
    fn test_roll_count_follows_chips() {
        let mut g = game(5, 20);

        for (i, chips) in (0..5).enumerate() {
            g.state_mut().set_chips(p(1), chips);
            let outcome = g.play_turn(p(1)).unwrap();

            assert_eq!(outcome.dice.len(), chips.min(3) as usize);
            let record = g.history().get(i + 1).unwrap();
            assert_eq!(record.active_player, Some(p(1)));
            assert_eq!(record.dice.as_ref().unwrap().len(), chips.min(3) as usize);
        }
    }

    #[test]
    fn test_zero_chip_player_passes() {
        let mut g = game(3, 30);
        g.state_mut().set_chips(p(2), 0);
        let before = g.state().chip_counts();

        let outcome = g.play_turn(p(2)).unwrap();

        assert!(outcome.dice.is_empty());
        assert_eq!(g.state().chip_counts(), before);
        assert_eq!(g.history().last().unwrap().dice, Some(DiceRoll::empty()));
    }

    #[test]
    fn test_distribute_recorded_rolls() {
        // Rolls and resulting tables from a recorded 3-player game.
        let mut g = game(3, 300);
        let turns: [(u8, [DiceSymbol; 3], [i64; 3], i64); 5] = [
            (1, [Dot, Dot, Dot], [100, 100, 100], 0),
            (2, [Left, Right, Centre], [101, 97, 101], 1),
            (3, [Left, Centre, Right], [102, 98, 98], 2),
            (1, [Left, Right, Dot], [100, 99, 99], 2),
            (2, [PlusDot, PlusDot, PlusDot], [100, 101, 99], 0),
        ];

        for (player, dice, chips, centre) in turns {
            g.distribute_chips(&DiceRoll::from(dice), p(player));
            assert_eq!(g.state().chip_counts().as_slice(), &chips);
            assert_eq!(g.state().centre_pile, centre);
        }
    }

    #[test]
    fn test_triple_steal_takes_centre() {
        let mut g = game(3, 30);
        g.state_mut().centre_pile = 5;
        g.state_mut().set_chips(p(1), 5);

        g.distribute_chips(&DiceRoll::from([PlusDot, PlusDot, PlusDot]), p(1));

        assert_eq!(g.state().chips(p(1)), 10);
        assert_eq!(g.state().chips(p(2)), 10);
        assert_eq!(g.state().chips(p(3)), 10);
        assert_eq!(g.state().centre_pile, 0);
    }

    #[test]
    fn test_triple_steal_without_centre_rule() {
        let setup = GameSetup::even(3, 30).unwrap().with_centre_steal(false);
        let mut g = Game::with_seed(setup, 1);
        g.state_mut().centre_pile = 5;
        g.state_mut().set_chips(p(1), 5);

        g.distribute_chips(&DiceRoll::from([PlusDot, PlusDot, PlusDot]), p(1));

        // Three single steals from the neighbours instead.
        assert_eq!(g.state().chips(p(1)), 8);
        assert_eq!(g.state().chips(p(2)) + g.state().chips(p(3)), 17);
        assert_eq!(g.state().centre_pile, 5);
    }

    #[test]
    fn test_steal_sees_earlier_symbols() {
        // Player 2 passes its only chip left, then steals it back from the
        // only eligible target: player 1, who just received it.
        let setup = GameSetup::even(3, 3).unwrap();
        let mut g = Game::with_seed(setup, 3);
        g.state_mut().set_chips(p(1), 0);
        g.state_mut().set_chips(p(3), 0);
        g.state_mut().centre_pile = 2;

        g.distribute_chips(&DiceRoll::from_symbols(&[Left, PlusDot]), p(2));

        assert_eq!(g.state().chip_counts().as_slice(), &[0, 1, 0]);
    }

    #[test]
    fn test_unclamped_intermediate() {
        let mut g = game(3, 6);
        g.state_mut().set_chips(p(1), 1);

        g.distribute_chips(&DiceRoll::from_symbols(&[Left, Left]), p(1));
        assert_eq!(g.state().chips(p(1)), -1);

        g.distribute_chips(&DiceRoll::from_symbols(&[PlusDot]), p(1));
        assert_eq!(g.state().chips(p(1)), 0);
    }

    #[test]
    fn test_steal_with_no_targets_is_noop() {
        let setup = GameSetup::even(3, 30)
            .unwrap()
            .with_aggression(AggressionLevel::NonNeighbours);
        let mut g = Game::with_seed(setup, 9);
        let before = g.state().chip_counts();

        g.distribute_chips(&DiceRoll::from_symbols(&[PlusDot, PlusDot]), p(1));

        assert_eq!(g.state().chip_counts(), before);
    }

    #[test]
    fn test_check_for_winner_cases() {
        // players, chips, centre pile, expected winner
        let cases: [(&[i64], i64, Option<u8>); 3] = [
            (&[0, 0, 400, 0, 0], 100, Some(3)),
            (&[0, 34, 0], 65, Some(2)),
            (&[0, 34, 0, 26], 140, None),
        ];

        for (chips, centre, expected) in cases {
            let total = chips.iter().sum::<i64>() + centre;
            let mut g = game(chips.len(), total);
            for (i, &c) in chips.iter().enumerate() {
                g.state_mut().set_chips(PlayerId::from_index(i), c);
            }
            g.state_mut().centre_pile = centre;

            let winner = g.check_for_winner();

            assert_eq!(winner, expected.map(p), "{chips:?}");
            assert_eq!(g.is_finished(), expected.is_some());
        }
    }

    #[test]
    fn test_finished_is_absorbing() {
        let mut g = game(3, 99);
        g.state_mut().set_chips(p(1), 0);
        g.state_mut().set_chips(p(2), 34);
        g.state_mut().set_chips(p(3), 0);
        g.state_mut().centre_pile = 65;
        assert_eq!(g.check_for_winner(), Some(p(2)));

        let len = g.history().len();
        assert_eq!(g.play_turn(p(3)), None);
        assert_eq!(g.play_next_turn(), None);
        assert_eq!(g.history().len(), len);
        assert_eq!(g.play_game(), p(2));
    }

    #[test]
    fn test_from_position() {
        let setup = GameSetup::new(vec![
            PlayerSetup::new(3),
            PlayerSetup::new(0),
            PlayerSetup::new(2),
        ])
        .unwrap();
        let g = Game::from_position(setup, GameRng::new(5), 4).unwrap();

        assert_eq!(g.total_chips(), 9);
        assert_eq!(g.state().centre_pile, 4);
        assert!(!g.is_finished());
        let first = g.history().get(0).unwrap();
        assert_eq!(first.chips.as_slice(), &[3, 0, 2]);
        assert_eq!(first.centre_pile, 4);

        let setup = GameSetup::even(2, 4).unwrap();
        assert_eq!(
            Game::from_position(setup, GameRng::new(5), -1).err(),
            Some(SetupError::NegativeCentrePile(-1))
        );
    }

    #[test]
    fn test_play_game_returns_at_once_when_position_is_won() {
        let setup = GameSetup::new(vec![
            PlayerSetup::new(0),
            PlayerSetup::new(34),
            PlayerSetup::new(0),
        ])
        .unwrap();
        let mut g = Game::from_position(setup, GameRng::new(1), 65).unwrap();

        assert!(g.is_finished());
        assert_eq!(g.state().status(), GameStatus::Finished);
        assert_eq!(g.play_game(), p(2));
        assert_eq!(g.play_until(10), Some(p(2)));
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn test_resume_from_snapshot_replays_identically() {
        let mut original = game(4, 40);
        original.play_until(9);

        let json = serde_json::to_string(&original.snapshot()).unwrap();
        let snapshot: GameSnapshot = serde_json::from_str(&json).unwrap();
        let mut resumed = Game::resume(snapshot);

        assert_eq!(resumed.next_player(), original.next_player());
        assert_eq!(resumed.history(), original.history());
        assert_eq!(resumed.play_game(), original.play_game());
        assert_eq!(resumed.history(), original.history());
    }

    #[test]
    fn test_play_next_turn_round_robin() {
        let mut g = game(4, 4000);
        let order: Vec<_> = (0..9)
            .filter_map(|_| g.play_next_turn())
            .map(|o| o.player.get())
            .collect();

        assert_eq!(order, vec![1, 2, 3, 4, 1, 2, 3, 4, 1]);
    }

    #[test]
    fn test_play_game_conserves_chips() {
        let mut g = game(3, 300);
        let winner = g.play_game();

        assert_eq!(g.winner(), Some(winner));
        assert_eq!(g.state().chips_in_play(), 300);
        assert_eq!(
            g.state().chips(winner),
            g.total_chips() - g.state().centre_pile
        );
        assert!(g.history().iter().all(|r| r.chips_in_play() == 300));
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = game(4, 40);
        let mut b = game(4, 40);
        a.play_game();
        b.play_game();

        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_play_until_limit() {
        let mut g = game(4, 4000);
        assert_eq!(g.play_until(5), None);
        assert_eq!(g.history().len(), 6);
        assert_eq!(g.next_player(), p(2));
    }
}
