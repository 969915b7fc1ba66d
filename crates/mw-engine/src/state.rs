//! The observable state of one game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::{Die, DieId, Player, Pool};
use crate::error::{EngineError, EngineResult};
use crate::selection::Selection;
use crate::timer::DualTimer;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOverCause {
    /// Every die of the loser was captured.
    Elimination,
    /// The game clock ran out and the tie-break decided.
    Clock,
}

impl fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elimination => f.write_str("elimination"),
            Self::Clock => f.write_str("clock"),
        }
    }
}

/// The result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// The winning side.
    pub winner: Player,
    /// Why the game ended.
    pub cause: GameOverCause,
}

/// Everything about a game that a snapshot must restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Whose turn it is.
    pub current_player: Player,
    /// The side that moved first; fixed for the whole game.
    pub first_player: Player,
    /// Commits and skips so far.
    pub move_count: u32,
    /// Set once the game ends; never cleared except by undo.
    pub outcome: Option<Outcome>,
    /// Game and move countdowns.
    pub clock: DualTimer,
    /// Player 1's pool, then player 2's.
    pub pools: [Pool; 2],
    /// The attack under construction.
    pub selection: Selection,
}

impl GameState {
    /// Set up a fresh game with `first_player` to move.
    ///
    /// Fails unless the pools belong to player 1 and player 2, in that order.
    pub fn new(pools: [Pool; 2], first_player: Player, clock: DualTimer) -> EngineResult<Self> {
        if pools[0].owner() != Player::One || pools[1].owner() != Player::Two {
            return Err(EngineError::IllegalSelection(
                "pools must be given in seat order".into(),
            ));
        }
        Ok(Self {
            current_player: first_player,
            first_player,
            move_count: 0,
            outcome: None,
            clock,
            pools,
            selection: Selection::new(),
        })
    }

    /// The pool owned by `player`.
    pub fn pool(&self, player: Player) -> &Pool {
        &self.pools[player.index()]
    }

    pub(crate) fn pool_mut(&mut self, player: Player) -> &mut Pool {
        &mut self.pools[player.index()]
    }

    /// Look up any die on the board.
    pub fn die(&self, id: DieId) -> Option<&Die> {
        self.pool(id.owner).get(id)
    }

    /// Hand the turn over: clear the selection and refill the move clock.
    pub(crate) fn pass_to_opponent(&mut self) {
        self.current_player = self.current_player.opponent();
        self.selection.clear();
        self.clock.moves.reset();
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// The winner, once the game has ended.
    pub fn winner(&self) -> Option<Player> {
        self.outcome.map(|o| o.winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Sides;

    fn state() -> GameState {
        GameState::new(
            [
                Pool::from_values(Player::One, [1, 2, 3, 4, 5, 6]).unwrap(),
                Pool::from_values(Player::Two, [4, 6, 8, 10, 12, 20]).unwrap(),
            ],
            Player::Two,
            DualTimer::new(720, 60),
        )
        .unwrap()
    }

    #[test]
    fn new_game_starts_with_first_player() {
        let s = state();
        assert_eq!(s.current_player, Player::Two);
        assert_eq!(s.first_player, Player::Two);
        assert_eq!(s.move_count, 0);
        assert!(!s.is_over());
        assert!(s.selection.is_empty());
    }

    #[test]
    fn rejects_pools_out_of_seat_order() {
        let one = Pool::from_values(Player::One, [1, 2, 3, 4, 5, 6]).unwrap();
        let two = Pool::from_values(Player::Two, [1, 2, 3, 4, 5, 6]).unwrap();
        assert!(GameState::new([two, one], Player::One, DualTimer::new(0, 0)).is_err());
    }

    #[test]
    fn die_lookup_crosses_pools() {
        let s = state();
        let id = DieId::new(Player::Two, Sides::D20);
        assert_eq!(s.die(id).map(|d| d.value), Some(20));
        assert_eq!(s.pool(Player::One).owner(), Player::One);
    }

    #[test]
    fn outcome_reports_winner() {
        let mut s = state();
        s.outcome = Some(Outcome {
            winner: Player::One,
            cause: GameOverCause::Clock,
        });
        assert!(s.is_over());
        assert_eq!(s.winner(), Some(Player::One));
        assert_eq!(GameOverCause::Clock.to_string(), "clock");
    }
}
