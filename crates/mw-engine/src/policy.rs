//! The contract between a session and an external opponent policy.
//!
//! The engine never calls a policy on its own. The surrounding system opens
//! a decision with [`Session::begin_opponent_turn`](crate::Session::begin_opponent_turn),
//! lets the think delay run down through ticks, asks its policy for a
//! decision, and hands the decision back together with the ticket it was
//! given. A ticket from an abandoned game or an undone turn is refused.
//! Once the delay is over the move clock runs again; a decision still
//! unanswered when it expires is discarded and the turn passes.

use crate::dice::DieId;
use crate::expression::ExprToken;
use crate::state::GameState;

/// A single move chosen by an opponent policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpponentDecision {
    /// Pass the turn.
    Skip,
    /// Capture `target` with one die.
    Strength {
        /// The attacking die.
        attacker: DieId,
        /// The opponent die to capture.
        target: DieId,
    },
    /// Capture `target` with an expression over several dice.
    Mind {
        /// The full expression, dice in the order they are used.
        tokens: Vec<ExprToken>,
        /// The opponent die to capture.
        target: DieId,
    },
}

/// Chooses moves for one side.
pub trait OpponentPolicy {
    /// Pick a move for the side whose turn it is.
    fn decide(&mut self, view: &GameState) -> OpponentDecision;
}

impl<F> OpponentPolicy for F
where
    F: FnMut(&GameState) -> OpponentDecision,
{
    fn decide(&mut self, view: &GameState) -> OpponentDecision {
        self(view)
    }
}

/// Identifies one opened decision. Only the ticket of the decision that is
/// still pending will be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionTicket {
    generation: u64,
    turn: u64,
}

impl DecisionTicket {
    pub(crate) fn new(generation: u64, turn: u64) -> Self {
        Self { generation, turn }
    }

    /// The session generation (bumped by new game and abandon).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The turn serial the decision was opened on.
    pub fn turn(&self) -> u64 {
        self.turn
    }
}

/// A decision the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingDecision {
    pub(crate) ticket: DecisionTicket,
    pub(crate) think_remaining: u32,
}

impl PendingDecision {
    pub(crate) fn is_ready(&self) -> bool {
        self.think_remaining == 0
    }

    /// One second of thinking. Returns `true` on the tick that finishes it.
    pub(crate) fn advance(&mut self) -> bool {
        if self.think_remaining == 0 {
            return false;
        }
        self.think_remaining -= 1;
        self.think_remaining == 0
    }
}
