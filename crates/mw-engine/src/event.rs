//! Game events, recorded as they happen for observers to read back.

use crate::dice::{DieId, Player};
use crate::selection::AttackType;
use crate::state::GameOverCause;

/// What kind of game event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEventKind {
    /// A new game was set up.
    GameStarted {
        /// The side that moves first.
        first_player: Player,
    },
    /// An attack was committed and captured a die.
    AttackCommitted {
        /// The capturing side.
        player: Player,
        /// How the capture was made.
        attack: AttackType,
        /// The captured die.
        captured: DieId,
        /// The comparison or expression, e.g. `5 ≥ 3` or `2 + 3 = 5`.
        text: String,
    },
    /// A player passed.
    TurnSkipped {
        /// The side that passed.
        player: Player,
    },
    /// The move clock ran out and the turn was skipped.
    TurnTimedOut {
        /// The side whose turn expired.
        player: Player,
    },
    /// The game ended.
    GameOver {
        /// The winning side.
        winner: Player,
        /// Whether the game ended by elimination or by the clock.
        cause: GameOverCause,
    },
    /// The last committed attack was taken back.
    UndoPerformed {
        /// The side whose attack was taken back.
        player: Player,
    },
    /// A pending opponent decision was cancelled.
    DecisionDiscarded {
        /// The side that was deciding.
        player: Player,
    },
}

impl GameEventKind {
    /// Whether `who` is the subject. A game start concerns both sides.
    pub fn involves(&self, who: Player) -> bool {
        match self {
            Self::GameStarted { .. } => true,
            Self::AttackCommitted { player, .. }
            | Self::TurnSkipped { player }
            | Self::TurnTimedOut { player }
            | Self::UndoPerformed { player }
            | Self::DecisionDiscarded { player } => *player == who,
            Self::GameOver { winner, .. } => *winner == who,
        }
    }
}

/// One entry in the game's event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    /// `move_count` after the event.
    pub move_number: u32,
    /// What happened.
    pub kind: GameEventKind,
    /// One line for people to read.
    pub description: String,
}

impl GameEvent {
    /// Stamp an event with the move it happened on.
    pub fn new(move_number: u32, kind: GameEventKind, description: impl Into<String>) -> Self {
        Self {
            move_number,
            kind,
            description: description.into(),
        }
    }
}

/// The events of one game, oldest first.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    max_events: usize,
}

impl EventLog {
    /// An empty log keeping at most `max_events` entries (0 keeps all).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Record an event. Past capacity the oldest entries fall off.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Everything still held.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events stamped with `move_number`.
    pub fn events_at_move(&self, move_number: u32) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.move_number == move_number)
            .collect()
    }

    /// Events whose subject is `player`.
    pub fn events_for_player(&self, player: Player) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.involves(player))
            .collect()
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skipped(move_number: u32, player: Player) -> GameEvent {
        GameEvent::new(move_number, GameEventKind::TurnSkipped { player }, "skip")
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(skipped(1, Player::One));
        log.push(skipped(2, Player::Two));
        assert_eq!(log.len(), 2);
        assert_eq!(log.events_at_move(1).len(), 1);
        assert_eq!(log.events_for_player(Player::Two).len(), 1);
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(skipped(i, Player::One));
        }
        assert_eq!(log.len(), 2);
        // Oldest events were dropped, newest remain
        assert_eq!(log.events()[0].move_number, 3);
        assert_eq!(log.events()[1].move_number, 4);
    }

    #[test]
    fn event_kind_involves_player() {
        let start = GameEventKind::GameStarted {
            first_player: Player::Two,
        };
        assert!(start.involves(Player::One));
        assert!(start.involves(Player::Two));

        let over = GameEventKind::GameOver {
            winner: Player::One,
            cause: GameOverCause::Clock,
        };
        assert!(over.involves(Player::One));
        assert!(!over.involves(Player::Two));
    }
}
