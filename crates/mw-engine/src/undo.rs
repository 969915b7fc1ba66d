//! One level of take-back.

use crate::dice::Player;
use crate::state::GameState;
use crate::tally::GameTally;

/// Everything needed to put a game back as it was before a commit.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub(crate) state: GameState,
    pub(crate) tally: GameTally,
    pub(crate) taker: Player,
}

/// Holds at most one snapshot; storing a new one discards the old.
#[derive(Debug, Default)]
pub struct UndoSlot {
    snapshot: Option<Snapshot>,
}

impl UndoSlot {
    /// Whether a snapshot is held.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_none()
    }

    pub(crate) fn store(&mut self, state: GameState, tally: GameTally, taker: Player) {
        self.snapshot = Some(Snapshot {
            state,
            tally,
            taker,
        });
    }

    pub(crate) fn take(&mut self) -> Option<Snapshot> {
        self.snapshot.take()
    }

    pub(crate) fn clear(&mut self) {
        self.snapshot = None;
    }
}
