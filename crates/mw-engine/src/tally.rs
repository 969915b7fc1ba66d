//! Per-game statistics, kept for the lifetime of a session only.

use serde::{Deserialize, Serialize};

use crate::dice::Player;
use crate::selection::AttackType;

/// Running counts for the current game, indexed by player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTally {
    /// Captures made with a strength attack.
    pub strength_captures: [u32; 2],
    /// Captures made with a mind attack.
    pub mind_captures: [u32; 2],
    /// Most dice used in a single mind attack.
    pub biggest_combo: [usize; 2],
    /// Turns passed, by choice or on timeout.
    pub skips: [u32; 2],
    /// Seconds the game has been running.
    pub elapsed_secs: u32,
}

impl GameTally {
    pub(crate) fn record_capture(&mut self, player: Player, attack: AttackType, dice_used: usize) {
        let i = player.index();
        match attack {
            AttackType::Strength => self.strength_captures[i] += 1,
            AttackType::Mind => {
                self.mind_captures[i] += 1;
                self.biggest_combo[i] = self.biggest_combo[i].max(dice_used);
            }
        }
    }

    pub(crate) fn record_skip(&mut self, player: Player) {
        self.skips[player.index()] += 1;
    }

    /// Total captures made by `player`.
    pub fn captures(&self, player: Player) -> u32 {
        let i = player.index();
        self.strength_captures[i] + self.mind_captures[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_captures_by_type() {
        let mut tally = GameTally::default();
        tally.record_capture(Player::One, AttackType::Strength, 1);
        tally.record_capture(Player::One, AttackType::Mind, 3);
        tally.record_capture(Player::One, AttackType::Mind, 2);
        tally.record_capture(Player::Two, AttackType::Mind, 4);
        assert_eq!(tally.captures(Player::One), 3);
        assert_eq!(tally.mind_captures, [2, 1]);
        assert_eq!(tally.biggest_combo, [3, 4]);
    }

    #[test]
    fn records_skips() {
        let mut tally = GameTally::default();
        tally.record_skip(Player::Two);
        tally.record_skip(Player::Two);
        assert_eq!(tally.skips, [0, 2]);
        assert_eq!(tally.captures(Player::Two), 0);
    }
}
