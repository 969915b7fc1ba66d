//! Dice, die identities, and the two player slots.
//!
//! Every player owns exactly one die of each [`Sides`] value, so a die is
//! identified by its owner and its side-count.

pub mod pool;
pub mod roll;

pub use pool::Pool;
pub use roll::roll_biased;

use serde::{Deserialize, Serialize};

/// One of the two player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// Player slot 1.
    One,
    /// Player slot 2.
    Two,
}

impl Player {
    /// Both player slots in seat order.
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// Returns the other player slot.
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Zero-based seat index.
    pub fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Seat number as shown to players (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// The face-count of a die. The set of six is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sides {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
}

impl Sides {
    /// Every die a player owns, smallest first.
    pub const ALL: [Sides; 6] = [
        Sides::D4,
        Sides::D6,
        Sides::D8,
        Sides::D10,
        Sides::D12,
        Sides::D20,
    ];

    /// Returns the number of faces.
    pub fn count(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// Parse a die from a string like "d20" or "D6".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "d4" => Some(Self::D4),
            "d6" => Some(Self::D6),
            "d8" => Some(Self::D8),
            "d10" => Some(Self::D10),
            "d12" => Some(Self::D12),
            "d20" => Some(Self::D20),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.count())
    }
}

/// Stable identity of a die: its owner plus its side-count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DieId {
    /// The player whose pool holds the die.
    pub owner: Player,
    /// The die's face-count.
    pub sides: Sides,
}

impl DieId {
    /// Create an id for `owner`'s die with the given face-count.
    pub fn new(owner: Player, sides: Sides) -> Self {
        Self { owner, sides }
    }
}

impl std::fmt::Display for DieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}:{}", self.owner.number(), self.sides)
    }
}

/// A single die in a player's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    /// Identity of the die.
    pub id: DieId,
    /// The face currently showing (1 to `sides`).
    pub value: u32,
    /// Whether the opponent has captured this die.
    pub captured: bool,
}

impl Die {
    /// The die's face-count.
    pub fn sides(&self) -> Sides {
        self.id.sides
    }

    /// True while the die has not been captured.
    pub fn is_active(&self) -> bool {
        !self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_opponent_and_index() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
        assert_eq!(Player::One.index(), 0);
        assert_eq!(Player::Two.index(), 1);
        assert_eq!(Player::Two.to_string(), "player 2");
    }

    #[test]
    fn sides_count() {
        let counts: Vec<u32> = Sides::ALL.iter().map(|s| s.count()).collect();
        assert_eq!(counts, vec![4, 6, 8, 10, 12, 20]);
    }

    #[test]
    fn sides_from_str() {
        assert_eq!(Sides::from_str_tag("d20"), Some(Sides::D20));
        assert_eq!(Sides::from_str_tag(" D6 "), Some(Sides::D6));
        assert_eq!(Sides::from_str_tag("d100"), None);
        assert_eq!(Sides::from_str_tag("foo"), None);
    }

    #[test]
    fn die_id_display() {
        assert_eq!(DieId::new(Player::One, Sides::D12).to_string(), "p1:d12");
        assert_eq!(DieId::new(Player::Two, Sides::D4).to_string(), "p2:d4");
    }
}
