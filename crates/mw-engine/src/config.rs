//! Configuration accepted when a game starts.

use serde::{Deserialize, Serialize};

use crate::dice::Player;
use crate::dice::roll::MAX_BIAS;
use crate::error::{EngineError, EngineResult};

/// Default game length: twelve minutes.
pub const DEFAULT_GAME_SECS: u32 = 12 * 60;

/// Default time allowed for a single move.
pub const DEFAULT_MOVE_SECS: u32 = 60;

/// Initial ordering of a freshly rolled pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceSort {
    /// Lowest face first.
    #[default]
    Value,
    /// Smallest die first.
    Sides,
}

/// Configuration for a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// RNG seed for reproducible games. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Total game length in seconds. 0 disables the game clock.
    pub game_duration_secs: u32,
    /// Time allowed per move in seconds. 0 disables the move clock.
    pub move_duration_secs: u32,
    /// Initial ordering of each pool.
    pub dice_sort: DiceSort,
    /// Force player 1 to move first instead of comparing rolls.
    pub always_first: bool,
    /// Roll bias (-3 to 3). Positive favors high faces.
    pub roll_bias: i32,
    /// The side driven by an external opponent policy, if any.
    pub policy_player: Option<Player>,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            game_duration_secs: DEFAULT_GAME_SECS,
            move_duration_secs: DEFAULT_MOVE_SECS,
            dice_sort: DiceSort::Value,
            always_first: false,
            roll_bias: 0,
            policy_player: None,
            max_events: 0,
        }
    }
}

impl GameConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the game length in seconds (0 disables the game clock).
    pub fn with_game_duration(mut self, secs: u32) -> Self {
        self.game_duration_secs = secs;
        self
    }

    /// Set the per-move time limit in seconds (0 disables the move clock).
    pub fn with_move_duration(mut self, secs: u32) -> Self {
        self.move_duration_secs = secs;
        self
    }

    /// Set the initial pool ordering.
    pub fn with_dice_sort(mut self, sort: DiceSort) -> Self {
        self.dice_sort = sort;
        self
    }

    /// Always let player 1 move first.
    pub fn with_always_first(mut self, always_first: bool) -> Self {
        self.always_first = always_first;
        self
    }

    /// Set the roll bias (clamped to -3..=3).
    pub fn with_roll_bias(mut self, bias: i32) -> Self {
        self.roll_bias = bias.clamp(-MAX_BIAS, MAX_BIAS);
        self
    }

    /// Hand one side to an external opponent policy.
    pub fn with_policy_player(mut self, player: Player) -> Self {
        self.policy_player = Some(player);
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.roll_bias = self.roll_bias.clamp(-MAX_BIAS, MAX_BIAS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = GameConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.game_duration_secs, 720);
        assert_eq!(config.move_duration_secs, 60);
        assert_eq!(config.dice_sort, DiceSort::Value);
        assert!(!config.always_first);
        assert_eq!(config.roll_bias, 0);
        assert_eq!(config.policy_player, None);
    }

    #[test]
    fn config_builder_chain() {
        let config = GameConfig::default()
            .with_seed(123)
            .with_game_duration(0)
            .with_move_duration(15)
            .with_dice_sort(DiceSort::Sides)
            .with_always_first(true)
            .with_policy_player(Player::Two)
            .with_max_events(50);
        assert_eq!(config.seed, Some(123));
        assert_eq!(config.game_duration_secs, 0);
        assert_eq!(config.move_duration_secs, 15);
        assert_eq!(config.dice_sort, DiceSort::Sides);
        assert!(config.always_first);
        assert_eq!(config.policy_player, Some(Player::Two));
        assert_eq!(config.max_events, 50);
    }

    #[test]
    fn roll_bias_clamped() {
        assert_eq!(GameConfig::default().with_roll_bias(9).roll_bias, 3);
        assert_eq!(GameConfig::default().with_roll_bias(-9).roll_bias, -3);
        assert_eq!(GameConfig::default().with_roll_bias(-2).roll_bias, -2);
    }

    #[test]
    fn from_json_fills_defaults() {
        let config =
            GameConfig::from_json(r#"{ "seed": 7, "dice_sort": "sides", "roll_bias": 10 }"#)
                .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.dice_sort, DiceSort::Sides);
        assert_eq!(config.roll_bias, 3);
        assert_eq!(config.game_duration_secs, 720);
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        let err = GameConfig::from_json(r#"{ "difficulty": "hard" }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn round_trips_through_json() {
        let config = GameConfig::default().with_seed(5).with_policy_player(Player::Two);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
