//! Game and move countdowns.
//!
//! The engine owns no wall clock. Each call to [`Countdown::advance`] is one
//! elapsed second, driven by whatever tick source surrounds the session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A single countdown measured in whole seconds. A total of zero disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    total: u32,
    remaining: u32,
}

impl Countdown {
    /// Create a full countdown of `total` seconds (0 = disabled).
    pub fn new(total: u32) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    /// Whether this countdown runs at all.
    pub fn is_enabled(&self) -> bool {
        self.total > 0
    }

    /// Configured length in seconds.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Count down one second. Returns `true` only on the tick that reaches zero.
    pub fn advance(&mut self) -> bool {
        if !self.is_enabled() || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Refill to the configured total.
    pub fn reset(&mut self) {
        self.remaining = self.total;
    }

    /// Drop straight to zero.
    pub fn expire(&mut self) {
        self.remaining = 0;
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_enabled() {
            return f.write_str("--:--");
        }
        write!(f, "{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

/// The pair of clocks a game runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualTimer {
    /// Counts down the whole game; expiry ends it by tie-break.
    pub game: Countdown,
    /// Counts down the current move; expiry skips the turn.
    pub moves: Countdown,
}

impl DualTimer {
    /// Create both clocks at full time.
    pub fn new(game_secs: u32, move_secs: u32) -> Self {
        Self {
            game: Countdown::new(game_secs),
            moves: Countdown::new(move_secs),
        }
    }

    /// Create both clocks from a game configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.game_duration_secs, config.move_duration_secs)
    }
}
