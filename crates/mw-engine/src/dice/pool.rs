//! A player's six dice.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::roll::roll_biased;
use super::{Die, DieId, Player, Sides};
use crate::config::DiceSort;
use crate::error::{EngineError, EngineResult};

/// The fixed set of six dice owned by one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    owner: Player,
    dice: Vec<Die>,
}

impl Pool {
    /// Roll a fresh pool for `owner`, ordered by `sort`.
    pub fn roll<R: Rng + ?Sized>(owner: Player, sort: DiceSort, bias: i32, rng: &mut R) -> Self {
        let mut dice: Vec<Die> = Sides::ALL
            .iter()
            .map(|&sides| Die {
                id: DieId::new(owner, sides),
                value: roll_biased(&mut *rng, sides, bias),
                captured: false,
            })
            .collect();
        match sort {
            DiceSort::Value => dice.sort_by_key(|d| d.value),
            DiceSort::Sides => dice.sort_by_key(|d| d.sides()),
        }
        Self { owner, dice }
    }

    /// Build a pool from explicit faces, given in [`Sides::ALL`] order.
    ///
    /// Fails if a face is outside its die's range.
    pub fn from_values(owner: Player, values: [u32; 6]) -> EngineResult<Self> {
        let mut dice = Vec::with_capacity(6);
        for (sides, value) in Sides::ALL.into_iter().zip(values) {
            if !(1..=sides.count()).contains(&value) {
                return Err(EngineError::IllegalSelection(format!(
                    "{sides} cannot show {value}"
                )));
            }
            dice.push(Die {
                id: DieId::new(owner, sides),
                value,
                captured: false,
            });
        }
        Ok(Self { owner, dice })
    }

    /// The player who owns this pool.
    pub fn owner(&self) -> Player {
        self.owner
    }

    /// All dice, in creation order.
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    /// Look up a die by id.
    pub fn get(&self, id: DieId) -> Option<&Die> {
        self.dice.iter().find(|d| d.id == id)
    }

    /// Iterate over the dice not yet captured.
    pub fn active(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| d.is_active())
    }

    /// Number of dice not yet captured.
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Number of dice the opponent has captured.
    pub fn captured_count(&self) -> usize {
        self.dice.len() - self.active_count()
    }

    /// True once every die has been captured.
    pub fn is_eliminated(&self) -> bool {
        self.active_count() == 0
    }

    /// Faces of every die, ascending.
    pub fn sorted_values(&self) -> Vec<u32> {
        let mut values: Vec<u32> = self.dice.iter().map(|d| d.value).collect();
        values.sort_unstable();
        values
    }

    /// Mark a die as captured. Returns false if it was not found.
    pub(crate) fn capture(&mut self, id: DieId) -> bool {
        match self.dice.iter_mut().find(|d| d.id == id) {
            Some(die) => {
                die.captured = true;
                true
            }
            None => false,
        }
    }

    /// Re-roll an active die, returning its new face.
    pub(crate) fn reroll<R: Rng + ?Sized>(
        &mut self,
        id: DieId,
        bias: i32,
        rng: &mut R,
    ) -> Option<u32> {
        let die = self.dice.iter_mut().find(|d| d.id == id && !d.captured)?;
        die.value = roll_biased(rng, die.sides(), bias);
        Some(die.value)
    }
}
