//! Skill check success formula.
//!
//! A skill check compares a player's stat value against the authored target
//! number. The comparison yields a percentage chance, and a single d100 roll
//! decides the outcome:
//!
//! ```text
//! chance = clamp(base_chance + per_point * (stat - target), min_chance, max_chance)
//! success iff roll <= chance        (roll uniform in 1..=100)
//! ```
//!
//! The four parameters are game-balance settings, not engine logic, so they
//! are carried by [`SkillCheckFormula`] and can be tuned per deployment.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Lowest and highest face of the percentile die.
pub const D100_MIN: i32 = 1;
pub const D100_MAX: i32 = 100;

/// Tunable parameters of the skill check formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheckFormula {
    /// Chance (percent) when the stat exactly meets the target number
    pub base_chance: i32,
    /// Percentage points gained per stat point above the target (lost below)
    pub per_point: i32,
    /// Floor of the chance, so no check is hopeless
    pub min_chance: i32,
    /// Ceiling of the chance, so no check is certain
    pub max_chance: i32,
}

impl Default for SkillCheckFormula {
    fn default() -> Self {
        Self {
            base_chance: 50,
            per_point: 10,
            min_chance: 5,
            max_chance: 95,
        }
    }
}

/// Whether a skill check passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCheckOutcome {
    Success,
    Failure,
}

impl SkillCheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SkillCheckOutcome::Success)
    }
}

/// A resolved roll with the numbers that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillCheckRoll {
    pub roll: i32,
    pub chance: i32,
    pub outcome: SkillCheckOutcome,
}

impl SkillCheckFormula {
    /// Build a formula, rejecting bounds outside 0..=100 or inverted bounds.
    pub fn new(
        base_chance: i32,
        per_point: i32,
        min_chance: i32,
        max_chance: i32,
    ) -> Result<Self, DomainError> {
        if !(0..=D100_MAX).contains(&min_chance) || !(0..=D100_MAX).contains(&max_chance) {
            return Err(DomainError::validation(
                "skill check chance bounds must be within 0..=100",
            ));
        }
        if min_chance > max_chance {
            return Err(DomainError::validation(format!(
                "skill check min chance {} exceeds max chance {}",
                min_chance, max_chance
            )));
        }
        Ok(Self {
            base_chance,
            per_point,
            min_chance,
            max_chance,
        })
    }

    /// Percentage chance of success for a stat value against a target number.
    pub fn success_chance(&self, stat_value: i32, target_number: u32) -> i32 {
        let target = i64::from(target_number);
        let delta = i64::from(stat_value) - target;
        let raw = i64::from(self.base_chance) + i64::from(self.per_point) * delta;
        raw.clamp(i64::from(self.min_chance), i64::from(self.max_chance)) as i32
    }

    /// Decide the outcome of an already-rolled d100.
    pub fn evaluate(&self, stat_value: i32, target_number: u32, roll: i32) -> SkillCheckRoll {
        let chance = self.success_chance(stat_value, target_number);
        let outcome = if roll <= chance {
            SkillCheckOutcome::Success
        } else {
            SkillCheckOutcome::Failure
        };
        SkillCheckRoll {
            roll,
            chance,
            outcome,
        }
    }

    /// Roll a d100 through the injected sampler and decide the outcome.
    ///
    /// The sampler receives the inclusive bounds of the die.
    pub fn roll_with<F>(&self, stat_value: i32, target_number: u32, sample: F) -> SkillCheckRoll
    where
        F: FnOnce(i32, i32) -> i32,
    {
        let roll = sample(D100_MIN, D100_MAX);
        self.evaluate(stat_value, target_number, roll)
    }
}
