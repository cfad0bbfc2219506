//! Value objects shared by the dialogue content model and the engine.

mod skill_check;
mod stat;

pub use skill_check::{
    SkillCheckFormula, SkillCheckOutcome, SkillCheckRoll, D100_MAX, D100_MIN,
};
pub use stat::{Stat, StatBlock};
