//! Rolling skill checks.

use std::sync::Arc;

use mudtale_domain::{EventNode, SkillCheck, SkillCheckFormula, SkillCheckRoll, StatBlock};

use crate::infrastructure::ports::RandomPort;

/// Rolls a d100 through the injected random source.
pub struct SkillCheckResolver {
    formula: SkillCheckFormula,
    random: Arc<dyn RandomPort>,
}

impl SkillCheckResolver {
    pub fn new(formula: SkillCheckFormula, random: Arc<dyn RandomPort>) -> Self {
        Self { formula, random }
    }

    pub fn formula(&self) -> &SkillCheckFormula {
        &self.formula
    }

    /// Roll the check for a player and pick the branch.
    pub fn resolve<'a>(
        &self,
        check: &'a SkillCheck,
        stats: &StatBlock,
    ) -> (SkillCheckRoll, &'a EventNode) {
        let stat_value = stats.get(check.stat);
        let roll = self
            .formula
            .roll_with(stat_value, check.target_number, |min, max| {
                self.random.gen_range(min, max)
            });
        let node = if roll.outcome.is_success() {
            &check.success_node
        } else {
            &check.failure_node
        };
        (roll, node)
    }
}
