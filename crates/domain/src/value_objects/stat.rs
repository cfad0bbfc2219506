//! Character stats consulted by skill checks.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// The fixed set of stats a skill check may test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Strength,
    Agility,
    Intellect,
    Charisma,
    Endurance,
    Perception,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Strength,
        Stat::Agility,
        Stat::Intellect,
        Stat::Charisma,
        Stat::Endurance,
        Stat::Perception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Agility => "agility",
            Stat::Intellect => "intellect",
            Stat::Charisma => "charisma",
            Stat::Endurance => "endurance",
            Stat::Perception => "perception",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Stat::ALL
            .into_iter()
            .find(|stat| stat.as_str() == lowered)
            .ok_or_else(|| DomainError::parse(format!("Unknown stat: {}", s)))
    }
}

/// A player's stat values. Stats that were never set read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock(BTreeMap<Stat, i32>);

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        self.0.insert(stat, value);
        self
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        self.0.insert(stat, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_stats_case_insensitively() {
        assert_eq!("Agility".parse::<Stat>(), Ok(Stat::Agility));
        assert_eq!(" perception ".parse::<Stat>(), Ok(Stat::Perception));
    }

    #[test]
    fn rejects_unknown_stat() {
        let err = "luck".parse::<Stat>().unwrap_err();
        assert!(err.to_string().contains("luck"));
    }

    #[test]
    fn unset_stat_reads_zero() {
        let block = StatBlock::new().with(Stat::Strength, 7);
        assert_eq!(block.get(Stat::Strength), 7);
        assert_eq!(block.get(Stat::Charisma), 0);
    }

    #[test]
    fn stat_block_serializes_as_map() {
        let block = StatBlock::new().with(Stat::Agility, 4);
        let json = serde_json::to_value(&block).expect("serialize");
        assert_eq!(json, serde_json::json!({ "agility": 4 }));
    }
}
