//! Engine configuration loaded from the environment.
//!
//! Every value has a default, so an empty environment yields a working
//! configuration. Malformed numbers are logged and replaced by the default.

use std::path::PathBuf;

use mudtale_domain::SkillCheckFormula;

/// Energy an energy-requiring event costs when no override is configured.
pub const DEFAULT_ENERGY_COST: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// JSON content bundle loaded by the console binary
    pub content_path: Option<PathBuf>,
    /// Energy deducted when an energy-requiring event starts
    pub energy_cost: u32,
    pub skill_check: SkillCheckFormula,
    /// Name and class of the local console player
    pub player_name: String,
    pub player_class: Option<String>,
    pub player_energy: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_path: None,
            energy_cost: DEFAULT_ENERGY_COST,
            skill_check: SkillCheckFormula::default(),
            player_name: "Wanderer".to_string(),
            player_class: None,
            player_energy: 3,
        }
    }
}

impl EngineConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let formula_defaults = defaults.skill_check;

        let skill_check = match SkillCheckFormula::new(
            parse_or(&lookup, "MUDTALE_SKILL_BASE_CHANCE", formula_defaults.base_chance),
            parse_or(&lookup, "MUDTALE_SKILL_PER_POINT", formula_defaults.per_point),
            parse_or(&lookup, "MUDTALE_SKILL_MIN_CHANCE", formula_defaults.min_chance),
            parse_or(&lookup, "MUDTALE_SKILL_MAX_CHANCE", formula_defaults.max_chance),
        ) {
            Ok(formula) => formula,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid skill check tuning, using defaults");
                formula_defaults
            }
        };

        Self {
            content_path: non_empty(&lookup, "MUDTALE_CONTENT_PATH").map(PathBuf::from),
            energy_cost: parse_or(&lookup, "MUDTALE_ENERGY_COST", defaults.energy_cost),
            skill_check,
            player_name: non_empty(&lookup, "MUDTALE_PLAYER_NAME").unwrap_or(defaults.player_name),
            player_class: non_empty(&lookup, "MUDTALE_PLAYER_CLASS"),
            player_energy: parse_or(&lookup, "MUDTALE_PLAYER_ENERGY", defaults.player_energy),
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    match non_empty(lookup, key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid numeric setting, using default");
            default
        }),
    }
}
