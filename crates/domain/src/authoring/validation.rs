//! Event tree validation.
//!
//! Rejects malformed authored content before anything is persisted. Every
//! error names the path of the failing node or choice, e.g.
//! `rootNode.choices[1].skillCheck.failureNode.prompt`.

use std::fmt;

use thiserror::Error;

use super::draft::{ChoiceDraft, EventDefinitionDraft, NodeDraft};
use crate::value_objects::Stat;
use crate::{MobId, WeightedEvent};

/// Total the weights of a node's story events must reach.
pub const STORY_EVENT_WEIGHT_TOTAL: u64 = 100;

/// What is wrong at a given path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingTitle,
    MissingRootNode,
    /// The draft has not been through identity resolution
    MissingIdentity,
    MissingPrompt,
    MissingChoices,
    MissingChoiceText,
    /// More than one transition field set on a single choice
    ConflictingTransitions(Vec<&'static str>),
    EmptyTeleportTarget,
    MissingStat,
    UnknownStat(String),
    MissingTargetNumber,
    TargetNumberTooLow(i64),
    MissingBranch(&'static str),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "title cannot be empty"),
            Self::MissingRootNode => write!(f, "root node is required"),
            Self::MissingIdentity => write!(f, "identity has not been resolved"),
            Self::MissingPrompt => write!(f, "prompt cannot be empty"),
            Self::MissingChoices => write!(f, "choices must be a list"),
            Self::MissingChoiceText => write!(f, "choice text cannot be empty"),
            Self::ConflictingTransitions(fields) => write!(
                f,
                "choice may set at most one transition, found {}",
                fields.join(", ")
            ),
            Self::EmptyTeleportTarget => write!(f, "teleport target cannot be empty"),
            Self::MissingStat => write!(f, "skill check stat is required"),
            Self::UnknownStat(stat) => write!(f, "unknown skill check stat '{}'", stat),
            Self::MissingTargetNumber => write!(f, "skill check target number is required"),
            Self::TargetNumberTooLow(n) => {
                write!(f, "skill check target number must be at least 1, got {}", n)
            }
            Self::MissingBranch(branch) => write!(f, "skill check {} is required", branch),
        }
    }
}

/// Authored content failed validation; nothing was persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {issue}")]
pub struct TreeValidationError {
    pub path: String,
    pub issue: ValidationIssue,
}

impl TreeValidationError {
    pub fn new(path: impl Into<String>, issue: ValidationIssue) -> Self {
        Self {
            path: path.into(),
            issue,
        }
    }
}

/// A node's story event weights do not add up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("story event weights must sum to 100, got {actual_sum}")]
pub struct WeightsError {
    pub actual_sum: u64,
}

/// A choice's transition, borrowed from a draft that has passed the checks.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DraftTransition<'a> {
    Plain,
    Combat(MobId),
    Teleport(&'a str),
    Next(&'a NodeDraft),
    SkillCheck {
        stat: Stat,
        target_number: u32,
        success: &'a NodeDraft,
        failure: &'a NodeDraft,
    },
}

/// Validate a whole definition draft, recursing into every reachable node.
pub fn validate_definition(draft: &EventDefinitionDraft) -> Result<(), TreeValidationError> {
    if draft.title.trim().is_empty() {
        return Err(TreeValidationError::new("title", ValidationIssue::MissingTitle));
    }
    let root = draft
        .root_node
        .as_ref()
        .ok_or_else(|| TreeValidationError::new("rootNode", ValidationIssue::MissingRootNode))?;
    validate_node(root, "rootNode")
}

/// Validate a node draft and everything below it.
pub fn validate_node(node: &NodeDraft, path: &str) -> Result<(), TreeValidationError> {
    required_prompt(node, path)?;
    for (index, choice) in required_choices(node, path)?.iter().enumerate() {
        let choice_path = choice_path(path, index);
        required_choice_text(choice, &choice_path)?;
        match transition(choice, &choice_path)? {
            DraftTransition::Next(next) => validate_node(next, &format!("{choice_path}.nextNode"))?,
            DraftTransition::SkillCheck {
                success, failure, ..
            } => {
                validate_node(success, &format!("{choice_path}.skillCheck.successNode"))?;
                validate_node(failure, &format!("{choice_path}.skillCheck.failureNode"))?;
            }
            DraftTransition::Plain | DraftTransition::Combat(_) | DraftTransition::Teleport(_) => {}
        }
    }
    Ok(())
}

/// Validate a node's probability-weighted story events.
///
/// Valid when the list is empty or the weights sum to exactly 100.
pub fn validate_weighted_events(events: &[WeightedEvent]) -> Result<(), WeightsError> {
    if events.is_empty() {
        return Ok(());
    }
    let actual_sum: u64 = events.iter().map(|e| u64::from(e.weight)).sum();
    if actual_sum != STORY_EVENT_WEIGHT_TOTAL {
        return Err(WeightsError { actual_sum });
    }
    Ok(())
}

pub(crate) fn choice_path(node_path: &str, index: usize) -> String {
    format!("{node_path}.choices[{index}]")
}

pub(crate) fn required_prompt<'a>(
    node: &'a NodeDraft,
    path: &str,
) -> Result<&'a str, TreeValidationError> {
    match node.prompt.as_deref() {
        Some(prompt) if !prompt.trim().is_empty() => Ok(prompt),
        _ => Err(TreeValidationError::new(
            format!("{path}.prompt"),
            ValidationIssue::MissingPrompt,
        )),
    }
}

pub(crate) fn required_choices<'a>(
    node: &'a NodeDraft,
    path: &str,
) -> Result<&'a [ChoiceDraft], TreeValidationError> {
    node.choices.as_deref().ok_or_else(|| {
        TreeValidationError::new(format!("{path}.choices"), ValidationIssue::MissingChoices)
    })
}

pub(crate) fn required_choice_text<'a>(
    choice: &'a ChoiceDraft,
    path: &str,
) -> Result<&'a str, TreeValidationError> {
    match choice.text.as_deref() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(TreeValidationError::new(
            format!("{path}.text"),
            ValidationIssue::MissingChoiceText,
        )),
    }
}

/// Determine the single transition of a choice.
pub(crate) fn transition<'a>(
    choice: &'a ChoiceDraft,
    path: &str,
) -> Result<DraftTransition<'a>, TreeValidationError> {
    let present: Vec<&'static str> = [
        ("combat", choice.combat.is_some()),
        ("teleportToNode", choice.teleport_to_node.is_some()),
        ("nextNode", choice.next_node.is_some()),
        ("skillCheck", choice.skill_check.is_some()),
    ]
    .into_iter()
    .filter_map(|(field, set)| set.then_some(field))
    .collect();

    if present.len() > 1 {
        return Err(TreeValidationError::new(
            path,
            ValidationIssue::ConflictingTransitions(present),
        ));
    }

    if let Some(mob_id) = choice.combat {
        return Ok(DraftTransition::Combat(mob_id));
    }
    if let Some(target) = choice.teleport_to_node.as_deref() {
        if target.trim().is_empty() {
            return Err(TreeValidationError::new(
                format!("{path}.teleportToNode"),
                ValidationIssue::EmptyTeleportTarget,
            ));
        }
        return Ok(DraftTransition::Teleport(target));
    }
    if let Some(next) = choice.next_node.as_deref() {
        return Ok(DraftTransition::Next(next));
    }
    let Some(check) = choice.skill_check.as_ref() else {
        return Ok(DraftTransition::Plain);
    };

    let check_path = format!("{path}.skillCheck");
    let stat_name = check.stat.as_deref().ok_or_else(|| {
        TreeValidationError::new(format!("{check_path}.stat"), ValidationIssue::MissingStat)
    })?;
    let stat: Stat = stat_name.parse().map_err(|_| {
        TreeValidationError::new(
            format!("{check_path}.stat"),
            ValidationIssue::UnknownStat(stat_name.to_string()),
        )
    })?;
    let raw_target = check.target_number.ok_or_else(|| {
        TreeValidationError::new(
            format!("{check_path}.targetNumber"),
            ValidationIssue::MissingTargetNumber,
        )
    })?;
    let target_number = u32::try_from(raw_target)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            TreeValidationError::new(
                format!("{check_path}.targetNumber"),
                ValidationIssue::TargetNumberTooLow(raw_target),
            )
        })?;
    let success = check.success_node.as_deref().ok_or_else(|| {
        TreeValidationError::new(
            format!("{check_path}.successNode"),
            ValidationIssue::MissingBranch("successNode"),
        )
    })?;
    let failure = check.failure_node.as_deref().ok_or_else(|| {
        TreeValidationError::new(
            format!("{check_path}.failureNode"),
            ValidationIssue::MissingBranch("failureNode"),
        )
    })?;

    Ok(DraftTransition::SkillCheck {
        stat,
        target_number,
        success,
        failure,
    })
}
