//! Conversion of resolved drafts into the typed event model.

use std::collections::BTreeSet;

use super::draft::{EventDefinitionDraft, NodeDraft};
use super::validation::{
    choice_path, required_choice_text, required_choices, required_prompt, transition,
    DraftTransition, TreeValidationError, ValidationIssue,
};
use crate::{
    Choice, ChoiceId, ChoiceKind, EventDefinition, EventId, EventNode, NodeAddress, NodeId,
    RestrictionTag, SkillCheck,
};

impl TryFrom<EventDefinitionDraft> for EventDefinition {
    type Error = TreeValidationError;

    /// Compile a draft that has been validated and identity-resolved.
    fn try_from(draft: EventDefinitionDraft) -> Result<Self, Self::Error> {
        if draft.title.trim().is_empty() {
            return Err(TreeValidationError::new("title", ValidationIssue::MissingTitle));
        }
        let id = draft
            .id
            .as_ref()
            .map(|id| EventId::from_uuid(id.to_canonical()))
            .ok_or_else(|| TreeValidationError::new("id", ValidationIssue::MissingIdentity))?;
        let root = draft
            .root_node
            .as_ref()
            .ok_or_else(|| TreeValidationError::new("rootNode", ValidationIssue::MissingRootNode))?;

        Ok(EventDefinition {
            id,
            title: draft.title.trim().to_string(),
            actor_id: draft.actor_id,
            root_node: compile_node(root, "rootNode")?,
            requires_energy: draft.requires_energy,
        })
    }
}

/// Compile a node draft and its subtree.
pub fn compile_node(node: &NodeDraft, path: &str) -> Result<EventNode, TreeValidationError> {
    let prompt = required_prompt(node, path)?;
    let mut choices = Vec::new();

    for (index, draft) in required_choices(node, path)?.iter().enumerate() {
        let choice_path = choice_path(path, index);
        let text = required_choice_text(draft, &choice_path)?;
        let kind = match transition(draft, &choice_path)? {
            DraftTransition::Plain => ChoiceKind::Plain,
            DraftTransition::Combat(mob_id) => ChoiceKind::CombatHook { mob_id },
            DraftTransition::Teleport(address) => ChoiceKind::Teleport {
                node_address: NodeAddress::new(address.trim()),
            },
            DraftTransition::Next(next) => ChoiceKind::NextNode(Box::new(compile_node(
                next,
                &format!("{choice_path}.nextNode"),
            )?)),
            DraftTransition::SkillCheck {
                stat,
                target_number,
                success,
                failure,
            } => ChoiceKind::SkillCheck(Box::new(SkillCheck {
                stat,
                target_number,
                success_node: compile_node(
                    success,
                    &format!("{choice_path}.skillCheck.successNode"),
                )?,
                failure_node: compile_node(
                    failure,
                    &format!("{choice_path}.skillCheck.failureNode"),
                )?,
            })),
        };
        choices.push(Choice {
            id: draft
                .id
                .as_ref()
                .map(|id| ChoiceId::from_uuid(id.to_canonical())),
            text: text.to_string(),
            kind,
        });
    }

    Ok(EventNode {
        id: node.id.as_ref().map(|id| NodeId::from_uuid(id.to_canonical())),
        prompt: prompt.to_string(),
        restrictions: node
            .restrictions
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(RestrictionTag::new)
            .collect::<BTreeSet<_>>(),
        required_quest_id: node.required_quest_id,
        required_quest_event_id: node.required_quest_event_id,
        activate_quest_id: node.activate_quest_id,
        quest_completion_events: node.quest_completion_events.clone(),
        choices,
    })
}
