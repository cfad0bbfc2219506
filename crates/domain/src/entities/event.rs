//! Event definitions - the authored dialogue trees NPCs and story events use.
//!
//! An [`EventDefinition`] owns a recursive tree of [`EventNode`]s. Each node
//! offers [`Choice`]s, and each choice carries exactly one [`ChoiceKind`].
//! The tree is read-only to the engine; it is produced by the authoring
//! pipeline (see [`crate::authoring`]) and stored by the content store.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Stat;
use crate::{ActorId, ChoiceId, EventId, MobId, NodeId, QuestEventId, QuestId};

/// A top-level authored dialogue or story unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: EventId,
    pub title: String,
    /// Actor the event is anchored to (None for story events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<ActorId>,
    pub root_node: EventNode,
    /// Entering the event costs energy
    #[serde(default)]
    pub requires_energy: bool,
}

impl EventDefinition {
    pub fn new(title: impl Into<String>, root_node: EventNode) -> Self {
        Self {
            id: EventId::new(),
            title: title.into(),
            actor_id: None,
            root_node,
            requires_energy: false,
        }
    }

    pub fn with_actor(mut self, actor_id: ActorId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn requiring_energy(mut self) -> Self {
        self.requires_energy = true;
        self
    }
}

/// Name of a restriction predicate attached to a node.
///
/// Tags are an open set; the engine keeps a registry of predicates keyed by
/// tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionTag(String);

impl RestrictionTag {
    /// Only players without an assigned class.
    pub const NO_CLASS: &'static str = "noClass";
    /// Only players whose class is exactly "Enforcer".
    pub const ENFORCER_ONLY: &'static str = "enforcerOnly";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn no_class() -> Self {
        Self::new(Self::NO_CLASS)
    }

    pub fn enforcer_only() -> Self {
        Self::new(Self::ENFORCER_ONLY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RestrictionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address of a node in the world geography (resolved by the map registry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAddress(String);

impl NodeAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One prompt and its choices. A node without choices is a terminal leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNode {
    /// Stable identity; missing only for content written out-of-band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub restrictions: BTreeSet<RestrictionTag>,
    /// Only read on the root node: quest that must be active or completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_quest_id: Option<QuestId>,
    /// Only read on the root node: quest event that must be current or completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_quest_event_id: Option<QuestEventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_quest_id: Option<QuestId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quest_completion_events: Vec<QuestEventId>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl EventNode {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: Some(NodeId::new()),
            prompt: prompt.into(),
            restrictions: BTreeSet::new(),
            required_quest_id: None,
            required_quest_event_id: None,
            activate_quest_id: None,
            quest_completion_events: Vec::new(),
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_restriction(mut self, tag: RestrictionTag) -> Self {
        self.restrictions.insert(tag);
        self
    }

    pub fn requiring_quest(mut self, quest_id: QuestId) -> Self {
        self.required_quest_id = Some(quest_id);
        self
    }

    pub fn requiring_quest_event(mut self, quest_event_id: QuestEventId) -> Self {
        self.required_quest_event_id = Some(quest_event_id);
        self
    }

    pub fn activating_quest(mut self, quest_id: QuestId) -> Self {
        self.activate_quest_id = Some(quest_id);
        self
    }

    pub fn completing_events(mut self, events: impl IntoIterator<Item = QuestEventId>) -> Self {
        self.quest_completion_events.extend(events);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn has_restriction(&self, tag: &str) -> bool {
        self.restrictions.iter().any(|t| t.as_str() == tag)
    }

    /// Child nodes reachable in one step, in choice order.
    ///
    /// A skill check contributes both its success and failure branches.
    pub fn children(&self) -> impl Iterator<Item = &EventNode> {
        self.choices.iter().flat_map(|choice| choice.kind.child_nodes())
    }
}

/// A selectable option on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ChoiceId>,
    pub text: String,
    pub kind: ChoiceKind,
}

impl Choice {
    pub fn new(text: impl Into<String>, kind: ChoiceKind) -> Self {
        Self {
            id: Some(ChoiceId::new()),
            text: text.into(),
            kind,
        }
    }

    /// A choice that ends the flow when selected.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, ChoiceKind::Plain)
    }

    pub fn to_node(text: impl Into<String>, node: EventNode) -> Self {
        Self::new(text, ChoiceKind::NextNode(Box::new(node)))
    }

    /// The single node this choice leads to, if it has exactly one.
    ///
    /// Skill checks have two possible destinations and return None.
    pub fn destination(&self) -> Option<&EventNode> {
        match &self.kind {
            ChoiceKind::NextNode(node) => Some(node),
            _ => None,
        }
    }
}

/// The transition a choice performs. Exactly one per choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChoiceKind {
    /// Ends the flow
    Plain,
    /// Hands the player over to the combat system
    #[serde(rename_all = "camelCase")]
    CombatHook { mob_id: MobId },
    /// Asks the movement system to relocate the player
    #[serde(rename_all = "camelCase")]
    Teleport { node_address: NodeAddress },
    /// Continues the dialogue at a nested node
    NextNode(Box<EventNode>),
    /// Continues at one of two nodes depending on a stat roll
    SkillCheck(Box<SkillCheck>),
}

impl ChoiceKind {
    pub fn child_nodes(&self) -> Vec<&EventNode> {
        match self {
            ChoiceKind::NextNode(node) => vec![node.as_ref()],
            ChoiceKind::SkillCheck(check) => vec![&check.success_node, &check.failure_node],
            ChoiceKind::Plain | ChoiceKind::CombatHook { .. } | ChoiceKind::Teleport { .. } => {
                Vec::new()
            }
        }
    }
}

/// A probabilistic branch on a player stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheck {
    pub stat: Stat,
    pub target_number: u32,
    pub success_node: EventNode,
    pub failure_node: EventNode,
}

impl SkillCheck {
    pub fn new(stat: Stat, target_number: u32, success: EventNode, failure: EventNode) -> Self {
        Self {
            stat,
            target_number,
            success_node: success,
            failure_node: failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_without_choices_is_terminal() {
        assert!(EventNode::new("Goodbye.").is_terminal());
        assert!(!EventNode::new("Hi")
            .with_choice(Choice::plain("Bye"))
            .is_terminal());
    }

    #[test]
    fn children_include_both_skill_check_branches() {
        let success = EventNode::new("You slip past.");
        let failure = EventNode::new("You are spotted.");
        let next = EventNode::new("Later.");
        let root = EventNode::new("A guard blocks the way.")
            .with_choice(Choice::new(
                "Sneak",
                ChoiceKind::SkillCheck(Box::new(SkillCheck::new(
                    Stat::Agility,
                    5,
                    success.clone(),
                    failure.clone(),
                ))),
            ))
            .with_choice(Choice::plain("Leave"))
            .with_choice(Choice::to_node("Wait", next.clone()));

        let prompts: Vec<&str> = root.children().map(|n| n.prompt.as_str()).collect();
        assert_eq!(
            prompts,
            vec!["You slip past.", "You are spotted.", "Later."]
        );
    }

    #[test]
    fn destination_only_for_next_node() {
        let node = EventNode::new("X");
        assert_eq!(
            Choice::to_node("go", node.clone()).destination(),
            Some(&node)
        );
        assert!(Choice::plain("bye").destination().is_none());
    }

    #[test]
    fn definition_round_trips_through_json() {
        let root = EventNode::new("Who are you?")
            .with_restriction(RestrictionTag::no_class())
            .with_choice(Choice::new(
                "Fight",
                ChoiceKind::CombatHook {
                    mob_id: MobId::new(),
                },
            ))
            .with_choice(Choice::new(
                "Run",
                ChoiceKind::Teleport {
                    node_address: NodeAddress::new("town-square"),
                },
            ));
        let definition = EventDefinition::new("Stranger", root).requiring_energy();

        let json = serde_json::to_string(&definition).expect("serialize");
        let back: EventDefinition = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, definition);
    }
}
