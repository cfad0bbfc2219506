//! Wire shape of authored event content.
//!
//! Authoring tools send event trees where every field may be missing and each
//! transition is an independent optional field. Drafts are what the validator
//! and identity resolver operate on before content is compiled into
//! [`crate::EventDefinition`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ActorId, MobId, QuestEventId, QuestId};

/// An identity as it arrives over the wire.
///
/// Older content stores wrap ids (`{"$oid": "..."}`) or use arbitrary strings.
/// After identity resolution every id in a draft is [`WireId::Canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Canonical(Uuid),
    Wrapped {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Plain(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinitionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<ActorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_node: Option<NodeDraft>,
    #[serde(default)]
    pub requires_energy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_quest_id: Option<QuestId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_quest_event_id: Option<QuestEventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_quest_id: Option<QuestId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quest_completion_events: Vec<QuestEventId>,
    /// Must be present (an empty list marks a terminal node)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ChoiceDraft>>,
}

impl NodeDraft {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            choices: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn with_choice(mut self, choice: ChoiceDraft) -> Self {
        self.choices.get_or_insert_with(Vec::new).push(choice);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat: Option<MobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teleport_to_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node: Option<Box<NodeDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_check: Option<SkillCheckDraft>,
}

impl ChoiceDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn leading_to(mut self, node: NodeDraft) -> Self {
        self.next_node = Some(Box::new(node));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheckDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_node: Option<Box<NodeDraft>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_node: Option<Box<NodeDraft>>,
}
