//! Dialogue responses, outcomes and errors.

use serde::Serialize;

use mudtale_domain::{ActorId, EventId, MapNodeId, MobId, NodeAddress, PlayerId};

use crate::infrastructure::ports::RepoError;

pub const END_OF_FLOW_TEXT: &str = "The conversation is over.";
pub const EVENT_ENDED_TEXT: &str = "This event has ended.";
pub const TOO_TIRED_TEXT: &str = "You are too tired to do that right now.";
pub const NOT_A_NUMBER_TEXT: &str = "Please answer with the number of your choice.";
pub const COMBAT_TEXT: &str = "You ready yourself for a fight.";

/// What the client is shown after a dialogue command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueResponse {
    pub text: String,
    pub has_choices: bool,
    pub is_end: bool,
    /// Set for re-prompts after unusable input; the flow did not move
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// Work another system must carry out on the engine's behalf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<DialogueEffect>,
}

impl DialogueResponse {
    /// A rendered node.
    pub fn rendered(text: impl Into<String>, has_choices: bool, speaker: Option<String>) -> Self {
        Self {
            text: text.into(),
            has_choices,
            is_end: !has_choices,
            error: false,
            speaker,
            effect: None,
        }
    }

    /// The flow finished normally.
    pub fn end_of_flow(speaker: Option<String>) -> Self {
        Self::ended(END_OF_FLOW_TEXT, speaker)
    }

    /// The flow was cut short because its content went away.
    pub fn event_ended() -> Self {
        Self::ended(EVENT_ENDED_TEXT, None)
    }

    pub fn ended(text: impl Into<String>, speaker: Option<String>) -> Self {
        Self::rendered(text, false, speaker)
    }

    /// Ask again without moving the flow.
    pub fn reprompt(text: impl Into<String>, speaker: Option<String>) -> Self {
        Self {
            text: text.into(),
            has_choices: true,
            is_end: false,
            error: true,
            speaker,
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: DialogueEffect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Hand-off to a collaborating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DialogueEffect {
    #[serde(rename_all = "camelCase")]
    StartCombat { mob_id: MobId },
    #[serde(rename_all = "camelCase")]
    Teleport {
        map_node_id: MapNodeId,
        address: NodeAddress,
    },
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A flow started; the root is rendered
    Started(DialogueResponse),
    /// The chosen event needs energy the player does not have
    TooTired { notice: String },
    /// Nothing to offer; the caller falls back to its default behavior
    NotOffered,
}

impl EntryOutcome {
    pub fn too_tired() -> Self {
        Self::TooTired {
            notice: TOO_TIRED_TEXT.to_string(),
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, EntryOutcome::Started(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("Player is not in a dialogue")]
    NotInDialogue,
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Failures during continuation. Never reach the caller; they end the flow.
#[derive(Debug, thiserror::Error)]
pub(crate) enum LookupError {
    #[error("Event definition {0} no longer exists")]
    DefinitionMissing(EventId),
    #[error("Player {0} no longer exists")]
    PlayerMissing(PlayerId),
    #[error("Actor {0} no longer exists")]
    ActorMissing(ActorId),
    #[error("No map node at address {0}")]
    AddressUnresolved(NodeAddress),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
