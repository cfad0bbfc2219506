//! Dialogue use cases.
//!
//! A dialogue flow runs through an authored event tree:
//! 1. Player talks to an actor or arrives at a map node (EnterDialogue)
//! 2. The root prompt is rendered with the choices the player may take
//! 3. Player answers with a number (SubmitChoice)
//! 4. The flow moves to the next node, hands off to combat or movement, or ends
//!
//! While a flow is active the player's dialogue-channel input belongs here,
//! not to chat.

use std::sync::Arc;

mod arrival;
mod effects;
mod eligibility;
mod enter;
mod format;
mod locate;
mod skill_check;
mod submit_choice;
mod types;

#[cfg(test)]
mod scenario_tests;

pub use effects::apply_quest_effects;
pub use eligibility::{
    quest_gate_open, ChoiceFilter, PlayerContext, RestrictionPredicate, RestrictionRegistry,
    ENFORCER_CLASS,
};
pub use enter::EnterDialogue;
pub use format::{format_node, FormattedNode};
pub use locate::find_node;
pub use skill_check::SkillCheckResolver;
pub use submit_choice::SubmitChoice;
pub use types::{
    DialogueEffect, DialogueError, DialogueResponse, EntryOutcome, END_OF_FLOW_TEXT,
    EVENT_ENDED_TEXT, TOO_TIRED_TEXT,
};

use crate::infrastructure::ports::{
    ActorRepo, ClockPort, EventContentRepo, MapNodeRepo, PlayerRepo, QuestLedgerPort, RandomPort,
};

/// Collaborators the dialogue use cases read from and write to.
#[derive(Clone)]
pub struct DialoguePorts {
    pub content: Arc<dyn EventContentRepo>,
    pub quests: Arc<dyn QuestLedgerPort>,
    pub players: Arc<dyn PlayerRepo>,
    pub actors: Arc<dyn ActorRepo>,
    pub map_nodes: Arc<dyn MapNodeRepo>,
    pub random: Arc<dyn RandomPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Container for dialogue use cases.
pub struct DialogueUseCases {
    pub enter: Arc<EnterDialogue>,
    pub submit_choice: Arc<SubmitChoice>,
}

impl DialogueUseCases {
    pub fn new(enter: Arc<EnterDialogue>, submit_choice: Arc<SubmitChoice>) -> Self {
        Self {
            enter,
            submit_choice,
        }
    }
}
