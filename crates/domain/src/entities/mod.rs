//! Domain entities.

mod event;
mod map_node;
mod player;
mod quest;

pub use event::{
    Choice, ChoiceKind, EventDefinition, EventNode, NodeAddress, RestrictionTag, SkillCheck,
};
pub use map_node::{MapNode, WeightedEvent};
pub use player::{Actor, PlayerRecord};
pub use quest::{QuestLedger, QuestProgress, QuestStatus};
