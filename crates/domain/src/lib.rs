//! Mudtale domain - the dialogue content model and its invariants.
//!
//! ## Structure
//!
//! - `entities/` - Event trees, player and actor records, quest ledger, map nodes
//! - `value_objects/` - Stats and the skill check formula
//! - `authoring/` - Validation, identity resolution, and compilation of authored drafts
//! - `ids` - Typed UUID identifiers

pub mod authoring;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Actor, Choice, ChoiceKind, EventDefinition, EventNode, MapNode, NodeAddress, PlayerRecord,
    QuestLedger, QuestProgress, QuestStatus, RestrictionTag, SkillCheck, WeightedEvent,
};

pub use error::DomainError;

pub use ids::{
    ActorId, ChoiceId, EventId, MapNodeId, MobId, NodeId, PlayerId, QuestEventId, QuestId,
};

pub use value_objects::{SkillCheckFormula, SkillCheckOutcome, SkillCheckRoll, Stat, StatBlock};
