//! Player and actor records as seen by the dialogue engine.
//!
//! Both are owned by external collaborators; the engine only reads them
//! (energy is deducted through the player collaborator, never in place).

use serde::{Deserialize, Serialize};

use crate::value_objects::StatBlock;
use crate::{ActorId, PlayerId};

/// The slice of a player's record the dialogue engine consults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    /// Assigned class name, if the player has chosen one
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub energy: u32,
    #[serde(default)]
    pub stats: StatBlock,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            class_name: None,
            energy: 0,
            stats: StatBlock::new(),
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    pub fn has_class(&self) -> bool {
        self.class_name.is_some()
    }
}

/// An NPC that events can be anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
        }
    }
}
