//! Collaborator port traits.
//!
//! The dialogue engine owns none of this data. Content, quests, players,
//! actors and geography all live behind these traits.

use async_trait::async_trait;
use mudtale_domain::{
    Actor, ActorId, EventDefinition, EventId, MapNode, NodeAddress, PlayerId, PlayerRecord,
    QuestEventId, QuestId, QuestLedger,
};

use super::error::RepoError;

// =============================================================================
// Content Store
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventContentRepo: Send + Sync {
    async fn get(&self, id: EventId) -> Result<Option<EventDefinition>, RepoError>;
    async fn save(&self, definition: &EventDefinition) -> Result<(), RepoError>;

    /// Events anchored to an actor, in storage order.
    async fn list_for_actor(&self, actor_id: ActorId) -> Result<Vec<EventDefinition>, RepoError>;
}

// =============================================================================
// Quest Ledger
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestLedgerPort: Send + Sync {
    async fn get_ledger(&self, player_id: PlayerId) -> Result<QuestLedger, RepoError>;
    async fn complete_event(
        &self,
        player_id: PlayerId,
        quest_event_id: QuestEventId,
    ) -> Result<(), RepoError>;
    async fn activate_quest(&self, player_id: PlayerId, quest_id: QuestId) -> Result<(), RepoError>;
}

// =============================================================================
// Player Records
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn get(&self, id: PlayerId) -> Result<Option<PlayerRecord>, RepoError>;

    /// Deduct energy, returning what remains. Fails if the player has too little.
    async fn spend_energy(&self, id: PlayerId, amount: u32) -> Result<u32, RepoError>;
}

// =============================================================================
// Actor Registry
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActorRepo: Send + Sync {
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Actor>, RepoError>;
}

// =============================================================================
// Geography Registry
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MapNodeRepo: Send + Sync {
    async fn get_by_address(&self, address: &NodeAddress) -> Result<Option<MapNode>, RepoError>;
}
