//! In-memory collaborator adapters.
//!
//! Used by the console binary and by scenario tests. Each adapter keeps its
//! data behind a `tokio::sync::RwLock` and implements one collaborator port.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use mudtale_domain::authoring::EventDefinitionDraft;
use mudtale_domain::{
    Actor, ActorId, EventDefinition, EventId, MapNode, NodeAddress, PlayerId, PlayerRecord,
    QuestEventId, QuestId, QuestLedger, QuestProgress, QuestStatus,
};

use super::ports::{
    ActorRepo, EventContentRepo, MapNodeRepo, PlayerRepo, QuestLedgerPort, RepoError,
};

// =============================================================================
// Content Store
// =============================================================================

/// Event definitions in insertion order.
#[derive(Default)]
pub struct InMemoryContentStore {
    definitions: RwLock<Vec<EventDefinition>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a definition, as an authoring tool would while a player is mid-flow.
    pub async fn delete(&self, id: EventId) -> bool {
        let mut guard = self.definitions.write().await;
        let before = guard.len();
        guard.retain(|d| d.id != id);
        guard.len() != before
    }

    pub async fn len(&self) -> usize {
        self.definitions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.definitions.read().await.is_empty()
    }
}

#[async_trait]
impl EventContentRepo for InMemoryContentStore {
    async fn get(&self, id: EventId) -> Result<Option<EventDefinition>, RepoError> {
        let guard = self.definitions.read().await;
        Ok(guard.iter().find(|d| d.id == id).cloned())
    }

    async fn save(&self, definition: &EventDefinition) -> Result<(), RepoError> {
        let mut guard = self.definitions.write().await;
        match guard.iter_mut().find(|d| d.id == definition.id) {
            Some(existing) => *existing = definition.clone(),
            None => guard.push(definition.clone()),
        }
        Ok(())
    }

    async fn list_for_actor(&self, actor_id: ActorId) -> Result<Vec<EventDefinition>, RepoError> {
        let guard = self.definitions.read().await;
        Ok(guard
            .iter()
            .filter(|d| d.actor_id == Some(actor_id))
            .cloned()
            .collect())
    }
}

// =============================================================================
// Quest Ledger
// =============================================================================

/// Ordered quest events of one quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestOutline {
    pub id: QuestId,
    #[serde(default)]
    pub events: Vec<QuestEventId>,
}

/// Per-player quest progress driven by quest outlines.
///
/// Activating a quest places the player at its first event. Completing the
/// current event advances to the next one; completing the last event
/// completes the quest.
#[derive(Default)]
pub struct InMemoryQuestLedger {
    outlines: RwLock<Vec<QuestOutline>>,
    ledgers: RwLock<HashMap<PlayerId, QuestLedger>>,
}

impl InMemoryQuestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_outline(&self, outline: QuestOutline) {
        self.outlines.write().await.push(outline);
    }

    /// Replace a player's ledger wholesale.
    pub async fn set_ledger(&self, player_id: PlayerId, ledger: QuestLedger) {
        self.ledgers.write().await.insert(player_id, ledger);
    }

    async fn outline_for_event(&self, quest_event_id: QuestEventId) -> Option<QuestOutline> {
        self.outlines
            .read()
            .await
            .iter()
            .find(|o| o.events.contains(&quest_event_id))
            .cloned()
    }

    async fn first_event(&self, quest_id: QuestId) -> Option<QuestEventId> {
        self.outlines
            .read()
            .await
            .iter()
            .find(|o| o.id == quest_id)
            .and_then(|o| o.events.first().copied())
    }
}

#[async_trait]
impl QuestLedgerPort for InMemoryQuestLedger {
    async fn get_ledger(&self, player_id: PlayerId) -> Result<QuestLedger, RepoError> {
        Ok(self
            .ledgers
            .read()
            .await
            .get(&player_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn complete_event(
        &self,
        player_id: PlayerId,
        quest_event_id: QuestEventId,
    ) -> Result<(), RepoError> {
        let outline = self.outline_for_event(quest_event_id).await;
        let mut ledgers = self.ledgers.write().await;
        let ledger = ledgers.entry(player_id).or_default();

        // Without an outline the event belongs to whichever quest currently sits on it.
        let progress = match &outline {
            Some(outline) => ledger.quests.iter_mut().find(|q| q.quest_id == outline.id),
            None => ledger
                .quests
                .iter_mut()
                .find(|q| q.current_event_id == Some(quest_event_id)),
        };
        let Some(progress) = progress else {
            tracing::debug!(
                player_id = %player_id,
                quest_event_id = %quest_event_id,
                "Quest event completed outside any started quest"
            );
            return Ok(());
        };

        if !progress.completed_event_ids.contains(&quest_event_id) {
            progress.completed_event_ids.push(quest_event_id);
        }
        if progress.current_event_id == Some(quest_event_id) {
            let next = outline.as_ref().and_then(|o| {
                o.events
                    .iter()
                    .skip_while(|e| **e != quest_event_id)
                    .nth(1)
                    .copied()
            });
            progress.current_event_id = next;
            if next.is_none() {
                progress.status = QuestStatus::Completed;
            }
        }
        Ok(())
    }

    async fn activate_quest(&self, player_id: PlayerId, quest_id: QuestId) -> Result<(), RepoError> {
        let first_event = self.first_event(quest_id).await;
        let mut ledgers = self.ledgers.write().await;
        let ledger = ledgers.entry(player_id).or_default();
        if ledger.has_started(quest_id) {
            return Ok(());
        }
        let mut progress = QuestProgress::active(quest_id);
        progress.current_event_id = first_event;
        ledger.quests.push(progress);
        Ok(())
    }
}

// =============================================================================
// Player Records
// =============================================================================

#[derive(Default)]
pub struct InMemoryPlayers {
    players: RwLock<HashMap<PlayerId, PlayerRecord>>,
}

impl InMemoryPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, player: PlayerRecord) {
        self.players.write().await.insert(player.id, player);
    }

    pub async fn remove(&self, id: PlayerId) {
        self.players.write().await.remove(&id);
    }
}

#[async_trait]
impl PlayerRepo for InMemoryPlayers {
    async fn get(&self, id: PlayerId) -> Result<Option<PlayerRecord>, RepoError> {
        Ok(self.players.read().await.get(&id).cloned())
    }

    async fn spend_energy(&self, id: PlayerId, amount: u32) -> Result<u32, RepoError> {
        let mut guard = self.players.write().await;
        let player = guard
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Player", id))?;
        player.energy = player.energy.checked_sub(amount).ok_or_else(|| {
            RepoError::constraint(format!(
                "player {id} has {} energy, needs {amount}",
                player.energy
            ))
        })?;
        Ok(player.energy)
    }
}

// =============================================================================
// Actor Registry
// =============================================================================

#[derive(Default)]
pub struct InMemoryActors {
    actors: RwLock<Vec<Actor>>,
}

impl InMemoryActors {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, actor: Actor) {
        self.actors.write().await.push(actor);
    }
}

#[async_trait]
impl ActorRepo for InMemoryActors {
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, RepoError> {
        Ok(self.actors.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Actor>, RepoError> {
        let name = name.trim();
        Ok(self
            .actors
            .read()
            .await
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .cloned())
    }
}

// =============================================================================
// Geography Registry
// =============================================================================

#[derive(Default)]
pub struct InMemoryMapNodes {
    nodes: RwLock<HashMap<NodeAddress, MapNode>>,
}

impl InMemoryMapNodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, node: MapNode) {
        self.nodes.write().await.insert(node.address.clone(), node);
    }
}

#[async_trait]
impl MapNodeRepo for InMemoryMapNodes {
    async fn get_by_address(&self, address: &NodeAddress) -> Result<Option<MapNode>, RepoError> {
        Ok(self.nodes.read().await.get(address).cloned())
    }
}

// =============================================================================
// World
// =============================================================================

/// One of each in-memory adapter, sharing nothing with each other.
#[derive(Default, Clone)]
pub struct InMemoryWorld {
    pub content: Arc<InMemoryContentStore>,
    pub quests: Arc<InMemoryQuestLedger>,
    pub players: Arc<InMemoryPlayers>,
    pub actors: Arc<InMemoryActors>,
    pub map_nodes: Arc<InMemoryMapNodes>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// Content Bundle
// =============================================================================

/// A world's worth of content in one JSON document.
///
/// Events are authored drafts; they still have to pass the authoring pipeline
/// before the content store accepts them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub quests: Vec<QuestOutline>,
    #[serde(default)]
    pub events: Vec<EventDefinitionDraft>,
    #[serde(default)]
    pub map_nodes: Vec<MapNode>,
}

impl ContentBundle {
    pub fn from_json(raw: &str) -> Result<Self, RepoError> {
        serde_json::from_str(raw).map_err(RepoError::serialization)
    }

    pub async fn read_from(path: &Path) -> Result<Self, RepoError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::storage("read_content_bundle", e))?;
        Self::from_json(&raw)
    }
}
