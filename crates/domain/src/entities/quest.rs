//! Read model of a player's quest ledger.
//!
//! The ledger is persisted by the quest collaborator. The dialogue engine
//! reads a snapshot to gate events and choices, and asks the collaborator to
//! complete quest events or activate quests.

use serde::{Deserialize, Serialize};

use crate::{QuestEventId, QuestId};

/// Lifecycle of a quest in a player's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestStatus {
    Active,
    Completed,
}

/// Progress of one quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgress {
    pub quest_id: QuestId,
    pub status: QuestStatus,
    /// The quest event the player is currently working on
    #[serde(default)]
    pub current_event_id: Option<QuestEventId>,
    #[serde(default)]
    pub completed_event_ids: Vec<QuestEventId>,
}

impl QuestProgress {
    pub fn active(quest_id: QuestId) -> Self {
        Self {
            quest_id,
            status: QuestStatus::Active,
            current_event_id: None,
            completed_event_ids: Vec::new(),
        }
    }

    pub fn completed(quest_id: QuestId) -> Self {
        Self {
            status: QuestStatus::Completed,
            ..Self::active(quest_id)
        }
    }

    pub fn at_event(mut self, event_id: QuestEventId) -> Self {
        self.current_event_id = Some(event_id);
        self
    }

    pub fn with_completed_event(mut self, event_id: QuestEventId) -> Self {
        self.completed_event_ids.push(event_id);
        self
    }

    /// The event is the current one or already completed.
    pub fn has_reached(&self, event_id: QuestEventId) -> bool {
        self.current_event_id == Some(event_id) || self.completed_event_ids.contains(&event_id)
    }
}

/// Snapshot of every quest a player has started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestLedger {
    pub quests: Vec<QuestProgress>,
}

impl QuestLedger {
    pub fn new(quests: Vec<QuestProgress>) -> Self {
        Self { quests }
    }

    pub fn get(&self, quest_id: QuestId) -> Option<&QuestProgress> {
        self.quests.iter().find(|q| q.quest_id == quest_id)
    }

    pub fn is_active(&self, quest_id: QuestId) -> bool {
        self.get(quest_id)
            .is_some_and(|q| q.status == QuestStatus::Active)
    }

    /// Active or completed - the quest has been started at some point.
    pub fn has_started(&self, quest_id: QuestId) -> bool {
        self.get(quest_id).is_some()
    }

    pub fn active_quest_ids(&self) -> impl Iterator<Item = QuestId> + '_ {
        self.quests
            .iter()
            .filter(|q| q.status == QuestStatus::Active)
            .map(|q| q.quest_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_quest_counts_as_started_but_not_active() {
        let quest = QuestId::new();
        let ledger = QuestLedger::new(vec![QuestProgress::completed(quest)]);
        assert!(ledger.has_started(quest));
        assert!(!ledger.is_active(quest));
        assert_eq!(ledger.active_quest_ids().count(), 0);
    }

    #[test]
    fn reached_covers_current_and_completed_events() {
        let current = QuestEventId::new();
        let done = QuestEventId::new();
        let progress = QuestProgress::active(QuestId::new())
            .at_event(current)
            .with_completed_event(done);
        assert!(progress.has_reached(current));
        assert!(progress.has_reached(done));
        assert!(!progress.has_reached(QuestEventId::new()));
    }
}
