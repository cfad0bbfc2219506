//! Per-player session state.
//!
//! Each player owns one session record whose [`PlayerActivity`] is the single
//! authority on what the player is doing. The active event slot of the
//! dialogue engine lives inside it, so "in dialogue" and "in combat" can never
//! disagree.
//!
//! Commands for one player must be handled one at a time. Handlers take the
//! player's command lock ([`SessionStore::lock_player`]) for the whole command;
//! different players never contend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use mudtale_domain::{ActorId, EventId, EventNode, MobId, NodeId, PlayerId};

/// A player's position inside a dialogue flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEventState {
    pub player_id: PlayerId,
    pub event_id: EventId,
    pub current_node_id: NodeId,
    /// Copy of the node at the time it was entered, used when the node can no
    /// longer be found in the reloaded tree
    pub current_node_snapshot: EventNode,
    pub actor_id: Option<ActorId>,
    pub is_story_event: bool,
    pub started_at: DateTime<Utc>,
}

/// What a player is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlayerActivity {
    #[default]
    Idle,
    Dialogue(ActiveEventState),
    Combat {
        mob_id: MobId,
    },
}

impl PlayerActivity {
    pub fn is_idle(&self) -> bool {
        matches!(self, PlayerActivity::Idle)
    }
}

/// In-memory session records keyed by player.
#[derive(Default)]
pub struct SessionStore {
    activities: DashMap<PlayerId, PlayerActivity>,
    command_locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize command handling for one player.
    pub async fn lock_player(&self, player_id: PlayerId) -> OwnedMutexGuard<()> {
        let lock = self
            .command_locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    pub fn activity(&self, player_id: PlayerId) -> PlayerActivity {
        self.activities
            .get(&player_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Active event slot
    // =========================================================================

    /// Put the player into a dialogue flow, replacing whatever they were doing.
    pub fn start_event(&self, state: ActiveEventState) {
        tracing::debug!(
            player_id = %state.player_id,
            event_id = %state.event_id,
            node_id = %state.current_node_id,
            "Active event slot set"
        );
        self.activities
            .insert(state.player_id, PlayerActivity::Dialogue(state));
    }

    pub fn active_event(&self, player_id: PlayerId) -> Option<ActiveEventState> {
        match self.activities.get(&player_id)?.value() {
            PlayerActivity::Dialogue(state) => Some(state.clone()),
            _ => None,
        }
    }

    /// Whether dialogue-channel input from this player belongs to the engine.
    pub fn in_dialogue(&self, player_id: PlayerId) -> bool {
        self.activities
            .get(&player_id)
            .is_some_and(|entry| matches!(entry.value(), PlayerActivity::Dialogue(_)))
    }

    /// Move the player's slot to another node of the same event.
    ///
    /// Returns false when the player no longer has a slot.
    pub fn advance_event(&self, player_id: PlayerId, node_id: NodeId, snapshot: EventNode) -> bool {
        match self.activities.get_mut(&player_id) {
            Some(mut entry) => match entry.value_mut() {
                PlayerActivity::Dialogue(state) => {
                    state.current_node_id = node_id;
                    state.current_node_snapshot = snapshot;
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Drop the player's dialogue slot. Does nothing if there is none.
    pub fn clear_event(&self, player_id: PlayerId) {
        let removed = self
            .activities
            .remove_if(&player_id, |_, activity| {
                matches!(activity, PlayerActivity::Dialogue(_))
            })
            .is_some();
        if removed {
            tracing::debug!(player_id = %player_id, "Active event slot cleared");
        }
    }

    // =========================================================================
    // Other activities
    // =========================================================================

    /// Hand the player to the combat system; any dialogue slot is superseded.
    pub fn begin_combat(&self, player_id: PlayerId, mob_id: MobId) {
        let previous = self
            .activities
            .insert(player_id, PlayerActivity::Combat { mob_id });
        if let Some(PlayerActivity::Dialogue(state)) = previous {
            tracing::info!(
                player_id = %player_id,
                event_id = %state.event_id,
                mob_id = %mob_id,
                "Dialogue superseded by combat"
            );
        }
    }

    pub fn end_combat(&self, player_id: PlayerId) {
        self.activities
            .remove_if(&player_id, |_, activity| {
                matches!(activity, PlayerActivity::Combat { .. })
            });
    }

    /// Forget everything about a disconnected player.
    ///
    /// Takes the guard from `lock_player` so the activity is dropped inside
    /// the player's critical section. The lock entry itself is only removed
    /// when no other command is queued on it.
    pub fn disconnect(&self, player_id: PlayerId, guard: OwnedMutexGuard<()>) {
        self.activities.remove(&player_id);
        // Owners when idle: the map entry and the held guard.
        let lock_dropped = self
            .command_locks
            .remove_if(&player_id, |_, lock| Arc::strong_count(lock) <= 2)
            .is_some();
        drop(guard);
        tracing::debug!(player_id = %player_id, lock_dropped, "Player session dropped");
    }

    pub fn active_sessions(&self) -> usize {
        self.activities.len()
    }
}
