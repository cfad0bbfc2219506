//! Player activity changes driven from outside the dialogue engine.

use std::sync::Arc;

use mudtale_domain::{MobId, PlayerId};

use crate::stores::{PlayerActivity, SessionStore};

/// Which subsystem a line of dialogue-channel input goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOwner {
    Dialogue,
    Combat,
    Chat,
}

/// Decide who handles a player's input.
pub struct RouteInput {
    sessions: Arc<SessionStore>,
}

impl RouteInput {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn execute(&self, player_id: PlayerId) -> InputOwner {
        match self.sessions.activity(player_id) {
            PlayerActivity::Dialogue(_) => InputOwner::Dialogue,
            PlayerActivity::Combat { .. } => InputOwner::Combat,
            PlayerActivity::Idle => InputOwner::Chat,
        }
    }

    /// Whether the dialogue engine owns the player's input.
    pub fn owns_input(&self, player_id: PlayerId) -> bool {
        self.execute(player_id) == InputOwner::Dialogue
    }
}

/// Hand a player to the combat system, superseding any dialogue.
pub struct BeginCombat {
    sessions: Arc<SessionStore>,
}

impl BeginCombat {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, player_id: PlayerId, mob_id: MobId) {
        let _guard = self.sessions.lock_player(player_id).await;
        self.sessions.begin_combat(player_id, mob_id);
        tracing::info!(player_id = %player_id, mob_id = %mob_id, "Combat started");
    }
}

/// Return a player from combat to idle.
pub struct EndCombat {
    sessions: Arc<SessionStore>,
}

impl EndCombat {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, player_id: PlayerId) {
        let _guard = self.sessions.lock_player(player_id).await;
        self.sessions.end_combat(player_id);
    }
}

/// Drop all session state of a disconnected player.
pub struct Disconnect {
    sessions: Arc<SessionStore>,
}

impl Disconnect {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn execute(&self, player_id: PlayerId) {
        let guard = self.sessions.lock_player(player_id).await;
        self.sessions.disconnect(player_id, guard);
        tracing::info!(player_id = %player_id, "Player disconnected");
    }
}
