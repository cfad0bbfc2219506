//! Entering a dialogue flow.
//!
//! Two triggers lead here: a player talking to an actor, and a player
//! arriving at a map node that carries story events. Both narrow down to one
//! event definition and then share the same entry steps.

use std::sync::Arc;

use mudtale_domain::{ActorId, EventDefinition, NodeAddress, PlayerId, PlayerRecord};

use super::arrival::arrive;
use super::eligibility::{quest_gate_open, ChoiceFilter, PlayerContext};
use super::types::{DialogueError, DialogueResponse, EntryOutcome};
use super::DialoguePorts;
use crate::infrastructure::ports::RepoError;
use crate::stores::{ActiveEventState, PlayerActivity, SessionStore};

/// Start the first eligible event anchored to an actor.
pub struct EnterDialogue {
    ports: DialoguePorts,
    sessions: Arc<SessionStore>,
    filter: Arc<ChoiceFilter>,
    energy_cost: u32,
}

impl EnterDialogue {
    pub fn new(
        ports: DialoguePorts,
        sessions: Arc<SessionStore>,
        filter: Arc<ChoiceFilter>,
        energy_cost: u32,
    ) -> Self {
        Self {
            ports,
            sessions,
            filter,
            energy_cost,
        }
    }

    /// Talk to an actor.
    ///
    /// # Returns
    /// * `Ok(EntryOutcome::Started)` - the root node is rendered
    /// * `Ok(EntryOutcome::TooTired)` - no slot was created, show the notice
    /// * `Ok(EntryOutcome::NotOffered)` - nothing to say, fall back to chat
    /// * `Err(DialogueError)` - the player is unknown or a collaborator failed
    pub async fn execute(
        &self,
        player_id: PlayerId,
        actor_id: ActorId,
    ) -> Result<EntryOutcome, DialogueError> {
        let _guard = self.sessions.lock_player(player_id).await;

        let player = load_player(&self.ports, player_id).await?;
        if !self.accepts_dialogue(player_id) {
            return Ok(EntryOutcome::NotOffered);
        }

        let Some(actor) = self.ports.actors.get(actor_id).await? else {
            tracing::debug!(player_id = %player_id, actor_id = %actor_id, "Unknown actor");
            return Ok(EntryOutcome::NotOffered);
        };

        let candidates = self.ports.content.list_for_actor(actor_id).await?;
        self.begin(player, candidates, Some(actor.name), false)
            .await
    }

    /// Roll for a story event at a map node.
    pub async fn execute_story_event(
        &self,
        player_id: PlayerId,
        address: &NodeAddress,
    ) -> Result<EntryOutcome, DialogueError> {
        let _guard = self.sessions.lock_player(player_id).await;

        let player = load_player(&self.ports, player_id).await?;
        if !self.accepts_dialogue(player_id) {
            return Ok(EntryOutcome::NotOffered);
        }

        let Some(map_node) = self.ports.map_nodes.get_by_address(address).await? else {
            tracing::debug!(address = %address, "No map node at address");
            return Ok(EntryOutcome::NotOffered);
        };
        if map_node.story_events.is_empty() {
            return Ok(EntryOutcome::NotOffered);
        }

        let roll = self.ports.random.gen_range(1, 100);
        let Some(event_id) = map_node.pick_story_event(u32::try_from(roll).unwrap_or_default())
        else {
            tracing::debug!(address = %address, roll, "Story event roll selected nothing");
            return Ok(EntryOutcome::NotOffered);
        };

        let Some(definition) = self.ports.content.get(event_id).await? else {
            tracing::warn!(
                address = %address,
                event_id = %event_id,
                "Map node references a missing story event"
            );
            return Ok(EntryOutcome::NotOffered);
        };

        self.begin(player, vec![definition], None, true).await
    }

    /// A player fighting cannot be pulled into a conversation.
    fn accepts_dialogue(&self, player_id: PlayerId) -> bool {
        match self.sessions.activity(player_id) {
            PlayerActivity::Combat { mob_id } => {
                tracing::debug!(
                    player_id = %player_id,
                    mob_id = %mob_id,
                    "Dialogue refused during combat"
                );
                false
            }
            PlayerActivity::Idle | PlayerActivity::Dialogue(_) => true,
        }
    }

    async fn begin(
        &self,
        player: PlayerRecord,
        candidates: Vec<EventDefinition>,
        speaker: Option<String>,
        is_story_event: bool,
    ) -> Result<EntryOutcome, DialogueError> {
        let player_id = player.id;
        let ledger = self.ports.quests.get_ledger(player_id).await?;

        // 1. Root quest gates narrow the candidates; the first survivor wins
        let Some(definition) = candidates
            .into_iter()
            .find(|d| quest_gate_open(&d.root_node, &ledger))
        else {
            tracing::debug!(player_id = %player_id, "No event passes its quest gates");
            return Ok(EntryOutcome::NotOffered);
        };

        // 2. Energy
        if definition.requires_energy && player.energy < self.energy_cost {
            tracing::info!(
                player_id = %player_id,
                event_id = %definition.id,
                energy = player.energy,
                "Player too tired for event"
            );
            return Ok(EntryOutcome::too_tired());
        }

        // 3. Root restrictions
        let ctx = PlayerContext::new(&player, &ledger);
        if !self.filter.node_allowed(&definition.root_node, &ctx) {
            tracing::debug!(
                player_id = %player_id,
                event_id = %definition.id,
                "Event root restricted for player"
            );
            return Ok(EntryOutcome::NotOffered);
        }

        // 4. Render the root
        let arrival = arrive(
            self.ports.quests.as_ref(),
            self.ports.random.as_ref(),
            &self.filter,
            &player,
            ledger,
            &definition.root_node,
        )
        .await?;

        // 5. Pay for the event once the root applied cleanly
        if definition.requires_energy {
            match self
                .ports
                .players
                .spend_energy(player_id, self.energy_cost)
                .await
            {
                Ok(remaining) => {
                    tracing::debug!(player_id = %player_id, remaining, "Energy spent on event");
                }
                Err(RepoError::ConstraintViolation(reason)) => {
                    tracing::info!(player_id = %player_id, reason = %reason, "Energy spend refused");
                    return Ok(EntryOutcome::too_tired());
                }
                Err(e) => return Err(e.into()),
            }
        }

        if !arrival.formatted.has_choices {
            self.sessions.clear_event(player_id);
            tracing::info!(
                player_id = %player_id,
                event_id = %definition.id,
                "Event ended at its root"
            );
            return Ok(EntryOutcome::Started(DialogueResponse::ended(
                arrival.formatted.text,
                speaker,
            )));
        }

        self.sessions.start_event(ActiveEventState {
            player_id,
            event_id: definition.id,
            current_node_id: arrival.node_id,
            current_node_snapshot: arrival.snapshot,
            actor_id: definition.actor_id,
            is_story_event,
            started_at: self.ports.clock.now(),
        });
        tracing::info!(
            player_id = %player_id,
            event_id = %definition.id,
            is_story_event,
            "Dialogue started"
        );

        Ok(EntryOutcome::Started(DialogueResponse::rendered(
            arrival.formatted.text,
            true,
            speaker,
        )))
    }
}

async fn load_player(ports: &DialoguePorts, player_id: PlayerId) -> Result<PlayerRecord, DialogueError> {
    ports
        .players
        .get(player_id)
        .await?
        .ok_or(DialogueError::PlayerNotFound(player_id))
}
