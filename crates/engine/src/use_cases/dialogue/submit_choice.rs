//! Continuing a dialogue flow with the player's numbered answer.
//!
//! The definition is reloaded on every answer so edits made while a player is
//! mid-flow take effect. The player's node is found again by identity; if the
//! edit removed it, the copy taken when the node was entered stands in.

use std::sync::Arc;

use mudtale_domain::{Choice, ChoiceKind, EventNode, PlayerId, PlayerRecord, QuestLedger};

use super::arrival::arrive;
use super::eligibility::{ChoiceFilter, PlayerContext};
use super::locate::find_node;
use super::skill_check::SkillCheckResolver;
use super::types::{
    DialogueEffect, DialogueError, DialogueResponse, LookupError, COMBAT_TEXT, NOT_A_NUMBER_TEXT,
};
use super::DialoguePorts;
use crate::stores::{ActiveEventState, SessionStore};

/// Apply a player's answer to their active event.
pub struct SubmitChoice {
    ports: DialoguePorts,
    sessions: Arc<SessionStore>,
    filter: Arc<ChoiceFilter>,
    skill_checks: Arc<SkillCheckResolver>,
}

impl SubmitChoice {
    pub fn new(
        ports: DialoguePorts,
        sessions: Arc<SessionStore>,
        filter: Arc<ChoiceFilter>,
        skill_checks: Arc<SkillCheckResolver>,
    ) -> Self {
        Self {
            ports,
            sessions,
            filter,
            skill_checks,
        }
    }

    /// Handle `raw_text` as an answer to the player's current node.
    ///
    /// # Returns
    /// * `Ok(DialogueResponse)` - the next node, an end of flow, or a re-prompt
    /// * `Err(DialogueError::NotInDialogue)` - the input belongs to chat
    pub async fn execute(
        &self,
        player_id: PlayerId,
        raw_text: &str,
    ) -> Result<DialogueResponse, DialogueError> {
        let _guard = self.sessions.lock_player(player_id).await;

        let state = self
            .sessions
            .active_event(player_id)
            .ok_or(DialogueError::NotInDialogue)?;

        match self.continue_flow(&state, raw_text).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(
                    player_id = %player_id,
                    event_id = %state.event_id,
                    error = %e,
                    "Dialogue ended after failed lookup"
                );
                self.sessions.clear_event(player_id);
                Ok(DialogueResponse::event_ended())
            }
        }
    }

    async fn continue_flow(
        &self,
        state: &ActiveEventState,
        raw_text: &str,
    ) -> Result<DialogueResponse, LookupError> {
        let player_id = state.player_id;

        // 1. Reload the definition
        let definition = self
            .ports
            .content
            .get(state.event_id)
            .await?
            .ok_or(LookupError::DefinitionMissing(state.event_id))?;

        // 2. Find the player's node, falling back to the entry snapshot
        let node = match find_node(&definition.root_node, state.current_node_id) {
            Some(node) => node,
            None => {
                tracing::debug!(
                    player_id = %player_id,
                    node_id = %state.current_node_id,
                    "Node missing from reloaded tree, using snapshot"
                );
                &state.current_node_snapshot
            }
        };

        let speaker = self.speaker(state).await?;
        let player = self
            .ports
            .players
            .get(player_id)
            .await?
            .ok_or(LookupError::PlayerMissing(player_id))?;
        let ledger = self.ports.quests.get_ledger(player_id).await?;

        // 3. Filter
        let ctx = PlayerContext::new(&player, &ledger);
        let eligible = self.filter.eligible(&node.choices, &ctx);

        // 4. Nothing left to choose
        if node.choices.is_empty() || eligible.is_empty() {
            self.sessions.clear_event(player_id);
            tracing::info!(player_id = %player_id, event_id = %state.event_id, "Dialogue finished");
            return Ok(DialogueResponse::end_of_flow(speaker));
        }

        // 5-6. Parse the answer
        let choice = match select(&eligible, raw_text) {
            Ok(choice) => choice,
            Err(prompt) => return Ok(DialogueResponse::reprompt(prompt, speaker)),
        };
        tracing::debug!(
            player_id = %player_id,
            event_id = %state.event_id,
            choice = %choice.text,
            "Choice selected"
        );

        // 7-9. Follow the transition
        match &choice.kind {
            ChoiceKind::Plain => {
                self.sessions.clear_event(player_id);
                tracing::info!(player_id = %player_id, event_id = %state.event_id, "Dialogue finished");
                Ok(DialogueResponse::end_of_flow(speaker))
            }
            ChoiceKind::CombatHook { mob_id } => {
                self.sessions.begin_combat(player_id, *mob_id);
                Ok(DialogueResponse::ended(COMBAT_TEXT, speaker)
                    .with_effect(DialogueEffect::StartCombat { mob_id: *mob_id }))
            }
            ChoiceKind::Teleport { node_address } => {
                let map_node = self
                    .ports
                    .map_nodes
                    .get_by_address(node_address)
                    .await?
                    .ok_or_else(|| LookupError::AddressUnresolved(node_address.clone()))?;
                self.sessions.clear_event(player_id);
                tracing::info!(
                    player_id = %player_id,
                    address = %node_address,
                    "Dialogue handed off to movement"
                );
                Ok(DialogueResponse::ended(
                    format!("You are taken to {}.", map_node.address),
                    speaker,
                )
                .with_effect(DialogueEffect::Teleport {
                    map_node_id: map_node.id,
                    address: map_node.address,
                }))
            }
            ChoiceKind::NextNode(next) => {
                self.advance(state, &player, ledger, next, speaker).await
            }
            ChoiceKind::SkillCheck(check) => {
                let (roll, next) = self.skill_checks.resolve(check, &player.stats);
                tracing::debug!(
                    player_id = %player_id,
                    stat = %check.stat,
                    target = check.target_number,
                    roll = roll.roll,
                    chance = roll.chance,
                    success = roll.outcome.is_success(),
                    "Skill check rolled"
                );
                self.advance(state, &player, ledger, next, speaker).await
            }
        }
    }

    /// Move the player to `next` and render it.
    async fn advance(
        &self,
        state: &ActiveEventState,
        player: &PlayerRecord,
        ledger: QuestLedger,
        next: &EventNode,
        speaker: Option<String>,
    ) -> Result<DialogueResponse, LookupError> {
        let arrival = arrive(
            self.ports.quests.as_ref(),
            self.ports.random.as_ref(),
            &self.filter,
            player,
            ledger,
            next,
        )
        .await?;

        if !arrival.formatted.has_choices {
            self.sessions.clear_event(player.id);
            tracing::info!(player_id = %player.id, event_id = %state.event_id, "Dialogue finished");
            return Ok(DialogueResponse::ended(arrival.formatted.text, speaker));
        }

        self.sessions
            .advance_event(player.id, arrival.node_id, arrival.snapshot);
        Ok(DialogueResponse::rendered(
            arrival.formatted.text,
            true,
            speaker,
        ))
    }

    async fn speaker(&self, state: &ActiveEventState) -> Result<Option<String>, LookupError> {
        let Some(actor_id) = state.actor_id else {
            return Ok(None);
        };
        let actor = self
            .ports
            .actors
            .get(actor_id)
            .await?
            .ok_or(LookupError::ActorMissing(actor_id))?;
        Ok(Some(actor.name))
    }
}

/// Pick the 1-based choice named by the player, or the re-prompt to show.
fn select<'c>(eligible: &[&'c Choice], raw_text: &str) -> Result<&'c Choice, String> {
    let Ok(number) = raw_text.trim().parse::<usize>() else {
        return Err(NOT_A_NUMBER_TEXT.to_string());
    };
    number
        .checked_sub(1)
        .and_then(|index| eligible.get(index).copied())
        .ok_or_else(|| format!("Please choose a number from 1 to {}.", eligible.len()))
}
